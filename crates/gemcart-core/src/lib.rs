pub mod app_config;
pub mod cart;
pub mod config;
pub mod mutation;
pub mod products;
pub mod response;

pub use app_config::{AppConfig, Environment};
pub use cart::{
    AppliedGiftCard, BuyerIdentity, CartCost, CartLine, CartSnapshot, DiscountCode, Image,
    LineCost, Merchandise, Money, SelectedOption,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use mutation::{
    BuyerIdentityInput, CartActionKind, CartForm, CartLineInput, CartLineUpdateInput,
    CartMutation,
};
pub use products::CatalogProduct;
pub use response::{CartAnalytics, CartResponse, CartUserError, CartWarning};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Rejections raised while turning a submitted cart form into a [`CartMutation`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartInputError {
    /// The `action` field named something outside the supported action set.
    #[error("unsupported cart action: {0}")]
    UnsupportedAction(String),

    /// The action was recognised but its inputs are malformed.
    #[error("invalid cart input: {0}")]
    Validation(String),
}
