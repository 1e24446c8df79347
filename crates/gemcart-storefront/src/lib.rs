pub mod client;
pub mod error;
pub mod normalize;
mod queries;
mod retry;
pub mod types;

pub use client::StorefrontClient;
pub use error::StorefrontError;
pub use normalize::{normalize_cart, normalize_product};
