use serde::{Deserialize, Serialize};

use crate::cart::CartSnapshot;

/// A user-facing error reported by the commerce platform for a cart
/// mutation (e.g. an unknown discount code). Carried in the response body,
/// never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartUserError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub field: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartWarning {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAnalytics {
    pub cart_id: Option<String>,
}

/// Envelope returned by the cart gateway for every mutation and read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartResponse {
    pub cart: Option<CartSnapshot>,
    #[serde(default)]
    pub errors: Vec<CartUserError>,
    #[serde(default)]
    pub warnings: Vec<CartWarning>,
    #[serde(default)]
    pub analytics: CartAnalytics,
}

impl CartResponse {
    #[must_use]
    pub fn new(
        cart: Option<CartSnapshot>,
        errors: Vec<CartUserError>,
        warnings: Vec<CartWarning>,
    ) -> Self {
        let analytics = CartAnalytics {
            cart_id: cart.as_ref().map(|c| c.id.clone()),
        };
        Self {
            cart,
            errors,
            warnings,
            analytics,
        }
    }

    /// `true` when the platform accepted the mutation without user errors.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
