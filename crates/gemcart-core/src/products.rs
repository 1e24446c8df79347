use serde::{Deserialize, Serialize};

use crate::cart::{Image, Money};

/// A product from a storefront collection, normalized for listing and
/// attribute filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    /// Product GID, e.g. `"gid://shopify/Product/42"`.
    pub id: String,
    /// URL slug, e.g. `"round-1-25-carat-g-vs1"`.
    pub handle: String,
    pub title: String,
    /// Raw HTML description (`descriptionHtml`). Gemstone attributes live here
    /// as free text, not as structured fields.
    #[serde(default)]
    pub description_html: Option<String>,
    /// Minimum variant price, if the platform reported one.
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_available")]
    pub available_for_sale: bool,
    #[serde(default)]
    pub featured_image: Option<Image>,
}

impl CatalogProduct {
    /// Description text, or an empty string when the product has none.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description_html.as_deref().unwrap_or("")
    }
}

/// Availability defaults to `true` when a product dump omits the field.
fn default_available() -> bool {
    true
}
