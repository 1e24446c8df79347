//! Cart domain types.
//!
//! These mirror the cart fragment the storefront requests from the Storefront
//! API, already normalized (connections flattened, empty strings treated as
//! absent). Field names serialize in camelCase so the JSON handed to the
//! browser keeps the platform's shape.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount. The Storefront API sends amounts as decimal strings
/// (`"1250.00"`), which is also how they serialize back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: Decimal,
    pub currency_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: String,
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

/// The purchasable variant a cart line points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchandise {
    /// Variant GID, e.g. `"gid://shopify/ProductVariant/123"`.
    pub id: String,
    /// Variant title; `"Default Title"` for single-variant products.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub product_title: String,
    #[serde(default)]
    pub product_handle: String,
    #[serde(default)]
    pub image: Option<Image>,
    /// Unit price. Known for lines the server returned, and for optimistic
    /// lines when the submitting form supplied the selected variant.
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

impl Merchandise {
    /// A merchandise reference carrying only the variant id.
    #[must_use]
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            product_title: String::new(),
            product_handle: String::new(),
            image: None,
            price: None,
            selected_options: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineCost {
    pub amount_per_quantity: Money,
    pub total_amount: Money,
    #[serde(default)]
    pub compare_at_amount_per_quantity: Option<Money>,
}

/// One merchandise entry within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: String,
    pub merchandise: Merchandise,
    pub quantity: u32,
    /// `None` while the line is optimistic: pricing needs the server round trip.
    #[serde(default)]
    pub cost: Option<LineCost>,
    /// `true` while a pending mutation referencing this line is unresolved.
    #[serde(default)]
    pub is_optimistic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub subtotal_amount: Money,
    pub total_amount: Money,
    #[serde(default)]
    pub total_tax_amount: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCode {
    pub code: String,
    /// Whether the code currently applies to the cart contents.
    pub applicable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedGiftCard {
    pub id: String,
    pub last_characters: String,
    pub amount_used: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerIdentity {
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Server-confirmed cart state. Produced only from a Storefront API response
/// and replaced wholesale after every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Cart GID, e.g. `"gid://shopify/Cart/c1-abc?key=def"`.
    pub id: String,
    pub lines: Vec<CartLine>,
    pub total_quantity: u32,
    pub cost: CartCost,
    #[serde(default)]
    pub discount_codes: Vec<DiscountCode>,
    #[serde(default)]
    pub applied_gift_cards: Vec<AppliedGiftCard>,
    #[serde(default)]
    pub note: Option<String>,
    pub checkout_url: String,
    #[serde(default)]
    pub buyer_identity: BuyerIdentity,
}

impl CartSnapshot {
    /// Codes already applied to the cart, in the order the platform reports them.
    #[must_use]
    pub fn discount_code_list(&self) -> Vec<String> {
        self.discount_codes.iter().map(|d| d.code.clone()).collect()
    }

    #[must_use]
    pub fn line(&self, line_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_serializes_amount_as_string() {
        let money = Money {
            amount: Decimal::new(125_000, 2),
            currency_code: "USD".to_string(),
        };
        let json = serde_json::to_value(&money).expect("serialize");
        assert_eq!(json["amount"], "1250.00");
        assert_eq!(json["currencyCode"], "USD");
    }

    #[test]
    fn cart_line_defaults_optimistic_flag_to_false() {
        let line: CartLine = serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/CartLine/1",
            "merchandise": { "id": "gid://shopify/ProductVariant/9" },
            "quantity": 1
        }))
        .expect("deserialize");
        assert!(!line.is_optimistic);
        assert!(line.cost.is_none());
        assert_eq!(line.merchandise, Merchandise::from_id("gid://shopify/ProductVariant/9"));
    }
}
