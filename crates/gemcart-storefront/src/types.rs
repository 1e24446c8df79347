//! Storefront API response shapes.
//!
//! ## Observed shape
//!
//! ### Envelope
//! Every response is `{"data": ..., "errors": [...]}`. `errors` is absent on
//! success. Query-cost throttling arrives as HTTP 200 with an error whose
//! `extensions.code` is `"THROTTLED"`, not as a 429.
//!
//! ### Money
//! `amount` is a decimal string (`"1250.0"`); trailing zeros are not
//! guaranteed, so it is parsed into a `Decimal` rather than kept as text.
//!
//! ### Cart lines
//! `lines` is a connection. With `nodes` selected the edges wrapper is
//! skipped. `merchandise` is a union; only `ProductVariant` members carry the
//! fields we select, so a non-variant line arrives as `{}`.
//!
//! ### `cart(id:)`
//! Returns `null` (not an error) for an expired or unknown cart id.
//!
//! ### `userErrors`
//! `field` is a path array (`["lines", "0", "quantity"]`) or `null`.

use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<GraphQlErrorExtensions>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
}

/// Payload shared by every cart mutation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    #[serde(default)]
    pub cart: Option<WireCart>,
    #[serde(default)]
    pub user_errors: Vec<WireUserError>,
    #[serde(default)]
    pub warnings: Vec<WireWarning>,
}

#[derive(Debug, Deserialize)]
pub struct WireUserError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct WireWarning {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMoney {
    pub amount: Decimal,
    pub currency_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCart {
    pub id: String,
    pub checkout_url: String,
    pub total_quantity: u32,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub buyer_identity: Option<WireBuyerIdentity>,
    #[serde(default)]
    pub discount_codes: Vec<WireDiscountCode>,
    #[serde(default)]
    pub applied_gift_cards: Vec<WireAppliedGiftCard>,
    pub cost: WireCartCost,
    pub lines: WireConnection<WireCartLine>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBuyerIdentity {
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireDiscountCode {
    pub code: String,
    pub applicable: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAppliedGiftCard {
    pub id: String,
    pub last_characters: String,
    pub amount_used: WireMoney,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCartCost {
    pub subtotal_amount: WireMoney,
    pub total_amount: WireMoney,
    #[serde(default)]
    pub total_tax_amount: Option<WireMoney>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireConnection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
    #[serde(default)]
    pub page_info: Option<WirePageInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireCartLine {
    pub id: String,
    pub quantity: u32,
    #[serde(default)]
    pub cost: Option<WireLineCost>,
    pub merchandise: WireMerchandise,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireLineCost {
    pub amount_per_quantity: WireMoney,
    pub total_amount: WireMoney,
    #[serde(default)]
    pub compare_at_amount_per_quantity: Option<WireMoney>,
}

/// Only populated for `ProductVariant` union members.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMerchandise {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<WireMoney>,
    #[serde(default)]
    pub image: Option<WireImage>,
    #[serde(default)]
    pub selected_options: Vec<WireSelectedOption>,
    #[serde(default)]
    pub product: Option<WireProductRef>,
}

#[derive(Debug, Deserialize)]
pub struct WireSelectedOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct WireProductRef {
    pub handle: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct WireCollection {
    pub products: WireConnection<WireProduct>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProduct {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description_html: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_available")]
    pub available_for_sale: bool,
    #[serde(default)]
    pub featured_image: Option<WireImage>,
    #[serde(default)]
    pub price_range: Option<WirePriceRange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePriceRange {
    pub min_variant_price: WireMoney,
}

/// Availability defaults to `true` when the field is not selected.
fn default_available() -> bool {
    true
}
