//! The fixed set of cart actions a storefront form may submit, and the
//! validation that turns a raw `(action, inputs)` pair into a [`CartMutation`].
//!
//! Action names follow the platform's cart-form convention (`LinesAdd`,
//! `DiscountCodesUpdate`, ...). Kebab-case aliases (`add-lines`) are accepted
//! for hand-written forms.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cart::Merchandise;
use crate::CartInputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CartActionKind {
    LinesAdd,
    LinesUpdate,
    LinesRemove,
    NoteUpdate,
    DiscountCodesUpdate,
    GiftCardCodesUpdate,
    BuyerIdentityUpdate,
}

impl CartActionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LinesAdd => "LinesAdd",
            Self::LinesUpdate => "LinesUpdate",
            Self::LinesRemove => "LinesRemove",
            Self::NoteUpdate => "NoteUpdate",
            Self::DiscountCodesUpdate => "DiscountCodesUpdate",
            Self::GiftCardCodesUpdate => "GiftCardCodesUpdate",
            Self::BuyerIdentityUpdate => "BuyerIdentityUpdate",
        }
    }

    /// Whether a successful mutation of this kind changes the cart's lines.
    #[must_use]
    pub fn changes_lines(self) -> bool {
        matches!(self, Self::LinesAdd | Self::LinesUpdate | Self::LinesRemove)
    }
}

impl std::fmt::Display for CartActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CartActionKind {
    type Err = CartInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "LinesAdd" | "add-lines" => Ok(Self::LinesAdd),
            "LinesUpdate" | "update-lines" => Ok(Self::LinesUpdate),
            "LinesRemove" | "remove-lines" => Ok(Self::LinesRemove),
            "NoteUpdate" | "note-update" => Ok(Self::NoteUpdate),
            "DiscountCodesUpdate" | "discount-codes-update" => Ok(Self::DiscountCodesUpdate),
            "GiftCardCodesUpdate" | "gift-card-codes-update" => Ok(Self::GiftCardCodesUpdate),
            "BuyerIdentityUpdate" | "buyer-identity-update" => Ok(Self::BuyerIdentityUpdate),
            other => Err(CartInputError::UnsupportedAction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Variant details the submitting form already has on screen, used to
    /// render the optimistic line before the server answers.
    #[serde(default)]
    pub selected_variant: Option<Merchandise>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    /// Cart line id (not the variant id).
    pub id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerIdentityInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_access_token: Option<String>,
}

/// A validated cart mutation ready to send to the commerce API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartMutation {
    LinesAdd { lines: Vec<CartLineInput> },
    LinesUpdate { lines: Vec<CartLineUpdateInput> },
    LinesRemove { line_ids: Vec<String> },
    NoteUpdate { note: String },
    /// Full replacement list; a newly entered code is already merged in front.
    DiscountCodesUpdate { discount_codes: Vec<String> },
    GiftCardCodesUpdate { gift_card_codes: Vec<String> },
    BuyerIdentityUpdate { buyer_identity: BuyerIdentityInput },
}

impl CartMutation {
    #[must_use]
    pub fn kind(&self) -> CartActionKind {
        match self {
            Self::LinesAdd { .. } => CartActionKind::LinesAdd,
            Self::LinesUpdate { .. } => CartActionKind::LinesUpdate,
            Self::LinesRemove { .. } => CartActionKind::LinesRemove,
            Self::NoteUpdate { .. } => CartActionKind::NoteUpdate,
            Self::DiscountCodesUpdate { .. } => CartActionKind::DiscountCodesUpdate,
            Self::GiftCardCodesUpdate { .. } => CartActionKind::GiftCardCodesUpdate,
            Self::BuyerIdentityUpdate { .. } => CartActionKind::BuyerIdentityUpdate,
        }
    }

    /// Parses and validates the inputs for `action`.
    ///
    /// `inputs` of `None` is treated as an empty object.
    ///
    /// # Errors
    ///
    /// - [`CartInputError::UnsupportedAction`] for an unknown action name.
    /// - [`CartInputError::Validation`] when the inputs do not fit the action.
    pub fn parse(action: &str, inputs: Option<&Value>) -> Result<Self, CartInputError> {
        let kind = action.parse::<CartActionKind>()?;
        let empty = Value::Object(serde_json::Map::new());
        let inputs = inputs.unwrap_or(&empty);

        match kind {
            CartActionKind::LinesAdd => {
                let raw: LinesAddInputs = decode(kind, inputs)?;
                if raw.lines.is_empty() {
                    return Err(validation("LinesAdd requires at least one line"));
                }
                for line in &raw.lines {
                    if line.merchandise_id.trim().is_empty() {
                        return Err(validation("LinesAdd line is missing merchandiseId"));
                    }
                    if line.quantity == 0 {
                        return Err(validation("LinesAdd quantity must be at least 1"));
                    }
                }
                Ok(Self::LinesAdd { lines: raw.lines })
            }
            CartActionKind::LinesUpdate => {
                let raw: LinesUpdateInputs = decode(kind, inputs)?;
                if raw.lines.is_empty() {
                    return Err(validation("LinesUpdate requires at least one line"));
                }
                if raw.lines.iter().any(|l| l.id.trim().is_empty()) {
                    return Err(validation("LinesUpdate line is missing id"));
                }
                Ok(Self::LinesUpdate { lines: raw.lines })
            }
            CartActionKind::LinesRemove => {
                let raw: LinesRemoveInputs = decode(kind, inputs)?;
                let line_ids: Vec<String> = raw
                    .line_ids
                    .into_iter()
                    .filter(|id| !id.trim().is_empty())
                    .collect();
                if line_ids.is_empty() {
                    return Err(validation("LinesRemove requires at least one line id"));
                }
                Ok(Self::LinesRemove { line_ids })
            }
            CartActionKind::NoteUpdate => {
                let raw: NoteUpdateInputs = decode(kind, inputs)?;
                let note = raw
                    .note
                    .ok_or_else(|| validation("NoteUpdate requires a string note"))?;
                Ok(Self::NoteUpdate { note })
            }
            CartActionKind::DiscountCodesUpdate => {
                let raw: DiscountCodesInputs = decode(kind, inputs)?;
                Ok(Self::DiscountCodesUpdate {
                    discount_codes: prepend_code(raw.discount_code, raw.discount_codes),
                })
            }
            CartActionKind::GiftCardCodesUpdate => {
                let raw: GiftCardCodesInputs = decode(kind, inputs)?;
                Ok(Self::GiftCardCodesUpdate {
                    gift_card_codes: prepend_code(raw.gift_card_code, raw.gift_card_codes),
                })
            }
            CartActionKind::BuyerIdentityUpdate => {
                let raw: BuyerIdentityInputs = decode(kind, inputs)?;
                Ok(Self::BuyerIdentityUpdate {
                    buyer_identity: raw.buyer_identity,
                })
            }
        }
    }
}

/// A parsed cart form submission: the mutation plus an optional redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartForm {
    pub mutation: CartMutation,
    pub redirect_to: Option<String>,
}

impl CartForm {
    /// Parses a form submission. `inputs_json` is the raw JSON string from the
    /// form's `inputs` field; `redirect_field` is a top-level `redirectTo`
    /// form field, which wins over one embedded in the inputs.
    ///
    /// # Errors
    ///
    /// Returns [`CartInputError::Validation`] when `inputs_json` is not a JSON
    /// object, plus anything [`CartMutation::parse`] rejects.
    pub fn parse(
        action: &str,
        inputs_json: Option<&str>,
        redirect_field: Option<&str>,
    ) -> Result<Self, CartInputError> {
        let inputs = match inputs_json.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => {
                let value: Value = serde_json::from_str(raw)
                    .map_err(|e| validation(&format!("inputs is not valid JSON: {e}")))?;
                if !value.is_object() {
                    return Err(validation("inputs must be a JSON object"));
                }
                Some(value)
            }
            None => None,
        };

        let mutation = CartMutation::parse(action, inputs.as_ref())?;

        let redirect_to = redirect_field
            .map(str::to_string)
            .or_else(|| {
                inputs
                    .as_ref()
                    .and_then(|v| v.get("redirectTo"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            mutation,
            redirect_to,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LinesAddInputs {
    #[serde(default)]
    lines: Vec<CartLineInput>,
}

#[derive(Debug, Deserialize)]
struct LinesUpdateInputs {
    #[serde(default)]
    lines: Vec<CartLineUpdateInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinesRemoveInputs {
    #[serde(default)]
    line_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NoteUpdateInputs {
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscountCodesInputs {
    #[serde(default)]
    discount_code: Option<String>,
    #[serde(default)]
    discount_codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GiftCardCodesInputs {
    #[serde(default)]
    gift_card_code: Option<String>,
    #[serde(default)]
    gift_card_codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuyerIdentityInputs {
    buyer_identity: BuyerIdentityInput,
}

fn default_quantity() -> u32 {
    1
}

fn validation(message: &str) -> CartInputError {
    CartInputError::Validation(message.to_string())
}

fn decode<T: serde::de::DeserializeOwned>(
    kind: CartActionKind,
    inputs: &Value,
) -> Result<T, CartInputError> {
    T::deserialize(inputs).map_err(|e| CartInputError::Validation(format!("{kind} inputs: {e}")))
}

/// Puts a newly entered code in front of the already-applied codes so one
/// submission adds to the cart's codes instead of replacing them. Blank
/// entries and case-insensitive duplicates are dropped.
fn prepend_code(new_code: Option<String>, existing: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(existing.len() + 1);
    for code in new_code.into_iter().chain(existing) {
        let code = code.trim().to_string();
        if code.is_empty() || merged.iter().any(|c| c.eq_ignore_ascii_case(&code)) {
            continue;
        }
        merged.push(code);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_kind_accepts_platform_names_and_aliases() {
        assert_eq!("LinesAdd".parse::<CartActionKind>(), Ok(CartActionKind::LinesAdd));
        assert_eq!(
            "gift-card-codes-update".parse::<CartActionKind>(),
            Ok(CartActionKind::GiftCardCodesUpdate)
        );
    }

    #[test]
    fn unknown_action_is_unsupported() {
        let err = CartMutation::parse("CartDelete", None).unwrap_err();
        assert_eq!(err, CartInputError::UnsupportedAction("CartDelete".to_string()));
    }

    #[test]
    fn lines_add_defaults_quantity_to_one() {
        let inputs = json!({ "lines": [{ "merchandiseId": "gid://shopify/ProductVariant/1" }] });
        let mutation = CartMutation::parse("LinesAdd", Some(&inputs)).expect("parse");
        let CartMutation::LinesAdd { lines } = mutation else {
            panic!("expected LinesAdd");
        };
        assert_eq!(lines[0].quantity, 1);
    }

    #[test]
    fn lines_add_rejects_zero_quantity() {
        let inputs = json!({ "lines": [{ "merchandiseId": "v1", "quantity": 0 }] });
        assert!(matches!(
            CartMutation::parse("LinesAdd", Some(&inputs)),
            Err(CartInputError::Validation(_))
        ));
    }

    #[test]
    fn lines_update_allows_zero_quantity() {
        let inputs = json!({ "lines": [{ "id": "line-1", "quantity": 0 }] });
        let mutation = CartMutation::parse("LinesUpdate", Some(&inputs)).expect("parse");
        assert_eq!(mutation.kind(), CartActionKind::LinesUpdate);
    }

    #[test]
    fn lines_remove_requires_ids() {
        let inputs = json!({ "lineIds": ["  "] });
        assert!(matches!(
            CartMutation::parse("LinesRemove", Some(&inputs)),
            Err(CartInputError::Validation(_))
        ));
    }

    #[test]
    fn note_update_without_string_note_is_validation_error() {
        assert!(matches!(
            CartMutation::parse("NoteUpdate", Some(&json!({}))),
            Err(CartInputError::Validation(_))
        ));
        assert!(matches!(
            CartMutation::parse("NoteUpdate", Some(&json!({ "note": 42 }))),
            Err(CartInputError::Validation(_))
        ));
    }

    #[test]
    fn note_update_accepts_empty_note() {
        let mutation =
            CartMutation::parse("NoteUpdate", Some(&json!({ "note": "" }))).expect("parse");
        assert_eq!(mutation, CartMutation::NoteUpdate { note: String::new() });
    }

    #[test]
    fn discount_code_is_prepended_to_existing_codes() {
        let inputs = json!({ "discountCode": "SPARKLE10", "discountCodes": ["WELCOME"] });
        let mutation = CartMutation::parse("DiscountCodesUpdate", Some(&inputs)).expect("parse");
        assert_eq!(
            mutation,
            CartMutation::DiscountCodesUpdate {
                discount_codes: vec!["SPARKLE10".to_string(), "WELCOME".to_string()]
            }
        );
    }

    #[test]
    fn blank_discount_code_keeps_existing_list() {
        let inputs = json!({ "discountCode": "  ", "discountCodes": ["WELCOME"] });
        let mutation = CartMutation::parse("DiscountCodesUpdate", Some(&inputs)).expect("parse");
        assert_eq!(
            mutation,
            CartMutation::DiscountCodesUpdate {
                discount_codes: vec!["WELCOME".to_string()]
            }
        );
    }

    #[test]
    fn duplicate_gift_card_code_is_not_repeated() {
        let inputs = json!({ "giftCardCode": "abcd", "giftCardCodes": ["ABCD", "EFGH"] });
        let mutation = CartMutation::parse("GiftCardCodesUpdate", Some(&inputs)).expect("parse");
        assert_eq!(
            mutation,
            CartMutation::GiftCardCodesUpdate {
                gift_card_codes: vec!["abcd".to_string(), "EFGH".to_string()]
            }
        );
    }

    #[test]
    fn buyer_identity_requires_object() {
        assert!(matches!(
            CartMutation::parse("BuyerIdentityUpdate", Some(&json!({}))),
            Err(CartInputError::Validation(_))
        ));
        let mutation = CartMutation::parse(
            "BuyerIdentityUpdate",
            Some(&json!({ "buyerIdentity": { "countryCode": "CA" } })),
        )
        .expect("parse");
        assert_eq!(mutation.kind(), CartActionKind::BuyerIdentityUpdate);
    }

    #[test]
    fn cart_form_reads_redirect_from_inputs() {
        let form = CartForm::parse(
            "LinesAdd",
            Some(r#"{"lines":[{"merchandiseId":"v1"}],"redirectTo":"/checkout"}"#),
            None,
        )
        .expect("parse");
        assert_eq!(form.redirect_to.as_deref(), Some("/checkout"));
    }

    #[test]
    fn cart_form_field_redirect_wins() {
        let form = CartForm::parse(
            "LinesAdd",
            Some(r#"{"lines":[{"merchandiseId":"v1"}],"redirectTo":"/a"}"#),
            Some("/b"),
        )
        .expect("parse");
        assert_eq!(form.redirect_to.as_deref(), Some("/b"));
    }

    #[test]
    fn cart_form_rejects_non_object_inputs() {
        assert!(matches!(
            CartForm::parse("LinesAdd", Some("[1,2]"), None),
            Err(CartInputError::Validation(_))
        ));
        assert!(matches!(
            CartForm::parse("LinesAdd", Some("{not json"), None),
            Err(CartInputError::Validation(_))
        ));
    }

    #[test]
    fn changes_lines_only_for_line_actions() {
        assert!(CartActionKind::LinesRemove.changes_lines());
        assert!(!CartActionKind::NoteUpdate.changes_lines());
        assert!(!CartActionKind::DiscountCodesUpdate.changes_lines());
    }
}
