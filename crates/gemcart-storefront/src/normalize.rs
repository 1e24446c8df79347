//! Normalization from Storefront API wire types to [`gemcart_core`] types.

use gemcart_core::{
    AppliedGiftCard, BuyerIdentity, CartCost, CartLine, CartSnapshot, CartUserError, CartWarning,
    CatalogProduct, DiscountCode, Image, LineCost, Merchandise, Money, SelectedOption,
};

use crate::error::StorefrontError;
use crate::types::{
    WireCart, WireCartLine, WireImage, WireMoney, WireProduct, WireUserError, WireWarning,
};

/// Normalizes a wire cart into an authoritative [`CartSnapshot`].
///
/// # Errors
///
/// Returns [`StorefrontError::Normalization`] if a line's merchandise is not a
/// product variant (no id selected).
pub fn normalize_cart(cart: WireCart) -> Result<CartSnapshot, StorefrontError> {
    let lines = cart
        .lines
        .nodes
        .into_iter()
        .map(|line| normalize_line(line, &cart.id))
        .collect::<Result<Vec<_>, _>>()?;

    let buyer_identity = cart
        .buyer_identity
        .map(|b| BuyerIdentity {
            country_code: b.country_code,
            email: b.email.filter(|s| !s.is_empty()),
            phone: b.phone.filter(|s| !s.is_empty()),
        })
        .unwrap_or_default();

    Ok(CartSnapshot {
        id: cart.id,
        lines,
        total_quantity: cart.total_quantity,
        cost: CartCost {
            subtotal_amount: money(cart.cost.subtotal_amount),
            total_amount: money(cart.cost.total_amount),
            total_tax_amount: cart.cost.total_tax_amount.map(money),
        },
        discount_codes: cart
            .discount_codes
            .into_iter()
            .map(|d| DiscountCode {
                code: d.code,
                applicable: d.applicable,
            })
            .collect(),
        applied_gift_cards: cart
            .applied_gift_cards
            .into_iter()
            .map(|g| AppliedGiftCard {
                id: g.id,
                last_characters: g.last_characters,
                amount_used: money(g.amount_used),
            })
            .collect(),
        // An empty note and no note render the same; keep one representation.
        note: cart.note.filter(|n| !n.is_empty()),
        checkout_url: cart.checkout_url,
        buyer_identity,
    })
}

fn normalize_line(line: WireCartLine, cart_id: &str) -> Result<CartLine, StorefrontError> {
    let merchandise = line.merchandise;
    let Some(variant_id) = merchandise.id else {
        return Err(StorefrontError::Normalization {
            entity: format!("cart {cart_id} line {}", line.id),
            reason: "merchandise is not a product variant".into(),
        });
    };

    let (product_handle, product_title) = merchandise
        .product
        .map(|p| (p.handle, p.title))
        .unwrap_or_default();

    Ok(CartLine {
        id: line.id,
        merchandise: Merchandise {
            id: variant_id,
            title: merchandise.title.unwrap_or_default(),
            product_title,
            product_handle,
            image: merchandise.image.map(image),
            price: merchandise.price.map(money),
            selected_options: merchandise
                .selected_options
                .into_iter()
                .map(|o| SelectedOption {
                    name: o.name,
                    value: o.value,
                })
                .collect(),
        },
        quantity: line.quantity,
        cost: line.cost.map(|c| LineCost {
            amount_per_quantity: money(c.amount_per_quantity),
            total_amount: money(c.total_amount),
            compare_at_amount_per_quantity: c.compare_at_amount_per_quantity.map(money),
        }),
        is_optimistic: false,
    })
}

/// Normalizes a collection product for listing and attribute filtering.
#[must_use]
pub fn normalize_product(product: WireProduct) -> CatalogProduct {
    CatalogProduct {
        id: product.id,
        handle: product.handle,
        title: product.title,
        description_html: product.description_html.filter(|s| !s.trim().is_empty()),
        price: product.price_range.map(|p| money(p.min_variant_price)),
        tags: product.tags,
        available_for_sale: product.available_for_sale,
        featured_image: product.featured_image.map(image),
    }
}

pub(crate) fn user_error(err: WireUserError) -> CartUserError {
    CartUserError {
        code: err.code,
        field: err.field.unwrap_or_default(),
        message: err.message,
    }
}

pub(crate) fn warning(w: WireWarning) -> CartWarning {
    CartWarning {
        code: w.code,
        message: w.message,
        target: w.target,
    }
}

fn money(m: WireMoney) -> Money {
    Money {
        amount: m.amount,
        currency_code: m.currency_code,
    }
}

fn image(i: WireImage) -> Image {
    Image {
        url: i.url,
        alt_text: i.alt_text.filter(|s| !s.is_empty()),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
