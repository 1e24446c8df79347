use rust_decimal::Decimal;
use serde_json::json;

use super::*;
use crate::types::{WireCart, WireProduct};

fn wire_cart(value: serde_json::Value) -> WireCart {
    serde_json::from_value(value).expect("valid wire cart")
}

fn cart_json(lines: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "gid://shopify/Cart/c1?key=k",
        "checkoutUrl": "https://gems.example.com/cart/c/c1",
        "totalQuantity": 2,
        "note": "",
        "buyerIdentity": { "countryCode": "US", "email": null, "phone": "" },
        "discountCodes": [{ "code": "WELCOME", "applicable": true }],
        "appliedGiftCards": [],
        "cost": {
            "subtotalAmount": { "amount": "2500.0", "currencyCode": "USD" },
            "totalAmount": { "amount": "2500.0", "currencyCode": "USD" },
            "totalTaxAmount": null
        },
        "lines": { "nodes": lines }
    })
}

#[test]
fn normalize_cart_maps_lines_and_totals() {
    let cart = wire_cart(cart_json(json!([{
        "id": "gid://shopify/CartLine/1",
        "quantity": 2,
        "cost": {
            "amountPerQuantity": { "amount": "1250.0", "currencyCode": "USD" },
            "totalAmount": { "amount": "2500.0", "currencyCode": "USD" },
            "compareAtAmountPerQuantity": null
        },
        "merchandise": {
            "id": "gid://shopify/ProductVariant/9",
            "title": "Default Title",
            "price": { "amount": "1250.0", "currencyCode": "USD" },
            "image": { "url": "https://cdn.example.com/r.jpg", "altText": "" },
            "selectedOptions": [{ "name": "Title", "value": "Default Title" }],
            "product": { "handle": "round-1-25", "title": "Round 1.25ct" }
        }
    }])));

    let snapshot = normalize_cart(cart).expect("normalize");
    assert_eq!(snapshot.total_quantity, 2);
    assert_eq!(snapshot.lines.len(), 1);
    let line = &snapshot.lines[0];
    assert!(!line.is_optimistic);
    assert_eq!(line.merchandise.product_handle, "round-1-25");
    assert_eq!(line.merchandise.image.as_ref().unwrap().alt_text, None);
    assert_eq!(
        line.cost.as_ref().unwrap().total_amount.amount,
        Decimal::new(2500, 0)
    );
    assert_eq!(snapshot.discount_code_list(), vec!["WELCOME".to_string()]);
}

#[test]
fn normalize_cart_drops_empty_note_and_phone() {
    let snapshot = normalize_cart(wire_cart(cart_json(json!([])))).expect("normalize");
    assert!(snapshot.note.is_none());
    assert!(snapshot.buyer_identity.phone.is_none());
    assert_eq!(snapshot.buyer_identity.country_code.as_deref(), Some("US"));
}

#[test]
fn normalize_cart_rejects_non_variant_merchandise() {
    let cart = wire_cart(cart_json(json!([{
        "id": "gid://shopify/CartLine/2",
        "quantity": 1,
        "merchandise": {}
    }])));
    let err = normalize_cart(cart).unwrap_err();
    assert!(
        matches!(err, StorefrontError::Normalization { .. }),
        "expected Normalization, got: {err:?}"
    );
}

#[test]
fn normalize_product_reads_min_price_and_drops_blank_description() {
    let product: WireProduct = serde_json::from_value(json!({
        "id": "gid://shopify/Product/5",
        "handle": "oval-lab-grown",
        "title": "Oval Lab Grown 2ct",
        "descriptionHtml": "   ",
        "tags": ["lab-grown"],
        "availableForSale": false,
        "featuredImage": null,
        "priceRange": { "minVariantPrice": { "amount": "3100.00", "currencyCode": "USD" } }
    }))
    .expect("valid wire product");

    let product = normalize_product(product);
    assert!(product.description_html.is_none());
    assert!(!product.available_for_sale);
    assert_eq!(product.price.unwrap().amount, Decimal::new(310_000, 2));
}
