//! Integration tests for `StorefrontClient`.
//!
//! Uses `wiremock` to stand up a local GraphQL endpoint per test so no real
//! network traffic is made. Cart operations are told apart by the root
//! field named in the posted document.

use gemcart_core::{CartLineInput, CartMutation};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gemcart_storefront::{StorefrontClient, StorefrontError};

const GRAPHQL_PATH: &str = "/api/2025-01/graphql.json";

fn test_client(server: &MockServer) -> StorefrontClient {
    test_client_with_retries(server, 0)
}

fn test_client_with_retries(server: &MockServer, max_retries: u32) -> StorefrontClient {
    StorefrontClient::with_endpoint(
        &format!("{}{GRAPHQL_PATH}", server.uri()),
        "test-token",
        5,
        "gemcart-test/0.1",
        max_retries,
        0,
    )
    .expect("failed to build test StorefrontClient")
}

/// Minimal valid cart with one line of `quantity` units.
fn cart_json(quantity: u32) -> serde_json::Value {
    json!({
        "id": "gid://shopify/Cart/c1?key=k",
        "checkoutUrl": "https://gems.example.com/cart/c/c1",
        "totalQuantity": quantity,
        "note": null,
        "buyerIdentity": null,
        "discountCodes": [],
        "appliedGiftCards": [],
        "cost": {
            "subtotalAmount": { "amount": "1250.0", "currencyCode": "USD" },
            "totalAmount": { "amount": "1250.0", "currencyCode": "USD" },
            "totalTaxAmount": null
        },
        "lines": { "nodes": [{
            "id": "gid://shopify/CartLine/1",
            "quantity": quantity,
            "cost": {
                "amountPerQuantity": { "amount": "1250.0", "currencyCode": "USD" },
                "totalAmount": { "amount": "1250.0", "currencyCode": "USD" },
                "compareAtAmountPerQuantity": null
            },
            "merchandise": {
                "id": "gid://shopify/ProductVariant/9",
                "title": "Default Title",
                "price": { "amount": "1250.0", "currencyCode": "USD" },
                "image": null,
                "selectedOptions": [],
                "product": { "handle": "round-1-25", "title": "Round 1.25ct" }
            }
        }] }
    })
}

fn payload(root: &str, cart: serde_json::Value, user_errors: serde_json::Value) -> serde_json::Value {
    json!({ "data": { root: { "cart": cart, "userErrors": user_errors, "warnings": [] } } })
}

fn add_line(quantity: u32) -> Vec<CartLineInput> {
    vec![CartLineInput {
        merchandise_id: "gid://shopify/ProductVariant/9".to_string(),
        quantity,
        selected_variant: None,
    }]
}

#[tokio::test]
async fn add_lines_sends_token_and_returns_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("X-Shopify-Storefront-Access-Token", "test-token"))
        .and(body_string_contains("cartLinesAdd"))
        .and(body_partial_json(json!({
            "variables": { "cartId": "gid://shopify/Cart/c1?key=k" }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(payload("cartLinesAdd", cart_json(2), json!([]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let response = client
        .add_lines("gid://shopify/Cart/c1?key=k", &add_line(2))
        .await
        .expect("add_lines");

    assert!(response.is_success());
    let cart = response.cart.expect("cart in payload");
    assert_eq!(cart.total_quantity, 2);
    assert!(!cart.lines[0].is_optimistic);
    assert_eq!(
        response.analytics.cart_id.as_deref(),
        Some("gid://shopify/Cart/c1?key=k")
    );
}

#[tokio::test]
async fn apply_without_cart_id_creates_cart_for_lines_add() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("cartCreate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(payload("cartCreate", cart_json(1), json!([]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mutation = CartMutation::LinesAdd {
        lines: add_line(1),
    };
    let response = client.apply(None, &mutation).await.expect("apply");
    assert_eq!(response.cart.expect("cart").lines.len(), 1);
}

#[tokio::test]
async fn apply_without_cart_id_rejects_non_add_mutations() {
    let server = MockServer::start().await;
    let client = test_client(&server);
    let mutation = CartMutation::NoteUpdate {
        note: "gift wrap".to_string(),
    };
    let result = client.apply(None, &mutation).await;
    assert!(matches!(result, Err(StorefrontError::MissingData { .. })));
}

#[tokio::test]
async fn user_errors_are_returned_as_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("cartDiscountCodesUpdate"))
        .and(body_partial_json(json!({
            "variables": { "discountCodes": ["NOPE", "WELCOME"] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload(
            "cartDiscountCodesUpdate",
            cart_json(1),
            json!([{ "code": "INVALID", "field": ["discountCodes"], "message": "Discount code NOPE is invalid" }]),
        )))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let response = client
        .update_discount_codes(
            "gid://shopify/Cart/c1?key=k",
            &["NOPE".to_string(), "WELCOME".to_string()],
        )
        .await
        .expect("user errors are not transport errors");

    assert!(!response.is_success());
    assert_eq!(response.errors[0].code.as_deref(), Some("INVALID"));
    assert_eq!(response.errors[0].field, vec!["discountCodes".to_string()]);
    assert!(response.cart.is_some());
}

#[tokio::test]
async fn top_level_graphql_errors_become_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Field 'bogus' doesn't exist on type 'Cart'" }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.get_cart("gid://shopify/Cart/c1?key=k").await;
    assert!(
        matches!(result, Err(StorefrontError::GraphQl { .. })),
        "expected GraphQl error, got: {result:?}"
    );
}

#[tokio::test]
async fn get_cart_returns_none_for_unknown_cart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("query Cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "cart": null } })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let cart = client
        .get_cart("gid://shopify/Cart/expired")
        .await
        .expect("get_cart");
    assert!(cart.is_none());
}

#[tokio::test]
async fn mutation_is_retried_after_429() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(payload("cartNoteUpdate", cart_json(1), json!([]))),
        )
        .mount(&server)
        .await;

    let client = test_client_with_retries(&server, 1);
    let result = client
        .update_note("gid://shopify/Cart/c1?key=k", "engrave: forever")
        .await;
    assert!(result.is_ok(), "expected Ok after retry, got: {result:?}");
}

#[tokio::test]
async fn mutation_is_not_retried_after_5xx() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client_with_retries(&server, 3);
    let result = client
        .add_lines("gid://shopify/Cart/c1?key=k", &add_line(1))
        .await;
    assert!(
        matches!(result, Err(StorefrontError::UnexpectedStatus { status: 503, .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn throttled_query_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Throttled", "extensions": { "code": "THROTTLED" } }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "cart": cart_json(3) } })))
        .mount(&server)
        .await;

    let client = test_client_with_retries(&server, 1);
    let cart = client
        .get_cart("gid://shopify/Cart/c1?key=k")
        .await
        .expect("get_cart after throttle")
        .expect("cart exists");
    assert_eq!(cart.cart.expect("snapshot").total_quantity, 3);
}

#[tokio::test]
async fn malformed_json_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.get_cart("gid://shopify/Cart/c1").await;
    assert!(matches!(result, Err(StorefrontError::Deserialize { .. })));
}

#[tokio::test]
async fn collection_products_follows_cursors() {
    let server = MockServer::start().await;

    let product = |id: u32, title: &str| {
        json!({
            "id": format!("gid://shopify/Product/{id}"),
            "handle": format!("diamond-{id}"),
            "title": title,
            "descriptionHtml": "<p>Round cut, 1.0 carat</p>",
            "tags": [],
            "availableForSale": true,
            "featuredImage": null,
            "priceRange": { "minVariantPrice": { "amount": "999.0", "currencyCode": "USD" } }
        })
    };

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "after": null } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "collection": {
            "products": {
                "pageInfo": { "hasNextPage": true, "endCursor": "c2" },
                "nodes": [product(1, "Round 1ct")]
            }
        } } })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "after": "c2" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "collection": {
            "products": {
                "pageInfo": { "hasNextPage": false, "endCursor": null },
                "nodes": [product(2, "Oval 2ct")]
            }
        } } })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let products = client
        .collection_products("diamonds", 1)
        .await
        .expect("collection_products");
    let titles: Vec<&str> = products.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Round 1ct", "Oval 2ct"]);
}

#[tokio::test]
async fn unknown_collection_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "collection": null } })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let products = client
        .collection_products("missing", 50)
        .await
        .expect("collection_products");
    assert!(products.is_empty());
}
