//! HTTP client for the Storefront GraphQL API.

use std::time::Duration;

use gemcart_core::{
    AppConfig, BuyerIdentityInput, CartLineInput, CartLineUpdateInput, CartMutation,
    CartResponse, CatalogProduct,
};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::StorefrontError;
use crate::normalize::{normalize_cart, normalize_product, user_error, warning};
use crate::queries::{self, Operation};
use crate::retry::{retry_with_backoff, Replay};
use crate::types::{CartPayload, GraphQlResponse, WireCart, WireCollection};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Maximum number of collection pages to fetch before returning an error.
/// Prevents infinite loops on cycling cursors.
const MAX_PAGES: usize = 50;

/// Client for the Storefront GraphQL API.
///
/// Cart operations return a [`CartResponse`]: user errors reported by the
/// platform (an unknown discount code, an out-of-stock variant) are data in
/// that response, while transport and GraphQL-level failures are
/// [`StorefrontError`]s.
pub struct StorefrontClient {
    client: Client,
    endpoint: Url,
    access_token: String,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    backoff_base_ms: u64,
}

impl StorefrontClient {
    /// Creates a client for the shop named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StorefrontError::InvalidEndpoint`] if the
    /// configured shop domain does not form a valid URL.
    pub fn new(config: &AppConfig) -> Result<Self, StorefrontError> {
        Self::with_endpoint(
            &config.storefront_endpoint(),
            &config.storefront_api_token,
            config.storefront_timeout_secs,
            &config.storefront_user_agent,
            config.storefront_max_retries,
            config.storefront_backoff_base_ms,
        )
    }

    /// Creates a client for an explicit GraphQL endpoint (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::new`].
    pub fn with_endpoint(
        endpoint: &str,
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, StorefrontError> {
        let endpoint = Url::parse(endpoint).map_err(|e| StorefrontError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            access_token: access_token.to_owned(),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Fetches the cart by id. Returns `Ok(None)` when the platform no longer
    /// knows the cart (expired or deleted).
    ///
    /// # Errors
    ///
    /// Propagates transport, GraphQL, and normalization failures.
    pub async fn get_cart(&self, cart_id: &str) -> Result<Option<CartResponse>, StorefrontError> {
        let query = queries::cart_query();
        let cart: Option<WireCart> = self
            .execute(
                queries::CART_ROOT_FIELD,
                &query,
                json!({ "cartId": cart_id }),
                Replay::Safe,
            )
            .await?;
        match cart {
            Some(cart) => Ok(Some(CartResponse::new(
                Some(normalize_cart(cart)?),
                Vec::new(),
                Vec::new(),
            ))),
            None => Ok(None),
        }
    }

    /// Creates a cart, optionally with initial lines.
    ///
    /// # Errors
    ///
    /// Propagates transport, GraphQL, and normalization failures.
    pub async fn create_cart(
        &self,
        lines: &[CartLineInput],
    ) -> Result<CartResponse, StorefrontError> {
        let variables = json!({ "input": { "lines": wire_line_inputs(lines) } });
        self.cart_mutation(queries::CART_CREATE, variables).await
    }

    /// # Errors
    ///
    /// Propagates transport, GraphQL, and normalization failures.
    pub async fn add_lines(
        &self,
        cart_id: &str,
        lines: &[CartLineInput],
    ) -> Result<CartResponse, StorefrontError> {
        let variables = json!({ "cartId": cart_id, "lines": wire_line_inputs(lines) });
        self.cart_mutation(queries::CART_LINES_ADD, variables).await
    }

    /// # Errors
    ///
    /// Propagates transport, GraphQL, and normalization failures.
    pub async fn update_lines(
        &self,
        cart_id: &str,
        lines: &[CartLineUpdateInput],
    ) -> Result<CartResponse, StorefrontError> {
        let lines: Vec<Value> = lines
            .iter()
            .map(|l| json!({ "id": l.id, "quantity": l.quantity }))
            .collect();
        let variables = json!({ "cartId": cart_id, "lines": lines });
        self.cart_mutation(queries::CART_LINES_UPDATE, variables).await
    }

    /// # Errors
    ///
    /// Propagates transport, GraphQL, and normalization failures.
    pub async fn remove_lines(
        &self,
        cart_id: &str,
        line_ids: &[String],
    ) -> Result<CartResponse, StorefrontError> {
        let variables = json!({ "cartId": cart_id, "lineIds": line_ids });
        self.cart_mutation(queries::CART_LINES_REMOVE, variables).await
    }

    /// # Errors
    ///
    /// Propagates transport, GraphQL, and normalization failures.
    pub async fn update_note(
        &self,
        cart_id: &str,
        note: &str,
    ) -> Result<CartResponse, StorefrontError> {
        let variables = json!({ "cartId": cart_id, "note": note });
        self.cart_mutation(queries::CART_NOTE_UPDATE, variables).await
    }

    /// Replaces the cart's discount codes with `codes`.
    ///
    /// # Errors
    ///
    /// Propagates transport, GraphQL, and normalization failures.
    pub async fn update_discount_codes(
        &self,
        cart_id: &str,
        codes: &[String],
    ) -> Result<CartResponse, StorefrontError> {
        let variables = json!({ "cartId": cart_id, "discountCodes": codes });
        self.cart_mutation(queries::CART_DISCOUNT_CODES_UPDATE, variables)
            .await
    }

    /// # Errors
    ///
    /// Propagates transport, GraphQL, and normalization failures.
    pub async fn update_gift_card_codes(
        &self,
        cart_id: &str,
        codes: &[String],
    ) -> Result<CartResponse, StorefrontError> {
        let variables = json!({ "cartId": cart_id, "giftCardCodes": codes });
        self.cart_mutation(queries::CART_GIFT_CARD_CODES_UPDATE, variables)
            .await
    }

    /// # Errors
    ///
    /// Propagates transport, GraphQL, and normalization failures.
    pub async fn update_buyer_identity(
        &self,
        cart_id: &str,
        buyer_identity: &BuyerIdentityInput,
    ) -> Result<CartResponse, StorefrontError> {
        let variables = json!({ "cartId": cart_id, "buyerIdentity": buyer_identity });
        self.cart_mutation(queries::CART_BUYER_IDENTITY_UPDATE, variables)
            .await
    }

    /// Dispatches a validated [`CartMutation`] against `cart_id`.
    ///
    /// A `LinesAdd` without a cart id creates the cart with those lines.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::MissingData`] when any other mutation is
    /// attempted without a cart id, plus anything the underlying call returns.
    pub async fn apply(
        &self,
        cart_id: Option<&str>,
        mutation: &CartMutation,
    ) -> Result<CartResponse, StorefrontError> {
        let Some(cart_id) = cart_id else {
            return match mutation {
                CartMutation::LinesAdd { lines } => self.create_cart(lines).await,
                other => Err(StorefrontError::MissingData {
                    operation: format!("{} without a cart id", other.kind()),
                }),
            };
        };

        match mutation {
            CartMutation::LinesAdd { lines } => self.add_lines(cart_id, lines).await,
            CartMutation::LinesUpdate { lines } => self.update_lines(cart_id, lines).await,
            CartMutation::LinesRemove { line_ids } => self.remove_lines(cart_id, line_ids).await,
            CartMutation::NoteUpdate { note } => self.update_note(cart_id, note).await,
            CartMutation::DiscountCodesUpdate { discount_codes } => {
                self.update_discount_codes(cart_id, discount_codes).await
            }
            CartMutation::GiftCardCodesUpdate { gift_card_codes } => {
                self.update_gift_card_codes(cart_id, gift_card_codes).await
            }
            CartMutation::BuyerIdentityUpdate { buyer_identity } => {
                self.update_buyer_identity(cart_id, buyer_identity).await
            }
        }
    }

    /// Fetches every product in a collection, following `pageInfo` cursors.
    ///
    /// Returns an empty list when the collection handle is unknown.
    ///
    /// # Errors
    ///
    /// Propagates any page failure; products from earlier pages are discarded.
    /// Returns [`StorefrontError::PaginationLimit`] past [`MAX_PAGES`] pages.
    pub async fn collection_products(
        &self,
        handle: &str,
        page_size: u32,
    ) -> Result<Vec<CatalogProduct>, StorefrontError> {
        let mut products = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let variables = json!({ "handle": handle, "first": page_size, "after": cursor });
            let collection: Option<WireCollection> = self
                .execute(
                    queries::COLLECTION_ROOT_FIELD,
                    queries::COLLECTION_PRODUCTS_QUERY,
                    variables,
                    Replay::Safe,
                )
                .await?;

            let Some(collection) = collection else {
                tracing::debug!(handle, "collection not found");
                return Ok(products);
            };

            let page_info = collection.products.page_info;
            products.extend(collection.products.nodes.into_iter().map(normalize_product));

            cursor = page_info
                .filter(|p| p.has_next_page)
                .and_then(|p| p.end_cursor);
            if cursor.is_none() {
                return Ok(products);
            }
        }

        Err(StorefrontError::PaginationLimit {
            handle: handle.to_owned(),
            max_pages: MAX_PAGES,
        })
    }

    async fn cart_mutation(
        &self,
        operation: Operation,
        variables: Value,
    ) -> Result<CartResponse, StorefrontError> {
        let document = operation.document();
        let payload: Option<CartPayload> = self
            .execute(
                operation.root_field,
                &document,
                variables,
                Replay::RejectedOnly,
            )
            .await?;
        let payload = payload.ok_or_else(|| StorefrontError::MissingData {
            operation: operation.root_field.to_owned(),
        })?;

        let cart = payload.cart.map(normalize_cart).transpose()?;
        let errors: Vec<_> = payload.user_errors.into_iter().map(user_error).collect();
        let warnings = payload.warnings.into_iter().map(warning).collect();

        if !errors.is_empty() {
            tracing::info!(
                operation = operation.root_field,
                error_count = errors.len(),
                "storefront reported cart user errors"
            );
        }

        Ok(CartResponse::new(cart, errors, warnings))
    }

    /// Posts a GraphQL document and deserializes `data.<root_field>`.
    async fn execute<T: DeserializeOwned>(
        &self,
        root_field: &str,
        query: &str,
        variables: Value,
        replay: Replay,
    ) -> Result<T, StorefrontError> {
        let body = json!({ "query": query, "variables": variables });

        let envelope = retry_with_backoff(self.max_retries, self.backoff_base_ms, replay, || {
            let body = &body;
            async move {
                let response = self
                    .client
                    .post(self.endpoint.clone())
                    .header(ACCESS_TOKEN_HEADER, &self.access_token)
                    .json(body)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(1);
                    return Err(StorefrontError::RateLimited { retry_after_secs });
                }

                if !status.is_success() {
                    return Err(StorefrontError::UnexpectedStatus {
                        status: status.as_u16(),
                        operation: root_field.to_owned(),
                    });
                }

                let text = response.text().await?;
                let envelope = serde_json::from_str::<GraphQlResponse>(&text).map_err(|e| {
                    StorefrontError::Deserialize {
                        context: format!("{root_field} response envelope"),
                        source: e,
                    }
                })?;

                // Query-cost throttling is reported in-band; the query was not executed.
                if envelope.errors.iter().any(|e| {
                    e.extensions.as_ref().and_then(|x| x.code.as_deref()) == Some("THROTTLED")
                }) {
                    return Err(StorefrontError::RateLimited { retry_after_secs: 1 });
                }

                Ok(envelope)
            }
        })
        .await?;

        if !envelope.errors.is_empty() {
            let messages = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            tracing::warn!(operation = root_field, %messages, "storefront GraphQL errors");
            return Err(StorefrontError::GraphQl {
                operation: root_field.to_owned(),
                messages,
            });
        }

        let mut data = envelope.data.ok_or_else(|| StorefrontError::MissingData {
            operation: root_field.to_owned(),
        })?;
        let field = data.get_mut(root_field).map(Value::take).unwrap_or(Value::Null);

        serde_json::from_value(field).map_err(|e| StorefrontError::Deserialize {
            context: root_field.to_owned(),
            source: e,
        })
    }
}

fn wire_line_inputs(lines: &[CartLineInput]) -> Vec<Value> {
    lines
        .iter()
        .map(|l| json!({ "merchandiseId": l.merchandise_id, "quantity": l.quantity }))
        .collect()
}
