use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Top-level GraphQL `errors` (bad query, access denied, throttled
    /// query cost). Cart user errors are not reported through this variant.
    #[error("GraphQL errors from {operation}: {messages}")]
    GraphQl { operation: String, messages: String },

    #[error("rate limited by storefront API (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {operation}")]
    UnexpectedStatus { status: u16, operation: String },

    #[error("{operation} returned no data")]
    MissingData { operation: String },

    #[error("normalization error for {entity}: {reason}")]
    Normalization { entity: String, reason: String },

    #[error("pagination limit reached for collection {handle}: exceeded {max_pages} pages")]
    PaginationLimit { handle: String, max_pages: usize },

    #[error("invalid storefront endpoint \"{endpoint}\": {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
