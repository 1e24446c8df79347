use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Shop domain serving the Storefront API, e.g. `"gems.myshopify.com"`.
    pub store_domain: String,
    pub storefront_api_token: String,
    pub storefront_api_version: String,
    pub storefront_timeout_secs: u64,
    pub storefront_user_agent: String,
    pub storefront_max_retries: u32,
    pub storefront_backoff_base_ms: u64,
    pub cart_cookie_name: String,
    pub cart_cookie_max_age_days: u32,
    pub collection_page_size: u32,
}

impl AppConfig {
    /// GraphQL endpoint for the configured shop and API version.
    ///
    /// A domain without a scheme is assumed to be served over HTTPS.
    #[must_use]
    pub fn storefront_endpoint(&self) -> String {
        let domain = self.store_domain.trim_end_matches('/');
        let base = if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        };
        format!("{base}/api/{}/graphql.json", self.storefront_api_version)
    }

    /// Cookie lifetime in seconds.
    #[must_use]
    pub fn cart_cookie_max_age_secs(&self) -> u64 {
        u64::from(self.cart_cookie_max_age_days) * 24 * 60 * 60
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("store_domain", &self.store_domain)
            .field("storefront_api_token", &"[redacted]")
            .field("storefront_api_version", &self.storefront_api_version)
            .field("storefront_timeout_secs", &self.storefront_timeout_secs)
            .field("storefront_user_agent", &self.storefront_user_agent)
            .field("storefront_max_retries", &self.storefront_max_retries)
            .field(
                "storefront_backoff_base_ms",
                &self.storefront_backoff_base_ms,
            )
            .field("cart_cookie_name", &self.cart_cookie_name)
            .field("cart_cookie_max_age_days", &self.cart_cookie_max_age_days)
            .field("collection_page_size", &self.collection_page_size)
            .finish()
    }
}
