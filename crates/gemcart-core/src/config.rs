use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let store_domain = require("PUBLIC_STORE_DOMAIN")?;
    let storefront_api_token = require("PUBLIC_STOREFRONT_API_TOKEN")?;

    let env = parse_environment(&or_default("GEMCART_ENV", "development"));
    let bind_addr = parse_addr("GEMCART_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("GEMCART_LOG_LEVEL", "info");

    let storefront_api_version = or_default("GEMCART_STOREFRONT_API_VERSION", "2025-01");
    let storefront_timeout_secs = parse_u64("GEMCART_STOREFRONT_TIMEOUT_SECS", "30")?;
    let storefront_user_agent = or_default("GEMCART_STOREFRONT_USER_AGENT", "gemcart/0.1 (storefront)");
    let storefront_max_retries = parse_u32("GEMCART_STOREFRONT_MAX_RETRIES", "2")?;
    let storefront_backoff_base_ms = parse_u64("GEMCART_STOREFRONT_BACKOFF_BASE_MS", "250")?;

    let cart_cookie_name = or_default("GEMCART_CART_COOKIE_NAME", "cart");
    if cart_cookie_name.is_empty()
        || !cart_cookie_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigError::InvalidEnvVar {
            var: "GEMCART_CART_COOKIE_NAME".to_string(),
            reason: format!("'{cart_cookie_name}' is not a valid cookie name"),
        });
    }
    let cart_cookie_max_age_days = parse_u32("GEMCART_CART_COOKIE_MAX_AGE_DAYS", "14")?;

    let collection_page_size = parse_u32("GEMCART_COLLECTION_PAGE_SIZE", "100")?;
    if !(1..=250).contains(&collection_page_size) {
        return Err(ConfigError::InvalidEnvVar {
            var: "GEMCART_COLLECTION_PAGE_SIZE".to_string(),
            reason: format!("{collection_page_size} is outside 1..=250"),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        store_domain,
        storefront_api_token,
        storefront_api_version,
        storefront_timeout_secs,
        storefront_user_agent,
        storefront_max_retries,
        storefront_backoff_base_ms,
        cart_cookie_name,
        cart_cookie_max_age_days,
        collection_page_size,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
