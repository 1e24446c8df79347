use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("PUBLIC_STORE_DOMAIN", "gems.myshopify.com");
    m.insert("PUBLIC_STOREFRONT_API_TOKEN", "public-token");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(parse_environment("development"), Environment::Development);
    assert_eq!(parse_environment("test"), Environment::Test);
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_fails_without_store_domain() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "PUBLIC_STORE_DOMAIN"),
        "expected MissingEnvVar(PUBLIC_STORE_DOMAIN), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_without_storefront_token() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("PUBLIC_STORE_DOMAIN", "gems.myshopify.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "PUBLIC_STOREFRONT_API_TOKEN"),
        "expected MissingEnvVar(PUBLIC_STOREFRONT_API_TOKEN), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_required_var_as_missing() {
    let mut map = full_env();
    map.insert("PUBLIC_STOREFRONT_API_TOKEN", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.storefront_api_version, "2025-01");
    assert_eq!(cfg.storefront_timeout_secs, 30);
    assert_eq!(cfg.storefront_user_agent, "gemcart/0.1 (storefront)");
    assert_eq!(cfg.storefront_max_retries, 2);
    assert_eq!(cfg.storefront_backoff_base_ms, 250);
    assert_eq!(cfg.cart_cookie_name, "cart");
    assert_eq!(cfg.cart_cookie_max_age_days, 14);
    assert_eq!(cfg.collection_page_size, 100);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("GEMCART_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GEMCART_BIND_ADDR"),
        "expected InvalidEnvVar(GEMCART_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_overrides_storefront_retries() {
    let mut map = full_env();
    map.insert("GEMCART_STOREFRONT_MAX_RETRIES", "5");
    map.insert("GEMCART_STOREFRONT_BACKOFF_BASE_MS", "10");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert_eq!(cfg.storefront_max_retries, 5);
    assert_eq!(cfg.storefront_backoff_base_ms, 10);
}

#[test]
fn build_app_config_rejects_non_numeric_timeout() {
    let mut map = full_env();
    map.insert("GEMCART_STOREFRONT_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GEMCART_STOREFRONT_TIMEOUT_SECS"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_cookie_name_with_separator() {
    let mut map = full_env();
    map.insert("GEMCART_CART_COOKIE_NAME", "cart;id");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GEMCART_CART_COOKIE_NAME"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_oversized_page_size() {
    let mut map = full_env();
    map.insert("GEMCART_COLLECTION_PAGE_SIZE", "500");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
}

#[test]
fn storefront_endpoint_adds_https_scheme() {
    let cfg = build_app_config(lookup_from_map(&full_env())).expect("config");
    assert_eq!(
        cfg.storefront_endpoint(),
        "https://gems.myshopify.com/api/2025-01/graphql.json"
    );
}

#[test]
fn storefront_endpoint_keeps_explicit_scheme() {
    let mut map = full_env();
    map.insert("PUBLIC_STORE_DOMAIN", "http://127.0.0.1:9000/");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert_eq!(
        cfg.storefront_endpoint(),
        "http://127.0.0.1:9000/api/2025-01/graphql.json"
    );
}

#[test]
fn debug_output_redacts_token() {
    let cfg = build_app_config(lookup_from_map(&full_env())).expect("config");
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("public-token"));
    assert!(rendered.contains("[redacted]"));
}
