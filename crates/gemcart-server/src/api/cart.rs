//! Cart mutation gateway: `POST /cart` and `GET /cart`.
//!
//! The cart id lives only in a cookie. Successful responses return the
//! platform's `{cart, errors, warnings, analytics}` envelope unwrapped, so a
//! storefront page can render from it directly.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use gemcart_core::{CartActionKind, CartForm, CartInputError, CartResponse};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_storefront_error, ApiError, AppState};

/// Cookie-safe characters are left as-is; everything else is escaped.
const COOKIE_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Deserialize)]
pub(super) struct CartFormBody {
    #[serde(default)]
    action: String,
    /// JSON object encoded as a string.
    #[serde(default)]
    inputs: Option<String>,
    #[serde(default, rename = "redirectTo")]
    redirect_to: Option<String>,
}

pub(super) async fn submit_cart_form(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Form(body): Form<CartFormBody>,
) -> Result<Response, ApiError> {
    if body.action.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "form field `action` is required",
        ));
    }

    let form = CartForm::parse(
        &body.action,
        body.inputs.as_deref(),
        body.redirect_to.as_deref(),
    )
    .map_err(|e| map_input_error(req_id.0.clone(), &e))?;
    let kind = form.mutation.kind();
    let redirect_to = form.redirect_to.filter(|target| {
        let usable = is_redirect_target(target);
        if !usable {
            tracing::debug!(%target, "ignoring redirect to unsupported target");
        }
        usable
    });

    let cart_id = read_cart_cookie(&headers, &state.config.cart_cookie_name);
    if cart_id.is_none() && kind != CartActionKind::LinesAdd {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("{kind} requires an existing cart"),
        ));
    }

    let response = state
        .storefront
        .apply(cart_id.as_deref(), &form.mutation)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    tracing::info!(
        request_id = %req_id.0,
        action = %kind,
        created = cart_id.is_none(),
        user_errors = response.errors.len(),
        "cart mutation applied"
    );

    let cookie = response.cart.as_ref().map(|cart| {
        cart_cookie(
            &state.config.cart_cookie_name,
            &cart.id,
            state.config.cart_cookie_max_age_secs(),
        )
    });

    let mut res = match redirect_to {
        Some(target) => Redirect::to(&target).into_response(),
        None => Json(response).into_response(),
    };
    if let Some(value) = cookie.and_then(|c| HeaderValue::from_str(&c).ok()) {
        res.headers_mut().append(header::SET_COOKIE, value);
    }
    Ok(res)
}

pub(super) async fn get_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let cookie_name = &state.config.cart_cookie_name;
    let Some(cart_id) = read_cart_cookie(&headers, cookie_name) else {
        return Ok(Json(CartResponse::default()).into_response());
    };

    let cart = state
        .storefront
        .get_cart(&cart_id)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    match cart {
        Some(cart) => Ok(Json(cart).into_response()),
        None => {
            tracing::info!(request_id = %req_id.0, "cart cookie points at an expired cart");
            let mut res = Json(CartResponse::default()).into_response();
            if let Ok(value) = HeaderValue::from_str(&expired_cart_cookie(cookie_name)) {
                res.headers_mut().append(header::SET_COOKIE, value);
            }
            Ok(res)
        }
    }
}

fn map_input_error(request_id: String, error: &CartInputError) -> ApiError {
    let code = match error {
        CartInputError::UnsupportedAction(_) => "unsupported_action",
        CartInputError::Validation(_) => "validation_error",
    };
    tracing::debug!(error = %error, code, "rejected cart form");
    ApiError::new(request_id, code, error.to_string())
}

/// Reads and percent-decodes the cart id cookie. Empty values count as absent.
pub(super) fn read_cart_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| percent_decode_str(value).decode_utf8_lossy().into_owned())
        .filter(|value| !value.is_empty())
}

pub(super) fn cart_cookie(name: &str, cart_id: &str, max_age_secs: u64) -> String {
    let value = utf8_percent_encode(cart_id, COOKIE_VALUE);
    format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

fn expired_cart_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Relative paths and absolute http(s) URLs that fit in a `Location`
/// header. Paths browsers read as protocol-relative (`//host`, `/\host`)
/// are rejected.
pub(super) fn is_redirect_target(target: &str) -> bool {
    if HeaderValue::from_str(target).is_err() {
        return false;
    }
    if target.starts_with('/') {
        return !(target.starts_with("//") || target.starts_with("/\\"));
    }
    reqwest::Url::parse(target).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_cookie_encodes_gid() {
        let cookie = cart_cookie("cart", "gid://shopify/Cart/c1?key=k", 1_209_600);
        assert_eq!(
            cookie,
            "cart=gid%3A%2F%2Fshopify%2FCart%2Fc1%3Fkey%3Dk; Path=/; HttpOnly; SameSite=Lax; Max-Age=1209600"
        );
    }

    #[test]
    fn read_cart_cookie_decodes_value_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; cart=gid%3A%2F%2Fshopify%2FCart%2Fc1; x=1"),
        );
        assert_eq!(
            read_cart_cookie(&headers, "cart").as_deref(),
            Some("gid://shopify/Cart/c1")
        );
        assert_eq!(read_cart_cookie(&headers, "missing"), None);
    }

    #[test]
    fn read_cart_cookie_treats_empty_as_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("cart="));
        assert_eq!(read_cart_cookie(&headers, "cart"), None);
    }

    #[test]
    fn redirect_targets() {
        assert!(is_redirect_target("/cart"));
        assert!(is_redirect_target("https://gems.example.com/checkout"));
        assert!(!is_redirect_target("//evil.example.com"));
        assert!(!is_redirect_target("/\\evil.example.com"));
        assert!(!is_redirect_target("/a\nb"));
        assert!(!is_redirect_target("javascript:alert(1)"));
        assert!(!is_redirect_target("cart"));
    }
}
