//! A/B test variant assignment
//!
//! Landing routes map to fixed variant tags; the root route assigns a
//! uniformly random variant. The assignment sticks through a 30-day cookie
//! so a returning visitor always sees the same variant.

use axum::{
    http::{header, HeaderMap, Uri},
    response::{IntoResponse, Json},
};
use rand::Rng;
use serde::Serialize;

/// Cookie that pins a visitor to a variant
pub const VARIANT_COOKIE: &str = "ab-test-variant";

/// Cookie lifetime in seconds (30 days)
const COOKIE_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

/// Valid variant tags
const VARIANTS: &[&str] = &["A", "B", "C", "D"];

#[derive(Debug, Serialize)]
pub struct VariantResponse {
    pub variant: String,
}

/// Map a landing route to its fixed variant tag
fn route_variant(path: &str) -> Option<&'static str> {
    match path {
        "/lp1" => Some("A"),
        "/lp2" => Some("B"),
        "/lp3" => Some("C"),
        "/lp4" => Some("D"),
        _ => None,
    }
}

/// Extract a valid variant from the Cookie header
fn cookie_variant(headers: &HeaderMap) -> Option<&'static str> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in cookies.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        if parts.next() == Some(VARIANT_COOKIE) {
            let value = parts.next()?;
            return VARIANTS.iter().find(|v| **v == value).copied();
        }
    }
    None
}

fn random_variant() -> &'static str {
    VARIANTS[rand::thread_rng().gen_range(0..VARIANTS.len())]
}

/// `GET /` and `GET /lp1..lp4` - resolve the visitor's variant.
/// Landing routes force their tag and refresh the cookie; the root route
/// honors an existing cookie and only assigns randomly without one.
pub async fn variant_handler(uri: Uri, headers: HeaderMap) -> axum::response::Response {
    let (variant, set_cookie) = match route_variant(uri.path()) {
        Some(forced) => (forced, true),
        None => match cookie_variant(&headers) {
            Some(existing) => (existing, false),
            None => (random_variant(), true),
        },
    };

    let body = Json(VariantResponse {
        variant: variant.to_string(),
    });

    if set_cookie {
        let cookie = format!(
            "{}={}; Max-Age={}; Path=/; SameSite=Lax",
            VARIANT_COOKIE, variant, COOKIE_MAX_AGE_SECS
        );
        ([(header::SET_COOKIE, cookie)], body).into_response()
    } else {
        body.into_response()
    }
}
