//! Double-submit CSRF tokens.
//!
//! Login and refresh set a script-readable `csrf_token` cookie. Unsafe
//! requests authenticated by the `access_token` cookie must echo it in the
//! `X-CSRF-Token` header.

use axum::http::Method;
use subtle::ConstantTimeEq;

/// Header the client echoes the token in.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Fresh 32-byte token, hex encoded.
pub fn generate_csrf_token() -> String {
    super::random_hex::<32>()
}

/// Methods that never change state and so skip the CSRF check.
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Constant-time comparison of the cookie value and the header value.
pub fn tokens_match(cookie: &str, header: &str) -> bool {
    !cookie.is_empty() && cookie.as_bytes().ct_eq(header.as_bytes()).into()
}
