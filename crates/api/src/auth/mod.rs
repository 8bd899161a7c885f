//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access-token signing and refresh-token helpers.
//! - [`csrf`] -- double-submit CSRF token generation and comparison.
//! - [`cookies`] -- `Set-Cookie` builders and `Cookie` header parsing.

pub mod cookies;
pub mod csrf;
pub mod jwt;
pub mod password;

use rand::Rng;

/// `n` random bytes from the thread RNG, hex encoded (`2 * n` chars).
pub fn random_hex<const N: usize>() -> String {
    let bytes: [u8; N] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
