//! Request extractors for authentication, authorization and client metadata.
//!
//! - [`auth::AuthUser`] / [`auth::OptionalAuthUser`] -- caller from cookie or Bearer token.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireEditor`] -- requires `editor` or `admin`.
//! - [`rbac::RequireAuth`] -- requires any authenticated user.
//! - [`client::ClientMeta`] -- client IP and user agent.

pub mod auth;
pub mod client;
pub mod rbac;
