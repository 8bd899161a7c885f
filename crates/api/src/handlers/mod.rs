//! Request handlers, one module per resource.
//!
//! Handlers validate the request shape, apply the domain rules from
//! `soundstage_core`, and delegate persistence to the repositories in
//! `soundstage_db`.

pub mod ad_campaigns;
pub mod ad_spots;
pub mod admin_users;
pub mod articles;
pub mod artists;
pub mod auth;
pub mod clients;
pub mod engagement;
pub mod events;
pub mod health;
pub mod playlists;
pub mod reports;
pub mod service_providers;
pub mod songs;
pub mod subscription_plans;
pub mod subscriptions;
pub mod uploads;

use soundstage_core::error::CoreError;
use soundstage_core::slug::slug_or_derive;
use soundstage_core::types::DbId;

use crate::error::AppError;

/// 404 for `entity` with `id`.
pub(crate) fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

/// Normalise the client slug, or derive one from `name`.
///
/// Rejects inputs that produce an empty slug (e.g. names with no ASCII
/// letters or digits and no explicit slug).
pub(crate) fn resolve_slug(explicit: Option<&str>, name: &str) -> Result<String, AppError> {
    let slug = slug_or_derive(explicit, name);
    if slug.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "slug could not be derived; provide one explicitly".into(),
        )));
    }
    Ok(slug)
}

/// Normalise a slug sent on update, if any.
pub(crate) fn resolve_patch_slug(explicit: Option<&str>) -> Result<Option<String>, AppError> {
    explicit.map(|s| resolve_slug(Some(s), s)).transpose()
}

/// Reject values outside `allowed` with a 400 naming the field.
pub(crate) fn check_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), AppError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "{field} must be one of: {}",
            allowed.join(", ")
        ))))
    }
}
