//! Moderation report statuses, target types, and transitions.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Freshly filed, nobody has looked at it yet.
pub const STATUS_OPEN: &str = "open";
/// An editor picked it up.
pub const STATUS_REVIEWING: &str = "reviewing";
/// Action taken on the reported content.
pub const STATUS_RESOLVED: &str = "resolved";
/// Closed without action.
pub const STATUS_DISMISSED: &str = "dismissed";

/// All valid report statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_OPEN,
    STATUS_REVIEWING,
    STATUS_RESOLVED,
    STATUS_DISMISSED,
];

/// Maximum length of the free-text `details` field.
pub const MAX_DETAILS_LENGTH: usize = 5_000;

// ---------------------------------------------------------------------------
// Target types
// ---------------------------------------------------------------------------

/// Content types that can be reported, paired with the table they live in.
pub const REPORTABLE_TARGETS: &[(&str, &str)] = &[
    ("song", "songs"),
    ("artist", "artists"),
    ("article", "articles"),
    ("event", "events"),
    ("playlist", "playlists"),
    ("service_provider", "service_providers"),
];

/// Resolve a target type to its table name.
pub fn target_table(entity_type: &str) -> Result<&'static str, CoreError> {
    REPORTABLE_TARGETS
        .iter()
        .find(|(name, _)| *name == entity_type)
        .map(|(_, table)| *table)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Cannot report '{entity_type}'. Reportable types: {:?}",
                REPORTABLE_TARGETS.iter().map(|(n, _)| *n).collect::<Vec<_>>()
            ))
        })
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Returns the set of statuses that `from_status` may transition to.
///
/// - `open`      -> `reviewing`, `dismissed`
/// - `reviewing` -> `resolved`, `dismissed`, `open`
/// - `resolved`  -> `open` (re-open)
/// - `dismissed` -> `open` (re-open)
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_OPEN => &[STATUS_REVIEWING, STATUS_DISMISSED],
        STATUS_REVIEWING => &[STATUS_RESOLVED, STATUS_DISMISSED, STATUS_OPEN],
        STATUS_RESOLVED | STATUS_DISMISSED => &[STATUS_OPEN],
        _ => &[],
    }
}

/// Validate that a report transition from `current` to `next` is allowed.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    let allowed = valid_transitions(current);
    if allowed.contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot transition report from '{current}' to '{next}'. Allowed transitions: {allowed:?}"
        )))
    }
}

/// Validate that a status string is one of the known statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid report status '{status}'. Must be one of: {VALID_STATUSES:?}"
        )))
    }
}

/// Whether the final status closes the report (stamps `resolved_by`).
pub fn is_closing(status: &str) -> bool {
    status == STATUS_RESOLVED || status == STATUS_DISMISSED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_statuses_are_valid() {
        for s in VALID_STATUSES {
            assert!(validate_status(s).is_ok());
        }
        assert!(validate_status("closed").is_err());
    }

    #[test]
    fn open_cannot_jump_to_resolved() {
        assert!(validate_transition(STATUS_OPEN, STATUS_RESOLVED).is_err());
        assert!(validate_transition(STATUS_OPEN, STATUS_REVIEWING).is_ok());
        assert!(validate_transition(STATUS_OPEN, STATUS_DISMISSED).is_ok());
    }

    #[test]
    fn closed_reports_can_reopen() {
        assert!(validate_transition(STATUS_RESOLVED, STATUS_OPEN).is_ok());
        assert!(validate_transition(STATUS_DISMISSED, STATUS_OPEN).is_ok());
        assert!(validate_transition(STATUS_RESOLVED, STATUS_DISMISSED).is_err());
    }

    #[test]
    fn target_tables_resolve() {
        assert_eq!(target_table("song").unwrap(), "songs");
        assert_eq!(target_table("service_provider").unwrap(), "service_providers");
        assert!(target_table("user").is_err());
    }

    #[test]
    fn closing_statuses() {
        assert!(is_closing(STATUS_RESOLVED));
        assert!(is_closing(STATUS_DISMISSED));
        assert!(!is_closing(STATUS_REVIEWING));
    }
}
