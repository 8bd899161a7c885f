//! Subscription lifecycle and profile tiers.
//!
//! Statuses move along a fixed transition table. Every transition also
//! decides what happens to the subscriber's artist and service-provider
//! profiles: entering a paying state lifts them to [`TIER_SUBSCRIBED`],
//! losing access drops them back to [`TIER_FREE`].

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Created, waiting for payment confirmation.
pub const STATUS_PENDING_PAYMENT: &str = "pending_payment";
/// Free trial period.
pub const STATUS_TRIAL: &str = "trial";
/// Paid and running.
pub const STATUS_ACTIVE: &str = "active";
/// Cancelled by the subscriber; access continues until `end_date`.
pub const STATUS_CANCELLED: &str = "cancelled";
/// Past its end date.
pub const STATUS_EXPIRED: &str = "expired";
/// Frozen by an administrator.
pub const STATUS_SUSPENDED: &str = "suspended";

/// All valid subscription statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING_PAYMENT,
    STATUS_TRIAL,
    STATUS_ACTIVE,
    STATUS_CANCELLED,
    STATUS_EXPIRED,
    STATUS_SUSPENDED,
];

/// Statuses that count as the user's one current subscription.
///
/// Must match the predicate of the `uq_subscriptions_current_user` index.
pub const CURRENT_STATUSES: &[&str] = &[
    STATUS_PENDING_PAYMENT,
    STATUS_TRIAL,
    STATUS_ACTIVE,
    STATUS_SUSPENDED,
];

/// Statuses the expiry sweep inspects for `end_date < now`.
pub const EXPIRABLE_STATUSES: &[&str] = &[STATUS_TRIAL, STATUS_ACTIVE, STATUS_CANCELLED];

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

pub const TIER_FREE: &str = "free";
pub const TIER_SUBSCRIBED: &str = "subscribed";

/// All valid profile tiers.
pub const VALID_TIERS: &[&str] = &[TIER_FREE, TIER_SUBSCRIBED];

/// Validate a tier filter value.
pub fn validate_tier(tier: &str) -> Result<(), CoreError> {
    if VALID_TIERS.contains(&tier) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid tier '{tier}'. Must be one of: {VALID_TIERS:?}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Returns the set of statuses that `from_status` may transition to.
///
/// - `pending_payment` -> `trial`, `active`, `cancelled`
/// - `trial`           -> `active`, `cancelled`, `expired`, `suspended`
/// - `active`          -> `active` (renew/upgrade), `cancelled`, `expired`, `suspended`
/// - `cancelled`       -> `active` (renew), `expired`
/// - `suspended`       -> `active`, `cancelled`, `expired`
/// - `expired`         -> `active` (renew)
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_PENDING_PAYMENT => &[STATUS_TRIAL, STATUS_ACTIVE, STATUS_CANCELLED],
        STATUS_TRIAL => &[
            STATUS_ACTIVE,
            STATUS_CANCELLED,
            STATUS_EXPIRED,
            STATUS_SUSPENDED,
        ],
        STATUS_ACTIVE => &[
            STATUS_ACTIVE,
            STATUS_CANCELLED,
            STATUS_EXPIRED,
            STATUS_SUSPENDED,
        ],
        STATUS_CANCELLED => &[STATUS_ACTIVE, STATUS_EXPIRED],
        STATUS_SUSPENDED => &[STATUS_ACTIVE, STATUS_CANCELLED, STATUS_EXPIRED],
        STATUS_EXPIRED => &[STATUS_ACTIVE],
        _ => &[],
    }
}

/// Validate that a transition from `current` to `next` is allowed.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    let allowed = valid_transitions(current);
    if allowed.contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot move subscription from '{current}' to '{next}'. Allowed: {allowed:?}"
        )))
    }
}

/// Validate that a status string is one of the known statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid subscription status '{status}'. Must be one of: {VALID_STATUSES:?}"
        )))
    }
}

/// The profile tier implied by moving from `from` to `to`.
///
/// `None` means linked profiles keep whatever tier they have. Cancelling a
/// running subscription keeps the tier until the expiry sweep runs, while
/// cancelling before payment never granted one.
pub fn tier_after(from: &str, to: &str) -> Option<&'static str> {
    match to {
        STATUS_TRIAL | STATUS_ACTIVE => Some(TIER_SUBSCRIBED),
        STATUS_EXPIRED | STATUS_SUSPENDED => Some(TIER_FREE),
        STATUS_CANCELLED if from == STATUS_PENDING_PAYMENT => Some(TIER_FREE),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Lifecycle actions
// ---------------------------------------------------------------------------

/// What a lifecycle action decided: the next status and the new period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub status: &'static str,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub tier: Option<&'static str>,
}

/// Initial status for a new subscription.
///
/// A trial is granted only when requested and the plan offers one.
pub fn initial(start_trial: bool, trial_days: i32, now: Timestamp) -> Transition {
    if start_trial && trial_days > 0 {
        Transition {
            status: STATUS_TRIAL,
            start_date: Some(now),
            end_date: Some(now + Duration::days(i64::from(trial_days))),
            tier: Some(TIER_SUBSCRIBED),
        }
    } else {
        Transition {
            status: STATUS_PENDING_PAYMENT,
            start_date: None,
            end_date: None,
            tier: None,
        }
    }
}

/// Payment confirmed: run a full plan period from `now`.
pub fn activate(current: &str, duration_days: i32, now: Timestamp) -> Result<Transition, CoreError> {
    if current != STATUS_PENDING_PAYMENT && current != STATUS_TRIAL {
        return Err(CoreError::Conflict(format!(
            "Only pending or trial subscriptions can be activated (status is '{current}')"
        )));
    }
    validate_transition(current, STATUS_ACTIVE)?;
    Ok(Transition {
        status: STATUS_ACTIVE,
        start_date: Some(now),
        end_date: Some(now + Duration::days(i64::from(duration_days))),
        tier: tier_after(current, STATUS_ACTIVE),
    })
}

/// Switch plans: restart the period under the new plan's duration.
pub fn upgrade(current: &str, new_duration_days: i32, now: Timestamp) -> Result<Transition, CoreError> {
    if current != STATUS_TRIAL && current != STATUS_ACTIVE {
        return Err(CoreError::Conflict(format!(
            "Only trial or active subscriptions can change plan (status is '{current}')"
        )));
    }
    validate_transition(current, STATUS_ACTIVE)?;
    Ok(Transition {
        status: STATUS_ACTIVE,
        start_date: Some(now),
        end_date: Some(now + Duration::days(i64::from(new_duration_days))),
        tier: tier_after(current, STATUS_ACTIVE),
    })
}

/// Extend by one plan period, counted from the later of `now` and the current end.
pub fn renew(
    current: &str,
    end_date: Option<Timestamp>,
    duration_days: i32,
    now: Timestamp,
) -> Result<Transition, CoreError> {
    if ![STATUS_ACTIVE, STATUS_CANCELLED, STATUS_EXPIRED].contains(&current) {
        return Err(CoreError::Conflict(format!(
            "Only active, cancelled or expired subscriptions can be renewed (status is '{current}')"
        )));
    }
    validate_transition(current, STATUS_ACTIVE)?;
    let base = match end_date {
        Some(end) if end > now => end,
        _ => now,
    };
    let start = if current == STATUS_EXPIRED { Some(now) } else { None };
    Ok(Transition {
        status: STATUS_ACTIVE,
        start_date: start,
        end_date: Some(base + Duration::days(i64::from(duration_days))),
        tier: tier_after(current, STATUS_ACTIVE),
    })
}

/// Plain status move for cancel/suspend/resume/expire, keeping the period.
pub fn move_to(current: &str, next: &'static str) -> Result<Transition, CoreError> {
    validate_transition(current, next)?;
    Ok(Transition {
        status: next,
        start_date: None,
        end_date: None,
        tier: tier_after(current, next),
    })
}

/// Whether a subscription in `status` ending at `end_date` is due for expiry.
pub fn is_due_for_expiry(status: &str, end_date: Option<Timestamp>, now: Timestamp) -> bool {
    EXPIRABLE_STATUSES.contains(&status) && end_date.is_some_and(|end| end < now)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn all_statuses_are_valid() {
        for s in VALID_STATUSES {
            assert!(validate_status(s).is_ok(), "status '{s}' should be valid");
        }
        assert!(validate_status("paused").is_err());
    }

    #[test]
    fn current_statuses_are_a_subset_of_valid() {
        for s in CURRENT_STATUSES {
            assert!(VALID_STATUSES.contains(s));
        }
        assert!(!CURRENT_STATUSES.contains(&STATUS_CANCELLED));
        assert!(!CURRENT_STATUSES.contains(&STATUS_EXPIRED));
    }

    #[test]
    fn pending_cannot_expire_directly() {
        assert!(validate_transition(STATUS_PENDING_PAYMENT, STATUS_EXPIRED).is_err());
        assert!(validate_transition(STATUS_PENDING_PAYMENT, STATUS_ACTIVE).is_ok());
    }

    #[test]
    fn expired_only_renews() {
        assert_eq!(valid_transitions(STATUS_EXPIRED), &[STATUS_ACTIVE]);
        assert!(validate_transition(STATUS_EXPIRED, STATUS_CANCELLED).is_err());
    }

    #[test]
    fn unknown_status_has_no_transitions() {
        assert!(valid_transitions("bogus").is_empty());
    }

    #[test]
    fn trial_requires_plan_trial_days() {
        let t = initial(true, 0, now());
        assert_eq!(t.status, STATUS_PENDING_PAYMENT);
        assert_eq!(t.tier, None);

        let t = initial(true, 14, now());
        assert_eq!(t.status, STATUS_TRIAL);
        assert_eq!(t.end_date, Some(now() + Duration::days(14)));
        assert_eq!(t.tier, Some(TIER_SUBSCRIBED));
    }

    #[test]
    fn activation_runs_full_period_and_lifts_tier() {
        let t = activate(STATUS_PENDING_PAYMENT, 30, now()).unwrap();
        assert_eq!(t.status, STATUS_ACTIVE);
        assert_eq!(t.start_date, Some(now()));
        assert_eq!(t.end_date, Some(now() + Duration::days(30)));
        assert_eq!(t.tier, Some(TIER_SUBSCRIBED));
    }

    #[test]
    fn activation_of_active_is_rejected() {
        assert!(activate(STATUS_ACTIVE, 30, now()).is_err());
        assert!(activate(STATUS_EXPIRED, 30, now()).is_err());
    }

    #[test]
    fn upgrade_only_from_trial_or_active() {
        assert!(upgrade(STATUS_TRIAL, 365, now()).is_ok());
        assert!(upgrade(STATUS_ACTIVE, 365, now()).is_ok());
        assert!(upgrade(STATUS_CANCELLED, 365, now()).is_err());
        assert!(upgrade(STATUS_PENDING_PAYMENT, 365, now()).is_err());
    }

    #[test]
    fn renew_extends_from_future_end() {
        let end = now() + Duration::days(5);
        let t = renew(STATUS_ACTIVE, Some(end), 30, now()).unwrap();
        assert_eq!(t.end_date, Some(end + Duration::days(30)));
        assert_eq!(t.start_date, None);
    }

    #[test]
    fn renew_after_expiry_starts_now() {
        let end = now() - Duration::days(3);
        let t = renew(STATUS_EXPIRED, Some(end), 30, now()).unwrap();
        assert_eq!(t.start_date, Some(now()));
        assert_eq!(t.end_date, Some(now() + Duration::days(30)));
        assert_eq!(t.tier, Some(TIER_SUBSCRIBED));
    }

    #[test]
    fn renew_of_suspended_is_rejected() {
        assert!(renew(STATUS_SUSPENDED, None, 30, now()).is_err());
    }

    #[test]
    fn cancel_keeps_tier_until_expiry() {
        let t = move_to(STATUS_ACTIVE, STATUS_CANCELLED).unwrap();
        assert_eq!(t.status, STATUS_CANCELLED);
        assert_eq!(t.tier, None);
    }

    #[test]
    fn cancel_before_payment_drops_tier() {
        let t = move_to(STATUS_PENDING_PAYMENT, STATUS_CANCELLED).unwrap();
        assert_eq!(t.tier, Some(TIER_FREE));
    }

    #[test]
    fn expiry_and_suspension_drop_tier() {
        assert_eq!(tier_after(STATUS_ACTIVE, STATUS_EXPIRED), Some(TIER_FREE));
        assert_eq!(tier_after(STATUS_TRIAL, STATUS_SUSPENDED), Some(TIER_FREE));
        assert_eq!(tier_after(STATUS_SUSPENDED, STATUS_ACTIVE), Some(TIER_SUBSCRIBED));
    }

    #[test]
    fn due_for_expiry() {
        let past = Some(now() - Duration::seconds(1));
        let future = Some(now() + Duration::days(1));
        assert!(is_due_for_expiry(STATUS_ACTIVE, past, now()));
        assert!(is_due_for_expiry(STATUS_CANCELLED, past, now()));
        assert!(!is_due_for_expiry(STATUS_ACTIVE, future, now()));
        assert!(!is_due_for_expiry(STATUS_SUSPENDED, past, now()));
        assert!(!is_due_for_expiry(STATUS_PENDING_PAYMENT, None, now()));
    }

    #[test]
    fn tier_validation() {
        assert!(validate_tier(TIER_FREE).is_ok());
        assert!(validate_tier(TIER_SUBSCRIBED).is_ok());
        assert!(validate_tier("gold").is_err());
    }
}
