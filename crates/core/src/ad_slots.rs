//! Ad-spot slot allocation.
//!
//! An ad spot hosts at most [`MAX_CAMPAIGNS_PER_SPOT`] concurrently active
//! campaigns, each ranked by a unique priority in
//! [`MIN_PRIORITY`]..=[`MAX_PRIORITY`]. Two campaigns compete for the same
//! spot only when both are active and their inclusive date ranges overlap.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Date, DbId};

/// Maximum number of active campaigns that may overlap on one spot.
pub const MAX_CAMPAIGNS_PER_SPOT: usize = 5;

/// Highest-ranked priority slot.
pub const MIN_PRIORITY: i32 = 1;

/// Lowest-ranked priority slot.
pub const MAX_PRIORITY: i32 = 5;

// ---------------------------------------------------------------------------
// Campaign statuses
// ---------------------------------------------------------------------------

pub const CAMPAIGN_DRAFT: &str = "draft";
pub const CAMPAIGN_ACTIVE: &str = "active";
pub const CAMPAIGN_PAUSED: &str = "paused";
pub const CAMPAIGN_COMPLETED: &str = "completed";

/// All valid campaign statuses.
pub const CAMPAIGN_STATUSES: &[&str] = &[
    CAMPAIGN_DRAFT,
    CAMPAIGN_ACTIVE,
    CAMPAIGN_PAUSED,
    CAMPAIGN_COMPLETED,
];

/// Validate that a status string is one of the known campaign statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if CAMPAIGN_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid campaign status '{status}'. Must be one of: {CAMPAIGN_STATUSES:?}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Booking model
// ---------------------------------------------------------------------------

/// An inclusive calendar range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: Date, end: Date) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::Validation(format!(
                "start_date ({start}) must not be after end_date ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Inclusive overlap: ranges sharing a single day overlap.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains(&self, day: Date) -> bool {
        self.start <= day && day <= self.end
    }
}

/// An already-booked campaign as seen by the allocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub campaign_id: DbId,
    pub priority: i32,
    pub range: DateRange,
    pub status: String,
}

/// The slot a new or edited campaign wants to occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRequest {
    /// `Some` when editing an existing campaign, so it never conflicts with itself.
    pub campaign_id: Option<DbId>,
    pub priority: i32,
    pub range: DateRange,
}

/// Why a slot request was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotConflict {
    /// Another overlapping active campaign already holds this priority.
    #[error("Priority {priority} is already taken by campaign {held_by} in an overlapping date range")]
    PriorityTaken { priority: i32, held_by: DbId },
    /// The overlapping window already hosts the maximum number of campaigns.
    #[error(
        "Ad spot already has {overlapping} active campaigns in an overlapping date range (maximum {max})",
        max = MAX_CAMPAIGNS_PER_SPOT
    )]
    SpotFull { overlapping: usize },
}

impl From<SlotConflict> for CoreError {
    fn from(conflict: SlotConflict) -> Self {
        CoreError::Conflict(conflict.to_string())
    }
}

/// Validate that `priority` is a real slot.
pub fn validate_priority(priority: i32) -> Result<(), CoreError> {
    if (MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Priority must be between {MIN_PRIORITY} and {MAX_PRIORITY} (got {priority})"
        )))
    }
}

/// Active bookings whose range overlaps `range`, excluding `exclude`.
pub fn overlapping<'a>(
    bookings: &'a [Booking],
    range: &DateRange,
    exclude: Option<DbId>,
) -> Vec<&'a Booking> {
    bookings
        .iter()
        .filter(|b| b.status == CAMPAIGN_ACTIVE)
        .filter(|b| Some(b.campaign_id) != exclude)
        .filter(|b| b.range.overlaps(range))
        .collect()
}

/// Decide whether `request` may occupy its slot given the spot's bookings.
///
/// The priority check runs first so the caller learns which campaign holds
/// the slot even when the window is also full.
pub fn check_slot(request: &SlotRequest, bookings: &[Booking]) -> Result<(), SlotConflict> {
    let overlaps = overlapping(bookings, &request.range, request.campaign_id);

    if let Some(holder) = overlaps.iter().find(|b| b.priority == request.priority) {
        return Err(SlotConflict::PriorityTaken {
            priority: request.priority,
            held_by: holder.campaign_id,
        });
    }

    if overlaps.len() >= MAX_CAMPAIGNS_PER_SPOT {
        return Err(SlotConflict::SpotFull {
            overlapping: overlaps.len(),
        });
    }

    Ok(())
}

/// Free priorities and remaining capacity of a spot over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub range: DateRange,
    pub free_priorities: Vec<i32>,
    pub taken_priorities: Vec<i32>,
    pub remaining_capacity: usize,
}

/// Summarise which slots remain bookable over `range`.
pub fn availability(range: DateRange, bookings: &[Booking]) -> Availability {
    let overlaps = overlapping(bookings, &range, None);

    let mut taken: Vec<i32> = overlaps.iter().map(|b| b.priority).collect();
    taken.sort_unstable();
    taken.dedup();

    let remaining_capacity = MAX_CAMPAIGNS_PER_SPOT.saturating_sub(overlaps.len());
    let free_priorities = if remaining_capacity == 0 {
        Vec::new()
    } else {
        (MIN_PRIORITY..=MAX_PRIORITY)
            .filter(|p| !taken.contains(p))
            .collect()
    };

    Availability {
        range,
        free_priorities,
        taken_priorities: taken,
        remaining_capacity,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> Date {
        Date::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn range(start: u32, end: u32) -> DateRange {
        DateRange::new(day(start), day(end)).unwrap()
    }

    fn booking(id: DbId, priority: i32, start: u32, end: u32) -> Booking {
        Booking {
            campaign_id: id,
            priority,
            range: range(start, end),
            status: CAMPAIGN_ACTIVE.to_string(),
        }
    }

    fn request(priority: i32, start: u32, end: u32) -> SlotRequest {
        SlotRequest {
            campaign_id: None,
            priority,
            range: range(start, end),
        }
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert!(DateRange::new(day(10), day(9)).is_err());
        assert!(DateRange::new(day(9), day(9)).is_ok());
    }

    #[test]
    fn ranges_sharing_one_day_overlap() {
        assert!(range(1, 5).overlaps(&range(5, 9)));
        assert!(range(5, 9).overlaps(&range(1, 5)));
        assert!(!range(1, 4).overlaps(&range(5, 9)));
    }

    #[test]
    fn contained_range_overlaps() {
        assert!(range(1, 20).overlaps(&range(5, 6)));
        assert!(range(5, 6).overlaps(&range(1, 20)));
    }

    #[test]
    fn empty_spot_accepts_any_priority() {
        assert_eq!(check_slot(&request(3, 1, 10), &[]), Ok(()));
    }

    #[test]
    fn occupied_priority_in_overlapping_window_is_rejected() {
        let bookings = vec![booking(7, 2, 1, 10)];
        assert_eq!(
            check_slot(&request(2, 10, 15), &bookings),
            Err(SlotConflict::PriorityTaken {
                priority: 2,
                held_by: 7
            })
        );
    }

    #[test]
    fn same_priority_outside_window_is_fine() {
        let bookings = vec![booking(7, 2, 1, 10)];
        assert_eq!(check_slot(&request(2, 11, 15), &bookings), Ok(()));
    }

    #[test]
    fn sixth_overlapping_campaign_is_rejected() {
        let bookings = vec![
            booking(1, 1, 1, 10),
            booking(2, 2, 5, 12),
            booking(3, 3, 8, 20),
            booking(4, 4, 10, 10),
            booking(5, 5, 9, 30),
        ];
        assert_eq!(
            check_slot(&request(3, 10, 11), &bookings),
            Err(SlotConflict::PriorityTaken {
                priority: 3,
                held_by: 3
            })
        );
    }

    #[test]
    fn capacity_counts_only_the_overlapping_window() {
        // Six bookings on the spot, but only four overlap days 10..=11.
        let bookings = vec![
            booking(1, 1, 1, 3),
            booking(2, 2, 10, 12),
            booking(3, 3, 10, 20),
            booking(4, 4, 10, 10),
            booking(5, 5, 9, 30),
            booking(6, 1, 4, 4),
        ];
        assert_eq!(check_slot(&request(1, 10, 11), &bookings), Ok(()));
    }

    #[test]
    fn full_spot_is_reported_when_priority_free() {
        // Five overlapping bookings with a duplicated priority leave priority 5
        // nominally free but the window is still at capacity.
        let bookings = vec![
            booking(1, 1, 1, 10),
            booking(2, 2, 1, 10),
            booking(3, 3, 1, 10),
            booking(4, 4, 1, 5),
            booking(5, 4, 6, 10),
        ];
        assert_eq!(
            check_slot(&request(5, 1, 10), &bookings),
            Err(SlotConflict::SpotFull { overlapping: 5 })
        );
    }

    #[test]
    fn non_active_bookings_never_block() {
        let mut paused = booking(9, 1, 1, 10);
        paused.status = CAMPAIGN_PAUSED.to_string();
        let mut draft = booking(10, 1, 1, 10);
        draft.status = CAMPAIGN_DRAFT.to_string();
        assert_eq!(check_slot(&request(1, 1, 10), &[paused, draft]), Ok(()));
    }

    #[test]
    fn editing_does_not_conflict_with_itself() {
        let bookings = vec![booking(4, 1, 1, 10)];
        let edit = SlotRequest {
            campaign_id: Some(4),
            priority: 1,
            range: range(2, 12),
        };
        assert_eq!(check_slot(&edit, &bookings), Ok(()));
    }

    #[test]
    fn priority_bounds() {
        assert!(validate_priority(0).is_err());
        assert!(validate_priority(1).is_ok());
        assert!(validate_priority(5).is_ok());
        assert!(validate_priority(6).is_err());
    }

    #[test]
    fn availability_lists_free_priorities() {
        let bookings = vec![booking(1, 1, 1, 10), booking(2, 4, 5, 6)];
        let avail = availability(range(4, 8), &bookings);
        assert_eq!(avail.taken_priorities, vec![1, 4]);
        assert_eq!(avail.free_priorities, vec![2, 3, 5]);
        assert_eq!(avail.remaining_capacity, 3);
    }

    #[test]
    fn availability_of_full_spot_has_no_free_priorities() {
        let bookings = vec![
            booking(1, 1, 1, 10),
            booking(2, 2, 1, 10),
            booking(3, 3, 1, 10),
            booking(4, 3, 1, 10),
            booking(5, 3, 1, 10),
        ];
        let avail = availability(range(1, 10), &bookings);
        assert!(avail.free_priorities.is_empty());
        assert_eq!(avail.remaining_capacity, 0);
    }

    #[test]
    fn conflict_maps_to_core_conflict() {
        let err: CoreError = SlotConflict::SpotFull { overlapping: 5 }.into();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[test]
    fn conflict_is_a_std_error_with_readable_message() {
        let err: Box<dyn std::error::Error> = Box::new(SlotConflict::PriorityTaken {
            priority: 2,
            held_by: 9,
        });
        assert_eq!(
            err.to_string(),
            "Priority 2 is already taken by campaign 9 in an overlapping date range"
        );
        let full = SlotConflict::SpotFull { overlapping: 5 }.to_string();
        assert!(full.ends_with("(maximum 5)"));
    }

    #[test]
    fn unknown_status_is_invalid() {
        assert!(validate_status("live").is_err());
        for s in CAMPAIGN_STATUSES {
            assert!(validate_status(s).is_ok());
        }
    }
}
