//! View/click deduplication rules.
//!
//! A view or click counts once per viewer per target inside a rolling
//! [`DEDUP_WINDOW_HOURS`] window. The viewer is the authenticated user when
//! known, otherwise the `(ip, user agent)` pair.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Length of the uniqueness window.
pub const DEDUP_WINDOW_HOURS: i64 = 24;

/// Longest user-agent string stored with an event.
pub const MAX_USER_AGENT_LENGTH: usize = 512;

/// Placeholder used when no client address can be determined.
pub const UNKNOWN_IP: &str = "unknown";

/// Kind of engagement being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    View,
    Click,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::View => "view",
            EventKind::Click => "click",
        }
    }
}

/// Entity types that carry engagement counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Song,
    Article,
    Event,
    AdCampaign,
}

impl TargetKind {
    /// Value stored in `engagement_events.target_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Song => "song",
            TargetKind::Article => "article",
            TargetKind::Event => "event",
            TargetKind::AdCampaign => "ad_campaign",
        }
    }

    /// Table holding the denormalised counter.
    pub fn table(self) -> &'static str {
        match self {
            TargetKind::Song => "songs",
            TargetKind::Article => "articles",
            TargetKind::Event => "events",
            TargetKind::AdCampaign => "ad_campaigns",
        }
    }

    /// Counter column for `kind`, or an error when the target does not track it.
    ///
    /// The returned names are static so they are safe to splice into SQL.
    pub fn counter_column(self, kind: EventKind) -> Result<&'static str, CoreError> {
        match (self, kind) {
            (_, EventKind::View) => Ok("view_count"),
            (TargetKind::AdCampaign, EventKind::Click) => Ok("click_count"),
            (target, EventKind::Click) => Err(CoreError::Validation(format!(
                "Clicks are not tracked for {}",
                target.as_str()
            ))),
        }
    }
}

/// Who produced an engagement event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerKey {
    User(DbId),
    Anonymous { ip: String, user_agent: String },
}

impl ViewerKey {
    /// Build the key from request metadata, preferring the user id.
    pub fn resolve(user_id: Option<DbId>, ip: Option<&str>, user_agent: Option<&str>) -> Self {
        match user_id {
            Some(id) => ViewerKey::User(id),
            None => ViewerKey::Anonymous {
                ip: ip
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(UNKNOWN_IP)
                    .to_string(),
                user_agent: truncate_user_agent(user_agent.unwrap_or("")),
            },
        }
    }
}

/// Cut a user agent to [`MAX_USER_AGENT_LENGTH`] bytes on a char boundary.
pub fn truncate_user_agent(user_agent: &str) -> String {
    if user_agent.len() <= MAX_USER_AGENT_LENGTH {
        return user_agent.to_string();
    }
    let mut end = MAX_USER_AGENT_LENGTH;
    while !user_agent.is_char_boundary(end) {
        end -= 1;
    }
    user_agent[..end].to_string()
}

/// Pick the client address from proxy headers.
///
/// `X-Forwarded-For` wins (first hop), then `X-Real-IP`.
pub fn client_ip<'a>(forwarded_for: Option<&'a str>, real_ip: Option<&'a str>) -> Option<&'a str> {
    forwarded_for
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| real_ip.map(str::trim).filter(|s| !s.is_empty()))
}

/// Events newer than this instant suppress a new count.
pub fn window_start(now: Timestamp) -> Timestamp {
    now - Duration::hours(DEDUP_WINDOW_HOURS)
}

/// Whether a previous event at `last_seen` still suppresses a new one at `now`.
pub fn is_duplicate(last_seen: Option<Timestamp>, now: Timestamp) -> bool {
    last_seen.is_some_and(|seen| seen > window_start(now))
}

/// Outcome returned to the client after recording an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordOutcome {
    /// `false` when the event fell inside the dedup window.
    pub counted: bool,
    /// The counter value after this request.
    pub count: i64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
