//! Status transition history.
//!
//! The upstream system appends an immutable record each time a meeting's
//! status changes, but does not guarantee delivery order. This module sorts
//! the records chronologically and projects them into timeline entries for
//! display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MeetingState;

/// Who initiated a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionSource {
    /// A user action (e.g. requesting or stopping a bot).
    User,
    /// The transcription bot reporting back.
    BotCallback,
    /// A source string this layer does not recognize.
    #[serde(other)]
    Unknown,
}

impl TransitionSource {
    /// Display label for the initiating source.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::BotCallback => "Bot",
            Self::Unknown => "System",
        }
    }
}

/// An immutable record of a meeting status change, as reported upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    /// Status before the change, absent for the first transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Status after the change.
    pub to: String,
    /// When the change happened.
    pub timestamp: DateTime<Utc>,
    /// Who initiated the change, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<TransitionSource>,
    /// Optional free-text reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A transition projected for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    /// Coarse badge label for the target status (not the refined descriptor).
    pub status_label: &'static str,
    /// Label for the initiating source.
    pub source_label: &'static str,
    /// Absolute timestamp, RFC 3339.
    pub timestamp: DateTime<Utc>,
    /// Human-readable relative timestamp ("5m ago").
    pub relative: String,
    /// Optional free-text reason.
    pub reason: Option<String>,
    /// Whether this is the chronologically last (current) entry.
    pub is_current: bool,
}

/// Sort transitions ascending by timestamp.
///
/// The sort is stable: records with equal timestamps keep their relative
/// input order, since the upstream does not guarantee strict ordering.
#[must_use]
pub fn order_transitions(mut transitions: Vec<StatusTransition>) -> Vec<StatusTransition> {
    transitions.sort_by_key(|t| t.timestamp);
    transitions
}

/// Project a transition history into display entries.
///
/// Entries come back in chronological order with the last one marked
/// current. An empty history yields an empty vector - absence of history is
/// a valid, non-error state and the caller renders nothing for it.
#[must_use]
pub fn build_timeline(transitions: Vec<StatusTransition>, now: DateTime<Utc>) -> Vec<TimelineEntry> {
    let ordered = order_transitions(transitions);
    let last = ordered.len().saturating_sub(1);

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, transition)| TimelineEntry {
            status_label: MeetingState::from_parts(&transition.to, None, None).base_label(),
            source_label: transition
                .source
                .map_or("System", TransitionSource::label),
            timestamp: transition.timestamp,
            relative: relative_time(transition.timestamp, now),
            reason: transition.reason,
            is_current: index == last,
        })
        .collect()
}

/// Format a timestamp relative to `now` ("just now", "5m ago", "3h ago").
///
/// Future timestamps (clock skew between upstream and this host) render as
/// "just now" rather than a negative duration.
#[must_use]
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let seconds = elapsed.num_seconds();

    if seconds < 60 {
        return "just now".to_owned();
    }

    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return format!("{minutes}m ago");
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{hours}h ago");
    }

    format!("{}d ago", elapsed.num_days())
}
