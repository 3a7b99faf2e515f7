//! Meeting listing enriched with lifecycle classification.
//!
//! Raw upstream statuses are resolved into the typed lifecycle model at
//! this boundary; the browser receives display-ready labels, tone classes,
//! and a chronological transition timeline instead of raw status strings.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use vexa_core::{TimelineEntry, build_timeline, classify};

use crate::error::Result;
use crate::middleware::SessionToken;
use crate::state::AppState;
use crate::vexa::types::Meeting;

/// A meeting projected for display.
#[derive(Debug, Serialize)]
pub struct MeetingView {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_meeting_id: Option<String>,
    /// Raw upstream status, kept for clients that key off it.
    pub status: String,
    /// Refined display label (e.g. "Ended" rather than "Completed").
    pub label: &'static str,
    pub description: &'static str,
    pub text_class: &'static str,
    pub badge_class: &'static str,
    pub timeline: Vec<TimelineEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl MeetingView {
    fn from_meeting(meeting: Meeting, now: DateTime<Utc>) -> Self {
        let descriptor = classify(&meeting.state());
        Self {
            id: meeting.id,
            platform: meeting.platform,
            native_meeting_id: meeting.native_meeting_id,
            status: meeting.status,
            label: descriptor.label,
            description: descriptor.description,
            text_class: descriptor.tone.text_class(),
            badge_class: descriptor.tone.badge_class(),
            timeline: build_timeline(meeting.status_transitions, now),
            created_at: meeting.created_at,
            start_time: meeting.start_time,
            end_time: meeting.end_time,
        }
    }
}

/// `GET /api/meetings` - the session user's meetings, classified.
pub async fn list(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Json<Vec<MeetingView>>> {
    let meetings = state.api().list_meetings(&token).await?;
    let now = Utc::now();

    Ok(Json(
        meetings
            .into_iter()
            .map(|meeting| MeetingView::from_meeting(meeting, now))
            .collect(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_view_carries_refined_label_and_tones() {
        let meeting: Meeting = serde_json::from_value(serde_json::json!({
            "id": 3,
            "status": "completed",
            "data": { "completion_reason": "meeting_ended" }
        }))
        .unwrap();

        let view = MeetingView::from_meeting(meeting, Utc::now());
        assert_eq!(view.label, "Ended");
        assert_eq!(view.text_class, "text-green-700");
        assert_eq!(view.badge_class, "bg-green-100");
        assert_eq!(view.status, "completed");
        assert!(view.timeline.is_empty());
    }

    #[test]
    fn test_view_timeline_is_ordered_with_current_marker() {
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();
        let meeting: Meeting = serde_json::from_value(serde_json::json!({
            "id": 4,
            "status": "active",
            "status_transitions": [
                { "to": "active", "timestamp": "2026-08-28T11:59:00Z" },
                { "to": "requested", "timestamp": "2026-08-28T11:00:00Z" }
            ]
        }))
        .unwrap();

        let view = MeetingView::from_meeting(meeting, now);
        assert_eq!(view.timeline.len(), 2);
        assert_eq!(view.timeline[0].status_label, "Requested");
        assert!(!view.timeline[0].is_current);
        assert!(view.timeline[1].is_current);
    }

    #[test]
    fn test_bogus_status_still_renders() {
        let meeting: Meeting = serde_json::from_value(serde_json::json!({
            "id": 5,
            "status": "quantum_entangled"
        }))
        .unwrap();

        let view = MeetingView::from_meeting(meeting, Utc::now());
        assert_eq!(view.label, "Unknown");
    }
}
