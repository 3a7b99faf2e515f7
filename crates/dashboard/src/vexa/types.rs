//! Wire types for the Vexa platform APIs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vexa_core::{Email, MeetingState, StatusTransition, TokenId, UserId};

/// A user identity as stored upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VexaUser {
    /// Upstream-assigned opaque identifier.
    pub id: UserId,
    /// Natural key.
    pub email: Email,
    /// Display name, if set.
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL, if set.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A bearer token minted by the identity store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiToken {
    /// Token record identifier.
    pub id: TokenId,
    /// The opaque bearer token value, forwarded as `X-API-Key`.
    pub token: String,
    /// Owning user.
    pub user_id: UserId,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Auxiliary meeting data reported by the transcription API.
///
/// Free-form upstream; only the fields refining the lifecycle status are
/// modeled here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeetingData {
    /// Why the meeting reached `completed`, when it did.
    #[serde(default)]
    pub completion_reason: Option<String>,
    /// Upstream error code, when the meeting failed.
    #[serde(default)]
    pub error_code: Option<String>,
}

/// A meeting resource from the transcription API.
///
/// Status fields stay as raw strings on the wire; [`Meeting::state`]
/// resolves them into the typed lifecycle model exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    /// Upstream meeting identifier.
    pub id: i64,
    /// Meeting platform (e.g. `google_meet`).
    #[serde(default)]
    pub platform: Option<String>,
    /// Platform-native meeting identifier.
    #[serde(default)]
    pub native_meeting_id: Option<String>,
    /// Current lifecycle status, owned and mutated upstream.
    pub status: String,
    /// Auxiliary data refining the status.
    #[serde(default)]
    pub data: MeetingData,
    /// Append-only status change history, in no guaranteed order.
    #[serde(default)]
    pub status_transitions: Vec<StatusTransition>,
    /// When the meeting record was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the bot joined.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// When the meeting ended.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl Meeting {
    /// Resolve the raw status fields into the typed lifecycle state.
    #[must_use]
    pub fn state(&self) -> MeetingState {
        MeetingState::from_parts(
            &self.status,
            self.data.completion_reason.as_deref(),
            self.data.error_code.as_deref(),
        )
    }
}

/// Response envelope for the meeting list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MeetingsResponse {
    /// The user's meetings.
    #[serde(default)]
    pub meetings: Vec<Meeting>,
}
