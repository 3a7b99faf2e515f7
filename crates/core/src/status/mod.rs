//! Meeting lifecycle state model.
//!
//! The upstream API reports a meeting's lifecycle as loosely-typed strings:
//! a coarse `status`, an optional `completion_reason` (when completed) and an
//! optional `error_code` (when failed). Raw strings are resolved once at the
//! boundary into [`MeetingState`]; everything downstream dispatches on the
//! sum type and never re-parses strings.
//!
//! [`classify`] is a pure, total function from a state to a user-facing
//! [`StatusDescriptor`] (label, tone, explanation). Unrecognized statuses map
//! to an explicit "Unknown" descriptor - the upstream contract is not a
//! closed enum from this layer's point of view.

pub mod transitions;

pub use transitions::{
    StatusTransition, TimelineEntry, TransitionSource, build_timeline, order_transitions,
};

use serde::{Deserialize, Serialize};

// =============================================================================
// MeetingState
// =============================================================================

/// Why a meeting reached the `completed` status.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompletionReason {
    /// Transcription was stopped manually.
    Stopped,
    /// The meeting itself ended.
    MeetingEnded,
    /// The bot was kicked or removed from the meeting.
    Removed,
    /// The bot was never admitted from the waiting room.
    AdmissionRejected,
    /// A reason code this layer does not recognize.
    Other(String),
}

impl CompletionReason {
    /// Resolve a raw reason code from the upstream API.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "stopped" => Self::Stopped,
            "meeting_ended" => Self::MeetingEnded,
            "kicked" | "removed" => Self::Removed,
            "awaiting_admission_rejected" => Self::AdmissionRejected,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// A meeting's lifecycle state, resolved from the upstream status fields.
///
/// The declared status set is
/// `{requested, joining, awaiting_admission, active, completed, failed}`;
/// anything else lands in [`MeetingState::Unknown`] with the raw string
/// preserved for logging.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MeetingState {
    /// Bot requested, not yet dispatched.
    Requested,
    /// Bot is connecting to the meeting.
    Joining,
    /// Bot is waiting in the lobby to be admitted.
    AwaitingAdmission,
    /// Transcription is running.
    Active,
    /// Meeting finished, with an optional refining reason.
    Completed(Option<CompletionReason>),
    /// Meeting failed, with an optional upstream error code.
    Failed(Option<String>),
    /// A status string this layer does not recognize.
    Unknown(String),
}

impl MeetingState {
    /// Resolve a raw `(status, completion_reason, error_code)` triple.
    ///
    /// This is the single boundary where status strings enter the model;
    /// auxiliary fields are only consulted for the status they refine.
    #[must_use]
    pub fn from_parts(status: &str, completion_reason: Option<&str>, error_code: Option<&str>) -> Self {
        match status {
            "requested" => Self::Requested,
            "joining" => Self::Joining,
            "awaiting_admission" => Self::AwaitingAdmission,
            "active" => Self::Active,
            "completed" => Self::Completed(completion_reason.map(CompletionReason::from_code)),
            "failed" => Self::Failed(error_code.map(str::to_owned)),
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// The coarse status label, ignoring any refinement.
    ///
    /// Transition history deliberately uses this label set rather than the
    /// refined descriptors.
    #[must_use]
    pub const fn base_label(&self) -> &'static str {
        match self {
            Self::Requested => "Requested",
            Self::Joining => "Joining",
            Self::AwaitingAdmission => "Awaiting admission",
            Self::Active => "Active",
            Self::Completed(_) => "Completed",
            Self::Failed(_) => "Failed",
            Self::Unknown(_) => "Unknown",
        }
    }
}

// =============================================================================
// StatusDescriptor
// =============================================================================

/// Semantic tone of a status, mapped to fixed CSS utility classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    /// Positive outcome or healthy live state.
    Success,
    /// Informational, in-progress.
    Info,
    /// Needs attention but not an error.
    Warning,
    /// Failure.
    Error,
    /// Manual or indeterminate outcome.
    Neutral,
}

impl StatusTone {
    /// Foreground color class for the status text.
    #[must_use]
    pub const fn text_class(self) -> &'static str {
        match self {
            Self::Success => "text-green-700",
            Self::Info => "text-blue-700",
            Self::Warning => "text-amber-700",
            Self::Error => "text-red-700",
            Self::Neutral => "text-gray-700",
        }
    }

    /// Background color class for the status badge.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Success => "bg-green-100",
            Self::Info => "bg-blue-100",
            Self::Warning => "bg-amber-100",
            Self::Error => "bg-red-100",
            Self::Neutral => "bg-gray-100",
        }
    }
}

/// User-facing description of a meeting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusDescriptor {
    /// Short badge label.
    pub label: &'static str,
    /// One-line explanation shown next to the badge.
    pub description: &'static str,
    /// Semantic tone driving the color classes.
    pub tone: StatusTone,
}

impl StatusDescriptor {
    const fn new(label: &'static str, description: &'static str, tone: StatusTone) -> Self {
        Self {
            label,
            description,
            tone,
        }
    }
}

// =============================================================================
// classify
// =============================================================================

/// Failure descriptions keyed by case-insensitive error-code substring.
///
/// Order matters: the first matching entry wins, so the more specific
/// `admission` entry precedes the generic `timeout` one
/// (`ADMISSION_TIMEOUT` matches both).
const FAILURE_MESSAGES: &[(&str, &str)] = &[
    ("admission", "Bot was not admitted to meeting"),
    ("not_found", "Meeting could not be found"),
    ("crash", "Transcription bot crashed unexpectedly"),
    ("capacity", "No transcription bots were available"),
    ("timeout", "Bot timed out while connecting to the meeting"),
];

const GENERIC_FAILURE: &str = "Transcription failed";

/// Map a meeting state to its user-facing descriptor.
///
/// Pure and total: every state, including [`MeetingState::Unknown`], yields
/// a defined descriptor.
#[must_use]
pub fn classify(state: &MeetingState) -> StatusDescriptor {
    match state {
        MeetingState::Requested => StatusDescriptor::new(
            "Requested",
            "Bot requested and queued to join",
            StatusTone::Neutral,
        ),
        MeetingState::Joining => StatusDescriptor::new(
            "Joining",
            "Bot is connecting to the meeting",
            StatusTone::Info,
        ),
        MeetingState::AwaitingAdmission => StatusDescriptor::new(
            "Waiting",
            "Bot is waiting to be admitted to the meeting",
            StatusTone::Warning,
        ),
        MeetingState::Active => StatusDescriptor::new(
            "Active",
            "Transcription in progress",
            StatusTone::Success,
        ),
        MeetingState::Completed(reason) => classify_completed(reason.as_ref()),
        MeetingState::Failed(code) => StatusDescriptor::new(
            "Failed",
            code.as_deref().map_or(GENERIC_FAILURE, failure_message),
            StatusTone::Error,
        ),
        MeetingState::Unknown(_) => StatusDescriptor::new(
            "Unknown",
            "Unrecognized meeting status",
            StatusTone::Neutral,
        ),
    }
}

/// Refine the `completed` status by its completion reason.
///
/// `AdmissionRejected` intentionally overrides the base success styling:
/// the reason code carries more semantic weight than the coarse status.
fn classify_completed(reason: Option<&CompletionReason>) -> StatusDescriptor {
    match reason {
        Some(CompletionReason::Stopped) => StatusDescriptor::new(
            "Stopped",
            "Transcription stopped manually",
            StatusTone::Neutral,
        ),
        Some(CompletionReason::MeetingEnded) => StatusDescriptor::new(
            "Ended",
            "Meeting ended and transcription completed",
            StatusTone::Success,
        ),
        Some(CompletionReason::Removed) => StatusDescriptor::new(
            "Removed",
            "Bot was removed from the meeting",
            StatusTone::Warning,
        ),
        Some(CompletionReason::AdmissionRejected) => StatusDescriptor::new(
            "Rejected",
            "Bot was not admitted to the meeting",
            StatusTone::Error,
        ),
        Some(CompletionReason::Other(_)) | None => StatusDescriptor::new(
            "Completed",
            "Transcription completed",
            StatusTone::Success,
        ),
    }
}

/// Look up a failure description by case-insensitive substring match.
fn failure_message(code: &str) -> &'static str {
    let lower = code.to_lowercase();
    FAILURE_MESSAGES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map_or(GENERIC_FAILURE, |(_, message)| message)
}
