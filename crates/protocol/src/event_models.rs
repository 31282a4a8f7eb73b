//! The streamed Event Record and its structured payload.
//!
//! The backend emits newline-delimited `data: {json}` frames while a
//! build or refinement runs. Each frame deserializes into a
//! [`BuildEvent`]. Events are immutable once parsed; only the session
//! state machine may promote one of their artifact-bearing fields into
//! the session-wide current artifact.

use serde::{Deserialize, Serialize};

/// Status reported by a pipeline step.
///
/// The backend treats this as an open string set; any value this client
/// does not recognize deserializes to [`EventStatus::Unknown`] and is
/// treated as non-terminal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// The step has begun working.
    Starting,

    /// The step finished its work.
    Complete,

    /// A verification step succeeded.
    Passed,

    /// A verification step found problems.
    Failed,

    /// Any status value this client does not recognize.
    #[default]
    #[serde(other)]
    Unknown,
}

impl EventStatus {
    /// Whether this status marks the end of a step's work.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Passed | Self::Failed)
    }
}

/// Structured detail attached to an event.
///
/// Arrives under the JSON key `data` inside the event record. All
/// fields are optional; unknown fields are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct EventPayload {
    /// Free-text rationale from the agent, rendered as an insight block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,

    /// Short findings from the research step.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<String>,

    /// Component names from the architecture step.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<String>,

    /// Feature names, rendered as success pills.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,

    /// A complete generated artifact from the coding step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// A complete artifact produced by a debugging pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_code: Option<String>,

    /// A complete artifact produced by a refinement pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refined_code: Option<String>,
}

/// One structured, independently-parseable unit of the streamed protocol.
///
/// Every field is optional on the wire; a bare `{}` is a valid (if
/// useless) event. `step` identifies the producing agent, `phase` is a
/// coarse tag (the literal `"chat"` marks conversational messages), and
/// the artifact-bearing fields carry full replacements, never diffs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct BuildEvent {
    /// Which agent/phase produced the event (0 = conversational/system,
    /// 1 = research, 2 = architecture, 3 = coding, 4 = testing,
    /// 6 = debugging, 7 = refinement).
    #[serde(default)]
    pub step: u32,

    /// Coarse phase tag, e.g. `"research"`, `"code"`, `"chat"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    /// Step status; absent statuses read as [`EventStatus::Unknown`].
    #[serde(default)]
    pub status: EventStatus,

    /// Human-readable progress text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Structured detail, under the wire key `data`.
    #[serde(default, rename = "data", skip_serializing_if = "Option::is_none")]
    pub payload: Option<EventPayload>,

    /// Present once the build has produced its terminal artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_code: Option<String>,

    /// Present when the backend reports a hard stream-level failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BuildEvent {
    /// Whether this is a conversational (non-pipeline) message.
    pub fn is_chat(&self) -> bool {
        self.phase.as_deref() == Some("chat")
    }

    /// The artifact this event carries, if any.
    ///
    /// Resolution order: `payload.code`, `payload.fixed_code`,
    /// `payload.refined_code`, then `final_code`.
    pub fn artifact_candidate(&self) -> Option<&str> {
        let payload = self.payload.as_ref();
        payload
            .and_then(|p| p.code.as_deref())
            .or_else(|| payload.and_then(|p| p.fixed_code.as_deref()))
            .or_else(|| payload.and_then(|p| p.refined_code.as_deref()))
            .or(self.final_code.as_deref())
    }
}
