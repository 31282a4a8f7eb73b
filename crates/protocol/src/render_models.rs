//! Render Intents consumed by the UI.
//!
//! The router turns each streamed event into zero or more Render
//! Intents: descriptions of one UI effect each, decoupled from how the
//! effect is visually realized. The render sink applies intents in the
//! exact order they were emitted.

use serde::{Deserialize, Serialize};

use crate::agent_models::AgentId;
use crate::event_models::EventPayload;

/// Visual classification of a chat entry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatClassification {
    /// A step finished or a check passed.
    Success,
    /// A failure, from a step or from the stream itself.
    Error,
    /// A step has started and carries detail worth showing.
    Working,
    /// A conversational message.
    Complete,
}

/// One UI effect to apply.
///
/// Uses tagged enum serialization like the rest of the protocol:
/// ```json
/// {
///   "type": "statusUpdate",
///   "payload": { "text": "Writing code...", "visible": true }
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum RenderIntent {
    /// Append an entry to the chat log.
    ChatEntry {
        identity: AgentId,
        text: String,
        classification: ChatClassification,
        /// Structured detail rendered under the entry's main text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<EventPayload>,
    },

    /// Update the transient status indicator.
    ///
    /// `visible: false` hides the indicator; the controller always
    /// emits one when a stream ends, so the sink can also treat it as
    /// the stream-finished signal.
    StatusUpdate { text: String, visible: bool },

    /// Replace the live preview with a new artifact.
    ///
    /// Always a full replacement; the router never emits this for an
    /// artifact identical to the current one.
    ArtifactUpdate { content: String },

    /// The build produced its terminal artifact; expose the download
    /// affordance.
    TerminalArtifact { available: bool },
}
