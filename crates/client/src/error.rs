//! Error types for the streaming update controller.

use thiserror::Error;

/// Errors surfaced at the controller boundary.
///
/// Errors originating inside the decoder, parser, or router never
/// escape as faults; they degrade to skipped frames or chat error
/// intents. This type covers the request boundary only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never reached the server, or the connection dropped.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status before streaming.
    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// A stream is already being consumed.
    #[error("a build is already in progress")]
    Busy,

    /// Refinement was requested with no artifact to refine.
    #[error("no artifact to refine yet")]
    NoArtifact,
}
