//! Build-lifecycle state machine.
//!
//! One session instance lives for the whole page lifetime and is owned
//! by the controller; it is the only state mutated across requests. A
//! fresh build resets the current artifact, a refinement preserves it
//! as the base the refinement augments, and any stream end — normal,
//! errored, or cancelled — returns the session to [`SessionPhase::Idle`].

use crate::error::ClientError;

/// Lifecycle phase of the build session.
///
/// There is no persisted error state: an error during streaming is
/// rendered as a chat entry and the session still returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No request in flight, no stream open.
    #[default]
    Idle,
    /// Exactly one decoder/parser/router pipeline is consuming a
    /// response body.
    Streaming,
}

/// Session-wide state for one build-or-refine request at a time.
#[derive(Debug, Default)]
pub struct Session {
    phase: SessionPhase,
    current_artifact: Option<String>,
    status_message: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_streaming(&self) -> bool {
        self.phase == SessionPhase::Streaming
    }

    /// The most recently promoted artifact, if any.
    pub fn current_artifact(&self) -> Option<&str> {
        self.current_artifact.as_deref()
    }

    /// The last "starting" status message seen, if any.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub(crate) fn set_status_message(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Transition `Idle -> Streaming` for a fresh build.
    ///
    /// Resets the current artifact and status message.
    pub fn begin_build(&mut self) -> Result<(), ClientError> {
        if self.is_streaming() {
            return Err(ClientError::Busy);
        }
        self.current_artifact = None;
        self.status_message = None;
        self.phase = SessionPhase::Streaming;
        Ok(())
    }

    /// Transition `Idle -> Streaming` for a refinement.
    ///
    /// Preserves the current artifact as the refinement base.
    pub fn begin_refine(&mut self) -> Result<(), ClientError> {
        if self.is_streaming() {
            return Err(ClientError::Busy);
        }
        if self.current_artifact.is_none() {
            return Err(ClientError::NoArtifact);
        }
        self.phase = SessionPhase::Streaming;
        Ok(())
    }

    /// Transition back to `Idle` and clear the status message.
    ///
    /// The current artifact survives; it is the base for a later
    /// refinement.
    pub fn end_stream(&mut self) {
        self.phase = SessionPhase::Idle;
        self.status_message = None;
    }

    /// Adopt `candidate` as the current artifact unless it is already
    /// current.
    ///
    /// Comparison is exact string equality; every update is a full
    /// replacement. Returns whether a promotion happened.
    pub fn promote_artifact(&mut self, candidate: &str) -> bool {
        if self.current_artifact.as_deref() == Some(candidate) {
            return false;
        }
        self.current_artifact = Some(candidate.to_string());
        true
    }
}
