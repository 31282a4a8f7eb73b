//! The streaming update controller.
//!
//! Drives one build-or-refine stream end-to-end: opens the request,
//! feeds response chunks through the frame decoder and event parser,
//! routes each record into Render Intents, and keeps the session state
//! machine honest. Whatever happens — clean end-of-stream, transport
//! failure, or cancellation — the session returns to `Idle` and the
//! status indicator is hidden.
//!
//! Intents are pushed into an unbounded channel, so a slow reveal on
//! the render side never backpressures frame ingestion.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::debug;
use vb_protocol::{AgentId, ChatClassification, RenderIntent};

use crate::api::{ApiClient, ByteStream};
use crate::decoder::FrameDecoder;
use crate::error::ClientError;
use crate::parser::parse_event_line;
use crate::router::route_event;
use crate::session::Session;

/// Owns the session state machine and one streaming pipeline at a time.
///
/// The caller guarantees single-pipeline invocation (requests while
/// streaming are rejected at the boundary); the controller performs no
/// internal locking.
pub struct UpdateController {
    session: Session,
    intents_tx: UnboundedSender<RenderIntent>,
}

impl UpdateController {
    pub fn new(intents_tx: UnboundedSender<RenderIntent>) -> Self {
        Self {
            session: Session::new(),
            intents_tx,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run a fresh build from an idea.
    ///
    /// A request that fails before any bytes are read surfaces as one
    /// System chat error entry and the session returns to `Idle`; the
    /// call itself still succeeds. `Err` is returned only for requests
    /// rejected before the session transitions (already streaming).
    pub async fn run_build(
        &mut self,
        api: &ApiClient,
        idea: &str,
        cancel_rx: &mut UnboundedReceiver<()>,
    ) -> Result<(), ClientError> {
        self.session.begin_build()?;
        self.emit_status("Initializing project...", true);

        match api.build(idea).await {
            Ok(stream) => self.consume_stream(stream, cancel_rx).await,
            Err(e) => self.fail_before_stream(format!("Connection error: {e}")),
        }
        Ok(())
    }

    /// Run a refinement of the current artifact.
    ///
    /// The current artifact becomes the `code` field of the request and
    /// is preserved as the base the refinement augments.
    pub async fn run_refine(
        &mut self,
        api: &ApiClient,
        feedback: &str,
        cancel_rx: &mut UnboundedReceiver<()>,
    ) -> Result<(), ClientError> {
        let code = self
            .session
            .current_artifact()
            .ok_or(ClientError::NoArtifact)?
            .to_string();
        self.session.begin_refine()?;
        self.emit_status("Acknowledging request...", true);

        match api.refine(&code, feedback).await {
            Ok(stream) => self.consume_stream(stream, cancel_rx).await,
            Err(e) => self.fail_before_stream(format!("Failed to update code: {e}")),
        }
        Ok(())
    }

    /// Consume one response body to completion, cancellation, or error.
    async fn consume_stream(&mut self, mut stream: ByteStream, cancel_rx: &mut UnboundedReceiver<()>) {
        use futures::StreamExt;

        // Drop cancel signals left over from before this stream opened.
        while cancel_rx.try_recv().is_ok() {}

        let mut decoder = FrameDecoder::new();
        loop {
            tokio::select! {
                _ = cancel_rx.recv() => {
                    debug!("stream cancelled; releasing response body");
                    break;
                }
                chunk = stream.next() => match chunk {
                    Some(Ok(bytes)) => {
                        for line in decoder.push_chunk(&bytes) {
                            if let Some(event) = parse_event_line(&line) {
                                for intent in route_event(&event, &mut self.session) {
                                    self.emit(intent);
                                }
                            }
                        }
                    }
                    Some(Err(e)) => {
                        self.emit(RenderIntent::ChatEntry {
                            identity: AgentId::System,
                            text: format!("Connection error: {e}"),
                            classification: ChatClassification::Error,
                            detail: None,
                        });
                        break;
                    }
                    None => {
                        decoder.finish();
                        break;
                    }
                }
            }
        }

        self.session.end_stream();
        self.emit_status("", false);
    }

    /// The request failed before any bytes were read.
    fn fail_before_stream(&mut self, text: String) {
        self.emit(RenderIntent::ChatEntry {
            identity: AgentId::System,
            text,
            classification: ChatClassification::Error,
            detail: None,
        });
        self.session.end_stream();
        self.emit_status("", false);
    }

    fn emit(&self, intent: RenderIntent) {
        // A closed channel means the UI is gone; nothing left to render.
        let _ = self.intents_tx.send(intent);
    }

    fn emit_status(&mut self, text: &str, visible: bool) {
        if visible {
            self.session.set_status_message(text.to_string());
        }
        self.emit(RenderIntent::StatusUpdate {
            text: text.to_string(),
            visible,
        });
    }
}
