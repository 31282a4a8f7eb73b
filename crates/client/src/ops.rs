//! Command loop bridging the UI to the controller.
//!
//! The UI sends [`ClientOp`]s over a channel and receives Render
//! Intents back, so the render side and the streaming side stay
//! independently schedulable. Ops are processed sequentially: at most
//! one streaming pipeline exists at any time, and requests arriving
//! while a stream is active are dropped (the UI's boundary guard
//! prevents sending them in the first place).

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use vb_protocol::{AgentId, ChatClassification, RenderIntent};

use crate::api::ApiClient;
use crate::controller::UpdateController;
use crate::error::ClientError;

/// Commands the UI sends to the client task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOp {
    /// Start a fresh build from an idea.
    StartBuild { idea: String },
    /// Refine the current artifact with user feedback.
    Refine { feedback: String },
    /// Abort the stream currently being consumed, if any.
    Cancel,
    /// Stop the client task.
    Shutdown,
}

/// Run the client task until shutdown.
///
/// Owns the controller (and through it the session) for the whole
/// application lifetime, so the current artifact survives from one
/// stream to the next.
pub async fn run_client(
    api: ApiClient,
    mut op_rx: UnboundedReceiver<ClientOp>,
    intents_tx: UnboundedSender<RenderIntent>,
) {
    let mut controller = UpdateController::new(intents_tx.clone());
    let (cancel_tx, mut cancel_rx) = tokio::sync::mpsc::unbounded_channel();
    let mut shutdown = false;

    while !shutdown {
        let Some(op) = op_rx.recv().await else { break };
        let result = match op {
            ClientOp::StartBuild { idea } => {
                stream_op(
                    controller.run_build(&api, &idea, &mut cancel_rx),
                    &mut op_rx,
                    &cancel_tx,
                    &mut shutdown,
                )
                .await
            }
            ClientOp::Refine { feedback } => {
                stream_op(
                    controller.run_refine(&api, &feedback, &mut cancel_rx),
                    &mut op_rx,
                    &cancel_tx,
                    &mut shutdown,
                )
                .await
            }
            // Nothing is streaming; a stray cancel is a no-op.
            ClientOp::Cancel => Ok(()),
            ClientOp::Shutdown => break,
        };

        if let Err(e) = result {
            let _ = intents_tx.send(RenderIntent::ChatEntry {
                identity: AgentId::System,
                text: e.to_string(),
                classification: ChatClassification::Error,
                detail: None,
            });
        }
    }

    debug!("client task stopped");
}

/// Drive one streaming request while staying responsive to Cancel and
/// Shutdown ops.
async fn stream_op<F>(
    fut: F,
    op_rx: &mut UnboundedReceiver<ClientOp>,
    cancel_tx: &UnboundedSender<()>,
    shutdown: &mut bool,
) -> Result<(), ClientError>
where
    F: std::future::Future<Output = Result<(), ClientError>>,
{
    tokio::pin!(fut);
    loop {
        tokio::select! {
            result = &mut fut => return result,
            op = op_rx.recv() => match op {
                Some(ClientOp::Cancel) => {
                    let _ = cancel_tx.send(());
                }
                Some(ClientOp::Shutdown) | None => {
                    // Cancel the stream, let it wind down cleanly, then
                    // stop the outer loop.
                    let _ = cancel_tx.send(());
                    *shutdown = true;
                }
                Some(op) => {
                    warn!(?op, "ignoring request while a stream is active");
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test]
    async fn test_shutdown_stops_the_task() {
        let api = ApiClient::new("http://127.0.0.1:1").expect("client builds");
        let (op_tx, op_rx) = unbounded_channel();
        let (intents_tx, _intents_rx) = unbounded_channel();

        let handle = tokio::spawn(run_client(api, op_rx, intents_tx));
        op_tx.send(ClientOp::Shutdown).expect("task listening");
        handle.await.expect("task exits cleanly");
    }

    #[tokio::test]
    async fn test_dropping_the_op_channel_stops_the_task() {
        let api = ApiClient::new("http://127.0.0.1:1").expect("client builds");
        let (op_tx, op_rx) = unbounded_channel();
        let (intents_tx, _intents_rx) = unbounded_channel();

        let handle = tokio::spawn(run_client(api, op_rx, intents_tx));
        drop(op_tx);
        handle.await.expect("task exits cleanly");
    }

    #[tokio::test]
    async fn test_refine_without_artifact_surfaces_chat_error() {
        let api = ApiClient::new("http://127.0.0.1:1").expect("client builds");
        let (op_tx, op_rx) = unbounded_channel();
        let (intents_tx, mut intents_rx) = unbounded_channel();

        let handle = tokio::spawn(run_client(api, op_rx, intents_tx));
        op_tx
            .send(ClientOp::Refine {
                feedback: "darker".to_string(),
            })
            .expect("task listening");
        op_tx.send(ClientOp::Shutdown).expect("task listening");
        handle.await.expect("task exits cleanly");

        let mut saw_error = false;
        while let Ok(intent) = intents_rx.try_recv() {
            if matches!(
                intent,
                RenderIntent::ChatEntry {
                    classification: ChatClassification::Error,
                    ..
                }
            ) {
                saw_error = true;
            }
        }
        assert!(saw_error, "expected a chat error for refine-without-artifact");
    }

    #[tokio::test]
    async fn test_build_against_unreachable_server_reports_and_recovers() {
        let api = ApiClient::new("http://127.0.0.1:1").expect("client builds");
        let (op_tx, op_rx) = unbounded_channel();
        let (intents_tx, mut intents_rx) = unbounded_channel();

        let handle = tokio::spawn(run_client(api, op_rx, intents_tx));
        op_tx
            .send(ClientOp::StartBuild {
                idea: "a todo app".to_string(),
            })
            .expect("task listening");
        op_tx.send(ClientOp::Shutdown).expect("task listening");
        handle.await.expect("task exits cleanly");

        let mut intents = Vec::new();
        while let Ok(intent) = intents_rx.try_recv() {
            intents.push(intent);
        }
        // Initial status, chat error, then the hide that signals the end.
        assert!(matches!(
            intents.first(),
            Some(RenderIntent::StatusUpdate { visible: true, .. })
        ));
        assert!(intents.iter().any(|i| matches!(
            i,
            RenderIntent::ChatEntry {
                classification: ChatClassification::Error,
                ..
            }
        )));
        assert_eq!(
            intents.last(),
            Some(&RenderIntent::StatusUpdate {
                text: String::new(),
                visible: false,
            })
        );
    }
}
