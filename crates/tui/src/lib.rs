//! # vb-tui
//!
//! Terminal user interface for the VibeBuilder client.
//!
//! This crate is the render sink: it consumes Render Intents from
//! `vb-client` over a channel, applies them strictly in arrival order,
//! and realizes them as a chat log with a typewriter reveal effect, a
//! transient status pill, and a live artifact preview. User actions go
//! back to the client task as `ClientOp`s.

pub mod app;
pub mod chat;
pub mod tui;

pub use app::App;
pub use tui::Tui;

use anyhow::Result;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use vb_client::ClientOp;
use vb_protocol::RenderIntent;

/// Initialize the terminal and run the application until exit.
pub async fn run_app(
    op_tx: UnboundedSender<ClientOp>,
    intent_rx: UnboundedReceiver<RenderIntent>,
) -> Result<()> {
    let mut tui = Tui::init()?;
    let mut app = App::new(op_tx, intent_rx);
    let result = app.run(&mut tui).await;
    tui.restore()?;
    result
}
