//! `vibe` launches the VibeBuilder terminal client.
//!
//! The binary wires two tasks together over channels: the client task
//! (HTTP streaming, event routing, session state) and the TUI (chat
//! log, status pill, artifact preview). Logs go to a file when
//! requested, never to the terminal the TUI is drawing on.

use std::path::Path;

use clap::Parser;
use tokio::sync::mpsc::unbounded_channel;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;
use vb_client::ApiClient;

/// Terminal client for the VibeBuilder code-generation service.
#[derive(Parser, Debug)]
#[command(name = "vibe", version, about)]
struct Cli {
    /// Base URL of the VibeBuilder server.
    #[arg(long, env = "VIBE_SERVER", default_value = "http://localhost:5000")]
    server: String,

    /// Append diagnostics to this file.
    #[arg(long, env = "VIBE_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,
}

/// Set up file-backed logging. Returns the appender guard, which must
/// stay alive until exit or buffered lines are lost.
fn init_logging(log_file: Option<&Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let path = log_file?;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("vibe.log");

    let writer = tracing_appender::rolling::never(dir.unwrap_or(Path::new(".")), file_name);
    let (writer, guard) = tracing_appender::non_blocking(writer);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init();
    Some(guard)
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.log_file.as_deref());
    tracing::info!(server = %cli.server, "starting vibe");

    let api = ApiClient::new(&cli.server)?;
    let (op_tx, op_rx) = unbounded_channel();
    let (intent_tx, intent_rx) = unbounded_channel();

    let client_task = tokio::spawn(vb_client::run_client(api, op_rx, intent_tx));
    let result = vb_tui::run_app(op_tx, intent_rx).await;
    // The TUI sends Shutdown on exit, so the client task winds down.
    let _ = client_task.await;
    result.map_err(|e| color_eyre::eyre::eyre!(e))
}
