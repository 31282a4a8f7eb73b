//! TUI application state and event loop.
//!
//! The `App` owns the render-side view of the session: the chat log,
//! the status pill, the current artifact preview, and the input box.
//! It consumes Render Intents from the client task over a channel and
//! applies them strictly in arrival order; the typewriter reveal runs
//! off a timer tick so a slow reveal never stalls intent ingestion.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tokio::select;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_stream::StreamExt;
use tracing::debug;
use vb_client::ClientOp;
use vb_protocol::{ChatClassification, RenderIntent};

use crate::chat::{self, ChatEntry};
use crate::tui::Tui;

/// Characters revealed per tick (ticks fire every 40ms).
const REVEAL_CHARS_PER_TICK: usize = 3;

/// Maximum project title length before truncation.
const TITLE_MAX_CHARS: usize = 35;

/// Which artifact view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactTab {
    Preview,
    Code,
}

/// Main TUI application state.
pub struct App {
    /// Chat log, in intent arrival order.
    pub chat: Vec<ChatEntry>,
    /// Transient status pill text, or None when hidden.
    pub status: Option<String>,
    /// The artifact currently shown in the preview.
    pub artifact: Option<String>,
    /// Whether the terminal artifact has arrived.
    pub download_ready: bool,
    /// Boundary guard: true from submit until the stream-end signal.
    pub is_building: bool,
    /// Current text in the input box.
    pub input: String,
    /// Truncated idea shown as the project title.
    pub project_title: Option<String>,
    /// Active artifact view.
    pub active_tab: ArtifactTab,
    /// Flag to indicate if the application should exit.
    pub should_exit: bool,
    /// Channel to send operations to the client task.
    pub op_tx: UnboundedSender<ClientOp>,
    /// Channel to receive Render Intents from the client task.
    pub intent_rx: UnboundedReceiver<RenderIntent>,
}

impl App {
    /// Create a new App with communication channels.
    pub fn new(
        op_tx: UnboundedSender<ClientOp>,
        intent_rx: UnboundedReceiver<RenderIntent>,
    ) -> Self {
        Self {
            chat: Vec::new(),
            status: None,
            artifact: None,
            download_ready: false,
            is_building: false,
            input: String::new(),
            project_title: None,
            active_tab: ArtifactTab::Preview,
            should_exit: false,
            op_tx,
            intent_rx,
        }
    }

    /// Main event loop.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut term_events = crossterm::event::EventStream::new();
        let mut tick = tokio::time::interval(Duration::from_millis(40));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        while !self.should_exit {
            tui.draw(|frame| self.render(frame))?;

            select! {
                Some(intent) = self.intent_rx.recv() => {
                    self.apply_intent(intent);
                    // Drain whatever is already queued; the channel
                    // preserves emission order.
                    while let Ok(intent) = self.intent_rx.try_recv() {
                        self.apply_intent(intent);
                    }
                }
                Some(Ok(event)) = term_events.next() => {
                    if let Event::Key(key) = event {
                        self.handle_key_event(key);
                    }
                }
                _ = tick.tick() => {
                    chat::advance_reveal(&mut self.chat, REVEAL_CHARS_PER_TICK);
                }
            }
        }

        let _ = self.op_tx.send(ClientOp::Shutdown);
        Ok(())
    }

    /// Apply one Render Intent to the view state.
    pub fn apply_intent(&mut self, intent: RenderIntent) {
        match intent {
            RenderIntent::ChatEntry {
                identity,
                text,
                classification,
                detail,
            } => {
                self.chat
                    .push(ChatEntry::new(identity, classification, text, detail));
            }
            RenderIntent::StatusUpdate { text, visible } => {
                if visible {
                    self.status = Some(text);
                } else {
                    // The unconditional hide doubles as the
                    // stream-finished signal.
                    self.status = None;
                    self.is_building = false;
                }
            }
            RenderIntent::ArtifactUpdate { content } => {
                self.artifact = Some(content);
            }
            RenderIntent::TerminalArtifact { available } => {
                self.download_ready = available;
            }
        }
    }

    /// Handle keyboard events.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_exit = true;
            }
            KeyCode::Esc => {
                if self.is_building {
                    debug!("cancel requested");
                    let _ = self.op_tx.send(ClientOp::Cancel);
                } else {
                    self.should_exit = true;
                }
            }
            KeyCode::Tab => {
                self.active_tab = match self.active_tab {
                    ArtifactTab::Preview => ArtifactTab::Code,
                    ArtifactTab::Code => ArtifactTab::Preview,
                };
            }
            KeyCode::Enter => {
                self.submit();
            }
            KeyCode::Char(c) => {
                self.input.push(c);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            _ => {}
        }
    }

    /// Submit the input box: a fresh build when there is no artifact
    /// yet, a refinement afterwards. Rejected while a stream is active.
    fn submit(&mut self) {
        let text = self.input.trim().to_string();
        if text.is_empty() || self.is_building {
            return;
        }
        self.input.clear();

        if self.artifact.is_none() {
            self.start_build(text);
        } else {
            self.is_building = true;
            let _ = self.op_tx.send(ClientOp::Refine { feedback: text });
        }
    }

    fn start_build(&mut self, idea: String) {
        // Fresh build: reset the whole building view.
        self.chat.clear();
        self.artifact = None;
        self.download_ready = false;
        self.project_title = Some(truncate_title(&idea));
        self.is_building = true;
        debug!(idea = %idea, "starting build");
        let _ = self.op_tx.send(ClientOp::StartBuild { idea });
    }

    /// Render the TUI.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(0),    // Chat + preview
                Constraint::Length(3), // Input
            ])
            .split(area);

        self.render_header(frame, rows[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[1]);

        self.render_chat(frame, body[0]);
        self.render_artifact(frame, body[1]);
        self.render_input(frame, rows[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            "VibeBuilder",
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let Some(title) = &self.project_title {
            spans.push(Span::raw("  "));
            spans.push(Span::raw(title.as_str()));
        }
        if let Some(status) = &self.status {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("● {status}"),
                Style::default().fg(Color::Yellow),
            ));
        }
        if self.download_ready {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                "⬇ Ready",
                Style::default().fg(Color::Green),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_chat(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Agents");

        let mut lines: Vec<Line> = Vec::new();
        for entry in &self.chat {
            let color = classification_color(entry.classification);
            lines.push(Line::from(vec![
                Span::raw(entry.identity.icon()),
                Span::raw(" "),
                Span::styled(
                    entry.identity.label(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(entry.visible_text()));

            // Detail blocks appear once the main text has finished
            // revealing.
            if entry.is_fully_revealed() {
                if let Some(detail) = &entry.detail {
                    let dim = Style::default().fg(Color::DarkGray);
                    if let Some(thinking) = &detail.thinking {
                        lines.push(Line::from(vec![
                            Span::styled("Insight: ", dim),
                            Span::raw(thinking.as_str()),
                        ]));
                    }
                    let items = if detail.components.is_empty() {
                        &detail.findings
                    } else {
                        &detail.components
                    };
                    if !items.is_empty() {
                        lines.push(Line::from(vec![
                            Span::styled("Details: ", dim),
                            Span::raw(items.join(" · ")),
                        ]));
                    }
                    if !detail.features.is_empty() {
                        lines.push(Line::from(Span::styled(
                            format!("✓ {}", detail.features.join(" · ")),
                            Style::default().fg(Color::Green),
                        )));
                    }
                }
            }
            lines.push(Line::default());
        }

        // Keep the newest entries on screen.
        let inner_height = area.height.saturating_sub(2) as usize;
        let scroll = lines.len().saturating_sub(inner_height) as u16;

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn render_artifact(&self, frame: &mut Frame, area: Rect) {
        let title = match self.active_tab {
            ArtifactTab::Preview => "Preview (Tab: code)",
            ArtifactTab::Code => "Code (Tab: preview)",
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        let text = self
            .artifact
            .as_deref()
            .unwrap_or("The generated app will appear here.");

        let mut paragraph = Paragraph::new(text).block(block);
        if self.active_tab == ArtifactTab::Preview {
            paragraph = paragraph.wrap(Wrap { trim: false });
        }
        frame.render_widget(paragraph, area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let title = if self.is_building {
            "Building... (Esc to cancel)"
        } else if self.artifact.is_some() {
            "Refine (Enter to apply, Esc to quit)"
        } else {
            "Describe your app (Enter to build, Esc to quit)"
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        let paragraph = Paragraph::new(format!("> {}", self.input))
            .block(block)
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(paragraph, area);
    }
}

fn classification_color(classification: ChatClassification) -> Color {
    match classification {
        ChatClassification::Success => Color::Green,
        ChatClassification::Error => Color::Red,
        ChatClassification::Working => Color::Yellow,
        ChatClassification::Complete => Color::Cyan,
    }
}

/// Truncate an idea to the project-title length.
fn truncate_title(idea: &str) -> String {
    if idea.chars().count() <= TITLE_MAX_CHARS {
        return idea.to_string();
    }
    let truncated: String = idea.chars().take(TITLE_MAX_CHARS).collect();
    format!("{truncated}...")
}
