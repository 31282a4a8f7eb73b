//! Chat log entries and the typewriter reveal effect.
//!
//! New entries are appended to the log immediately when their Render
//! Intent arrives; the reveal is purely cosmetic and advances on a
//! timer tick, so stream ingestion never waits for it. Entries reveal
//! strictly in log order — a later entry stays hidden until every
//! earlier one has finished.

use vb_protocol::{AgentId, ChatClassification, EventPayload};

/// One entry in the chat log.
#[derive(Debug, Clone)]
pub struct ChatEntry {
    pub identity: AgentId,
    pub classification: ChatClassification,
    pub text: String,
    pub detail: Option<EventPayload>,
    /// Number of characters of `text` currently revealed.
    revealed: usize,
}

impl ChatEntry {
    pub fn new(
        identity: AgentId,
        classification: ChatClassification,
        text: String,
        detail: Option<EventPayload>,
    ) -> Self {
        Self {
            identity,
            classification,
            text,
            detail,
            revealed: 0,
        }
    }

    /// The portion of the text currently revealed, on a character
    /// boundary.
    pub fn visible_text(&self) -> &str {
        match self.text.char_indices().nth(self.revealed) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.revealed >= self.text.chars().count()
    }

    fn advance(&mut self, chars: usize) {
        let total = self.text.chars().count();
        self.revealed = (self.revealed + chars).min(total);
    }
}

/// Advance the reveal by `chars` characters on the earliest entry that
/// is not fully revealed yet.
///
/// Returns whether any entry is still revealing afterwards, so the
/// caller knows to keep ticking.
pub fn advance_reveal(entries: &mut [ChatEntry], chars: usize) -> bool {
    if let Some(entry) = entries.iter_mut().find(|e| !e.is_fully_revealed()) {
        entry.advance(chars);
    }
    entries.iter().any(|e| !e.is_fully_revealed())
}
