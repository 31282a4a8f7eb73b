//! Step-to-agent display identity mapping.
//!
//! Every streamed event carries a `step` index identifying which part
//! of the pipeline produced it. The UI displays each event under a
//! fixed agent identity (icon + label). The mapping is total: unknown
//! steps resolve to [`AgentId::System`].

use serde::{Deserialize, Serialize};

/// Display identity for the producer of a streamed event.
///
/// Not user-configurable; the mapping from step index is pure and
/// stateless.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AgentId {
    /// Conversational/system messages and anything unrecognized.
    System,
    /// Step 1: requirements research.
    Researcher,
    /// Step 2: architecture planning.
    Architect,
    /// Step 3: code generation.
    Coder,
    /// Step 4: testing.
    Tester,
    /// Steps 6 and 7: debugging fixes and refinement passes.
    Debugger,
}

impl AgentId {
    /// Resolve the display identity for a step index.
    ///
    /// Step 7 (refinement) displays as the debugger, which is the team
    /// that handles refinement requests. Any step outside the known set
    /// maps to [`AgentId::System`].
    pub fn from_step(step: u32) -> Self {
        match step {
            1 => Self::Researcher,
            2 => Self::Architect,
            3 => Self::Coder,
            4 => Self::Tester,
            6 | 7 => Self::Debugger,
            _ => Self::System,
        }
    }

    /// Emoji icon shown next to this agent's messages.
    pub fn icon(self) -> &'static str {
        match self {
            Self::System => "✨",
            Self::Researcher => "🔍",
            Self::Architect => "📐",
            Self::Coder => "💻",
            Self::Tester => "🧪",
            Self::Debugger => "🔧",
        }
    }

    /// Human-readable label shown next to this agent's messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::System => "VibeAI",
            Self::Researcher => "Researcher",
            Self::Architect => "Architect",
            Self::Coder => "Engineer",
            Self::Tester => "Quality",
            Self::Debugger => "Debugger",
        }
    }
}
