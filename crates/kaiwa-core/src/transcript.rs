//! Conversation transcript types.
//!
//! This module contains types for representing the exchange so far:
//! roles, individual turns, and the append-only transcript.

use serde::{Deserialize, Serialize};

/// Represents the role of a turn in a conversation.
///
/// Serializes to the lowercase wire names the completion service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Synthetic instruction turn, prepended at request time only.
    System,
    /// Turn submitted by the user.
    User,
    /// Turn produced by the AI assistant.
    Assistant,
}

/// A single turn in a conversation history.
///
/// Turns are immutable once appended; history is never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// The role of the turn's author.
    pub role: Role,
    /// The content of the turn.
    pub content: String,
}

impl Turn {
    /// Creates a system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only history of turns.
///
/// Insertion order is significant: it is the conversational context sent
/// to the completion service. Individual turns are never removed or
/// reordered; `clear` discards the whole history at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript(Vec<Turn>);

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn at the end.
    pub fn append(&mut self, turn: Turn) {
        self.0.push(turn);
    }

    /// Discards all turns.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// The turns in insertion order.
    pub fn turns(&self) -> &[Turn] {
        &self.0
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the transcript holds no turns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Observable state of a session: the transcript plus the busy flag.
///
/// `busy` is true exactly while a completion request is outstanding.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub transcript: Transcript,
    pub busy: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.append(Turn::user("first"));
        transcript.append(Turn::assistant("second"));

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.turns()[0], Turn::user("first"));
        assert_eq!(transcript.turns()[1], Turn::assistant("second"));
    }

    #[test]
    fn clear_discards_everything() {
        let mut transcript = Transcript::new();
        transcript.append(Turn::user("hello"));
        transcript.clear();

        assert!(transcript.is_empty());
    }

    #[test]
    fn roles_use_lowercase_wire_names() {
        let turn = Turn::assistant("hi");
        let json = serde_json::to_value(&turn).unwrap();

        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }
}
