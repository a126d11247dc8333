use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One human input paired with the assistant reply it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub human: String,
    pub assistant: String,
    pub at: DateTime<Utc>,
}

impl Turn {
    pub fn new(human: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            human: human.into(),
            assistant: assistant.into(),
            at: Utc::now(),
        }
    }
}

/// Append-only history of one interactive session. Lives only as long as the session.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: String,
    turns: Vec<Turn>,
    pub started_at: DateTime<Utc>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            turns: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn record(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_keeps_insertion_order() {
        let mut session = ChatSession::new();
        assert!(session.is_empty());

        session.record(Turn::new("hi", "hello"));
        session.record(Turn::new("python?", "sure"));

        assert_eq!(session.len(), 2);
        assert_eq!(session.turns()[0].human, "hi");
        assert_eq!(session.turns()[1].assistant, "sure");
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        assert_ne!(ChatSession::new().id, ChatSession::new().id);
    }
}
