//! Bounded conversation memory and the role-tagged prompt it feeds.
//!
//! The window is rebuilt from the full session history on every turn, so
//! only the most recent `k` turns ever reach the model. Interest detection
//! still sees the whole history.

use std::collections::VecDeque;

use super::session::Turn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Human,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PromptMessage {
    System(String),
    History { speaker: Speaker, text: String },
    HumanInput(String),
}

impl PromptMessage {
    /// Chat-completion role name.
    pub fn role(&self) -> &'static str {
        match self {
            PromptMessage::System(_) => "system",
            PromptMessage::History { speaker: Speaker::Human, .. } => "user",
            PromptMessage::History { speaker: Speaker::Assistant, .. } => "assistant",
            PromptMessage::HumanInput(_) => "user",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            PromptMessage::System(text) => text,
            PromptMessage::History { text, .. } => text,
            PromptMessage::HumanInput(text) => text,
        }
    }
}

/// Last `min(k, history.len())` turns, oldest first.
pub fn windowed(history: &[Turn], k: usize) -> &[Turn] {
    &history[history.len().saturating_sub(k)..]
}

#[derive(Debug, Clone)]
pub struct ConversationWindow {
    capacity: usize,
    turns: VecDeque<Turn>,
}

impl ConversationWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            turns: VecDeque::with_capacity(capacity),
        }
    }

    /// Fresh window holding whatever survives replaying `history` in order.
    pub fn replay(history: &[Turn], capacity: usize) -> Self {
        let mut window = Self::new(capacity);
        for turn in windowed(history, capacity) {
            window.save(turn.clone());
        }
        window
    }

    pub fn save(&mut self, turn: Turn) {
        if self.capacity == 0 {
            return;
        }
        if self.turns.len() == self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn messages(&self) -> Vec<PromptMessage> {
        self.turns
            .iter()
            .flat_map(|turn| {
                [
                    PromptMessage::History {
                        speaker: Speaker::Human,
                        text: turn.human.clone(),
                    },
                    PromptMessage::History {
                        speaker: Speaker::Assistant,
                        text: turn.assistant.clone(),
                    },
                ]
            })
            .collect()
    }
}

/// System instruction, replayed memory, then the new human turn.
pub fn assemble(system: &str, window: &ConversationWindow, input: &str) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(window.len() * 2 + 2);
    messages.push(PromptMessage::System(system.to_string()));
    messages.extend(window.messages());
    messages.push(PromptMessage::HumanInput(input.to_string()));
    messages
}
