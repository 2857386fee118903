//! Bounded conversation history
//!
//! The running dialogue sent to the model on every turn. The system prompt
//! is pinned at index 0 and never evicted; once the rest of the history
//! exceeds the configured bound, the oldest non-system message is dropped.

use crate::ollama::ChatMessage;

#[derive(Debug)]
pub struct ConversationMemory {
    messages: Vec<ChatMessage>,
    max_history: usize,
}

impl ConversationMemory {
    /// Create a memory seeded with the fixed system instruction.
    pub fn new(system_prompt: impl Into<String>, max_history: usize) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt)],
            max_history,
        }
    }

    /// Append a message, evicting the oldest non-system message when the
    /// history (excluding the system prompt) exceeds the bound.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        while self.messages.len() > self.max_history + 1 {
            self.messages.remove(1);
        }
    }

    /// Full message sequence, system prompt first. This is the chat payload.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages excluding the system prompt.
    pub fn len(&self) -> usize {
        self.messages.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
