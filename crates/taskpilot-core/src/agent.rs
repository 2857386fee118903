//! Per-turn orchestration
//!
//! [`Agent`] owns the only mutable state in the system (conversation memory
//! and the task store) and drives one turn: append the user's utterance,
//! call the backend, parse the reply into an intent, dispatch it, and
//! append the rendered response. The input surface (console REPL or HTTP
//! handler) owns reading input and obtaining clear-confirmation.

use anyhow::Result;
use tracing::{debug, warn};

use crate::dispatch::{self, Outcome};
use crate::intent::{parse_reply, ParsedIntent};
use crate::memory::ConversationMemory;
use crate::ollama::{ChatMessage, OllamaClient};
use crate::store::TaskStore;

/// Fixed system instruction sent as the first message of every conversation.
pub const SYSTEM_PROMPT: &str = r#"You are a Conversational Task Manager AI. Your primary goal is to help the user manage their tasks.
You understand commands to add tasks, list tasks, mark tasks as complete, query specific tasks, or clear all tasks.
You must always respond in a structured JSON format.

Here's the expected JSON structure:
{
    "intent": "add_task" | "list_tasks" | "complete_task" | "query_task" | "clear_tasks" | "unknown",
    "task_description": "string or null for list/clear/unknown intents",
    "response_message": "string (a helpful, concise message to the user)"
}

- If the user asks to add a task, set 'intent' to 'add_task' and extract 'task_description'.
- If the user asks to list tasks, set 'intent' to 'list_tasks'.
- If the user asks to complete a task, set 'intent' to 'complete_task' and extract 'task_description'.
- If the user asks about a specific task, set 'intent' to 'query_task' and extract 'task_description'.
- If the user asks to clear all tasks, set 'intent' to 'clear_tasks'.
- If you don't understand, set 'intent' to 'unknown'.

Be concise in 'response_message'. Do NOT include code examples or elaborate on your internal process in 'response_message'."#;

/// Message surfaced when the backend cannot be reached.
pub const UNREACHABLE_MESSAGE: &str =
    "Could not reach the Ollama server. Is 'ollama serve' running?";

/// What one turn produced
#[derive(Debug)]
pub enum TurnOutcome {
    /// The turn completed; `reply` was appended to the conversation.
    Reply { parsed: ParsedIntent, reply: String },
    /// The model asked to clear all tasks; the caller must obtain
    /// confirmation and then call [`Agent::resolve_clear`].
    ConfirmClear { parsed: ParsedIntent },
    /// The backend call failed; surface the message and end the session.
    Unreachable(String),
}

pub struct Agent {
    client: OllamaClient,
    model: String,
    memory: ConversationMemory,
    store: TaskStore,
}

impl Agent {
    pub fn new(client: OllamaClient, model: impl Into<String>, store: TaskStore, max_history: usize) -> Self {
        Self {
            client,
            model: model.into(),
            memory: ConversationMemory::new(SYSTEM_PROMPT, max_history),
            store,
        }
    }

    /// Run one turn for a non-empty user utterance.
    pub async fn handle_input(&mut self, input: &str) -> Result<TurnOutcome> {
        self.memory.push(ChatMessage::user(input));

        let raw = match self.client.chat(&self.model, self.memory.messages()).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Backend call failed");
                return Ok(TurnOutcome::Unreachable(UNREACHABLE_MESSAGE.to_string()));
            }
        };

        debug!(raw_len = raw.len(), "Received model reply");
        self.ingest_reply(&raw)
    }

    /// Parse and dispatch a raw model reply. Split out from
    /// [`Self::handle_input`] so the turn logic is testable without a
    /// running backend.
    fn ingest_reply(&mut self, raw: &str) -> Result<TurnOutcome> {
        let parsed = parse_reply(raw);

        match dispatch::dispatch(&parsed, &mut self.store)? {
            Outcome::Reply(reply) => {
                self.memory.push(ChatMessage::assistant(reply.clone()));
                Ok(TurnOutcome::Reply { parsed, reply })
            }
            Outcome::ConfirmClear => Ok(TurnOutcome::ConfirmClear { parsed }),
            // A model should never emit the unreachable sentinel, but if it
            // does, treat it as a real transport failure.
            Outcome::Shutdown(message) => Ok(TurnOutcome::Unreachable(message)),
        }
    }

    /// Complete the `clear_tasks` handshake with the confirmation the
    /// caller obtained, appending the resulting reply to the conversation.
    pub fn resolve_clear(&mut self, confirmed: bool) -> Result<String> {
        let reply = dispatch::resolve_clear(&mut self.store, confirmed)?;
        self.memory.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Persist the task store (used on normal exit).
    pub fn save(&self) -> Result<()> {
        self.store.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Intent;
    use tempfile::tempdir;

    fn agent_in(dir: &tempfile::TempDir) -> Agent {
        let client = OllamaClient::new("http://127.0.0.1:11434");
        let store = TaskStore::load(dir.path().join("tasks.json"));
        Agent::new(client, "qwen2.5:7b", store, 10)
    }

    #[test]
    fn test_ingest_add_task_mutates_store_and_memory() {
        let dir = tempdir().unwrap();
        let mut agent = agent_in(&dir);

        let outcome = agent
            .ingest_reply("{\"intent\": \"add_task\", \"task_description\": \"buy milk\", \"response_message\": \"Added buy milk.\"}")
            .unwrap();

        match outcome {
            TurnOutcome::Reply { parsed, reply } => {
                assert_eq!(parsed.intent, Intent::AddTask);
                assert_eq!(reply, "Added buy milk.");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        assert_eq!(agent.store().len(), 1);
        // The reply was appended as an assistant message.
        let last = agent.memory.messages().last().unwrap();
        assert_eq!(last.content, "Added buy milk.");
    }

    #[test]
    fn test_ingest_garbage_falls_back_without_mutation() {
        let dir = tempdir().unwrap();
        let mut agent = agent_in(&dir);

        let outcome = agent.ingest_reply("the model rambled instead").unwrap();
        match outcome {
            TurnOutcome::Reply { parsed, .. } => assert_eq!(parsed.intent, Intent::Unknown),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(agent.store().is_empty());
    }

    #[test]
    fn test_clear_handshake() {
        let dir = tempdir().unwrap();
        let mut agent = agent_in(&dir);
        agent
            .ingest_reply("{\"intent\": \"add_task\", \"task_description\": \"a\", \"response_message\": \"ok\"}")
            .unwrap();

        let outcome = agent
            .ingest_reply("{\"intent\": \"clear_tasks\", \"response_message\": \"Clearing.\"}")
            .unwrap();
        assert!(matches!(outcome, TurnOutcome::ConfirmClear { .. }));
        assert_eq!(agent.store().len(), 1);

        let reply = agent.resolve_clear(false).unwrap();
        assert_eq!(reply, "Task clearing cancelled.");
        assert_eq!(agent.store().len(), 1);

        agent
            .ingest_reply("{\"intent\": \"clear_tasks\", \"response_message\": \"Clearing.\"}")
            .unwrap();
        let reply = agent.resolve_clear(true).unwrap();
        assert_eq!(reply, "All tasks cleared.");
        assert!(agent.store().is_empty());
    }
}
