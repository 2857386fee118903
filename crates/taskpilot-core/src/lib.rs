//! taskpilot-core: conversational task manager core
//!
//! Provides:
//! - Configuration loading (taskpilot.toml)
//! - Ollama API client (non-streaming chat with forced JSON output)
//! - Bounded conversation memory with a pinned system prompt
//! - File-backed task store
//! - Intent extraction from raw model output and action dispatch

pub mod agent;
pub mod config;
pub mod dispatch;
pub mod intent;
pub mod memory;
pub mod ollama;
pub mod store;

pub use agent::{Agent, TurnOutcome, SYSTEM_PROMPT, UNREACHABLE_MESSAGE};
pub use config::Config;
pub use dispatch::{dispatch, render_listing, resolve_clear, Outcome};
pub use intent::{parse_reply, Intent, ParsedIntent};
pub use memory::ConversationMemory;
pub use ollama::{ChatMessage, OllamaClient, Role};
pub use store::{Task, TaskStatus, TaskStore};
