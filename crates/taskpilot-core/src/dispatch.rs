//! Intent dispatch
//!
//! Maps a parsed intent to a task-store mutation or query and renders the
//! user-facing reply. Clearing is split in two: `dispatch` only signals that
//! confirmation is required, and the surface that owns the I/O calls
//! [`resolve_clear`] with the user's answer. That keeps the core free of any
//! assumption about how confirmation is obtained (console prompt, HTTP
//! flag, UI dialog).

use anyhow::Result;

use crate::intent::{Intent, ParsedIntent};
use crate::store::{Task, TaskStatus, TaskStore};

/// Result of dispatching one parsed intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Rendered reply, ready to show and append to the conversation.
    Reply(String),
    /// `clear_tasks` was requested; the caller must obtain confirmation and
    /// then invoke [`resolve_clear`].
    ConfirmClear,
    /// Backend unreachable; surface the message and end the session.
    Shutdown(String),
}

/// Apply `parsed` to the store and render the reply.
pub fn dispatch(parsed: &ParsedIntent, store: &mut TaskStore) -> Result<Outcome> {
    let outcome = match parsed.intent {
        Intent::AddTask => match parsed.task_description.as_deref() {
            Some(description) if !description.trim().is_empty() => {
                let task = store.add(description)?;
                tracing::info!(id = task.id, "Added task");
                Outcome::Reply(parsed.response_message.clone())
            }
            _ => Outcome::Reply("I need a description to add a task.".to_string()),
        },

        Intent::ListTasks => Outcome::Reply(render_listing(store)),

        Intent::CompleteTask => match parsed.task_description.as_deref() {
            Some(identifier) => match store.complete(identifier)? {
                Some(description) => {
                    Outcome::Reply(format!("Marked '{}' as complete.", description))
                }
                None => Outcome::Reply(format!(
                    "Could not find pending task '{}'.",
                    identifier
                )),
            },
            None => Outcome::Reply("Please specify which task to complete.".to_string()),
        },

        Intent::QueryTask => match parsed.task_description.as_deref() {
            Some(query) => {
                let matches = store.find(query);
                if matches.is_empty() {
                    Outcome::Reply(format!(
                        "I couldn't find any tasks related to '{}'.",
                        query
                    ))
                } else {
                    let mut reply = format!("I found these tasks related to '{}':\n", query);
                    for task in matches {
                        reply.push_str(&format!("  - {}\n", render_task_line(task)));
                    }
                    Outcome::Reply(reply.trim_end().to_string())
                }
            }
            None => Outcome::Reply("What task are you asking about?".to_string()),
        },

        Intent::ClearTasks => Outcome::ConfirmClear,

        Intent::Unknown => Outcome::Reply(parsed.response_message.clone()),

        Intent::BackendUnreachable => Outcome::Shutdown(parsed.response_message.clone()),
    };

    Ok(outcome)
}

/// Second half of the `clear_tasks` handshake: apply or cancel the clear
/// according to the confirmation the caller obtained.
pub fn resolve_clear(store: &mut TaskStore, confirmed: bool) -> Result<String> {
    if confirmed {
        store.clear()?;
        tracing::info!("Cleared all tasks");
        Ok("All tasks cleared.".to_string())
    } else {
        Ok("Task clearing cancelled.".to_string())
    }
}

/// Render the two-section task listing.
pub fn render_listing(store: &TaskStore) -> String {
    if store.is_empty() {
        return "Your task list is empty!".to_string();
    }

    let mut out = String::from("Here are your tasks:\n");

    let pending = store.pending();
    if !pending.is_empty() {
        out.push_str("  --- Pending ---\n");
        for task in pending {
            out.push_str(&format!("  - {}\n", render_task_line(task)));
        }
    }

    let completed = store.completed();
    if !completed.is_empty() {
        out.push_str("  --- Completed ---\n");
        for task in completed {
            out.push_str(&format!("  - {}\n", render_task_line(task)));
        }
    }

    out.trim_end().to_string()
}

fn render_task_line(task: &Task) -> String {
    let marker = match task.status {
        TaskStatus::Pending => "[ ]",
        TaskStatus::Completed => "[x]",
    };
    format!("{} {} (ID: {})", marker, task.description, task.id)
}
