//! Task storage and persistence
//!
//! The store owns the full task list and rewrites its backing JSON file on
//! every mutation. A missing or corrupt file is never fatal: the store logs
//! and starts empty.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

/// A single task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub description: String,
    pub status: TaskStatus,
}

/// File-backed task list
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Load the store from `path`, starting empty if the file is missing or
    /// cannot be parsed.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let tasks = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<Task>>(&content) {
                Ok(tasks) => {
                    info!(count = tasks.len(), file = %path.display(), "Loaded tasks");
                    tasks
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Task file is malformed, starting empty");
                    Vec::new()
                }
            },
            Err(_) => {
                info!(file = %path.display(), "No existing task file, starting empty");
                Vec::new()
            }
        };

        Self { path, tasks }
    }

    /// Create an empty store backed by `path` without touching the filesystem.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tasks: Vec::new(),
        }
    }

    /// Persist the full task list, replacing the file atomically.
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.tasks)?;

        // Write to a sibling temp file then rename, so readers never observe
        // a half-written task list.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }

    /// Next unique task id: `max(ids) + 1`, or 1 when empty.
    pub fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Append a new pending task and persist.
    pub fn add(&mut self, description: impl Into<String>) -> Result<Task> {
        let task = Task {
            id: self.next_id(),
            description: description.into(),
            status: TaskStatus::Pending,
        };
        self.tasks.push(task.clone());
        self.save()?;
        Ok(task)
    }

    /// Mark a pending task completed.
    ///
    /// `identifier` is matched case-insensitively against pending task
    /// descriptions first; only if that fails and the identifier parses as an
    /// integer is it tried as a task id. Returns the resolved description on
    /// success. Already-completed tasks never match, so completing the same
    /// description twice reports not-found.
    pub fn complete(&mut self, identifier: &str) -> Result<Option<String>> {
        let lowered = identifier.to_lowercase();

        let by_description = self
            .tasks
            .iter()
            .position(|t| t.status == TaskStatus::Pending && t.description.to_lowercase() == lowered);

        let found = by_description.or_else(|| {
            identifier.parse::<u64>().ok().and_then(|id| {
                self.tasks
                    .iter()
                    .position(|t| t.status == TaskStatus::Pending && t.id == id)
            })
        });

        match found {
            Some(index) => {
                self.tasks[index].status = TaskStatus::Completed;
                let description = self.tasks[index].description.clone();
                self.save()?;
                Ok(Some(description))
            }
            None => Ok(None),
        }
    }

    /// Case-insensitive substring search over descriptions, in insertion order.
    pub fn find(&self, substring: &str) -> Vec<&Task> {
        let lowered = substring.to_lowercase();
        self.tasks
            .iter()
            .filter(|t| t.description.to_lowercase().contains(&lowered))
            .collect()
    }

    /// Pending tasks in insertion order.
    pub fn pending(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .collect()
    }

    /// Completed tasks in insertion order.
    pub fn completed(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .collect()
    }

    /// Remove all tasks and persist. Confirmation is the caller's job.
    pub fn clear(&mut self) -> Result<()> {
        self.tasks.clear();
        self.save()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}
