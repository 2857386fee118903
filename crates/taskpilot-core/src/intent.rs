//! Intent extraction from raw model output
//!
//! Local models wrap their JSON in prose or markdown fences often enough
//! that strict parsing is a losing game. The extraction here is a
//! deliberately narrow best-effort heuristic: slice from the first `{` to
//! the last `}` and parse that. Anything that fails degrades to the
//! `unknown` fallback instead of surfacing an error.

use serde::{Deserialize, Serialize};

pub const PARSE_FALLBACK_MESSAGE: &str = "I had trouble understanding your command format.";

/// The categorical action a user utterance maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    AddTask,
    ListTasks,
    CompleteTask,
    QueryTask,
    ClearTasks,
    /// Transport failure sentinel, constructed locally and never expected
    /// from the model.
    BackendUnreachable,
    #[serde(other)]
    Unknown,
}

/// A structured command parsed out of the model's reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedIntent {
    pub intent: Intent,
    #[serde(default)]
    pub task_description: Option<String>,
    #[serde(default = "default_response_message")]
    pub response_message: String,
}

fn default_response_message() -> String {
    "Okay.".to_string()
}

impl ParsedIntent {
    /// Fallback used whenever the model's output cannot be parsed.
    pub fn unknown_fallback() -> Self {
        Self {
            intent: Intent::Unknown,
            task_description: None,
            response_message: PARSE_FALLBACK_MESSAGE.to_string(),
        }
    }

    /// Sentinel for a failed backend call. The session loop terminates
    /// after surfacing `message`.
    pub fn backend_unreachable(message: impl Into<String>) -> Self {
        Self {
            intent: Intent::BackendUnreachable,
            task_description: None,
            response_message: message.into(),
        }
    }
}

/// Extract a [`ParsedIntent`] from raw model output.
///
/// Slices from the first `{` to the last `}` and parses the slice as JSON,
/// tolerating any surrounding text. Returns the `unknown` fallback when no
/// valid brace pair exists or the slice does not parse. Never fails.
pub fn parse_reply(raw: &str) -> ParsedIntent {
    let start = match raw.find('{') {
        Some(i) => i,
        None => return ParsedIntent::unknown_fallback(),
    };
    let end = match raw.rfind('}') {
        Some(i) if i > start => i,
        _ => return ParsedIntent::unknown_fallback(),
    };

    match serde_json::from_str::<ParsedIntent>(&raw[start..=end]) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(error = %e, raw, "Failed to parse model reply as intent");
            ParsedIntent::unknown_fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_json_falls_back() {
        let parsed = parse_reply("no json here");
        assert_eq!(parsed.intent, Intent::Unknown);
        assert_eq!(parsed.response_message, PARSE_FALLBACK_MESSAGE);
    }

    #[test]
    fn test_broken_json_falls_back() {
        let parsed = parse_reply("{broken");
        assert_eq!(parsed.intent, Intent::Unknown);
        assert_eq!(parsed.response_message, PARSE_FALLBACK_MESSAGE);
    }

    #[test]
    fn test_trailing_junk_tolerated() {
        let parsed = parse_reply("trailing {\"intent\": \"list_tasks\"} junk");
        assert_eq!(parsed.intent, Intent::ListTasks);
    }

    #[test]
    fn test_markdown_fenced_json() {
        let raw = "Sure! Here is the command:\n```json\n{\"intent\": \"add_task\", \"task_description\": \"buy milk\", \"response_message\": \"Added!\"}\n```";
        let parsed = parse_reply(raw);
        assert_eq!(parsed.intent, Intent::AddTask);
        assert_eq!(parsed.task_description.as_deref(), Some("buy milk"));
        assert_eq!(parsed.response_message, "Added!");
    }

    #[test]
    fn test_close_brace_before_open_falls_back() {
        let parsed = parse_reply("} backwards {");
        assert_eq!(parsed.intent, Intent::Unknown);
    }

    #[test]
    fn test_missing_response_message_defaults() {
        let parsed = parse_reply("{\"intent\": \"list_tasks\"}");
        assert_eq!(parsed.intent, Intent::ListTasks);
        assert_eq!(parsed.response_message, "Okay.");
        assert!(parsed.task_description.is_none());
    }

    #[test]
    fn test_unrecognized_intent_maps_to_unknown() {
        let parsed = parse_reply("{\"intent\": \"make_coffee\", \"response_message\": \"hm\"}");
        assert_eq!(parsed.intent, Intent::Unknown);
        assert_eq!(parsed.response_message, "hm");
    }

    #[test]
    fn test_null_task_description() {
        let parsed =
            parse_reply("{\"intent\": \"clear_tasks\", \"task_description\": null, \"response_message\": \"ok\"}");
        assert_eq!(parsed.intent, Intent::ClearTasks);
        assert!(parsed.task_description.is_none());
    }

    #[test]
    fn test_never_panics_on_arbitrary_text() {
        for raw in ["", "{}", "{{{{", "}}}}", "{\"intent\": 42}", "\u{0}{\u{0}}"] {
            let _ = parse_reply(raw);
        }
    }
}
