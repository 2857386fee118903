//! HTTP surface
//!
//! A single `POST /chat` endpoint so a UI or remote caller can drive the
//! agent. The response carries both the structured intent and the rendered
//! reply text, so the caller can choose which to present. There is no
//! interactive prompt here, so `clear_tasks` only executes when the request
//! carries `"confirm": true`.

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use taskpilot_core::{Agent, Config, Intent, OllamaClient, TaskStore, TurnOutcome};

// Task-store mutations are load-mutate-save over one file, so all turns
// serialize behind a single lock.
type AppState = Arc<Mutex<Agent>>;

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    confirm: bool,
}

#[derive(Debug, Serialize)]
struct ChatReply {
    intent: Intent,
    task_description: Option<String>,
    response_message: String,
    reply: String,
}

/// Run the HTTP server
pub async fn run(addr: Option<String>, model: Option<String>) -> Result<()> {
    let config = Config::try_load().unwrap_or_else(Config::default_minimal);

    let addr = addr.unwrap_or_else(|| config.server.addr.clone());
    let model = model.unwrap_or_else(|| config.ollama.model.clone());
    let task_file: PathBuf = config.tasks.file.clone();

    let client = OllamaClient::new(config.ollama_url());
    let store = TaskStore::load(&task_file);
    let agent = Agent::new(client, &model, store, config.memory.max_history);
    let state: AppState = Arc::new(Mutex::new(agent));

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/chat", post(chat))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, %model, "taskpilot server listening");
    println!("taskpilot server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, (StatusCode, String)> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "message must not be empty".to_string()));
    }

    let mut agent = state.lock().await;

    let outcome = agent
        .handle_input(message)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    match outcome {
        TurnOutcome::Reply { parsed, reply } => Ok(Json(ChatReply {
            intent: parsed.intent,
            task_description: parsed.task_description,
            response_message: parsed.response_message,
            reply,
        })),
        TurnOutcome::ConfirmClear { parsed } => {
            let mut reply = agent
                .resolve_clear(req.confirm)
                .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
            if !req.confirm {
                reply.push_str(" Resend with \"confirm\": true to clear all tasks.");
            }
            Ok(Json(ChatReply {
                intent: parsed.intent,
                task_description: parsed.task_description,
                response_message: parsed.response_message,
                reply,
            }))
        }
        // The server outlives a flaky backend; report it per request
        // instead of terminating the process.
        TurnOutcome::Unreachable(message) => Err((StatusCode::BAD_GATEWAY, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_confirm_defaults_false() {
        let req: ChatRequest = serde_json::from_str("{\"message\": \"list my tasks\"}").unwrap();
        assert_eq!(req.message, "list my tasks");
        assert!(!req.confirm);
    }

    #[test]
    fn test_chat_reply_shape() {
        let reply = ChatReply {
            intent: Intent::ListTasks,
            task_description: None,
            response_message: "Okay.".to_string(),
            reply: "Your task list is empty!".to_string(),
        };

        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["intent"], "list_tasks");
        assert_eq!(value["task_description"], serde_json::Value::Null);
        assert_eq!(value["reply"], "Your task list is empty!");
    }
}
