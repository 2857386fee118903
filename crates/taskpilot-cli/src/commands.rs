//! Non-interactive CLI commands

use anyhow::Result;

use taskpilot_core::{render_listing, Config, OllamaClient, TaskStore};

// ANSI color codes
const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn print_status(ok: bool, msg: &str) {
    let icon = if ok {
        format!("{}✓{}", GREEN, RESET)
    } else {
        format!("{}✗{}", RED, RESET)
    };
    println!("  {} {}", icon, msg);
}

/// Show backend status and task summary
pub async fn status() -> Result<()> {
    let config = Config::try_load().unwrap_or_else(Config::default_minimal);
    let client = OllamaClient::new(config.ollama_url());

    println!("{}Backend{}", BOLD, RESET);
    println!("  Endpoint: {}", config.ollama_url());
    println!("  Model: {}", config.ollama.model);

    let running = client.health_check().await.unwrap_or(false);
    print_status(running, if running { "Ollama is running" } else { "Ollama is not running" });

    println!("\n{}Tasks{}", BOLD, RESET);
    let store = TaskStore::load(&config.tasks.file);
    println!("  File: {}", config.tasks.file.display());
    println!(
        "  {} pending, {} completed",
        store.pending().len(),
        store.completed().len()
    );

    Ok(())
}

/// List stored tasks without calling the model
pub fn tasks_list() -> Result<()> {
    let config = Config::try_load().unwrap_or_else(Config::default_minimal);
    let store = TaskStore::load(&config.tasks.file);
    println!("{}", render_listing(&store));
    Ok(())
}
