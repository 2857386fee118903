//! Interactive console surface
//!
//! One turn per line of input: the utterance goes to the model with the
//! running conversation, the parsed intent is applied to the task store,
//! and the rendered reply is printed. `quit` (any case) persists the store
//! and exits; a failed backend call ends the session with an explanatory
//! message and exit code 0.

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use std::fs;
use std::path::{Path, PathBuf};

use taskpilot_core::{Agent, Config, OllamaClient, TaskStore, TurnOutcome};

// ANSI colors
const GREEN: &str = "\x1b[92m";
const YELLOW: &str = "\x1b[93m";
const CYAN: &str = "\x1b[96m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const SEPARATOR: &str = "------------------------------------------------------------";

/// Persisted readline history location
struct InputHistory {
    path: PathBuf,
}

impl InputHistory {
    fn new() -> Result<Self> {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taskpilot");

        fs::create_dir_all(&dir).context("Failed to create data directory")?;

        Ok(Self {
            path: dir.join("history"),
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Run the interactive chat loop
pub async fn run(model: Option<String>, tasks: Option<String>) -> Result<()> {
    let config = match Config::try_load() {
        Some(cfg) => cfg,
        None => {
            eprintln!(
                "{}Warning:{} taskpilot.toml not found, using defaults (localhost:11434)",
                YELLOW, RESET
            );
            Config::default_minimal()
        }
    };

    let model = model.unwrap_or_else(|| config.ollama.model.clone());
    let task_file = tasks.map(PathBuf::from).unwrap_or_else(|| config.tasks.file.clone());

    let client = OllamaClient::new(config.ollama_url());
    if !client.health_check().await.unwrap_or(false) {
        eprintln!(
            "{}Warning:{} Ollama does not look reachable at {}. The first command will fail if it is down.",
            YELLOW,
            RESET,
            config.ollama_url()
        );
    }

    let store = TaskStore::load(&task_file);
    println!(
        "{}Loaded {} tasks from {}{}",
        DIM,
        store.len(),
        task_file.display(),
        RESET
    );

    let mut agent = Agent::new(client, &model, store, config.memory.max_history);

    // Setup readline
    let history = InputHistory::new()?;
    let mut rl: Editor<(), DefaultHistory> = DefaultEditor::new()?;
    let _ = rl.load_history(history.path());

    print_welcome(&model);

    loop {
        let prompt = format!("{}You:{} ", CYAN, RESET);

        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}^C{}", DIM, RESET);
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}Goodbye!{}", DIM, RESET);
                agent.save()?;
                break;
            }
            Err(e) => {
                eprintln!("{}Error:{} {}", YELLOW, RESET, e);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line);

        if line.eq_ignore_ascii_case("quit") {
            println!("Goodbye!");
            agent.save()?;
            break;
        }

        match agent.handle_input(line).await? {
            TurnOutcome::Reply { reply, .. } => {
                println!("{}{}{}", GREEN, reply, RESET);
            }
            TurnOutcome::ConfirmClear { .. } => {
                let confirmed = confirm_clear(&mut rl)?;
                let reply = agent.resolve_clear(confirmed)?;
                println!("{}{}{}", GREEN, reply, RESET);
            }
            TurnOutcome::Unreachable(message) => {
                println!("{}{}{}", YELLOW, message, RESET);
                // The session cannot continue without a backend; leave
                // normally so scripts do not treat this as a crash.
                break;
            }
        }

        println!("{}{}{}", DIM, SEPARATOR, RESET);
    }

    let _ = rl.save_history(history.path());

    Ok(())
}

fn print_welcome(model: &str) {
    println!();
    println!("{}--- Conversational Task Manager ({}) ---{}", BOLD, model, RESET);
    println!(
        "Type your commands (e.g., 'Add buy groceries', 'List tasks', 'Complete buy groceries', 'quit')."
    );
    println!("{}{}{}", DIM, SEPARATOR, RESET);
}

fn confirm_clear(rl: &mut Editor<(), DefaultHistory>) -> Result<bool> {
    let answer = match rl.readline("Are you sure you want to clear ALL tasks? (yes/no): ") {
        Ok(answer) => answer,
        // Treat an interrupted prompt as a decline.
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
