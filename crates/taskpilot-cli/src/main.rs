//! taskpilot: conversational task manager over a local Ollama model

mod commands;
mod repl;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "taskpilot")]
#[command(about = "Conversational task manager backed by a local LLM", version)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the interactive chat loop
    Chat {
        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,

        /// Task file to use (overrides config)
        #[arg(short, long)]
        tasks: Option<String>,
    },

    /// Expose the agent over HTTP
    Serve {
        /// Address to bind (overrides config)
        #[arg(short, long)]
        addr: Option<String>,

        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Show backend status and task summary
    Status,

    /// Inspect the task file without calling the model
    Tasks {
        #[command(subcommand)]
        action: TaskAction,
    },
}

#[derive(Debug, Subcommand)]
enum TaskAction {
    /// List stored tasks
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Some(Commands::Chat { model, tasks }) => repl::run(model, tasks).await,
        Some(Commands::Serve { addr, model }) => server::run(addr, model).await,
        Some(Commands::Status) => commands::status().await,
        Some(Commands::Tasks { action }) => match action {
            TaskAction::List => commands::tasks_list(),
        },
        None => {
            // Default to the chat loop when no command specified
            repl::run(None, None).await
        }
    }
}
