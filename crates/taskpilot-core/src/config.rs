//! Configuration management for taskpilot.toml

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TasksConfig {
    pub file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    pub max_history: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("tasks.json"),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { max_history: 10 }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from taskpilot.toml
    pub fn load() -> Result<Self> {
        Self::load_from(Self::find_config_path()?)
    }

    /// Try to load configuration, returning None if not found
    pub fn try_load() -> Option<Self> {
        Self::load().ok()
    }

    /// Create a minimal default configuration for when taskpilot.toml is missing
    pub fn default_minimal() -> Self {
        Self {
            ollama: OllamaConfig {
                host: "127.0.0.1".to_string(),
                port: 11434,
                model: "qwen2.5:7b".to_string(),
            },
            tasks: TasksConfig::default(),
            memory: MemoryConfig::default(),
            server: ServerConfig::default(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.as_ref().display()))
    }

    /// Find taskpilot.toml by searching current directory and parents
    pub fn find_config_path() -> Result<PathBuf> {
        let mut current = std::env::current_dir()?;

        for _ in 0..10 {
            let candidate = current.join("taskpilot.toml");
            if candidate.exists() {
                return Ok(candidate);
            }
            if !current.pop() {
                break;
            }
        }

        anyhow::bail!("taskpilot.toml not found in current directory or parents")
    }

    /// Get Ollama base URL
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.ollama.host, self.ollama.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[ollama]
host = "127.0.0.1"
port = 11434
model = "qwen2.5:7b"

[tasks]
file = "tasks.json"

[memory]
max_history = 6

[server]
addr = "0.0.0.0:8000"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.ollama.port, 11434);
        assert_eq!(config.ollama.model, "qwen2.5:7b");
        assert_eq!(config.memory.max_history, 6);
        assert_eq!(config.server.addr, "0.0.0.0:8000");
        assert_eq!(config.ollama_url(), "http://127.0.0.1:11434");
    }

    #[test]
    fn test_optional_sections_default() {
        let toml = r#"
[ollama]
host = "localhost"
port = 11434
model = "qwen2.5:7b"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.tasks.file, PathBuf::from("tasks.json"));
        assert_eq!(config.memory.max_history, 10);
        assert_eq!(config.server.addr, "127.0.0.1:8000");
    }

    #[test]
    fn test_default_minimal() {
        let config = Config::default_minimal();
        assert_eq!(config.ollama_url(), "http://127.0.0.1:11434");
        assert_eq!(config.ollama.model, "qwen2.5:7b");
    }
}
