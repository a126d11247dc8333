use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

pub const ZORO_DIR: &str = ".zoro";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ZoroConfig {
    pub project_name: String,
    pub model: String,
    pub api_base: String,
    pub api_key_env: String,
    #[serde(default = "default_memory_window")]
    pub memory_window: usize,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
}

fn default_memory_window() -> usize {
    5
}

impl Default for ZoroConfig {
    fn default() -> Self {
        Self {
            project_name: "zoro".to_string(),
            model: "llama3-8b-8192".to_string(),
            api_base: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            memory_window: default_memory_window(),
            graph: GraphConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "Password".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8501 }
    }
}

impl ZoroConfig {
    pub fn config_path() -> String {
        format!("{}/config.toml", ZORO_DIR)
    }

    /// Reads `.zoro/config.toml` when present, otherwise the built-in defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(&Self::config_path()))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Malformed config at {}", path.display()))
    }

    /// The key is not validated here; an empty key surfaces as an auth failure at call time.
    pub fn api_key(&self) -> Option<String> {
        env::var(&self.api_key_env).ok().filter(|k| !k.is_empty())
    }
}
