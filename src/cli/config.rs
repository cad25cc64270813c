// Server Configuration Module
// Handles configuration from files and CLI overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub stream: StreamSettings,
    #[serde(default)]
    pub tokenizer: TokenizerSettings,
    #[serde(default)]
    pub routes: RoutesConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Inter-token pacing for streamed responses
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.stream.cadence_ms)
    }
}

/// Server network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Request validation ceilings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum permitted `request_delay` in milliseconds
    #[serde(default = "default_max_request_delay_ms")]
    pub max_request_delay_ms: u64,
    /// Completion token ceiling applied when the caller sends no cap
    #[serde(default = "default_token_budget")]
    pub default_token_budget: u32,
}

fn default_max_request_delay_ms() -> u64 {
    10_000
}

fn default_token_budget() -> u32 {
    4096
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_delay_ms: default_max_request_delay_ms(),
            default_token_budget: default_token_budget(),
        }
    }
}

/// Streaming cadence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamSettings {
    /// Milliseconds between token deltas
    #[serde(default = "default_cadence_ms")]
    pub cadence_ms: u64,
}

fn default_cadence_ms() -> u64 {
    100
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            cadence_ms: default_cadence_ms(),
        }
    }
}

/// Tokenizer strategy selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizerSettings {
    /// "bpe" (exact cl100k counts) or "regex" (fast splitter)
    #[serde(default = "default_tokenizer_strategy")]
    pub strategy: String,
}

fn default_tokenizer_strategy() -> String {
    "bpe".to_string()
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        Self {
            strategy: default_tokenizer_strategy(),
        }
    }
}

/// Provider route prefixes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    #[serde(default = "default_openai_prefix")]
    pub openai_prefix: String,
    #[serde(default = "default_anthropic_prefix")]
    pub anthropic_prefix: String,
}

fn default_openai_prefix() -> String {
    "/openai/v1".to_string()
}

fn default_anthropic_prefix() -> String {
    "/anthropic/v1".to_string()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            openai_prefix: default_openai_prefix(),
            anthropic_prefix: default_anthropic_prefix(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(String),
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}
