//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; a `.env` file is honored for local
//! development.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,

    // --- Language model (Ollama) ---
    /// Base URL of the Ollama server
    pub ollama_url: String,
    /// Model name passed to `/api/generate`
    pub ollama_model: String,
    /// Timeout for the `/api/tags` reachability probe
    pub ollama_health_timeout: Duration,
    /// Timeout for a single generation request
    pub ollama_request_timeout: Duration,
    /// Output token budget (`num_predict`)
    pub ollama_max_tokens: u32,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            ollama_url: "http://127.0.0.1:11434".to_string(),
            ollama_model: "llama3.2".to_string(),
            ollama_health_timeout: Duration::from_millis(500),
            ollama_request_timeout: Duration::from_secs(5),
            ollama_max_tokens: 500,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: parse_var("PORT", 8080)?,

            ollama_url: env::var("OLLAMA_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string()),
            ollama_health_timeout: Duration::from_millis(parse_var(
                "OLLAMA_HEALTH_TIMEOUT_MS",
                2000,
            )?),
            ollama_request_timeout: Duration::from_secs(parse_var("OLLAMA_TIMEOUT_SECS", 30)?),
            ollama_max_tokens: parse_var("OLLAMA_MAX_TOKENS", 500)?,
        })
    }
}

/// Read an optional numeric variable, rejecting values that do not parse.
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
