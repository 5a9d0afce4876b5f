// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ollama API client for text generation.
//!
//! Handles:
//! - Reachability probe (`GET /api/tags`) with a short timeout
//! - Single non-streaming generation call (`POST /api/generate`)

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Errors from talking to the Ollama server.
///
/// These never leave the AI content service: every failure there is
/// replaced by fallback content.
#[derive(Debug, thiserror::Error)]
pub enum OllamaError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("json error: {0}")]
    Serde(String),
}

impl From<reqwest::Error> for OllamaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OllamaError::Timeout
        } else if err.is_decode() {
            OllamaError::Serde(err.to_string())
        } else {
            OllamaError::Transport(err.to_string())
        }
    }
}

/// Sampling options for a generation request.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    pub temperature: f32,
    /// Overrides the client's default output token budget
    pub max_tokens: Option<u32>,
}

impl GenerateOptions {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature,
            max_tokens: None,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: ModelOptions,
}

#[derive(Serialize)]
struct ModelOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Ollama API client.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    health_timeout: Duration,
    max_tokens: u32,
}

impl OllamaClient {
    /// Create a client. `request_timeout` bounds every call made through it;
    /// the health probe uses the shorter `health_timeout`.
    pub fn new(
        base_url: &str,
        model: &str,
        health_timeout: Duration,
        request_timeout: Duration,
        max_tokens: u32,
    ) -> Result<Self, OllamaError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("habit-tracker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            health_timeout,
            max_tokens,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, OllamaError> {
        Self::new(
            &config.ollama_url,
            &config.ollama_model,
            config.ollama_health_timeout,
            config.ollama_request_timeout,
            config.ollama_max_tokens,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Best-effort reachability check. Any error or non-success status
    /// means "unavailable".
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);

        match self.http.get(&url).timeout(self.health_timeout).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::debug!(status = %response.status(), "Ollama health probe rejected");
                false
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ollama health probe failed");
                false
            }
        }
    }

    /// Generate a single completion for `prompt` and return the raw text.
    pub async fn generate(
        &self,
        prompt: &str,
        options: GenerateOptions,
    ) -> Result<String, OllamaError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: ModelOptions {
                temperature: options.temperature,
                num_predict: options.max_tokens.unwrap_or(self.max_tokens),
            },
        };

        let response = self.http.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OllamaError::Http { status, body });
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.response)
    }
}
