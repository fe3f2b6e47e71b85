use anyhow::Result;
use log::{error, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::CompletionConfig;

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion API key is not configured")]
    MissingCredentials,

    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("completion API returned no choices")]
    EmptyResponse,
}

/// Single-shot text completion consumed by the request dispatcher
#[async_trait::async_trait]
pub trait CompletionApi: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError>;
}

pub struct CompletionClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

impl CompletionClient {
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            warn!("Completion API key not configured; explain_concept requests will fail");
        }

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait::async_trait]
impl CompletionApi for CompletionClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError> {
        if self.api_key.is_empty() {
            return Err(CompletionError::MissingCredentials);
        }

        let request = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Completion API error {}: {}", status, body);
            return Err(CompletionError::Api { status, body });
        }

        let parsed: CompletionResponse = response.json().await?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::EmptyResponse)?;
        Ok(choice.text)
    }
}
