use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::CompletionProvider;
use crate::config::OpenAiConfig;
use crate::{Result, SidekickError};

/// Minimal HTTP client for OpenAI's *completions* endpoint.
///
/// One request, one response; the underlying `reqwest::Client` is shared,
/// so cloning is cheap.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    http: HttpClient,
    base: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout())
            .user_agent(concat!("sidekick-forecast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SidekickError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            http,
            base: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

fn describe_failure(status: StatusCode) -> &'static str {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "authentication rejected",
        StatusCode::TOO_MANY_REQUESTS => "quota or rate limit exceeded",
        _ => "backend returned an error",
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    #[instrument(name = "complete", skip_all, fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let start_time = Instant::now();
        let url = format!("{}/completions", self.base);
        debug!("Sending completion request to {}", url);

        let request = CompletionRequest {
            model: &self.model,
            prompt,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SidekickError::completion(format!("network failure: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SidekickError::completion(format!(
                "{} (status {status}): {body}",
                describe_failure(status)
            )));
        }

        let parsed: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| SidekickError::completion(format!("unreadable response: {e}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| SidekickError::completion("response contained no choices"))?;

        info!(
            "Received {} characters of completion in {:.3}s",
            text.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(text)
    }
}
