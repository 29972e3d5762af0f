//! HTTP client for the enhancement collaborator.
//!
//! Talks to a local Ollama server or the OpenAI chat API. Every failure path
//! is recoverable: [`LlmClient::enhance_or_convert`] degrades to the
//! heuristic converter instead of surfacing an error.

use super::config::{is_valid_server_url, LlmConfig, LlmProvider, ModelInfo, OPENAI_MODELS};
use super::prompt::{build_prompt, EnhanceRequest, SYSTEM_PROMPT};
use crate::convert;
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Environment variable holding the OpenAI API key.
pub const OPENAI_KEY_VAR: &str = "OPENAI_KEY";

/// Timeout for availability probes, independent of the request timeout.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the enhancement collaborator.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
}

impl LlmClient {
    /// Creates a client for the given configuration. The OpenAI key is read
    /// from `OPENAI_KEY` unless one is provided with [`Self::with_api_key`].
    pub fn new(config: LlmConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            api_key: None,
        }
    }

    /// Sets an explicit OpenAI API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Sends the enhancement request and returns the model's Markdown.
    pub async fn enhance(&self, request: &EnhanceRequest) -> Result<String> {
        if request.text.trim().is_empty() {
            return Err(Error::InvalidResponse("no text provided".to_string()));
        }

        let prompt = build_prompt(request);
        let markdown = match self.config.provider {
            LlmProvider::Local => self.call_ollama(&prompt).await?,
            LlmProvider::OpenAi => self.call_openai(&prompt).await?,
        };

        if markdown.trim().is_empty() {
            return Err(Error::InvalidResponse("empty completion".to_string()));
        }
        Ok(markdown)
    }

    /// Enhances the text, falling back to the heuristic converter on any
    /// failure. This never errors; the converter is total.
    pub async fn enhance_or_convert(&self, request: &EnhanceRequest) -> String {
        match self.enhance(request).await {
            Ok(markdown) => markdown,
            Err(_) => convert::convert(&request.text),
        }
    }

    /// Lists the models available from the configured provider.
    pub async fn available_models(&self) -> Result<Vec<ModelInfo>> {
        match self.config.provider {
            LlmProvider::Local => self.list_ollama_models().await,
            LlmProvider::OpenAi => {
                // Requires a key, but the catalog itself is static.
                self.openai_key()?;
                Ok(OPENAI_MODELS
                    .iter()
                    .map(|(name, _)| ModelInfo {
                        name: (*name).to_string(),
                        family: Some("OpenAI".to_string()),
                        ..ModelInfo::default()
                    })
                    .collect())
            }
        }
    }

    /// Probes whether the configured provider is reachable.
    pub async fn check_availability(&self) -> bool {
        match self.config.provider {
            LlmProvider::OpenAi => self.openai_key().is_ok(),
            LlmProvider::Local => {
                let Ok(url) = self.server_endpoint("api/tags") else {
                    return false;
                };
                self.http
                    .get(&url)
                    .timeout(PROBE_TIMEOUT)
                    .send()
                    .await
                    .map(|r| r.status().is_success())
                    .unwrap_or(false)
            }
        }
    }

    async fn call_ollama(&self, prompt: &str) -> Result<String> {
        let url = self.server_endpoint("api/generate")?;
        let body = json!({
            "model": self.config.selected_model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": self.config.temperature,
                "top_p": self.config.top_p,
            },
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .timeout(self.config.timeout())
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(Error::Http(response.status().to_string()));
        }

        #[derive(Deserialize)]
        struct GenerateResponse {
            #[serde(default)]
            response: String,
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;
        Ok(payload.response)
    }

    async fn call_openai(&self, prompt: &str) -> Result<String> {
        let api_key = self.openai_key()?;
        let body = json!({
            "model": self.config.selected_model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "temperature": self.config.temperature,
            "top_p": self.config.top_p,
        });

        let response = self
            .http
            .post(format!("{OPENAI_API_BASE}/chat/completions"))
            .bearer_auth(api_key)
            .json(&body)
            .timeout(self.config.timeout())
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(Error::Http(response.status().to_string()));
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            #[serde(default)]
            choices: Vec<ChatChoice>,
        }
        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }
        #[derive(Deserialize)]
        struct ChatMessage {
            #[serde(default)]
            content: String,
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;
        payload
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::InvalidResponse("no choices in completion".to_string()))
    }

    async fn list_ollama_models(&self) -> Result<Vec<ModelInfo>> {
        let url = self.server_endpoint("api/tags")?;
        let response = self
            .http
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(Error::Http(response.status().to_string()));
        }

        #[derive(Deserialize)]
        struct TagsResponse {
            #[serde(default)]
            models: Vec<TagModel>,
        }
        #[derive(Deserialize)]
        struct TagModel {
            name: String,
            size: Option<u64>,
            details: Option<TagDetails>,
        }
        #[derive(Deserialize, Default)]
        struct TagDetails {
            family: Option<String>,
            parameter_size: Option<String>,
        }

        let payload: TagsResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;
        Ok(payload
            .models
            .into_iter()
            .map(|m| {
                let details = m.details.unwrap_or_default();
                ModelInfo {
                    name: m.name,
                    size: m.size,
                    family: details.family,
                    parameter_size: details.parameter_size,
                }
            })
            .collect())
    }

    fn server_endpoint(&self, path: &str) -> Result<String> {
        if !is_valid_server_url(&self.config.server_url) {
            return Err(Error::InvalidServerUrl(self.config.server_url.clone()));
        }
        Ok(format!(
            "{}/{}",
            self.config.server_url.trim_end_matches('/'),
            path
        ))
    }

    fn openai_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(OPENAI_KEY_VAR).ok())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::MissingApiKey(LlmProvider::OpenAi.to_string()))
    }

    fn map_transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.config.timeout_secs)
        } else {
            Error::Http(err.to_string())
        }
    }
}
