//! LLM collaborator configuration.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use url::Url;

/// Default local inference server address (Ollama).
pub const DEFAULT_SERVER_URL: &str = "http://localhost:11434";

/// Default model for the local provider.
pub const DEFAULT_LOCAL_MODEL: &str = "llama3.1:8b";

/// Default model for the OpenAI provider.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Supported local models, in fallback priority order.
pub const SUPPORTED_LOCAL_MODELS: &[&str] = &[
    "llama3.1:8b",
    "llama3.1:latest",
    "llama3:8b",
    "llama3:latest",
    "phi4:latest",
    "phi4",
    "devstral:latest",
    "devstral",
    "qwen2.5:7b",
    "qwen2.5:latest",
    "mistral:7b",
    "mistral:latest",
];

/// OpenAI chat models offered to the user: (name, description).
pub const OPENAI_MODELS: &[(&str, &str)] = &[
    ("gpt-4o-mini", "Fast and affordable"),
    ("gpt-4o", "Most capable model"),
    ("gpt-3.5-turbo", "Legacy model"),
];

/// Which LLM backend the enhancement call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Local Ollama server.
    Local,
    /// OpenAI chat completions API.
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::Local => write!(f, "local"),
            LlmProvider::OpenAi => write!(f, "openai"),
        }
    }
}

/// Runtime environment capabilities, passed explicitly by the embedding
/// application instead of being probed from globals.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeContext {
    /// Whether a local inference server is expected to be reachable
    /// (for example, the application is running on the user's machine).
    pub local_server_expected: bool,
}

/// Configuration for the enhancement collaborator.
///
/// Unknown fields in persisted JSON are ignored and missing fields fall back
/// to defaults, so partial saved settings overlay cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmConfig {
    /// Which backend to call.
    pub provider: LlmProvider,

    /// Base URL of the local inference server.
    pub server_url: String,

    /// Model name to request.
    pub selected_model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Nucleus sampling cutoff.
    pub top_p: f32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            server_url: DEFAULT_SERVER_URL.to_string(),
            selected_model: DEFAULT_OPENAI_MODEL.to_string(),
            temperature: 0.3,
            top_p: 0.9,
            timeout_secs: 30,
        }
    }
}

impl LlmConfig {
    /// Builds defaults for the given runtime context: local provider when a
    /// local server is expected, OpenAI otherwise.
    pub fn for_context(ctx: &RuntimeContext) -> Self {
        if ctx.local_server_expected {
            Self {
                provider: LlmProvider::Local,
                selected_model: DEFAULT_LOCAL_MODEL.to_string(),
                ..Self::default()
            }
        } else {
            Self::default()
        }
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Sets the provider.
    pub fn with_provider(mut self, provider: LlmProvider) -> Self {
        self.provider = provider;
        self
    }

    /// Sets the server URL.
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.selected_model = model.into();
        self
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Whether a server URL is usable: parseable with an http or https scheme.
pub fn is_valid_server_url(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Picks the best model from the server's available list.
///
/// OpenAI prefers the default mini model; local providers walk the supported
/// list in priority order, matching case-insensitively on substrings.
pub fn best_available_model(available: &[String], provider: LlmProvider) -> String {
    match provider {
        LlmProvider::OpenAi => {
            if available.iter().any(|m| m == DEFAULT_OPENAI_MODEL) {
                DEFAULT_OPENAI_MODEL.to_string()
            } else {
                available
                    .first()
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string())
            }
        }
        LlmProvider::Local => {
            for supported in SUPPORTED_LOCAL_MODELS {
                let needle = supported.to_lowercase();
                if let Some(found) = available
                    .iter()
                    .find(|m| m.to_lowercase().contains(&needle) || m.as_str() == *supported)
                {
                    return found.clone();
                }
            }
            available
                .first()
                .cloned()
                .unwrap_or_else(|| DEFAULT_LOCAL_MODEL.to_string())
        }
    }
}

/// Model metadata as reported by a server.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModelInfo {
    /// Model name, e.g. "llama3.1:8b".
    pub name: String,

    /// Model blob size in bytes, when the server reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Model family, e.g. "llama".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    /// Parameter count label, e.g. "8B".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_size: Option<String>,
}

impl ModelInfo {
    /// Creates model info with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A fetched model list with a freshness window.
///
/// Callers re-query the server once the cache goes stale instead of probing
/// on every settings interaction.
#[derive(Debug)]
pub struct ModelCache {
    models: Vec<ModelInfo>,
    fetched_at: Instant,
    ttl: Duration,
}

impl ModelCache {
    /// Default freshness window: 5 minutes.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

    /// Caches a model list with the default freshness window.
    pub fn new(models: Vec<ModelInfo>) -> Self {
        Self::with_ttl(models, Self::DEFAULT_TTL)
    }

    /// Caches a model list with a custom freshness window.
    pub fn with_ttl(models: Vec<ModelInfo>, ttl: Duration) -> Self {
        Self {
            models,
            fetched_at: Instant::now(),
            ttl,
        }
    }

    /// Whether the cached list is still inside its freshness window.
    pub fn fresh(&self) -> bool {
        self.fetched_at.elapsed() < self.ttl
    }

    /// The cached models, or None once stale.
    pub fn models(&self) -> Option<&[ModelInfo]> {
        if self.fresh() {
            Some(&self.models)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LlmConfig::default();
        assert_eq!(config.provider, LlmProvider::OpenAi);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.selected_model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_context_selects_local_defaults() {
        let ctx = RuntimeContext {
            local_server_expected: true,
        };
        let config = LlmConfig::for_context(&ctx);
        assert_eq!(config.provider, LlmProvider::Local);
        assert_eq!(config.selected_model, DEFAULT_LOCAL_MODEL);
    }

    #[test]
    fn test_partial_json_overlays_defaults() {
        let config: LlmConfig = serde_json::from_str(r#"{"provider":"local"}"#).unwrap();
        assert_eq!(config.provider, LlmProvider::Local);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_server_url_validation() {
        assert!(is_valid_server_url("http://localhost:11434"));
        assert!(is_valid_server_url("https://api.example.com"));
        assert!(!is_valid_server_url("ftp://example.com"));
        assert!(!is_valid_server_url("not a url"));
    }

    #[test]
    fn test_best_local_model_priority_order() {
        let available = vec![
            "mistral:7b".to_string(),
            "llama3:8b".to_string(),
            "other:1b".to_string(),
        ];
        // llama3:8b outranks mistral:7b in the supported list.
        assert_eq!(
            best_available_model(&available, LlmProvider::Local),
            "llama3:8b"
        );
    }

    #[test]
    fn test_best_local_model_substring_match() {
        let available = vec!["registry/LLAMA3.1:8B-custom".to_string()];
        assert_eq!(
            best_available_model(&available, LlmProvider::Local),
            "registry/LLAMA3.1:8B-custom"
        );
    }

    #[test]
    fn test_best_model_falls_back_to_first_available() {
        let available = vec!["unknown:latest".to_string()];
        assert_eq!(
            best_available_model(&available, LlmProvider::Local),
            "unknown:latest"
        );
    }

    #[test]
    fn test_best_model_empty_list_uses_default() {
        assert_eq!(
            best_available_model(&[], LlmProvider::Local),
            DEFAULT_LOCAL_MODEL
        );
        assert_eq!(
            best_available_model(&[], LlmProvider::OpenAi),
            DEFAULT_OPENAI_MODEL
        );
    }

    #[test]
    fn test_model_cache_freshness() {
        let cache = ModelCache::new(vec![ModelInfo::named("llama3:8b")]);
        assert!(cache.fresh());
        assert_eq!(cache.models().unwrap().len(), 1);

        let stale = ModelCache::with_ttl(vec![ModelInfo::named("x")], Duration::ZERO);
        assert!(!stale.fresh());
        assert!(stale.models().is_none());
    }

    #[test]
    fn test_provider_serde_round_trip() {
        let json = serde_json::to_string(&LlmProvider::OpenAi).unwrap();
        assert_eq!(json, r#""openai""#);
        let back: LlmProvider = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LlmProvider::OpenAi);
    }
}
