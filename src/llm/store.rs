//! Settings persistence seam.
//!
//! Durable storage is not built here; the embedding application supplies any
//! key-value backend through [`ConfigStore`]. A corrupt or missing entry
//! falls back to context defaults rather than failing.

use super::config::{LlmConfig, RuntimeContext};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Mutex;

/// Storage key for the persisted LLM configuration.
pub const LLM_CONFIG_KEY: &str = "pastemark-llm-config";

/// A key-value settings backend.
pub trait ConfigStore {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Loads the LLM configuration from a store, falling back to context
/// defaults when the entry is missing or unreadable.
pub fn load_llm_config(store: &dyn ConfigStore, ctx: &RuntimeContext) -> LlmConfig {
    match store.get(LLM_CONFIG_KEY) {
        Ok(Some(raw)) => {
            serde_json::from_str(&raw).unwrap_or_else(|_| LlmConfig::for_context(ctx))
        }
        _ => LlmConfig::for_context(ctx),
    }
}

/// Persists the LLM configuration as JSON.
pub fn save_llm_config(store: &dyn ConfigStore, config: &LlmConfig) -> Result<()> {
    store.set(LLM_CONFIG_KEY, &serde_json::to_string(config)?)
}

/// In-memory store for tests and non-persistent callers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().expect("store mutex poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
