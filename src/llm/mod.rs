//! LLM enhancement collaborator.
//!
//! The heuristic converter in [`crate::convert`] is the always-available
//! baseline. Everything here is the substitutable enhancement path: a
//! configuration layer, the instruction prompt, a persistence seam, and
//! (with the `client` feature) an HTTP client for Ollama and OpenAI.
//!
//! The contract at the seam: any enhancer failure degrades to the converter,
//! never to a user-visible hard failure.

pub mod config;
pub mod prompt;
pub mod store;

#[cfg(feature = "client")]
pub mod client;

pub use config::{
    best_available_model, is_valid_server_url, LlmConfig, LlmProvider, ModelCache, ModelInfo,
    RuntimeContext,
};
pub use prompt::{build_prompt, EnhanceRequest, SYSTEM_PROMPT};
pub use store::{load_llm_config, save_llm_config, ConfigStore, MemoryStore, LLM_CONFIG_KEY};

#[cfg(feature = "client")]
pub use client::LlmClient;

use crate::error::Result;

/// The substitution seam: anything that can turn raw text into Markdown.
pub trait Enhancer {
    /// Produces Markdown for the request, or an error if unavailable.
    fn enhance(&self, request: &EnhanceRequest) -> Result<String>;
}

/// Runs an enhancer with the converter as fallback.
///
/// An error, or a blank result, yields the heuristic baseline instead.
pub fn enhance_or_convert<E: Enhancer>(enhancer: &E, request: &EnhanceRequest) -> String {
    match enhancer.enhance(request) {
        Ok(markdown) if !markdown.trim().is_empty() => markdown,
        _ => crate::convert::convert(&request.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct FixedEnhancer(&'static str);
    impl Enhancer for FixedEnhancer {
        fn enhance(&self, _request: &EnhanceRequest) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct DownEnhancer;
    impl Enhancer for DownEnhancer {
        fn enhance(&self, _request: &EnhanceRequest) -> Result<String> {
            Err(Error::Http("connection refused".to_string()))
        }
    }

    #[test]
    fn test_enhancer_output_used_when_available() {
        let request = EnhanceRequest::new("• item");
        let output = enhance_or_convert(&FixedEnhancer("# Enhanced"), &request);
        assert_eq!(output, "# Enhanced");
    }

    #[test]
    fn test_failure_falls_back_to_converter() {
        let request = EnhanceRequest::new("• item");
        let output = enhance_or_convert(&DownEnhancer, &request);
        assert_eq!(output, "- item");
    }

    #[test]
    fn test_blank_enhancer_result_falls_back() {
        let request = EnhanceRequest::new("• item");
        let output = enhance_or_convert(&FixedEnhancer("  \n "), &request);
        assert_eq!(output, "- item");
    }
}
