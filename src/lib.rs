//! # pastemark
//!
//! Heuristic conversion of unstructured pasted text into Markdown, with an
//! optional LLM enhancement path.
//!
//! The core is a single-pass line classifier that infers document structure
//! (headings, lists, tables, code blocks, quotes, inline emphasis, links)
//! from plain text with no markup hints, using only local context. It is
//! total: any string in, a Markdown string out, never an error.
//!
//! ## Quick Start
//!
//! ```
//! use pastemark::convert;
//!
//! let markdown = convert("PROJECT NOTES\n\n• first point\n• second point");
//! assert!(markdown.starts_with("# PROJECT NOTES"));
//! ```
//!
//! ## LLM enhancement
//!
//! With the `client` feature (default), [`LlmClient`] sends the same text to
//! a local Ollama server or the OpenAI API with a formatting prompt. The
//! heuristic converter is the fallback whenever that collaborator is
//! unreachable, times out, or misbehaves - the enhancement path can fail,
//! the baseline cannot.
//!
//! ## Features
//!
//! - `client` (default): HTTP client for the LLM collaborator

pub mod cleanup;
pub mod convert;
pub mod error;
pub mod llm;

// Re-exports
pub use convert::{convert, convert_with_options, ConvertOptions};
pub use error::{Error, Result};
pub use llm::{EnhanceRequest, Enhancer, LlmConfig, LlmProvider, RuntimeContext};

#[cfg(feature = "client")]
pub use llm::LlmClient;

/// Builder for configured conversion.
///
/// # Example
///
/// ```
/// use pastemark::Pastemark;
///
/// let markdown = Pastemark::new()
///     .without_normalization()
///     .convert("• raw bullet");
/// assert_eq!(markdown, "- raw bullet");
/// ```
pub struct Pastemark {
    options: ConvertOptions,
}

impl Default for Pastemark {
    fn default() -> Self {
        Self::new()
    }
}

impl Pastemark {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
        }
    }

    /// Disables the Unicode input pre-pass.
    pub fn without_normalization(mut self) -> Self {
        self.options = self.options.without_normalization();
        self
    }

    /// Disables the blank-line post-pass.
    pub fn without_blank_line_collapse(mut self) -> Self {
        self.options = self.options.without_blank_line_collapse();
        self
    }

    /// Converts text with the configured options.
    pub fn convert(&self, text: &str) -> String {
        convert_with_options(text, &self.options)
    }
}
