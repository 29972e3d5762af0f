//! Conversion options.

/// Options for the conversion pass.
///
/// Defaults reproduce the canonical behavior; both toggles only control the
/// normalization passes around the line scan, never the scan itself.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Apply Unicode NFC normalization and control-character removal to the
    /// input before scanning.
    pub normalize_input: bool,

    /// Collapse runs of three or more newlines in the output down to two.
    pub collapse_blank_lines: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            normalize_input: true,
            collapse_blank_lines: true,
        }
    }
}

impl ConvertOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables the Unicode input pre-pass.
    pub fn without_normalization(mut self) -> Self {
        self.normalize_input = false;
        self
    }

    /// Disables the blank-line post-pass.
    pub fn without_blank_line_collapse(mut self) -> Self {
        self.collapse_blank_lines = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert!(options.normalize_input);
        assert!(options.collapse_blank_lines);
    }

    #[test]
    fn test_builder_chain() {
        let options = ConvertOptions::new()
            .without_normalization()
            .without_blank_line_collapse();
        assert!(!options.normalize_input);
        assert!(!options.collapse_blank_lines);
    }
}
