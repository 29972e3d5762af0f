//! Prompt construction for the enhancement collaborator.
//!
//! The prompt encodes the hard rules the collaborator must follow, most
//! importantly that tabular data is always emitted as pipe tables and that
//! no content is dropped. The converter remains the baseline when the
//! collaborator fails; these rules keep the two outputs interchangeable.

/// One enhancement request: the raw text plus formatting preferences.
#[derive(Debug, Clone, Default)]
pub struct EnhanceRequest {
    /// The raw pasted text to format.
    pub text: String,

    /// Whether the collaborator should decorate headers with emojis.
    pub add_emojis: bool,

    /// Free-form natural-language instructions appended to the prompt.
    pub custom_instructions: String,
}

impl EnhanceRequest {
    /// Creates a request with default preferences.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Sets the emoji preference.
    pub fn with_emojis(mut self, add_emojis: bool) -> Self {
        self.add_emojis = add_emojis;
        self
    }

    /// Sets the custom instructions.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = instructions.into();
        self
    }
}

/// System message for chat-style APIs.
pub const SYSTEM_PROMPT: &str = "You are a markdown formatting expert. \
     Always respond with only the formatted markdown, no explanations.";

/// Builds the full instruction prompt for a request.
pub fn build_prompt(request: &EnhanceRequest) -> String {
    let emoji_instructions = if request.add_emojis {
        "4. Add appropriate and relevant emojis to headers and sections to make them \
         visually appealing. Use emojis that match the content. Place emojis at the \
         beginning of headers."
    } else {
        "4. Do NOT add any emojis to the text."
    };

    let custom = if request.custom_instructions.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nADDITIONAL INSTRUCTIONS FROM USER:\n{}\n",
            request.custom_instructions
        )
    };

    format!(
        "You are a markdown formatting expert. Convert the following text into \
         well-formatted markdown.\n\n\
         CRITICAL RULES - YOU MUST FOLLOW THESE EXACTLY:\n\n\
         1. TABLES ARE SACRED - NEVER REMOVE TABLES:\n   \
         - If you detect any tabular data (text aligned in columns with consistent \
         spacing), you MUST convert it to a markdown table\n   \
         - Use | separators between columns\n   \
         - Add a header separator row (|---|---|) after the first row\n   \
         - NEVER convert tables to lists or paragraphs\n\n\
         2. Headers: use # for main titles, ## for sections, ### for subsections\n\n\
         3. Lists:\n   \
         - Convert bullet points to proper markdown lists\n   \
         - Preserve numbered lists with correct formatting\n\n\
         {emoji_instructions}\n\n\
         5. Text formatting:\n   \
         - Bold: **text**\n   \
         - Italic: *text*\n   \
         - Code: `code`\n\n\
         6. Code blocks: Use ``` for multi-line code\n\n\
         7. URLs: Convert to [text](url) format\n\n\
         8. PRESERVE ALL CONTENT:\n   \
         - Do not remove or summarize any information\n   \
         - Keep all data intact\n   \
         - Maintain the original structure as much as possible\n\
         {custom}\n\
         REMEMBER: If you see data that looks like a table (rows and columns of \
         information), you MUST format it as a markdown table. This is non-negotiable.\n\n\
         Text to convert:\n{text}\n\n\
         Return ONLY the formatted markdown, no explanations or comments. \
         DO NOT remove tables or convert them to other formats.",
        emoji_instructions = emoji_instructions,
        custom = custom,
        text = request.text,
    )
}
