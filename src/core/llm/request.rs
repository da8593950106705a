use std::fmt;

use crate::error::{FastdocError, Result};

/// Instruction sent ahead of the source text unless the config overrides it
pub const DEFAULT_PROMPT: &str = "Generate high-quality, developer-friendly documentation for the following code. \
Ensure you include detailed function-level and file-level documentation, and a high level, slightly less technical \
overview at the start to make it friendly. Do not print full code snippets of existing code, just explain them:";

/// The remote LLM services fastdoc can delegate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Groq,
    Gemini,
    OpenAi,
    OpenRouter,
}

impl ProviderKind {
    /// In command-line flag order
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Groq,
        ProviderKind::Gemini,
        ProviderKind::OpenAi,
        ProviderKind::OpenRouter,
    ];

    /// Model used when neither the command line nor the config names one
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Groq => "llama-3.3-70b-versatile",
            ProviderKind::Gemini => "gemini-2.0-flash",
            ProviderKind::OpenAi => "gpt-3.5-turbo-instruct",
            ProviderKind::OpenRouter => "openrouter/quasar-alpha",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::Groq => "https://api.groq.com/openai",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com",
            ProviderKind::OpenAi => "https://api.openai.com",
            ProviderKind::OpenRouter => "https://openrouter.ai/api",
        }
    }

    pub fn default_max_tokens(self) -> Option<u32> {
        match self {
            ProviderKind::OpenAi => Some(1024),
            _ => None,
        }
    }

    pub fn default_temperature(self) -> Option<f32> {
        match self {
            ProviderKind::OpenAi => Some(0.7),
            _ => None,
        }
    }

    /// Environment variable holding the API key
    pub fn api_key_var(self) -> &'static str {
        match self {
            ProviderKind::Groq => "GROQ_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    /// Upper-case label used in the output header and the CLI flags
    pub fn label(self) -> &'static str {
        match self {
            ProviderKind::Groq => "GROQ",
            ProviderKind::Gemini => "GEMINI",
            ProviderKind::OpenAi => "OPENAI",
            ProviderKind::OpenRouter => "OPENROUTER",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::Groq => "Groq",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::OpenRouter => "OpenRouter",
        };
        f.write_str(name)
    }
}

/// Fully resolved parameters of a single generation request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub provider: ProviderKind,
    pub model: String,
    pub prompt: String,
    pub source_text: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl RequestSpec {
    /// Build a spec, falling back to the provider's default model and tuning
    pub fn new(
        provider: ProviderKind,
        model: Option<String>,
        prompt: impl Into<String>,
        source_text: impl Into<String>,
    ) -> Result<Self> {
        let prompt = prompt.into();
        let source_text = source_text.into();

        if prompt.trim().is_empty() {
            return Err(FastdocError::Config("Prompt must not be empty".to_string()));
        }
        if source_text.trim().is_empty() {
            return Err(FastdocError::Usage(
                "Source file is empty, nothing to document.".to_string(),
            ));
        }

        let model = model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| provider.default_model().to_string());

        Ok(Self {
            provider,
            model,
            prompt,
            source_text,
            max_tokens: provider.default_max_tokens(),
            temperature: provider.default_temperature(),
        })
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        if max_tokens.is_some() {
            self.max_tokens = max_tokens;
        }
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        if temperature.is_some() {
            self.temperature = temperature;
        }
        self
    }

    /// The single outbound message: prompt, blank line, source text
    pub fn message(&self) -> String {
        format!("{}\n\n{}", self.prompt, self.source_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_used_without_override() {
        for kind in ProviderKind::ALL {
            let spec = RequestSpec::new(kind, None, "Document this:", "fn main() {}").unwrap();
            assert_eq!(spec.model, kind.default_model());
        }
    }

    #[test]
    fn test_documented_default_models() {
        assert_eq!(ProviderKind::Groq.default_model(), "llama-3.3-70b-versatile");
        assert_eq!(ProviderKind::Gemini.default_model(), "gemini-2.0-flash");
        assert_eq!(ProviderKind::OpenAi.default_model(), "gpt-3.5-turbo-instruct");
        assert_eq!(ProviderKind::OpenRouter.default_model(), "openrouter/quasar-alpha");
    }

    #[test]
    fn test_model_override() {
        let spec = RequestSpec::new(
            ProviderKind::Groq,
            Some("deepseek-r1-distill-llama-70b".to_string()),
            "Document this:",
            "print('hi')",
        )
        .unwrap();
        assert_eq!(spec.model, "deepseek-r1-distill-llama-70b");

        let blank = RequestSpec::new(ProviderKind::Groq, Some("  ".to_string()), "p", "s").unwrap();
        assert_eq!(blank.model, "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_message_joins_prompt_and_source() {
        let spec = RequestSpec::new(ProviderKind::Gemini, None, "Explain:", "x = 1").unwrap();
        assert_eq!(spec.message(), "Explain:\n\nx = 1");
    }

    #[test]
    fn test_tuning_defaults() {
        let openai = RequestSpec::new(ProviderKind::OpenAi, None, "p", "s").unwrap();
        assert_eq!(openai.max_tokens, Some(1024));
        assert_eq!(openai.temperature, Some(0.7));

        let groq = RequestSpec::new(ProviderKind::Groq, None, "p", "s").unwrap();
        assert_eq!(groq.max_tokens, None);
        assert_eq!(groq.temperature, None);

        let tuned = openai.with_max_tokens(Some(2048)).with_temperature(None);
        assert_eq!(tuned.max_tokens, Some(2048));
        assert_eq!(tuned.temperature, Some(0.7));
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(matches!(
            RequestSpec::new(ProviderKind::Groq, None, "p", "   \n"),
            Err(FastdocError::Usage(_))
        ));
        assert!(matches!(
            RequestSpec::new(ProviderKind::Groq, None, "", "code"),
            Err(FastdocError::Config(_))
        ));
    }
}
