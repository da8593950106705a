use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::{ProviderKind, DEFAULT_CLOSE_MARKER, DEFAULT_OPEN_MARKER, DEFAULT_PROMPT};
use crate::error::{FastdocError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Prompt and tuning shared by all providers
    pub generation: GenerationConfig,

    /// Reasoning-trace markers
    pub sanitizer: SanitizerConfig,

    /// Per-provider credentials, models and endpoints
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File the documentation is written to
    pub path: PathBuf,

    /// Include a metadata comment (model, timestamp) under the header
    pub include_metadata: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Replaces the built-in instruction prompt
    pub prompt: Option<String>,

    /// Maximum tokens for LLM responses
    pub max_tokens: Option<u32>,

    /// Temperature for LLM responses (0.0 to 1.0)
    pub temperature: Option<f32>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    pub open_marker: String,
    pub close_marker: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub groq: ProviderSettings,
    pub gemini: ProviderSettings,
    pub openai: ProviderSettings,
    pub openrouter: ProviderSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// API key (falls back to the provider's environment variable)
    pub api_key: Option<String>,

    /// Model name overriding the provider default
    pub model: Option<String>,

    /// Base URL for proxies or compatible gateways
    pub base_url: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("README.md"),
            include_metadata: false,
        }
    }
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            open_marker: DEFAULT_OPEN_MARKER.to_string(),
            close_marker: DEFAULT_CLOSE_MARKER.to_string(),
        }
    }
}

impl GenerationConfig {
    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl ProvidersConfig {
    pub fn get(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::Groq => &self.groq,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::OpenRouter => &self.openrouter,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| FastdocError::Config(e.to_string()))?;

        if config.sanitizer.open_marker.is_empty() || config.sanitizer.close_marker.is_empty() {
            return Err(FastdocError::Config(
                "Sanitizer markers must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Err(FastdocError::Config(format!(
                        "Config file '{}' does not exist",
                        p.as_ref().display()
                    )))
                }
            }
            None => {
                let candidates = ["fastdoc.toml", ".fastdoc.toml"];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }
}
