// src/core/engine.rs
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;
use crate::credentials::CredentialResolver;
use crate::error::{FastdocError, Result};
use super::{
    create_documenter, DocumentWriter, ProviderEndpoint, ProviderKind, RequestSpec,
    ResponseSanitizer,
};

/// What the user asked for on the command line
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Source file to document
    pub source: PathBuf,

    /// Every provider flag that was set; exactly one is valid
    pub providers: Vec<ProviderKind>,

    /// Model override
    pub model: Option<String>,

    /// Output path override
    pub output: Option<PathBuf>,
}

/// Runs one documentation generation from source file to output file
pub struct Engine {
    config: Config,
    credentials: CredentialResolver,
    sanitizer: ResponseSanitizer,
    writer: DocumentWriter,
}

impl Engine {
    pub fn new(config_path: Option<&Path>, allow_prompt: bool) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;

        debug!("Loaded configuration: {:?}", config.output);

        Ok(Self::with_config(config, CredentialResolver::new(allow_prompt)))
    }

    pub fn with_config(config: Config, credentials: CredentialResolver) -> Self {
        let sanitizer = ResponseSanitizer::new(&config.sanitizer);
        let writer = DocumentWriter::new(&config.output);

        Self {
            config,
            credentials,
            sanitizer,
            writer,
        }
    }

    /// Generate documentation and return the path it was written to
    ///
    /// Input problems are reported before any credential lookup or network
    /// call, and the output file is only touched once the provider has
    /// answered and the answer has been cleaned.
    pub async fn generate(&self, request: GenerateRequest) -> Result<PathBuf> {
        if !request.source.is_file() {
            return Err(FastdocError::SourceNotFound(request.source));
        }

        let provider = select_provider(&request.providers)?;
        let source_text = std::fs::read_to_string(&request.source)?;

        let settings = self.config.providers.get(provider);
        let model = request.model.or_else(|| settings.model.clone());

        let spec = RequestSpec::new(provider, model, self.config.generation.prompt(), source_text)?
            .with_max_tokens(self.config.generation.max_tokens)
            .with_temperature(self.config.generation.temperature);

        let credential = self.credentials.resolve(spec.provider, settings)?;
        let endpoint = ProviderEndpoint::new(spec.provider, credential, settings.base_url.clone())
            .with_timeout(self.config.generation.timeout());
        let documenter = create_documenter(spec.provider, endpoint)?;

        info!(
            "📝 Generating documentation for {} with {} ({})",
            request.source.display(),
            documenter.provider_name(),
            spec.model
        );

        let raw = documenter.generate(&spec).await?;
        let cleaned = self.sanitizer.sanitize(&raw);

        let output_path = request
            .output
            .unwrap_or_else(|| self.config.output.path.clone());
        let content = self.writer.render(provider, &spec.model, &cleaned)?;
        self.writer.write(&output_path, &content)?;

        info!("Documentation written to {}", output_path.display());
        Ok(output_path)
    }
}

/// Resolve the provider flags to a single selection
pub fn select_provider(selected: &[ProviderKind]) -> Result<ProviderKind> {
    match selected {
        [provider] => Ok(*provider),
        _ => Err(FastdocError::Usage(
            "Please specify exactly one LLM using --groq, --gemini, --openai, or --openrouter."
                .to_string(),
        )),
    }
}
