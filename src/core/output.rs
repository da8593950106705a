use std::io::Write;
use std::path::Path;

use tera::{Context, Tera};
use tracing::debug;

use crate::config::OutputConfig;
use crate::error::Result;
use super::llm::ProviderKind;

const DOCUMENT_TEMPLATE: &str = "# Documentation generated by fastdoc using {{ provider }}\n\n\
{% if include_metadata %}<!-- model: {{ model }} | generated: {{ generated_at }} -->\n\n{% endif %}\
{{ body }}";

/// Renders the cleaned document under its header and persists it
pub struct DocumentWriter {
    include_metadata: bool,
}

impl DocumentWriter {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            include_metadata: config.include_metadata,
        }
    }

    pub fn render(&self, provider: ProviderKind, model: &str, body: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("provider", provider.label());
        context.insert("model", model);
        context.insert("body", body);
        context.insert("include_metadata", &self.include_metadata);
        context.insert("generated_at", &chrono::Utc::now().to_rfc3339());

        Ok(Tera::one_off(DOCUMENT_TEMPLATE, &context, false)?)
    }

    /// Write through a temp file in the target directory so the destination is never half written
    pub fn write(&self, path: &Path, content: &str) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(content.as_bytes())?;
        temp.flush()?;
        temp.persist(path).map_err(|e| e.error)?;

        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}
