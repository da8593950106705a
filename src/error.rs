use std::path::PathBuf;
use thiserror::Error;

use crate::core::ProviderKind;

/// Main error type for fastdoc operations
#[derive(Error, Debug)]
pub enum FastdocError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Usage(String),

    #[error("File '{}' does not exist.", .0.display())]
    SourceNotFound(PathBuf),

    #[error("No API key available for {provider}: {message}")]
    Credential { provider: ProviderKind, message: String },

    #[error("Documentation generation failed ({provider}): {message}")]
    Generation { provider: ProviderKind, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

impl FastdocError {
    pub fn generation(provider: ProviderKind, message: impl Into<String>) -> Self {
        Self::Generation {
            provider,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FastdocError>;
