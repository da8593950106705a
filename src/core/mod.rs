mod engine;
mod llm;
mod output;
mod sanitizer;

pub use llm::{
    create_documenter, ProviderEndpoint, ProviderKind, RequestSpec, DEFAULT_PROMPT,
};
pub use output::DocumentWriter;
pub use sanitizer::{ResponseSanitizer, DEFAULT_CLOSE_MARKER, DEFAULT_OPEN_MARKER};

pub use engine::{Engine, GenerateRequest};
