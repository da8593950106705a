//! LLM integration for generating documentation
//!
//! Every provider implements `LlmDocumenter`; [`create_documenter`] maps a
//! [`ProviderKind`] to its implementation so call sites never branch on the
//! provider themselves.

mod documenter;
mod providers;
mod request;

pub use documenter::ProviderEndpoint;
pub use providers::create_documenter;
pub use request::{ProviderKind, RequestSpec, DEFAULT_PROMPT};
