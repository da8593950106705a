//! API key resolution
//!
//! Keys are resolved once, before any provider is constructed: the config
//! file wins, then the provider's environment variable (a `.env` file in the
//! working directory is loaded first). When both are missing and we're
//! attached to a terminal, the user is asked for the key and it is saved to
//! `.env` for next time.

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::ProviderSettings;
use crate::core::ProviderKind;
use crate::error::{FastdocError, Result};

pub struct CredentialResolver {
    env_file: PathBuf,
    allow_prompt: bool,
}

impl CredentialResolver {
    pub fn new(allow_prompt: bool) -> Self {
        Self {
            env_file: PathBuf::from(".env"),
            allow_prompt,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_env_file(env_file: impl Into<PathBuf>, allow_prompt: bool) -> Self {
        Self {
            env_file: env_file.into(),
            allow_prompt,
        }
    }

    /// Load `.env` into the process environment; a missing file is fine
    fn load_env_file(&self) {
        match dotenvy::from_path(&self.env_file) {
            Ok(()) => debug!("Loaded environment from {}", self.env_file.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Ignoring unreadable {}: {}", self.env_file.display(), e),
        }
    }

    pub fn resolve(&self, kind: ProviderKind, settings: &ProviderSettings) -> Result<String> {
        if non_empty(settings.api_key.clone()).is_none() {
            self.load_env_file();
        }
        self.resolve_with(kind, settings, |var| std::env::var(var).ok())
    }

    fn resolve_with<F>(
        &self,
        kind: ProviderKind,
        settings: &ProviderSettings,
        lookup: F,
    ) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = non_empty(settings.api_key.clone()) {
            debug!("Using {} API key from config", kind);
            return Ok(key);
        }

        if let Some(key) = non_empty(lookup(kind.api_key_var())) {
            debug!("Using {} API key from {}", kind, kind.api_key_var());
            return Ok(key);
        }

        if self.allow_prompt && std::io::stdin().is_terminal() {
            let key = prompt_for_key(kind)?;
            self.store(kind, &key)?;
            info!("Saved {} to {}", kind.api_key_var(), self.env_file.display());
            return Ok(key);
        }

        Err(FastdocError::Credential {
            provider: kind,
            message: format!(
                "set {} or add api_key under [providers.{}] in the config file",
                kind.api_key_var(),
                kind.label().to_lowercase()
            ),
        })
    }

    /// Write `VAR=key` to the env file, replacing any earlier line for the same variable
    fn store(&self, kind: ProviderKind, key: &str) -> Result<()> {
        let var = kind.api_key_var();
        let prefix = format!("{}=", var);

        let existing = match std::fs::read_to_string(&self.env_file) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let mut lines: Vec<String> = existing
            .lines()
            .filter(|line| !line.trim_start().starts_with(&prefix))
            .map(str::to_string)
            .collect();
        lines.push(format!("{}{}", prefix, key));

        std::fs::write(&self.env_file, lines.join("\n") + "\n")?;
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn prompt_for_key(kind: ProviderKind) -> Result<String> {
    let mut stderr = std::io::stderr();
    write!(stderr, "Enter your {} API key: ", kind)?;
    stderr.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    non_empty(Some(line)).ok_or_else(|| FastdocError::Credential {
        provider: kind,
        message: "no key entered".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use predicates::prelude::*;

    fn settings(api_key: Option<&str>) -> ProviderSettings {
        ProviderSettings {
            api_key: api_key.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_config_key_wins_over_environment() {
        let resolver = CredentialResolver::with_env_file("unused.env", false);
        let key = resolver
            .resolve_with(ProviderKind::Groq, &settings(Some("from-config")), |_| {
                Some("from-env".to_string())
            })
            .unwrap();
        assert_eq!(key, "from-config");
    }

    #[test]
    fn test_environment_variable_per_provider() {
        let resolver = CredentialResolver::with_env_file("unused.env", false);
        let lookup = |var: &str| match var {
            "GEMINI_API_KEY" => Some("gemini-key".to_string()),
            "OPENROUTER_API_KEY" => Some("  router-key \n".to_string()),
            _ => None,
        };

        assert_eq!(
            resolver.resolve_with(ProviderKind::Gemini, &settings(None), lookup).unwrap(),
            "gemini-key"
        );
        assert_eq!(
            resolver.resolve_with(ProviderKind::OpenRouter, &settings(None), lookup).unwrap(),
            "router-key"
        );
    }

    #[test]
    fn test_missing_key_without_prompt_is_error() {
        let resolver = CredentialResolver::with_env_file("unused.env", false);
        let err = resolver
            .resolve_with(ProviderKind::OpenAi, &settings(Some("   ")), |_| None)
            .unwrap_err();

        match err {
            FastdocError::Credential { provider, message } => {
                assert_eq!(provider, ProviderKind::OpenAi);
                assert!(message.contains("OPENAI_API_KEY"));
                assert!(message.contains("[providers.openai]"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_reads_env_file() {
        // Variable name unique to this test so parallel tests can't interfere
        let temp = assert_fs::TempDir::new().unwrap();
        let env_file = temp.child(".env");
        env_file.write_str("OPENROUTER_API_KEY=from-dotenv\n").unwrap();

        // dotenvy never overrides a variable already set in the environment
        let expected = std::env::var("OPENROUTER_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "from-dotenv".to_string());

        let resolver = CredentialResolver::with_env_file(env_file.path(), false);

        for api_key in [Some(""), None, Some("  ")] {
            let key = resolver
                .resolve(ProviderKind::OpenRouter, &settings(api_key))
                .unwrap();
            assert_eq!(key, expected.trim(), "api_key = {api_key:?}");
        }
    }

    #[test]
    fn test_store_creates_env_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let env_file = temp.child(".env");

        let resolver = CredentialResolver::with_env_file(env_file.path(), false);
        resolver.store(ProviderKind::Groq, "gsk_123").unwrap();

        env_file.assert("GROQ_API_KEY=gsk_123\n");
    }

    #[test]
    fn test_store_replaces_existing_line() {
        let temp = assert_fs::TempDir::new().unwrap();
        let env_file = temp.child(".env");
        env_file
            .write_str("OPENAI_API_KEY=old\nGEMINI_API_KEY=keep\n")
            .unwrap();

        let resolver = CredentialResolver::with_env_file(env_file.path(), false);
        resolver.store(ProviderKind::OpenAi, "new").unwrap();

        env_file.assert(predicate::str::contains("GEMINI_API_KEY=keep"));
        env_file.assert(predicate::str::contains("OPENAI_API_KEY=new"));
        env_file.assert(predicate::str::contains("OPENAI_API_KEY=old").not());
    }
}
