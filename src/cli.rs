use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::core::{Engine, GenerateRequest, ProviderKind};

#[derive(Parser, Debug)]
#[command(name = "fastdoc")]
#[command(about = "Generate developer documentation for a source file using an LLM")]
#[command(version)]
pub struct Cli {
    /// Source file to document
    pub filename: PathBuf,

    /// Use Groq for generating documentation
    #[arg(long, visible_alias = "GROQ")]
    pub groq: bool,

    /// Use Gemini for generating documentation
    #[arg(long, visible_alias = "GEMINI")]
    pub gemini: bool,

    /// Use OpenAI for generating documentation
    #[arg(long, visible_alias = "OPENAI")]
    pub openai: bool,

    /// Use OpenRouter for generating documentation
    #[arg(long, visible_alias = "OPENROUTER")]
    pub openrouter: bool,

    /// Model name overriding the provider default
    #[arg(short, long)]
    pub model: Option<String>,

    /// Output file (defaults to README.md)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Never ask for a missing API key
    #[arg(long)]
    pub no_prompt: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Every provider whose flag was given, in flag order
    pub fn selected_providers(&self) -> Vec<ProviderKind> {
        let flags = [self.groq, self.gemini, self.openai, self.openrouter];

        ProviderKind::ALL
            .into_iter()
            .zip(flags)
            .filter_map(|(kind, set)| set.then_some(kind))
            .collect()
    }

    pub async fn execute(self) -> Result<()> {
        let request = GenerateRequest {
            providers: self.selected_providers(),
            source: self.filename,
            model: self.model,
            output: self.output,
        };

        let engine = Engine::new(self.config.as_deref(), !self.no_prompt)?;
        let written = engine.generate(request).await?;

        println!("Documentation has been written to {}", written.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_single_provider_flag() {
        let cli = Cli::try_parse_from(["fastdoc", "app.py", "--gemini"]).unwrap();
        assert_eq!(cli.filename, PathBuf::from("app.py"));
        assert_eq!(cli.selected_providers(), vec![ProviderKind::Gemini]);
        assert!(cli.model.is_none());
    }

    #[test]
    fn test_uppercase_aliases() {
        let cli = Cli::try_parse_from(["fastdoc", "app.py", "--OPENROUTER", "--model", "x/y"])
            .unwrap();
        assert_eq!(cli.selected_providers(), vec![ProviderKind::OpenRouter]);
        assert_eq!(cli.model.as_deref(), Some("x/y"));
    }

    #[test]
    fn test_no_provider_flags_parse() {
        // Counting is left to the engine so it can report a precise usage error
        let cli = Cli::try_parse_from(["fastdoc", "app.py"]).unwrap();
        assert!(cli.selected_providers().is_empty());
    }

    #[test]
    fn test_multiple_provider_flags_parse() {
        let cli = Cli::try_parse_from(["fastdoc", "app.py", "--groq", "--OPENAI"]).unwrap();
        assert_eq!(
            cli.selected_providers(),
            vec![ProviderKind::Groq, ProviderKind::OpenAi]
        );
    }

    #[test]
    fn test_filename_required() {
        assert!(Cli::try_parse_from(["fastdoc", "--groq"]).is_err());
    }

    #[test]
    fn test_output_and_config_flags() {
        let cli = Cli::try_parse_from([
            "fastdoc",
            "lib.rs",
            "--groq",
            "-o",
            "docs/LIB.md",
            "-c",
            "fastdoc.toml",
            "--no-prompt",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("docs/LIB.md")));
        assert_eq!(cli.config, Some(PathBuf::from("fastdoc.toml")));
        assert!(cli.no_prompt);
        assert!(cli.verbose);
    }

    #[tokio::test]
    async fn test_execute_without_provider_is_usage_error() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("app.py");
        std::fs::write(&source, "print('hi')").unwrap();
        let config = temp.path().join("fastdoc.toml");
        std::fs::write(&config, "").unwrap();
        let output = temp.path().join("README.md");

        let cli = Cli::try_parse_from([
            OsStr::new("fastdoc"),
            source.as_os_str(),
            OsStr::new("--config"),
            config.as_os_str(),
            OsStr::new("--output"),
            output.as_os_str(),
            OsStr::new("--no-prompt"),
        ])
        .unwrap();

        let err = cli.execute().await.unwrap_err();
        assert!(err.to_string().contains("exactly one LLM"));
        assert!(!output.exists());
    }
}
