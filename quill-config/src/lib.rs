//! Shared configuration loader for the quill toolchain.
//!
//! `defaults/quill.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`QuillConfig`].

use config::builder::DefaultState;
pub use config::ConfigError;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use quill_parser::quill::lexing::LexerOptions;
use quill_parser::quill::parsing::ParserOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/quill.default.toml");

/// Top-level configuration consumed by quill applications.
#[derive(Debug, Clone, Deserialize)]
pub struct QuillConfig {
    pub lexer: LexerConfig,
    pub parser: ParserConfig,
    pub inspect: InspectConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LexerConfig {
    pub spaces_per_indent: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub max_include_depth: usize,
}

/// Controls the output of the `tokenize` and `parse` commands.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub tokenize: InspectTokenizeConfig,
    pub parse: InspectParseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InspectTokenizeConfig {
    pub format: TokenFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InspectParseConfig {
    /// Name of a format registered with the parser's format registry.
    pub format: String,
    pub show_line_numbers: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenFormat {
    Simple,
    Json,
}

impl QuillConfig {
    pub fn lexer_options(&self) -> LexerOptions {
        LexerOptions {
            spaces_per_indent: self.lexer.spaces_per_indent,
        }
    }

    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            max_include_depth: self.parser.max_include_depth,
            lexer: self.lexer_options(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. `parser.max_include_depth`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<QuillConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<QuillConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.lexer.spaces_per_indent, 4);
        assert_eq!(config.parser.max_include_depth, 16);
        assert_eq!(config.inspect.tokenize.format, TokenFormat::Simple);
        assert_eq!(config.inspect.parse.format, "treeviz");
        assert!(!config.inspect.parse.show_line_numbers);
    }

    #[test]
    fn defaults_match_parser_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.parser_options(), ParserOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("inspect.tokenize.format", "json")
            .expect("override to apply")
            .set_override("parser.max_include_depth", 2i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.inspect.tokenize.format, TokenFormat::Json);
        assert_eq!(config.parser_options().max_include_depth, 2);
    }

    #[test]
    fn user_file_layers_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.toml");
        fs::write(&path, "[lexer]\nspaces_per_indent = 2\n").unwrap();

        let config = Loader::new().with_file(&path).build().expect("config to build");
        assert_eq!(config.lexer_options().spaces_per_indent, 2);
        assert_eq!(config.parser.max_include_depth, 16);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new().with_file("/definitely/not/here.toml").build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/definitely/not/here.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.lexer.spaces_per_indent, 4);
    }
}
