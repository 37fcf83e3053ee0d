//! Format registry for document serialization
//!
//! Each output format implements [Formatter] and is looked up by name through a
//! [FormatRegistry]. The CLI resolves its `--format` flag here.

use crate::quill::ast::Document;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during serialization
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// A named way of turning a document into text.
pub trait Formatter: Send + Sync {
    fn name(&self) -> &str;

    fn serialize(&self, doc: &Document) -> Result<String, FormatError>;

    fn description(&self) -> &str {
        ""
    }
}

pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter, replacing any previous one with the same name.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(doc)
    }

    /// All registered format names, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registry with the built-in treeviz, tag and JSON formatters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(super::TreevizFormatter);
        registry.register(super::TagFormatter);
        registry.register(super::JsonFormatter);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::parsing::parse_str;

    struct Shout;

    impl Formatter for Shout {
        fn name(&self) -> &str {
            "shout"
        }
        fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
            Ok(doc.root.plain_text().to_uppercase())
        }
    }

    #[test]
    fn test_defaults_are_registered() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.list_formats(), vec!["json", "tag", "treeviz"]);
    }

    #[test]
    fn test_custom_formatter() {
        let mut registry = FormatRegistry::new();
        registry.register(Shout);
        let doc = parse_str("hello");
        assert_eq!(registry.serialize(&doc, "shout").unwrap(), "HELLO");
    }

    #[test]
    fn test_unknown_format() {
        let registry = FormatRegistry::new();
        let doc = parse_str("hello");
        assert_eq!(
            registry.serialize(&doc, "nope"),
            Err(FormatError::FormatNotFound("nope".to_string()))
        );
    }
}
