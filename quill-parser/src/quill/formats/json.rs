//! JSON output for documents and token streams, through serde.

use super::registry::{FormatError, Formatter};
use crate::quill::ast::Document;
use crate::quill::token::Token;

pub fn document_to_json(doc: &Document) -> Result<String, FormatError> {
    serde_json::to_string_pretty(doc).map_err(|e| FormatError::SerializationError(e.to_string()))
}

pub fn tokens_to_json(tokens: &[Token]) -> Result<String, FormatError> {
    serde_json::to_string_pretty(tokens)
        .map_err(|e| FormatError::SerializationError(e.to_string()))
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        document_to_json(doc)
    }

    fn description(&self) -> &str {
        "The full tree, ranges and diagnostics as JSON"
    }
}
