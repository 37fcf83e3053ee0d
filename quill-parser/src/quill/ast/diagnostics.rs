//! Diagnostics collected while parsing
//!
//! The parser never aborts on malformed input. Constructs it can recover from silently (an
//! unclosed emphasis, a list interrupted by a paragraph) degrade without a trace; constructs
//! where the author clearly committed to something that then went wrong produce a
//! [Diagnostic] and parsing continues. Diagnostics are returned next to the tree, in the order
//! they were raised.

use super::range::Range;
use serde::Serialize;
use std::fmt;

/// Diagnostic severity levels matching LSP protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Information => write!(f, "info"),
            DiagnosticSeverity::Hint => write!(f, "hint"),
        }
    }
}

/// Stable diagnostic codes.
pub mod codes {
    /// A scope-close token with no matching open scope.
    pub const UNMATCHED_DEDENT: &str = "unmatched-dedent";
    /// `^[id]:` with no indented body below it.
    pub const REFERENCE_WITHOUT_BODY: &str = "reference-without-body";
    /// A reference body line that is not `key: value`.
    pub const MALFORMED_REFERENCE_ENTRY: &str = "malformed-reference-entry";
    /// An include that could not be read.
    pub const INCLUDE_FAILED: &str = "include-failed";
    /// An annotation line that is not `key: value`.
    pub const MALFORMED_ANNOTATION: &str = "malformed-annotation";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: DiagnosticSeverity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub source: String,
}

impl Diagnostic {
    pub fn new(range: Range, severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            range,
            severity,
            message: message.into(),
            code: None,
            source: "quill-parser".to_string(),
        }
    }

    pub fn error(range: Range, message: impl Into<String>) -> Self {
        Self::new(range, DiagnosticSeverity::Error, message)
    }

    pub fn warning(range: Range, message: impl Into<String>) -> Self {
        Self::new(range, DiagnosticSeverity::Warning, message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {} at {}",
            self.severity, self.source, self.message, self.range.start
        )?;
        if let Some(code) = &self.code {
            write!(f, " ({})", code)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::ast::range::Position;

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::error(
            Range::point(4, Position::new(1, 2)),
            "reference has no body",
        )
        .with_code(codes::REFERENCE_WITHOUT_BODY);
        assert_eq!(
            diagnostic.to_string(),
            "error [quill-parser]: reference has no body at 1:2 (reference-without-body)"
        );
        assert!(diagnostic.is_error());
    }
}
