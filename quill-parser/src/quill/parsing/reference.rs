//! Reference bodies
//!
//!     `^[id]:` alone on a line followed by an indented block defines a bibliographic
//!     reference. Each body line is `key: value`; the key is plain text and the value is inline
//!     content. Lines without a colon, or with an empty key, are not entries.

use super::inlines::{literal, parse_inlines};
use crate::quill::ast::ReferenceEntry;
use crate::quill::token::{Token, TokenKind};

/// Parse one body line. `None` when the line is not `key: value`.
pub fn parse_entry(tokens: &[Token]) -> Option<ReferenceEntry> {
    let colon = tokens
        .iter()
        .position(|token| token.kind == TokenKind::Colon)?;
    let key: String = tokens[..colon].iter().map(literal).collect();
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = parse_inlines(&tokens[colon + 1..], false).nodes;
    Some(ReferenceEntry {
        key: key.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::ast::NodeKind;
    use crate::quill::lexing::tokenize;

    #[test]
    fn test_entry_value_is_inline() {
        let tokens = tokenize("url: [https://example.org]");
        let entry = parse_entry(&tokens).unwrap();
        assert_eq!(entry.key, "url");
        assert!(matches!(entry.value[0].kind, NodeKind::Link { .. }));
    }

    #[test]
    fn test_first_colon_splits() {
        let tokens = tokenize("time: 10:30");
        let entry = parse_entry(&tokens).unwrap();
        assert_eq!(entry.key, "time");
        assert_eq!(entry.value[0].plain_text(), "10:30");
    }

    #[test]
    fn test_not_an_entry() {
        assert!(parse_entry(&tokenize("just words")).is_none());
        assert!(parse_entry(&tokenize(" : value")).is_none());
    }
}
