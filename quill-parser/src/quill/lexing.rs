//! Lexer
//!
//!     Turns a quill source buffer into a flat token stream. Lexing is total: it never fails and
//!     never panics on input. Anything that does not form a recognised construct becomes text.
//!
//! Scan Modes
//!
//!     Line-start mode runs at the beginning of the buffer and after every newline run. It reads
//!     the line prefix (indentation and block-quote units), emits the scope changes against the
//!     previous non-blank line, and tries the line-start markers. See [line_start].
//!
//!     Inline mode consumes the rest of the line. Character classes are recognised by a logos
//!     glyph lexer (see [glyphs]); the hand-written [Lexer] adds the context logos cannot see:
//!     quote direction, bracket matching, labels following a resource, and table rows.
//!     See [inline].
//!
//! Stream Guarantees
//!
//!     - the stream ends with exactly one EndOfStream token;
//!     - a run of line breaks, including whitespace-only lines between them, is exactly one
//!       Newline (run of one) or NewlinePlus (longer run) token;
//!     - increase and decrease scope tokens are balanced and properly nested.

pub mod common;
pub mod glyphs;
mod inline;
pub mod lexer;
mod line_start;
pub mod prefix;

pub use common::LexerOptions;
pub use lexer::Lexer;

use crate::quill::token::Token;

/// Tokenize a source buffer with the default options.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

pub fn tokenize_with_options(source: &str, options: LexerOptions) -> Vec<Token> {
    Lexer::with_options(source, options).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::token::TokenKind;

    #[test]
    fn test_two_space_indentation_option() {
        let options = LexerOptions {
            spaces_per_indent: 2,
        };
        let kinds: Vec<_> = tokenize_with_options("a\n  b", options)
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert!(kinds.contains(&TokenKind::IndentIncrease));

        let default_kinds: Vec<_> = tokenize("a\n  b").into_iter().map(|t| t.kind).collect();
        assert!(!default_kinds.contains(&TokenKind::IndentIncrease));
    }
}
