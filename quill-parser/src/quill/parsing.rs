//! Parsing module for the quill format
//!
//!     Turns the token stream produced by [lexing](crate::quill::lexing) into a [Document]: the
//!     root node plus every diagnostic raised on the way. Parsing never fails; input the
//!     grammar does not recognize degrades to literal text or to force-closed scopes.
//!
//! Parsing End To End
//!
//!         Block loop ([parser]):
//!             Walks the tokens one block start at a time, reconciling prefix scopes and
//!             closing the blocks the next line cannot continue before dispatching.
//!
//!         Scope stack ([scopes]):
//!             Blocks that can still receive children live on a stack of frames. A frame is
//!             appended to its parent when popped, so the tree is built bottom-up and no node
//!             is ever relinked.
//!
//!         Block builders ([blocks], [table], [reference]):
//!             One builder per construct. Tables and reference bodies have their own helpers.
//!
//!         Inline descent ([inlines]):
//!             Each block's content tokens are parsed into inline nodes with bounded
//!             backtracking.
//!
//!         Inclusion ([include]):
//!             `<<path>>` lines are read through an [Includer] and parsed recursively when an
//!             [IncludeContext] is supplied; see [loader](crate::quill::loader) for the disk-backed
//!             entry point.
//!
//! Testing
//!
//!     Structural tests use the fluent assertions in [testing](crate::quill::testing).

mod blocks;
pub mod include;
pub mod inlines;
pub mod parser;
pub mod reference;
mod scopes;
pub mod table;

pub use crate::quill::ast::Document;
pub use include::{IncludeContext, Includer};
pub use parser::Parser;

use crate::quill::lexing::{tokenize_with_options, LexerOptions};
use crate::quill::token::Token;

/// Knobs for the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// How many documents may be open at once through nested includes.
    pub max_include_depth: usize,
    /// Options used when tokenizing included documents.
    pub lexer: LexerOptions,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_include_depth: 16,
            lexer: LexerOptions::default(),
        }
    }
}

/// Parse a token stream without include support.
pub fn parse(tokens: &[Token]) -> Document {
    Parser::new(tokens).parse()
}

/// Tokenize and parse `source` with default options.
///
/// # Example
///
/// ```rust,ignore
/// use quill_parser::quill::parsing::parse_str;
///
/// let document = parse_str("> Title\n\nHello *world*");
/// assert_eq!(document.headings()[0].text, "Title");
/// ```
pub fn parse_str(source: &str) -> Document {
    parse_str_with_options(source, ParserOptions::default())
}

pub fn parse_str_with_options(source: &str, options: ParserOptions) -> Document {
    let tokens = tokenize_with_options(source, options.lexer.clone());
    Parser::with_context(&tokens, options, None).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::lexing::tokenize;

    #[test]
    fn test_parse_and_parse_str_agree() {
        let source = "- one\n- two\n\nclosing words";
        let tokens = tokenize(source);
        assert_eq!(parse(&tokens), parse_str(source));
    }

    #[test]
    fn test_empty_source() {
        let doc = parse_str("");
        assert!(doc.root.children.is_empty());
        assert!(doc.diagnostics.is_empty());
    }
}
