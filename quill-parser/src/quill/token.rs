//! Core token types and helpers shared across the lexer, parser, and tooling.
//!
//!     The lexer does most of the context-sensitive work (line-start markers, prefix scopes,
//!     quote direction, fenced bodies) so that the parser can make every decision by looking
//!     at a token kind and at most one token of lookahead.
//!
//! Token Layers
//!
//!     Structural Tokens:
//!         IndentIncrease/IndentDecrease and BlockquoteIncrease/BlockquoteDecrease. Synthesized
//!         from the line prefix by diffing it against the previous line's prefix. They behave
//!         like open/close braces and are always properly nested.
//!
//!     Line-start Tokens:
//!         Markers only recognised right after the prefix: headings, list markers, table rows,
//!         fences, admonitions, definitions, footnote definitions, breaks and includes.
//!
//!     Inline Tokens:
//!         Text runs, delimiters, captures (resources, labels, dates, emoji), comments, quotes
//!         and dashes.
//!
//!     Separators:
//!         Newline (a single line break) and NewlinePlus (a blank line, i.e. a block boundary).
//!         A run of line breaks is always collapsed into exactly one separator.

pub mod core;
pub mod formatting;

pub use core::{Token, TokenKind};
pub use formatting::{detokenize, to_simple_str, ToQuillString};
