//! AST definitions and utilities for the quill format
//!
//!     This module provides the document tree, source position tracking, the diagnostics that
//!     travel next to the tree, and the read-only API renderers build on.
//!
//! Document Structure
//!
//!     A parsed document is a [Document]: a `Root` [Node] and the list of diagnostics raised
//!     while parsing. Blocks nest through indentation and block quotes, through headings
//!     (a heading owns every block up to the next heading of the same or greater weight),
//!     and through containers like list items, definitions and admonitions.
//!
//!     Inline content (text, emphasis, links, footnotes, dates, punctuation) lives as children
//!     of the block that holds it: paragraphs, titles, items, terms, cells and so on.
//!
//! Location Tracking
//!
//!     Every token carries a byte span plus line/column positions computed once by
//!     [LineIndex]. Nodes take the range of the tokens they were built from, widened to
//!     cover their children when their frame closes. Ranges never influence parsing; they exist
//!     for diagnostics, position lookup and tooling.
//!
//! Modules
//!
//!     - `node`        Node, NodeKind and the small payload enums
//!     - `document`    The parse result
//!     - `range`       Position and Range types
//!     - `diagnostics` Diagnostic and severity
//!     - `error`       Include and loader errors
//!     - `visitor`     Before/after traversal
//!     - `queries`     References, headings, slugs and position lookup

pub mod diagnostics;
pub mod document;
pub mod error;
pub mod node;
pub mod queries;
pub mod range;
pub mod visitor;

pub use diagnostics::{codes, Diagnostic, DiagnosticSeverity};
pub use document::Document;
pub use error::{IncludeError, LoaderError};
pub use node::{
    Alignment, Annotation, ChangeKind, CheckState, CodeMode, EmphasisKind, ListKind, Node,
    NodeKind, PunctKind, ReferenceEntry, RowRole,
};
pub use queries::{count_kind, slugify, HeadingInfo};
pub use range::{LineIndex, Position, Range};
pub use visitor::{walk, Visitor};
