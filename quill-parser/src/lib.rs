//! # quill
//!
//! A lexer and parser for the quill markup format.
//!
//! File Layout
//!
//!     src/quill
//!       ├── token       Token kinds and the detokenizer
//!       ├── lexing      Source text to tokens
//!       ├── parsing     Tokens to the document tree
//!       ├── ast         Nodes, ranges, diagnostics and read-only queries
//!       ├── formats     Tree printers (treeviz, tag, JSON)
//!       ├── loader      Loading documents from disk, file inclusion
//!       └── testing     Fluent assertions and sample documents
//!
//! For testing guidelines, see the [testing module](quill::testing).

#![allow(rustdoc::invalid_html_tags)]

pub mod quill;
