//! Output formats
//!
//! This module contains the ways a parse result is turned back into text:
//! - documents to treeviz, tag and JSON (see [registry] for lookup by name)
//! - token streams to their simple one-per-line form or JSON

pub mod json;
pub mod registry;
pub mod tag;
pub mod treeviz;

pub use json::{document_to_json, tokens_to_json, JsonFormatter};
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use tag::{serialize_document as serialize_ast_tag, TagFormatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
