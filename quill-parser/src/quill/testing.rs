//! Testing utilities
//!
//!     Two rules keep parser tests honest:
//!
//!         1. Load quill sources from the curated samples in `tests/samples/` (see [samples])
//!            rather than inventing documents inline. Short inline strings are fine for unit
//!            tests of a single construct.
//!         2. Check structure with the fluent [assert_ast](fn@assert_ast) API rather than by
//!            indexing into `children` by hand.
//!
//!     ```rust,ignore
//!     use quill_parser::quill::testing::{assert_ast, Sample};
//!
//!     let doc = Sample::named("lists").parse();
//!     assert_ast(&doc).block(0, |list| {
//!         list.is_list().item_count(3);
//!     });
//!     ```

pub mod ast_assertions;
pub mod matchers;
pub mod samples;

pub use ast_assertions::{assert_ast, DocumentAssertion, NodeAssertion};
pub use matchers::TextMatch;
pub use samples::{samples_dir, Sample};
