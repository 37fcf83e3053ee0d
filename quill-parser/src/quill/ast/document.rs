//! The parse result: the root node plus the diagnostics raised while building it.

use super::diagnostics::Diagnostic;
use super::node::{Node, NodeKind};
use super::range::Range;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub root: Node,
    pub diagnostics: Vec<Diagnostic>,
}

impl Document {
    pub fn new(root: Node, diagnostics: Vec<Diagnostic>) -> Self {
        Self { root, diagnostics }
    }

    pub fn empty() -> Self {
        Self::new(Node::new(NodeKind::Root, Range::default()), Vec::new())
    }

    pub fn into_parts(self) -> (Node, Vec<Diagnostic>) {
        (self.root, self.diagnostics)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Top-level blocks of the document.
    pub fn blocks(&self) -> &[Node] {
        &self.root.children
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}
