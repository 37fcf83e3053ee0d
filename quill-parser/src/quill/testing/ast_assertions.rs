//! Fluent assertion API for parsed documents
//!
//!     Every assertion carries a context path such as `root:blocks[1]:items[0]` so a failure
//!     points at the node that broke. Closures scope the assertions on a child:
//!
//!         assert_ast(&doc)
//!             .block_count(1)
//!             .block(0, |list| {
//!                 list.is_list().item_count(2).item(1, |item| {
//!                     item.text("second");
//!                 });
//!             });

use super::matchers::TextMatch;
use crate::quill::ast::{
    Alignment, CheckState, Document, ListKind, Node, NodeKind, RowRole,
};

pub fn assert_ast(doc: &Document) -> DocumentAssertion<'_> {
    DocumentAssertion { doc }
}

fn summarize(nodes: &[Node]) -> String {
    nodes
        .iter()
        .map(|node| node.kind.name())
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct DocumentAssertion<'a> {
    doc: &'a Document,
}

impl<'a> DocumentAssertion<'a> {
    pub fn block_count(self, expected: usize) -> Self {
        let blocks = &self.doc.root.children;
        assert_eq!(
            blocks.len(),
            expected,
            "root: Expected {} blocks, found {} blocks: [{}]",
            expected,
            blocks.len(),
            summarize(blocks)
        );
        self
    }

    pub fn block<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let blocks = &self.doc.root.children;
        assert!(
            index < blocks.len(),
            "root: Block index {} out of bounds (document has {} blocks)",
            index,
            blocks.len()
        );
        assertion(NodeAssertion {
            node: &blocks[index],
            context: format!("root:blocks[{}]", index),
        });
        self
    }

    pub fn root<F>(self, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        assertion(NodeAssertion {
            node: &self.doc.root,
            context: "root".to_string(),
        });
        self
    }

    pub fn no_diagnostics(self) -> Self {
        assert!(
            self.doc.diagnostics.is_empty(),
            "root: Expected no diagnostics, found {:?}",
            self.doc.diagnostics
        );
        self
    }

    /// The diagnostic codes raised, in order.
    pub fn diagnostic_codes(self, expected: &[&str]) -> Self {
        let actual: Vec<&str> = self
            .doc
            .diagnostics
            .iter()
            .map(|d| d.code.as_deref().unwrap_or(""))
            .collect();
        assert_eq!(actual, expected, "root: Unexpected diagnostic codes");
        self
    }
}

pub struct NodeAssertion<'a> {
    pub(crate) node: &'a Node,
    pub(crate) context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// Assert the kind by its short name (`"paragraph"`, `"check-item"`, ...).
    pub fn kind(self, expected: &str) -> Self {
        assert_eq!(
            self.node.kind.name(),
            expected,
            "{}: Expected {}, found {}",
            self.context,
            expected,
            self.node.kind.name()
        );
        self
    }

    pub fn is_paragraph(self) -> Self {
        self.kind("paragraph")
    }

    pub fn is_list(self) -> Self {
        self.kind("list")
    }

    pub fn is_table(self) -> Self {
        self.kind("table")
    }

    pub fn is_heading(self, weight: u8) -> Self {
        match &self.node.kind {
            NodeKind::Heading { weight: actual, .. } => assert_eq!(
                *actual, weight,
                "{}: Expected heading of weight {}, found weight {}",
                self.context, weight, actual
            ),
            other => panic!("{}: Expected heading, found {}", self.context, other.name()),
        }
        self
    }

    pub fn heading_id(self, expected: Option<&str>) -> Self {
        match &self.node.kind {
            NodeKind::Heading { id, .. } => assert_eq!(
                id.as_deref(),
                expected,
                "{}: Unexpected heading id",
                self.context
            ),
            other => panic!("{}: Expected heading, found {}", self.context, other.name()),
        }
        self
    }

    pub fn list_kind(self, expected: ListKind) -> Self {
        match &self.node.kind {
            NodeKind::List { kind, .. } => assert_eq!(
                *kind, expected,
                "{}: Expected {:?} list, found {:?}",
                self.context, expected, kind
            ),
            other => panic!("{}: Expected list, found {}", self.context, other.name()),
        }
        self
    }

    pub fn check_state(self, expected: CheckState) -> Self {
        match &self.node.kind {
            NodeKind::CheckItem { state } => assert_eq!(
                *state, expected,
                "{}: Expected {:?}, found {:?}",
                self.context, expected, state
            ),
            other => panic!("{}: Expected check item, found {}", self.context, other.name()),
        }
        self
    }

    pub fn alignments(self, expected: &[Alignment]) -> Self {
        match &self.node.kind {
            NodeKind::Table { alignments, .. } => assert_eq!(
                alignments.as_slice(),
                expected,
                "{}: Unexpected column alignments",
                self.context
            ),
            other => panic!("{}: Expected table, found {}", self.context, other.name()),
        }
        self
    }

    pub fn row_roles(self, expected: &[RowRole]) -> Self {
        let actual: Vec<RowRole> = self
            .node
            .children
            .iter()
            .filter_map(|row| match row.kind {
                NodeKind::Row { role } => Some(role),
                _ => None,
            })
            .collect();
        assert_eq!(actual, expected, "{}: Unexpected row roles", self.context);
        self
    }

    pub fn text(self, expected: &str) -> Self {
        TextMatch::Exact(expected.to_string()).assert(&self.node.plain_text(), &self.context);
        self
    }

    pub fn text_starts_with(self, prefix: &str) -> Self {
        TextMatch::StartsWith(prefix.to_string()).assert(&self.node.plain_text(), &self.context);
        self
    }

    pub fn text_contains(self, substring: &str) -> Self {
        TextMatch::Contains(substring.to_string()).assert(&self.node.plain_text(), &self.context);
        self
    }

    pub fn annotation(self, key: &str, expected: &str) -> Self {
        assert_eq!(
            self.node.annotation(key),
            Some(expected),
            "{}: Expected annotation {} = {}, found {:?}",
            self.context,
            key,
            expected,
            self.node.annotations
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let children = &self.node.children;
        assert_eq!(
            children.len(),
            expected,
            "{}: Expected {} children, found {} children: [{}]",
            self.context,
            expected,
            children.len(),
            summarize(children)
        );
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        self.indexed("children", index, assertion)
    }

    pub fn item_count(self, expected: usize) -> Self {
        self.child_count(expected)
    }

    /// Scoped assertion on a list item, row or definition item.
    pub fn item<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        self.indexed("items", index, assertion)
    }

    fn indexed<F>(self, label: &str, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let node: &'a Node = self.node;
        assert!(
            index < node.children.len(),
            "{}: {} index {} out of bounds ({} has {})",
            self.context,
            label,
            index,
            node.kind.name(),
            node.children.len()
        );
        assertion(NodeAssertion {
            node: &node.children[index],
            context: format!("{}:{}[{}]", self.context, label, index),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::parsing::parse_str;

    #[test]
    fn test_fluent_chain() {
        let doc = parse_str("- one\n- two ~~ tone: calm");
        assert_ast(&doc).no_diagnostics().block_count(1).block(0, |list| {
            list.is_list()
                .list_kind(ListKind::Bullet { weight: 1 })
                .item_count(2)
                .item(1, |item| {
                    item.kind("item").text("two").annotation("tone", "calm");
                });
        });
    }

    #[test]
    #[should_panic(expected = "root:blocks[0]: Expected list, found paragraph")]
    fn test_failure_names_the_node() {
        let doc = parse_str("just text");
        assert_ast(&doc).block(0, |block| {
            block.is_list();
        });
    }
}
