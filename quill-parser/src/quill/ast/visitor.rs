//! Read-only traversal for renderers and tooling
//!
//! Implement [Visitor] and hand it to [walk]. Both hooks default to doing nothing, so a
//! visitor only overrides what it cares about. `before` is called in document order (pre-order)
//! and `after` once all of a node's children were walked (post-order), which is enough to emit
//! opening and closing markup.
//!
//! ```ignore
//! struct CountHeadings(usize);
//!
//! impl Visitor for CountHeadings {
//!     fn before(&mut self, node: &Node) {
//!         if matches!(node.kind, NodeKind::Heading { .. }) {
//!             self.0 += 1;
//!         }
//!     }
//! }
//! ```

use super::node::Node;

pub trait Visitor {
    fn before(&mut self, _node: &Node) {}
    fn after(&mut self, _node: &Node) {}
}

/// Depth-first walk over `node` and its children.
///
/// Reference entry values are part of the reference's payload and are not walked.
pub fn walk(node: &Node, visitor: &mut dyn Visitor) {
    visitor.before(node);
    for child in &node.children {
        walk(child, visitor);
    }
    visitor.after(node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::ast::node::NodeKind;
    use crate::quill::ast::range::Range;

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl Visitor for Trace {
        fn before(&mut self, node: &Node) {
            self.0.push(format!("+{}", node.kind.name()));
        }

        fn after(&mut self, node: &Node) {
            self.0.push(format!("-{}", node.kind.name()));
        }
    }

    #[test]
    fn test_walk_order() {
        let tree = Node::new(NodeKind::Root, Range::default()).with_children(vec![Node::new(
            NodeKind::Paragraph,
            Range::default(),
        )
        .with_children(vec![Node::text("x", Range::default())])]);

        let mut trace = Trace::default();
        walk(&tree, &mut trace);
        assert_eq!(
            trace.0,
            vec!["+root", "+paragraph", "+text", "-text", "-paragraph", "-root"]
        );
    }
}
