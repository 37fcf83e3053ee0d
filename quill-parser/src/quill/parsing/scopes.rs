//! The scope stack
//!
//!     The parser keeps the blocks that may still receive children as a stack of frames, root
//!     at the bottom. A frame owns its in-progress node; popping finalizes the node (its range
//!     is widened to cover its children) and appends it to the frame below. Nothing is ever
//!     relinked, so the finished tree is acyclic by construction.
//!
//!     Frames opened by an indentation or block-quote increase remember the unit that opened
//!     them: the matching decrease pops up to and including that frame, force-closing anything
//!     opened in between. No other code path pops such a frame.

use crate::quill::ast::{Node, NodeKind, Range, ReferenceEntry};
use crate::quill::lexing::prefix::PrefixUnit;

#[derive(Debug)]
pub(super) struct Frame {
    pub node: Node,
    /// Set for frames pushed by a prefix increase.
    pub opened_by: Option<PrefixUnit>,
    /// Running item index, for list frames.
    pub next_index: u64,
    /// The indented body of a reference: entries go to the reference below it.
    pub reference_body: bool,
}

impl Frame {
    pub fn new(node: Node) -> Self {
        Self {
            node,
            opened_by: None,
            next_index: 1,
            reference_body: false,
        }
    }

    pub fn opened_by(mut self, unit: PrefixUnit) -> Self {
        self.opened_by = Some(unit);
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.node.kind
    }

    /// Frames that only hold items or rows and cannot take arbitrary blocks.
    pub fn holds_blocks(&self) -> bool {
        !matches!(
            self.node.kind,
            NodeKind::List { .. } | NodeKind::Table { .. } | NodeKind::DefinitionList
        )
    }
}

/// Blocks that are dropped when they end up with no children.
fn droppable_when_empty(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Paragraph
            | NodeKind::Indent
            | NodeKind::Blockquote
            | NodeKind::List { .. }
            | NodeKind::Table { .. }
            | NodeKind::DefinitionList
    )
}

#[derive(Debug)]
pub(super) struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new(root: Node) -> Self {
        Self {
            frames: vec![Frame::new(root)],
        }
    }

    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> &Frame {
        // The root frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    pub fn top_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// The frame right below the top, if any.
    pub fn parent_mut(&mut self) -> Option<&mut Frame> {
        let len = self.frames.len();
        if len < 2 {
            return None;
        }
        self.frames.get_mut(len - 2)
    }

    pub fn push(&mut self, frame: Frame) {
        log::trace!("open {} at depth {}", frame.node.kind.name(), self.frames.len());
        self.frames.push(frame);
    }

    /// Finalize the top frame and append its node to the frame below.
    ///
    /// Panics when asked to pop the root: that is a parser bug, not bad input.
    pub fn pop(&mut self) {
        assert!(self.frames.len() > 1, "attempted to pop the root scope");
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let mut node = frame.node;
        log::trace!("close {} at depth {}", node.kind.name(), self.frames.len());

        let children = node.children.iter().map(|child| &child.range);
        if let Some(covered) = Range::bounding_box(children) {
            node.range = node.range.cover(&covered);
        }

        let parent = self.top_mut();

        if frame.reference_body {
            // Body content other than entries stays with the reference.
            parent.node.children.extend(node.children);
            parent.node.annotations.extend(node.annotations);
            return;
        }

        if node.children.is_empty() && droppable_when_empty(&node.kind) {
            log::debug!("dropping empty {}", node.kind.name());
            parent.node.annotations.extend(node.annotations);
            return;
        }

        parent.node.children.push(node);
    }

    /// Pop up to and including the innermost frame opened by `unit`.
    ///
    /// Returns false, without popping anything, when no such frame is open.
    pub fn pop_opened_by(&mut self, unit: PrefixUnit) -> bool {
        let Some(index) = self
            .frames
            .iter()
            .rposition(|frame| frame.opened_by == Some(unit))
        else {
            return false;
        };
        while self.frames.len() > index {
            self.pop();
        }
        true
    }

    /// Append a finished node to the top frame.
    pub fn append(&mut self, node: Node) {
        self.top_mut().node.children.push(node);
    }

    /// Add an entry to the reference that owns the current reference body.
    pub fn append_reference_entry(&mut self, entry: ReferenceEntry) -> bool {
        if !self.top().reference_body {
            return false;
        }
        match self.parent_mut() {
            Some(Frame {
                node:
                    Node {
                        kind: NodeKind::Reference { info, .. },
                        ..
                    },
                ..
            }) => {
                info.push(entry);
                true
            }
            _ => false,
        }
    }

    /// Close everything down to the root and hand the root back.
    pub fn finish(mut self) -> Node {
        while self.frames.len() > 1 {
            self.pop();
        }
        let root = self.frames.pop();
        root.map(|frame| frame.node)
            .unwrap_or_else(|| Node::new(NodeKind::Root, Range::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(kind: NodeKind) -> Node {
        Node::new(kind, Range::default())
    }

    #[test]
    fn test_pop_appends_to_parent() {
        let mut stack = ScopeStack::new(node(NodeKind::Root));
        stack.push(Frame::new(node(NodeKind::Paragraph)));
        stack.append(Node::text("x", Range::default()));
        stack.pop();
        let root = stack.finish();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].kind, NodeKind::Paragraph);
    }

    #[test]
    fn test_empty_blocks_are_dropped() {
        let mut stack = ScopeStack::new(node(NodeKind::Root));
        stack.push(Frame::new(node(NodeKind::Indent)).opened_by(PrefixUnit::Indent));
        stack.push(Frame::new(node(NodeKind::Paragraph)));
        let root = stack.finish();
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_pop_opened_by_force_closes_inner_frames() {
        let mut stack = ScopeStack::new(node(NodeKind::Root));
        stack.push(Frame::new(node(NodeKind::Blockquote)).opened_by(PrefixUnit::Quote));
        stack.push(Frame::new(node(NodeKind::Indent)).opened_by(PrefixUnit::Indent));
        stack.push(Frame::new(node(NodeKind::Heading {
            weight: 1,
            id: None,
        })));
        stack.append(node(NodeKind::Title));

        assert!(stack.pop_opened_by(PrefixUnit::Quote));
        assert_eq!(stack.depth(), 1);
        assert!(!stack.pop_opened_by(PrefixUnit::Indent));

        let root = stack.finish();
        let quote = &root.children[0];
        assert_eq!(quote.kind, NodeKind::Blockquote);
        assert_eq!(quote.children[0].kind, NodeKind::Indent);
    }

    #[test]
    #[should_panic(expected = "root scope")]
    fn test_popping_root_panics() {
        let mut stack = ScopeStack::new(node(NodeKind::Root));
        stack.pop();
    }
}
