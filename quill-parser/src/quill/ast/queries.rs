//! Read-only queries renderers need: references by id, heading text and ids, and
//! position-based lookup.

use super::document::Document;
use super::node::{Node, NodeKind, ReferenceEntry};
use super::range::Position;
use super::visitor::{walk, Visitor};

/// Lowercased alphanumeric words joined by single hyphens, used as the default heading id.
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut pending_hyphen = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// A heading as seen from outside the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingInfo<'a> {
    pub weight: u8,
    /// The explicit `{id}` anchor, or the slug of the title.
    pub id: String,
    pub text: String,
    pub node: &'a Node,
}

impl Node {
    /// Plain text of a heading's title; `None` for anything that is not a heading.
    pub fn heading_text(&self) -> Option<String> {
        if !matches!(self.kind, NodeKind::Heading { .. }) {
            return None;
        }
        let title = self
            .children
            .iter()
            .find(|child| child.kind == NodeKind::Title)?;
        Some(title.plain_text().trim().to_string())
    }

    /// The chain of nodes whose range contains `position`, outermost first.
    pub fn path_at(&self, position: Position) -> Vec<&Node> {
        let mut path = Vec::new();
        let mut current = self;
        if !current.range.contains(position) {
            return path;
        }
        path.push(current);
        while let Some(child) = current
            .children
            .iter()
            .find(|child| child.range.contains(position))
        {
            path.push(child);
            current = child;
        }
        path
    }
}

impl Document {
    /// Every reference definition in document order, with its entries.
    pub fn references(&self) -> Vec<(&str, &[ReferenceEntry])> {
        collect(&self.root, |node| match &node.kind {
            NodeKind::Reference { id, info } => Some((id.as_str(), info.as_slice())),
            _ => None,
        })
    }

    pub fn reference(&self, id: &str) -> Option<&[ReferenceEntry]> {
        self.references()
            .into_iter()
            .find(|(reference_id, _)| *reference_id == id)
            .map(|(_, entries)| entries)
    }

    /// Every heading in document order.
    pub fn headings(&self) -> Vec<HeadingInfo<'_>> {
        collect(&self.root, |node| match &node.kind {
            NodeKind::Heading { weight, id } => {
                let text = node.heading_text().unwrap_or_default();
                let id = id.clone().unwrap_or_else(|| slugify(&text));
                Some(HeadingInfo {
                    weight: *weight,
                    id,
                    text,
                    node,
                })
            }
            _ => None,
        })
    }

    pub fn find_heading(&self, id: &str) -> Option<HeadingInfo<'_>> {
        self.headings().into_iter().find(|heading| heading.id == id)
    }

    /// Deepest node containing `position`.
    pub fn node_at(&self, position: Position) -> Option<&Node> {
        self.root.path_at(position).pop()
    }
}

fn collect<'a, T>(root: &'a Node, pick: fn(&'a Node) -> Option<T>) -> Vec<T> {
    fn visit<'a, T>(node: &'a Node, pick: fn(&'a Node) -> Option<T>, found: &mut Vec<T>) {
        found.extend(pick(node));
        for child in &node.children {
            visit(child, pick, found);
        }
    }
    let mut found = Vec::new();
    visit(root, pick, &mut found);
    found
}

/// Counts nodes of one kind name; handy for quick statistics.
pub fn count_kind(root: &Node, name: &str) -> usize {
    struct Counter<'n> {
        name: &'n str,
        count: usize,
    }
    impl Visitor for Counter<'_> {
        fn before(&mut self, node: &Node) {
            if node.kind.name() == self.name {
                self.count += 1;
            }
        }
    }
    let mut counter = Counter { name, count: 0 };
    walk(root, &mut counter);
    counter.count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::parsing::parse_str;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Getting Started!"), "getting-started");
        assert_eq!(slugify("  a -- b  "), "a-b");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_headings_use_anchor_or_slug() {
        let doc = parse_str("> Intro {start}\n\n> Second Part");
        let headings = doc.headings();
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].id, "start");
        assert_eq!(headings[1].id, "second-part");
        assert_eq!(headings[1].text, "Second Part");
        assert!(doc.find_heading("second-part").is_some());
    }

    #[test]
    fn test_references_in_document_order() {
        let doc = parse_str("^[b]:\n\tauthor: B\n\n^[a]:\n\tauthor: A");
        let ids: Vec<_> = doc.references().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["b", "a"]);
        let entries = doc.reference("a").unwrap();
        assert_eq!(entries[0].key, "author");
    }

    #[test]
    fn test_node_at_finds_deepest() {
        let doc = parse_str("hello *world*");
        let node = doc.node_at(Position::new(0, 8)).unwrap();
        assert_eq!(node.kind, NodeKind::Text("world".into()));
        assert_eq!(count_kind(&doc.root, "emphasis"), 1);
    }
}
