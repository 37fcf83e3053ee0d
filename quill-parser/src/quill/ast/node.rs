//! The document tree node
//!
//!     Every element of a quill document is a [Node]: a closed [NodeKind] describing what it is,
//!     the source [Range] it spans, its ordered children and the annotations attached to it.
//!     The tree is owned and single-parent; it is built bottom-up by the parser and never
//!     mutated afterwards.
//!
//!     Which children a kind may hold is fixed by the parser rather than by the type system:
//!     rows only appear in tables, cells in rows, items in lists, definition items in definition
//!     lists, and titles/subtitles in headings.

use super::range::Range;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub range: Range,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

/// `~~ key: value` metadata, kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub key: String,
    pub value: String,
}

impl Annotation {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse `key: value`; the key must be non-empty.
    pub fn parse(text: &str) -> Option<Self> {
        let (key, value) = text.split_once(':')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, value.trim()))
    }
}

/// One `key: value` line of a reference body. The value is inline content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceEntry {
    pub key: String,
    pub value: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListKind {
    Bullet { weight: u8 },
    Numbered,
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckState {
    Todo,
    Done,
    Cancelled,
}

impl CheckState {
    pub fn from_ordinal(ordinal: u32) -> Self {
        match ordinal {
            1 => CheckState::Done,
            2 => CheckState::Cancelled,
            _ => CheckState::Todo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowRole {
    Header,
    Content,
    Footer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EmphasisKind {
    Bold,
    Italic,
    Underline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeKind {
    Added,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CodeMode {
    Inline,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PunctKind {
    EnDash,
    EmDash,
    DoubleQuoteOpen,
    DoubleQuoteClose,
    SingleQuoteOpen,
    SingleQuoteClose,
}

impl PunctKind {
    /// Typographic glyph for the mark.
    pub fn glyph(self) -> &'static str {
        match self {
            PunctKind::EnDash => "\u{2013}",
            PunctKind::EmDash => "\u{2014}",
            PunctKind::DoubleQuoteOpen => "\u{201c}",
            PunctKind::DoubleQuoteClose => "\u{201d}",
            PunctKind::SingleQuoteOpen => "\u{2018}",
            PunctKind::SingleQuoteClose => "\u{2019}",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    // Structural
    Root,
    Indent,
    Blockquote,
    Paragraph,
    Heading {
        weight: u8,
        id: Option<String>,
    },
    Title,
    Subtitle,
    List {
        kind: ListKind,
        start: u64,
    },
    Item {
        index: u64,
    },
    CheckItem {
        state: CheckState,
    },
    Table {
        alignments: Vec<Alignment>,
        header_rows: usize,
        footer_start: Option<usize>,
    },
    Row {
        role: RowRole,
    },
    Cell,
    DefinitionList,
    DefinitionItem,
    Term,
    Description,
    Admonition {
        label: String,
    },
    FootnoteDescribe {
        id: String,
    },
    Reference {
        id: String,
        info: Vec<ReferenceEntry>,
    },
    Include {
        path: String,
    },

    // Leaf and inline
    Text(String),
    Emphasis(EmphasisKind),
    Highlight,
    Change(ChangeKind),
    LineBreak,
    PageBreak,
    ThematicBreak,
    Code {
        mode: CodeMode,
        language: Option<String>,
        source: String,
    },
    Link {
        resource: String,
        anchor: Option<String>,
        label: Option<String>,
    },
    View {
        resource: String,
        anchor: Option<String>,
        label: Option<String>,
    },
    Footnote {
        id: Option<String>,
    },
    Intext {
        id: String,
    },
    DateTime {
        date: Option<String>,
        time: Option<String>,
    },
    Emoji {
        shortcode: String,
    },
    AccountTag(String),
    HashTag(String),
    Comment(String),
    Punct(PunctKind),
}

impl NodeKind {
    /// Short lowercase name used by the tree printers.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Indent => "indent",
            NodeKind::Blockquote => "blockquote",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading { .. } => "heading",
            NodeKind::Title => "title",
            NodeKind::Subtitle => "subtitle",
            NodeKind::List { .. } => "list",
            NodeKind::Item { .. } => "item",
            NodeKind::CheckItem { .. } => "check-item",
            NodeKind::Table { .. } => "table",
            NodeKind::Row { .. } => "row",
            NodeKind::Cell => "cell",
            NodeKind::DefinitionList => "definition-list",
            NodeKind::DefinitionItem => "definition-item",
            NodeKind::Term => "term",
            NodeKind::Description => "description",
            NodeKind::Admonition { .. } => "admonition",
            NodeKind::FootnoteDescribe { .. } => "footnote-describe",
            NodeKind::Reference { .. } => "reference",
            NodeKind::Include { .. } => "include",
            NodeKind::Text(_) => "text",
            NodeKind::Emphasis(_) => "emphasis",
            NodeKind::Highlight => "highlight",
            NodeKind::Change(_) => "change",
            NodeKind::LineBreak => "line-break",
            NodeKind::PageBreak => "page-break",
            NodeKind::ThematicBreak => "thematic-break",
            NodeKind::Code { .. } => "code",
            NodeKind::Link { .. } => "link",
            NodeKind::View { .. } => "view",
            NodeKind::Footnote { .. } => "footnote",
            NodeKind::Intext { .. } => "intext",
            NodeKind::DateTime { .. } => "datetime",
            NodeKind::Emoji { .. } => "emoji",
            NodeKind::AccountTag(_) => "account-tag",
            NodeKind::HashTag(_) => "hash-tag",
            NodeKind::Comment(_) => "comment",
            NodeKind::Punct(_) => "punct",
        }
    }
}

impl Node {
    pub fn new(kind: NodeKind, range: Range) -> Self {
        Self {
            kind,
            range,
            children: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn text(text: impl Into<String>, range: Range) -> Self {
        Self::new(NodeKind::Text(text.into()), range)
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, NodeKind::Comment(_))
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations
            .iter()
            .find(|annotation| annotation.key == key)
            .map(|annotation| annotation.value.as_str())
    }

    /// Copy of the tree with every range reset, for comparing shape and content only.
    pub fn without_ranges(&self) -> Node {
        let kind = match &self.kind {
            NodeKind::Reference { id, info } => NodeKind::Reference {
                id: id.clone(),
                info: info
                    .iter()
                    .map(|entry| ReferenceEntry {
                        key: entry.key.clone(),
                        value: entry.value.iter().map(Node::without_ranges).collect(),
                    })
                    .collect(),
            },
            other => other.clone(),
        };
        Node {
            kind,
            range: Range::default(),
            children: self.children.iter().map(Node::without_ranges).collect(),
            annotations: self.annotations.clone(),
        }
    }

    /// Equality of kind, payload, annotations and children, ignoring source ranges.
    pub fn structurally_eq(&self, other: &Node) -> bool {
        self.without_ranges() == other.without_ranges()
    }

    /// Concatenated readable text of this subtree. Comments are skipped, line breaks become
    /// spaces and typographic marks become their glyphs.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Code { source, .. } => out.push_str(source),
            NodeKind::Punct(punct) => out.push_str(punct.glyph()),
            NodeKind::LineBreak => out.push(' '),
            NodeKind::Emoji { shortcode } => {
                out.push(':');
                out.push_str(shortcode);
                out.push(':');
            }
            NodeKind::AccountTag(name) => {
                out.push('@');
                out.push_str(name);
            }
            NodeKind::HashTag(name) => {
                out.push('#');
                out.push_str(name);
            }
            NodeKind::DateTime { date, time } => {
                let parts: Vec<&str> = [date.as_deref(), time.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect();
                out.push_str(&parts.join(" "));
            }
            NodeKind::Link {
                resource, label, ..
            }
            | NodeKind::View {
                resource, label, ..
            } if self.children.is_empty() => {
                out.push_str(label.as_deref().unwrap_or(resource));
            }
            NodeKind::Comment(_) => {}
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::ast::range::Position;

    fn at(offset: usize) -> Range {
        Range::point(offset, Position::new(0, offset))
    }

    #[test]
    fn test_structural_equality_ignores_ranges() {
        let a = Node::new(NodeKind::Paragraph, at(0)).with_children(vec![Node::text("hi", at(0))]);
        let b = Node::new(NodeKind::Paragraph, at(7)).with_children(vec![Node::text("hi", at(9))]);
        let c = Node::new(NodeKind::Paragraph, at(0)).with_children(vec![Node::text("ho", at(0))]);

        assert_ne!(a, b);
        assert!(a.structurally_eq(&b));
        assert!(!a.structurally_eq(&c));
    }

    #[test]
    fn test_plain_text_skips_comments() {
        let paragraph = Node::new(NodeKind::Paragraph, at(0)).with_children(vec![
            Node::text("a", at(0)),
            Node::new(NodeKind::Punct(PunctKind::EmDash), at(1)),
            Node::new(NodeKind::Comment("hidden".into()), at(2)),
            Node::new(NodeKind::LineBreak, at(3)),
            Node::new(NodeKind::Emphasis(EmphasisKind::Bold), at(4))
                .with_children(vec![Node::text("b", at(5))]),
        ]);
        assert_eq!(paragraph.plain_text(), "a\u{2014} b");
    }

    #[test]
    fn test_annotation_parse() {
        assert_eq!(Annotation::parse("lang: en"), Some(Annotation::new("lang", "en")));
        assert_eq!(Annotation::parse(": nothing"), None);
        assert_eq!(Annotation::parse("no colon"), None);
    }
}
