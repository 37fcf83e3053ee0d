//! Treeviz formatter
//!
//! One line per node, nesting drawn with box connectors, which makes line-oriented documents
//! quick to scan:
//!
//!     ⧉ 3 blocks
//!     ├─ § > Getting started
//!     │ ├─ ⊤ Getting started
//!     │ └─ ¶ Hello world
//!     └─ ☰ 2 items
//!
//! Format: <prefix><connector> <icon> <label>, labels truncated to 30 characters.
//!
//! Icons
//!     Blocks:
//!         Root: ⧉  Heading: §  Title/Subtitle: ⊤  Paragraph: ¶  Indent: ➔  Blockquote: ❝
//!         List: ☰  Item: •  CheckItem: ☐  Table: ▦  Row: ═  Cell: ▫
//!         DefinitionList: ≔  Term: ≡  Description: ➔  Admonition: ⚑
//!         FootnoteDescribe: ³  Reference: ⊕  Include: ⇲  Code: 𝒱  Breaks: ─
//!     Inlines:
//!         Text: ◦  Emphasis: 𝐁  Highlight: ▒  Change: ±  Link: ↗  View: ◰
//!         Footnote: ³  Intext: †  Comment: ~

use super::registry::{FormatError, Formatter};
use crate::quill::ast::{Document, EmphasisKind, Node, NodeKind};

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn icon(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Root => "⧉",
        NodeKind::Heading { .. } => "§",
        NodeKind::Title | NodeKind::Subtitle => "⊤",
        NodeKind::Paragraph => "¶",
        NodeKind::Indent | NodeKind::Description => "➔",
        NodeKind::Blockquote => "❝",
        NodeKind::List { .. } => "☰",
        NodeKind::Item { .. } => "•",
        NodeKind::CheckItem { .. } => "☐",
        NodeKind::Table { .. } => "▦",
        NodeKind::Row { .. } => "═",
        NodeKind::Cell => "▫",
        NodeKind::DefinitionList => "≔",
        NodeKind::Term => "≡",
        NodeKind::Admonition { .. } => "⚑",
        NodeKind::FootnoteDescribe { .. } | NodeKind::Footnote { .. } => "³",
        NodeKind::Reference { .. } => "⊕",
        NodeKind::Include { .. } => "⇲",
        NodeKind::Code { .. } => "𝒱",
        NodeKind::PageBreak | NodeKind::ThematicBreak => "─",
        NodeKind::Text(_) => "◦",
        NodeKind::Emphasis(EmphasisKind::Bold) => "𝐁",
        NodeKind::Emphasis(_) => "𝐼",
        NodeKind::Highlight => "▒",
        NodeKind::Change(_) => "±",
        NodeKind::Link { .. } => "↗",
        NodeKind::View { .. } => "◰",
        NodeKind::Intext { .. } => "†",
        NodeKind::Comment(_) => "~",
        NodeKind::LineBreak => "↵",
        _ => "○",
    }
}

fn label(node: &Node) -> String {
    match &node.kind {
        NodeKind::Root => format!("{} blocks", node.children.len()),
        NodeKind::Heading { weight, id } => {
            let text = node.heading_text().unwrap_or_default();
            let marker = ">".repeat(*weight as usize);
            match id {
                Some(id) => format!("{} {} {{{}}}", marker, text, id),
                None => format!("{} {}", marker, text),
            }
        }
        NodeKind::List { .. } => format!("{} items", node.children.len()),
        NodeKind::Item { index } => format!("{}. {}", index, node.plain_text()),
        NodeKind::CheckItem { state } => format!("{:?} {}", state, node.plain_text()),
        NodeKind::Table { .. } => format!("{} rows", node.children.len()),
        NodeKind::Row { role } => format!("{:?}", role),
        NodeKind::Admonition { label } => format!("<{}>", label),
        NodeKind::FootnoteDescribe { id } => format!("^[{}]", id),
        NodeKind::Reference { id, info } => format!("^[{}] {} entries", id, info.len()),
        NodeKind::Include { path } => format!("<<{}>>", path),
        NodeKind::Code {
            language, source, ..
        } => match language {
            Some(language) => format!("{}: {}", language, source),
            None => source.clone(),
        },
        NodeKind::Link { resource, .. } | NodeKind::View { resource, .. } => resource.clone(),
        NodeKind::Intext { id } => id.clone(),
        NodeKind::Comment(text) => text.clone(),
        NodeKind::Text(text) => text.clone(),
        _ if node.children.is_empty() => node.kind.name().to_string(),
        _ => node.plain_text(),
    }
}

fn format_node(node: &Node, prefix: &str, is_last: bool, show_linum: bool, out: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    if show_linum {
        out.push_str(&format!("{:02} ", node.range.start.line + 1));
    }
    let text = label(node).replace('\n', " ");
    out.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        icon(&node.kind),
        truncate(&text, 30)
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let count = node.children.len();
    for (index, child) in node.children.iter().enumerate() {
        format_node(child, &child_prefix, index + 1 == count, show_linum, out);
    }
}

pub fn to_treeviz_str(doc: &Document) -> String {
    to_treeviz_str_with_linum(doc, false)
}

/// Treeviz output with each line prefixed by the node's 1-based source line.
pub fn to_treeviz_str_with_linum(doc: &Document, show_linum: bool) -> String {
    let mut out = format!("{} {}\n", icon(&doc.root.kind), label(&doc.root));
    let count = doc.root.children.len();
    for (index, child) in doc.root.children.iter().enumerate() {
        format_node(child, "", index + 1 == count, show_linum, &mut out);
    }
    out
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(to_treeviz_str(doc))
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::parsing::parse_str;

    #[test]
    fn test_connectors_and_icons() {
        let doc = parse_str("hello\n\n- a\n- b");
        let out = to_treeviz_str(&doc);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "⧉ 2 blocks");
        assert_eq!(lines[1], "├─ ¶ hello");
        assert_eq!(lines[3], "└─ ☰ 2 items");
        assert_eq!(lines[4], "  ├─ • 1. a");
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let doc = parse_str("a paragraph that is considerably longer than thirty characters");
        let out = to_treeviz_str(&doc);
        assert!(out.lines().nth(1).unwrap().ends_with("..."));
    }

    #[test]
    fn test_line_numbers() {
        let doc = parse_str("one\n\ntwo");
        let out = to_treeviz_str_with_linum(&doc, true);
        assert!(out.contains("03 └─ ¶ two"));
    }
}
