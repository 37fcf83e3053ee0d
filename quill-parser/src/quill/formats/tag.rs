//! Tag formatter
//!
//! Serializes the tree as indented XML-like tags. Attributes carry the node kind's payload;
//! text content is escaped. Useful for diffing parse results by eye and in test fixtures.
//!
//!     <root>
//!       <heading weight="1" id="intro">
//!         <title>Intro</title>
//!       </heading>
//!     </root>

use super::registry::{FormatError, Formatter};
use crate::quill::ast::{Document, Node, NodeKind};

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn attributes(kind: &NodeKind) -> Vec<(&'static str, String)> {
    let mut attrs = Vec::new();
    match kind {
        NodeKind::Heading { weight, id } => {
            attrs.push(("weight", weight.to_string()));
            if let Some(id) = id {
                attrs.push(("id", id.clone()));
            }
        }
        NodeKind::List { kind, start } => {
            attrs.push(("kind", format!("{:?}", kind).to_lowercase()));
            attrs.push(("start", start.to_string()));
        }
        NodeKind::Item { index } => attrs.push(("index", index.to_string())),
        NodeKind::CheckItem { state } => attrs.push(("state", format!("{:?}", state).to_lowercase())),
        NodeKind::Row { role } => attrs.push(("role", format!("{:?}", role).to_lowercase())),
        NodeKind::Table {
            header_rows,
            footer_start,
            ..
        } => {
            attrs.push(("header-rows", header_rows.to_string()));
            if let Some(footer) = footer_start {
                attrs.push(("footer-start", footer.to_string()));
            }
        }
        NodeKind::Admonition { label } => attrs.push(("label", label.clone())),
        NodeKind::FootnoteDescribe { id } | NodeKind::Reference { id, .. } => {
            attrs.push(("id", id.clone()))
        }
        NodeKind::Footnote { id: Some(id) } | NodeKind::Intext { id } => {
            attrs.push(("id", id.clone()))
        }
        NodeKind::Include { path } => attrs.push(("path", path.clone())),
        NodeKind::Emphasis(emphasis) => {
            attrs.push(("kind", format!("{:?}", emphasis).to_lowercase()))
        }
        NodeKind::Change(change) => attrs.push(("kind", format!("{:?}", change).to_lowercase())),
        NodeKind::Code { language, .. } => {
            if let Some(language) = language {
                attrs.push(("language", language.clone()));
            }
        }
        NodeKind::Link {
            resource,
            anchor,
            label,
        }
        | NodeKind::View {
            resource,
            anchor,
            label,
        } => {
            attrs.push(("resource", resource.clone()));
            if let Some(anchor) = anchor {
                attrs.push(("anchor", anchor.clone()));
            }
            if let Some(label) = label {
                attrs.push(("label", label.clone()));
            }
        }
        NodeKind::DateTime { date, time } => {
            if let Some(date) = date {
                attrs.push(("date", date.clone()));
            }
            if let Some(time) = time {
                attrs.push(("time", time.clone()));
            }
        }
        NodeKind::Emoji { shortcode } => attrs.push(("shortcode", shortcode.clone())),
        NodeKind::Punct(punct) => attrs.push(("glyph", punct.glyph().to_string())),
        _ => {}
    }
    attrs
}

/// Text content of leaf kinds that carry a string.
fn leaf_text(kind: &NodeKind) -> Option<&str> {
    match kind {
        NodeKind::Text(text)
        | NodeKind::Comment(text)
        | NodeKind::AccountTag(text)
        | NodeKind::HashTag(text) => Some(text),
        NodeKind::Code { source, .. } => Some(source),
        _ => None,
    }
}

fn serialize_node(node: &Node, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let name = node.kind.name();
    let mut open = String::from(name);
    for (key, value) in attributes(&node.kind) {
        open.push_str(&format!(" {}=\"{}\"", key, escape(&value)));
    }
    for annotation in &node.annotations {
        open.push_str(&format!(
            " data-{}=\"{}\"",
            annotation.key,
            escape(&annotation.value)
        ));
    }

    if let Some(text) = leaf_text(&node.kind) {
        out.push_str(&format!("{}<{}>{}</{}>\n", indent, open, escape(text), name));
        return;
    }
    if let NodeKind::Reference { info, .. } = &node.kind {
        out.push_str(&format!("{}<{}>\n", indent, open));
        for entry in info {
            let value: String = entry.value.iter().map(Node::plain_text).collect();
            out.push_str(&format!(
                "{}  <entry key=\"{}\">{}</entry>\n",
                indent,
                escape(&entry.key),
                escape(&value)
            ));
        }
        for child in &node.children {
            serialize_node(child, depth + 1, out);
        }
        out.push_str(&format!("{}</{}>\n", indent, name));
        return;
    }
    if node.children.is_empty() {
        out.push_str(&format!("{}<{} />\n", indent, open));
        return;
    }
    let inline_only = node.children.iter().all(|child| child.is_text());
    if inline_only {
        let text: String = node.children.iter().map(Node::plain_text).collect();
        out.push_str(&format!("{}<{}>{}</{}>\n", indent, open, escape(&text), name));
        return;
    }

    out.push_str(&format!("{}<{}>\n", indent, open));
    for child in &node.children {
        serialize_node(child, depth + 1, out);
    }
    out.push_str(&format!("{}</{}>\n", indent, name));
}

pub fn serialize_document(doc: &Document) -> String {
    let mut out = String::new();
    serialize_node(&doc.root, 0, &mut out);
    out
}

pub struct TagFormatter;

impl Formatter for TagFormatter {
    fn name(&self) -> &str {
        "tag"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serialize_document(doc))
    }

    fn description(&self) -> &str {
        "Indented XML-like tags"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::parsing::parse_str;

    #[test]
    fn test_heading_and_paragraph() {
        let doc = parse_str("> Intro {intro}\n\nSome <b> & more");
        let expected = "\
<root>
  <heading weight=\"1\" id=\"intro\">
    <title>Intro</title>
    <paragraph>Some &lt;b&gt; &amp; more</paragraph>
  </heading>
</root>
";
        assert_eq!(serialize_document(&doc), expected);
    }

    #[test]
    fn test_annotations_become_data_attributes() {
        let doc = parse_str("hello ~~ lang: en");
        let out = serialize_document(&doc);
        assert!(out.contains("<paragraph data-lang=\"en\">hello</paragraph>"));
    }

    #[test]
    fn test_empty_nodes_self_close() {
        let doc = parse_str("***");
        assert!(serialize_document(&doc).contains("<thematic-break />"));
    }
}
