//! Inline parsing
//!
//!     Recursive descent over the tokens of one block's content (a paragraph, a title, a cell,
//!     an item line). Paired delimiters parse their children until the matching closer; when
//!     no closer exists before the end of the content the opener backtracks to literal text.
//!     Nothing here can fail.
//!
//!     Whether an opener closes depends only on its position, so a failed attempt is recorded
//!     and never repeated. Each opener is tried at most once, which keeps the worst case
//!     polynomial in the length of the content.
//!
//!         *bold*  _italic_  __underline__  ==highlight==  `code`
//!         {+added+}  {-removed-}
//!         [resource#anchor](label)   link
//!         ![resource](label)         view
//!         ^[id]  ^(text)             footnotes
//!         &[id]                      in-text citation
//!
//!     Comments stay in place as nodes. Inline annotations are lifted out and handed to the
//!     enclosing block. Heading anchors are only meaningful in titles; elsewhere they read as
//!     the literal `{id}`.

use crate::quill::ast::{
    Annotation, ChangeKind, CodeMode, EmphasisKind, Node, NodeKind, PunctKind, Range,
};
use crate::quill::lexing::common::split_date_time;
use crate::quill::token::{Token, TokenKind, ToQuillString};
use std::collections::HashSet;

/// Result of parsing one run of inline content.
#[derive(Debug, Default)]
pub struct Inlines {
    pub nodes: Vec<Node>,
    pub annotations: Vec<Annotation>,
    /// The last `{id}` anchor, when anchors were requested.
    pub anchor: Option<String>,
}

/// Parse inline content. With `take_anchor`, anchors are collected instead of kept as text.
pub fn parse_inlines(tokens: &[Token], take_anchor: bool) -> Inlines {
    let mut parser = InlineParser {
        tokens,
        pos: 0,
        take_anchor,
        annotations: Vec::new(),
        anchor: None,
        failed: HashSet::new(),
    };
    let (nodes, _) = parser.sequence(None);
    let mut nodes = merge_text(nodes);
    trim_edges(&mut nodes);
    Inlines {
        nodes,
        annotations: parser.annotations,
        anchor: parser.anchor,
    }
}

struct InlineParser<'t> {
    tokens: &'t [Token],
    pos: usize,
    take_anchor: bool,
    annotations: Vec<Annotation>,
    anchor: Option<String>,
    /// Openers (position, closer) already known not to close.
    failed: HashSet<(usize, TokenKind)>,
}

/// The closing token for a paired opener.
fn closer_for(kind: TokenKind) -> Option<TokenKind> {
    match kind {
        TokenKind::Star | TokenKind::Underscore | TokenKind::DoubleUnderscore => Some(kind),
        TokenKind::Highlight => Some(TokenKind::Highlight),
        TokenKind::AddedOpen => Some(TokenKind::AddedClose),
        TokenKind::RemovedOpen => Some(TokenKind::RemovedClose),
        _ => None,
    }
}

fn paired_kind(kind: TokenKind) -> NodeKind {
    match kind {
        TokenKind::Star => NodeKind::Emphasis(EmphasisKind::Bold),
        TokenKind::Underscore => NodeKind::Emphasis(EmphasisKind::Italic),
        TokenKind::DoubleUnderscore => NodeKind::Emphasis(EmphasisKind::Underline),
        TokenKind::AddedOpen => NodeKind::Change(ChangeKind::Added),
        TokenKind::RemovedOpen => NodeKind::Change(ChangeKind::Removed),
        _ => NodeKind::Highlight,
    }
}

/// Surface text of a token that did not take part in any construct.
pub(super) fn literal(token: &Token) -> String {
    match token.kind {
        TokenKind::Text => token.text.clone(),
        TokenKind::Newline | TokenKind::NewlinePlus => " ".to_string(),
        _ => token.to_quill_string(),
    }
}

/// Split `resource#anchor` into its parts.
fn split_anchor(resource: &str) -> (String, Option<String>) {
    match resource.split_once('#') {
        Some((target, anchor)) if !anchor.is_empty() => {
            (target.to_string(), Some(anchor.to_string()))
        }
        _ => (resource.to_string(), None),
    }
}

impl<'t> InlineParser<'t> {
    fn peek(&self, offset: usize) -> Option<&'t Token> {
        self.tokens.get(self.pos + offset)
    }

    fn has_later(&self, kind: TokenKind) -> bool {
        self.tokens[self.pos..].iter().any(|token| token.kind == kind)
    }

    /// Parse until `closer` (consumed) or the end of the content.
    ///
    /// Returns the nodes and whether the closer was found.
    fn sequence(&mut self, closer: Option<TokenKind>) -> (Vec<Node>, bool) {
        let mut nodes = Vec::new();

        while let Some(token) = self.peek(0) {
            if Some(token.kind) == closer {
                self.pos += 1;
                return (nodes, true);
            }
            self.pos += 1;
            if let Some(node) = self.construct(token) {
                nodes.push(node);
            }
        }

        (nodes, closer.is_none())
    }

    /// Build the node starting at `token` (already consumed).
    fn construct(&mut self, token: &'t Token) -> Option<Node> {
        let range = token.range.clone();
        let node = match token.kind {
            TokenKind::Star
            | TokenKind::Underscore
            | TokenKind::DoubleUnderscore
            | TokenKind::Highlight
            | TokenKind::AddedOpen
            | TokenKind::RemovedOpen => return Some(self.paired(token)),
            TokenKind::Backtick => return Some(self.inline_code(token)),
            TokenKind::Resource => {
                let label = self.take_label();
                let (resource, anchor) = split_anchor(&token.text);
                let range = self.range_from(token);
                Node::new(
                    NodeKind::Link {
                        resource,
                        anchor,
                        label,
                    },
                    range,
                )
            }
            TokenKind::Bang if self.next_is(TokenKind::Resource) => {
                let resource_token = self.advance()?;
                let label = self.take_label();
                let (resource, anchor) = split_anchor(&resource_token.text);
                let range = self.range_from(token);
                Node::new(
                    NodeKind::View {
                        resource,
                        anchor,
                        label,
                    },
                    range,
                )
            }
            TokenKind::Caret if self.next_is(TokenKind::Resource) => {
                let id = self.advance()?.text.clone();
                let range = self.range_from(token);
                Node::new(NodeKind::Footnote { id: Some(id) }, range)
            }
            TokenKind::Caret if self.next_is(TokenKind::Label) => {
                let label = self.advance()?;
                let range = self.range_from(token);
                Node::new(NodeKind::Footnote { id: None }, range)
                    .with_children(vec![Node::text(label.text.clone(), label.range.clone())])
            }
            TokenKind::Ampersand if self.next_is(TokenKind::Resource) => {
                let id = self.advance()?.text.clone();
                let range = self.range_from(token);
                Node::new(NodeKind::Intext { id }, range)
            }
            TokenKind::Anchor if self.take_anchor => {
                self.anchor = Some(token.text.clone());
                return None;
            }
            TokenKind::DateTime => match split_date_time(&token.text) {
                Some((date, time)) => Node::new(NodeKind::DateTime { date, time }, range),
                None => Node::text(literal(token), range),
            },
            TokenKind::Emoji => Node::new(
                NodeKind::Emoji {
                    shortcode: token.text.clone(),
                },
                range,
            ),
            TokenKind::AccountTag => Node::new(NodeKind::AccountTag(token.text.clone()), range),
            TokenKind::HashTag => Node::new(NodeKind::HashTag(token.text.clone()), range),
            TokenKind::Comment => Node::new(NodeKind::Comment(token.text.clone()), range),
            TokenKind::Annotation => {
                if let Some(annotation) = Annotation::parse(&token.text) {
                    self.annotations.push(annotation);
                }
                return None;
            }
            TokenKind::Newline => Node::new(NodeKind::LineBreak, range),
            TokenKind::Hyphen => Node::text("-", range),
            TokenKind::EnDash => Node::new(NodeKind::Punct(PunctKind::EnDash), range),
            TokenKind::EmDash => Node::new(NodeKind::Punct(PunctKind::EmDash), range),
            TokenKind::DoubleQuoteOpen => {
                Node::new(NodeKind::Punct(PunctKind::DoubleQuoteOpen), range)
            }
            TokenKind::DoubleQuoteClose => {
                Node::new(NodeKind::Punct(PunctKind::DoubleQuoteClose), range)
            }
            TokenKind::SingleQuoteOpen => {
                Node::new(NodeKind::Punct(PunctKind::SingleQuoteOpen), range)
            }
            TokenKind::SingleQuoteClose => {
                Node::new(NodeKind::Punct(PunctKind::SingleQuoteClose), range)
            }
            TokenKind::IndentIncrease
            | TokenKind::IndentDecrease
            | TokenKind::BlockquoteIncrease
            | TokenKind::BlockquoteDecrease
            | TokenKind::EndOfStream => return None,
            _ => Node::text(literal(token), range),
        };
        Some(node)
    }

    fn next_is(&self, kind: TokenKind) -> bool {
        self.peek(0).is_some_and(|token| token.kind == kind)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.peek(0)?;
        self.pos += 1;
        Some(token)
    }

    fn take_label(&mut self) -> Option<String> {
        if self.next_is(TokenKind::Label) {
            self.advance().map(|label| label.text.clone())
        } else {
            None
        }
    }

    /// Range from `start` through the last consumed token.
    fn range_from(&self, start: &Token) -> Range {
        match self.pos.checked_sub(1).and_then(|last| self.tokens.get(last)) {
            Some(last) => start.range.cover(&last.range),
            None => start.range.clone(),
        }
    }

    /// Emphasis, highlight and change marks. Unclosed or empty pairs are literal.
    fn paired(&mut self, opener: &'t Token) -> Node {
        let literal_opener = Node::text(literal(opener), opener.range.clone());
        let Some(closer) = closer_for(opener.kind) else {
            return literal_opener;
        };
        let resume = self.pos;
        let attempt = (resume - 1, closer);
        if self.failed.contains(&attempt) || !self.has_later(closer) {
            return literal_opener;
        }

        let (children, closed) = self.sequence(Some(closer));
        if closed && !children.is_empty() {
            let range = self.range_from(opener);
            return Node::new(paired_kind(opener.kind), range).with_children(merge_text(children));
        }

        log::debug!("unmatched {} at {} read as text", opener.kind, opener.range.start);
        self.failed.insert(attempt);
        self.pos = resume;
        literal_opener
    }

    /// Backtick code: everything up to the next backtick, verbatim.
    fn inline_code(&mut self, opener: &'t Token) -> Node {
        let Some(offset) = self.tokens[self.pos..]
            .iter()
            .position(|token| token.kind == TokenKind::Backtick)
        else {
            return Node::text(literal(opener), opener.range.clone());
        };
        let body = &self.tokens[self.pos..self.pos + offset];
        if body.is_empty() {
            return Node::text(literal(opener), opener.range.clone());
        }
        let source: String = body.iter().map(literal).collect();
        self.pos += offset + 1;
        let range = self.range_from(opener);
        Node::new(
            NodeKind::Code {
                mode: CodeMode::Inline,
                language: None,
                source,
            },
            range,
        )
    }
}

/// Join adjacent text nodes.
pub(super) fn merge_text(nodes: Vec<Node>) -> Vec<Node> {
    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let (Some(last), NodeKind::Text(text)) = (merged.last_mut(), &node.kind) {
            if let NodeKind::Text(previous) = &mut last.kind {
                previous.push_str(text);
                last.range = last.range.cover(&node.range);
                continue;
            }
        }
        merged.push(node);
    }
    merged
}

/// Trim whitespace at the outer edges of inline content, dropping text left empty.
pub(super) fn trim_edges(nodes: &mut Vec<Node>) {
    if let Some(Node {
        kind: NodeKind::Text(text),
        ..
    }) = nodes.first_mut()
    {
        *text = text.trim_start().to_string();
        if text.is_empty() {
            nodes.remove(0);
        }
    }
    if let Some(Node {
        kind: NodeKind::Text(text),
        ..
    }) = nodes.last_mut()
    {
        *text = text.trim_end().to_string();
        if text.is_empty() {
            nodes.pop();
        }
    }
}
