//! The block loop
//!
//!     The parser walks the token stream one block start at a time. At each block start it:
//!
//!         1. consumes the separator in front of the block, remembering whether it was a
//!            single line break (`Newline`) or a blank line (`NewlinePlus`);
//!         2. reconciles prefix scopes: every increase opens a frame, every decrease pops back
//!            to the frame its matching increase opened;
//!         3. closes the frames the new block cannot continue (items, lists of another kind,
//!            tables interrupted by something that is not a row, and so on);
//!         4. dispatches on the current token to one of the block builders in
//!            [blocks](super::blocks).
//!
//!     Every dispatch consumes at least one token, so the loop always terminates. When the
//!     stream ends every open frame is closed, innermost first, and the root is returned.

use super::include::IncludeContext;
use super::scopes::{Frame, ScopeStack};
use super::ParserOptions;
use crate::quill::ast::{codes, Diagnostic, Document, ListKind, Node, NodeKind, Range};
use crate::quill::lexing::prefix::PrefixUnit;
use crate::quill::token::{Token, TokenKind};

pub struct Parser<'t, 'i> {
    pub(super) tokens: &'t [Token],
    pub(super) pos: usize,
    pub(super) scopes: ScopeStack,
    pub(super) diagnostics: Vec<Diagnostic>,
    pub(super) options: ParserOptions,
    pub(super) include: Option<IncludeContext<'i>>,
    /// The previous block was a heading line, so a same-weight heading may be its subtitle.
    pub(super) after_heading_line: bool,
}

/// The list kind a marker token would open or continue.
pub(super) fn marker_list_kind(token: &Token) -> Option<ListKind> {
    match token.kind {
        TokenKind::BulletMarker => Some(ListKind::Bullet {
            weight: token.size.unwrap_or(1) as u8,
        }),
        TokenKind::NumberMarker => Some(ListKind::Numbered),
        TokenKind::CheckMarker => Some(ListKind::Check),
        _ => None,
    }
}

impl<'t, 'i> Parser<'t, 'i> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self::with_context(tokens, ParserOptions::default(), None)
    }

    pub fn with_context(
        tokens: &'t [Token],
        options: ParserOptions,
        include: Option<IncludeContext<'i>>,
    ) -> Self {
        let root_range = match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => first.range.cover(&last.range),
            _ => Range::default(),
        };
        Self {
            tokens,
            pos: 0,
            scopes: ScopeStack::new(Node::new(NodeKind::Root, root_range)),
            diagnostics: Vec::new(),
            options,
            include,
            after_heading_line: false,
        }
    }

    pub fn parse(mut self) -> Document {
        loop {
            let sep = self.take_separator();
            self.reconcile_prefix(sep);

            let Some(token) = self.current() else {
                break;
            };
            if token.kind == TokenKind::EndOfStream {
                break;
            }
            if token.kind.is_separator() {
                continue;
            }

            self.close_ended_blocks(sep, token);

            let start = self.pos;
            let heading_line = self.dispatch(sep);
            self.after_heading_line = heading_line;
            if self.pos == start {
                // Never stall on a token no builder accepted.
                self.pos += 1;
            }
        }

        log::debug!(
            "parsed {} tokens, {} diagnostics",
            self.tokens.len(),
            self.diagnostics.len()
        );
        let root = self.scopes.finish();
        Document::new(root, self.diagnostics)
    }

    pub(super) fn current(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    pub(super) fn peek(&self, offset: usize) -> Option<&'t Token> {
        self.tokens.get(self.pos + offset)
    }

    /// Index of the first line-ending token at or after `from`.
    pub(super) fn line_end(&self, from: usize) -> usize {
        self.tokens[from.min(self.tokens.len())..]
            .iter()
            .position(|token| token.kind.ends_line())
            .map(|offset| from + offset)
            .unwrap_or(self.tokens.len())
    }

    /// The tokens from the current position to the end of the line; advances past them.
    pub(super) fn take_line(&mut self) -> &'t [Token] {
        let end = self.line_end(self.pos);
        let line = &self.tokens[self.pos..end];
        self.pos = end;
        line
    }

    pub(super) fn diagnose(&mut self, diagnostic: Diagnostic) {
        log::debug!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    fn take_separator(&mut self) -> Option<TokenKind> {
        let mut sep = None;
        while let Some(token) = self.current() {
            if !token.kind.is_separator() {
                break;
            }
            // A blank line anywhere in the run wins.
            if sep != Some(TokenKind::NewlinePlus) {
                sep = Some(token.kind);
            }
            self.pos += 1;
        }
        sep
    }

    fn reconcile_prefix(&mut self, sep: Option<TokenKind>) {
        while let Some(token) = self.current() {
            match token.kind {
                TokenKind::IndentIncrease => self.open_prefix_scope(PrefixUnit::Indent, sep, token),
                TokenKind::BlockquoteIncrease => {
                    self.open_prefix_scope(PrefixUnit::Quote, sep, token)
                }
                TokenKind::IndentDecrease => self.close_prefix_scope(PrefixUnit::Indent, token),
                TokenKind::BlockquoteDecrease => self.close_prefix_scope(PrefixUnit::Quote, token),
                _ => break,
            }
            self.pos += 1;
        }
    }

    fn open_prefix_scope(&mut self, unit: PrefixUnit, sep: Option<TokenKind>, token: &Token) {
        let blank_before = sep == Some(TokenKind::NewlinePlus);
        loop {
            let top = self.scopes.top();
            let close = match top.kind() {
                NodeKind::Item { .. } | NodeKind::CheckItem { .. } => blank_before,
                NodeKind::Admonition { .. } | NodeKind::FootnoteDescribe { .. } => blank_before,
                NodeKind::DefinitionItem => blank_before || unit == PrefixUnit::Quote,
                NodeKind::Reference { .. } => unit == PrefixUnit::Quote,
                _ => !top.holds_blocks(),
            };
            if !close {
                break;
            }
            self.scopes.pop();
        }

        let range = token.range.clone();
        let frame = match (self.scopes.top().kind(), unit) {
            (NodeKind::DefinitionItem, PrefixUnit::Indent) => {
                Frame::new(Node::new(NodeKind::Description, range))
            }
            (NodeKind::Reference { .. }, PrefixUnit::Indent) => {
                let mut frame = Frame::new(Node::new(NodeKind::Indent, range));
                frame.reference_body = true;
                frame
            }
            (_, PrefixUnit::Indent) => Frame::new(Node::new(NodeKind::Indent, range)),
            (_, PrefixUnit::Quote) => Frame::new(Node::new(NodeKind::Blockquote, range)),
        };
        self.scopes.push(frame.opened_by(unit));
    }

    fn close_prefix_scope(&mut self, unit: PrefixUnit, token: &Token) {
        if !self.scopes.pop_opened_by(unit) {
            self.diagnose(
                Diagnostic::warning(
                    token.range.clone(),
                    format!("{} without a matching open scope", token.kind),
                )
                .with_code(codes::UNMATCHED_DEDENT),
            );
        }
    }

    /// Close the frames that cannot continue into a block starting at `token`.
    fn close_ended_blocks(&mut self, sep: Option<TokenKind>, token: &Token) {
        let single_break = sep == Some(TokenKind::Newline);
        loop {
            let close = match self.scopes.top().kind() {
                NodeKind::Item { .. }
                | NodeKind::CheckItem { .. }
                | NodeKind::DefinitionItem
                | NodeKind::Reference { .. } => true,
                NodeKind::List { kind, .. } => {
                    !(single_break && marker_list_kind(token) == Some(*kind))
                }
                NodeKind::DefinitionList => {
                    !(single_break && token.kind == TokenKind::DefinitionMarker)
                }
                NodeKind::Table { .. } => {
                    !(single_break
                        && matches!(token.kind, TokenKind::Pipe | TokenKind::TableSeparator))
                }
                NodeKind::Admonition { .. } | NodeKind::FootnoteDescribe { .. } => {
                    sep == Some(TokenKind::NewlinePlus) || token.kind.starts_block()
                }
                _ => false,
            };
            if !close {
                break;
            }
            self.scopes.pop();
        }
    }

    /// Run the builder for the block at the current token. Returns true for heading lines.
    fn dispatch(&mut self, sep: Option<TokenKind>) -> bool {
        let Some(token) = self.current() else {
            return false;
        };
        match token.kind {
            TokenKind::HeadingMarker => {
                self.heading(sep);
                return true;
            }
            kind if kind.is_list_marker() => self.list_item(),
            TokenKind::Pipe => self.table_row(),
            TokenKind::TableSeparator => self.table_separator(),
            TokenKind::FenceOpen => self.code_block(),
            TokenKind::AdmonitionMarker => self.admonition(),
            TokenKind::FootnoteDefine => self.footnote_define(),
            TokenKind::DefinitionMarker => self.definition_item(),
            TokenKind::ThematicBreak => self.leaf(NodeKind::ThematicBreak),
            TokenKind::PageBreak => self.leaf(NodeKind::PageBreak),
            TokenKind::Include => self.include(),
            _ if self.scopes.top().reference_body => self.reference_entry(),
            TokenKind::Comment if self.line_end(self.pos) == self.pos + 1 => self.block_comment(),
            TokenKind::Annotation if self.line_end(self.pos) == self.pos + 1 => {
                self.block_annotation()
            }
            _ => self.paragraph(),
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::quill::ast::{codes, ListKind, NodeKind};
    use crate::quill::lexing::tokenize;
    use crate::quill::parsing::{parse, parse_str};
    use crate::quill::token::{Token, TokenKind};

    fn top_kinds(source: &str) -> Vec<&'static str> {
        parse_str(source)
            .root
            .children
            .iter()
            .map(|node| node.kind.name())
            .collect()
    }

    #[test]
    fn test_blank_line_separates_paragraphs() {
        assert_eq!(top_kinds("one\ntwo\n\nthree"), vec!["paragraph", "paragraph"]);
    }

    #[test]
    fn test_list_kind_change_splits_lists() {
        let doc = parse_str("- a\n1. b");
        let lists: Vec<_> = doc.root.children.iter().map(|n| n.kind.clone()).collect();
        assert_eq!(
            lists,
            vec![
                NodeKind::List {
                    kind: ListKind::Bullet { weight: 1 },
                    start: 1
                },
                NodeKind::List {
                    kind: ListKind::Numbered,
                    start: 1
                }
            ]
        );
        assert!(doc.root.children.iter().all(|list| list.children.len() == 1));
    }

    #[test]
    fn test_blank_line_ends_a_list() {
        assert_eq!(top_kinds("- a\n- b\n\n- c"), vec!["list", "list"]);
        let doc = parse_str("- a\n- b");
        assert_eq!(doc.root.children[0].children.len(), 2);
    }

    #[test]
    fn test_unmatched_dedent_is_a_diagnostic() {
        let mut tokens = tokenize("a");
        let eos = tokens.len() - 1;
        let range = tokens[eos].range.clone();
        tokens.insert(eos, Token::synthetic(TokenKind::IndentDecrease, range));

        let doc = parse(&tokens);
        assert_eq!(doc.root.children.len(), 1);
        assert_eq!(doc.diagnostics.len(), 1);
        assert_eq!(doc.diagnostics[0].code.as_deref(), Some(codes::UNMATCHED_DEDENT));
    }

    #[test]
    fn test_dedent_returns_to_outer_scope() {
        let doc = parse_str("a\n\tb\nc");
        assert_eq!(top_kinds("a\n\tb\nc"), vec!["paragraph", "indent", "paragraph"]);
        assert!(doc.diagnostics.is_empty());
    }
}
