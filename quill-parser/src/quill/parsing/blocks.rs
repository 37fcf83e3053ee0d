//! Block builders
//!
//!     One method per block construct, called by the block loop with the current token at the
//!     block's first marker. Each builder consumes the tokens of its line (and, for
//!     paragraphs and items, its continuation lines) and either appends a finished node to the
//!     top frame or pushes a new frame that later lines fill in.

use super::inlines::{parse_inlines, Inlines};
use super::parser::{marker_list_kind, Parser};
use super::reference::parse_entry;
use super::scopes::Frame;
use super::table::{apply_separator, build_row, next_row_role};
use crate::quill::ast::{
    codes, Annotation, CheckState, CodeMode, Diagnostic, ListKind, Node, NodeKind, Range,
};
use crate::quill::lexing::tokenize_with_options;
use crate::quill::token::{Token, TokenKind};

fn span(tokens: &[Token]) -> Option<Range> {
    Range::bounding_box(tokens.iter().map(|token| &token.range))
}

impl<'t, 'i> Parser<'t, 'i> {
    /// Tokens of the current line plus every continuation line, leaving the position at the
    /// separator that ends the last one.
    ///
    /// A line continues the previous one when it follows a single `Newline` and starts with
    /// neither a prefix change nor a block marker.
    fn gather_lines(&mut self) -> &'t [Token] {
        let start = self.pos;
        let mut end = self.line_end(start);
        while let (Some(sep), Some(next)) = (self.tokens.get(end), self.tokens.get(end + 1)) {
            let continues = sep.kind == TokenKind::Newline
                && !next.kind.is_prefix()
                && !next.kind.ends_line()
                && !next.kind.starts_block();
            if !continues {
                break;
            }
            end = self.line_end(end + 1);
        }
        self.pos = end;
        &self.tokens[start..end]
    }

    fn top_is_heading(&self) -> Option<(u8, usize)> {
        match self.scopes.top().kind() {
            NodeKind::Heading { weight, .. } => {
                Some((*weight, self.scopes.top().node.children.len()))
            }
            _ => None,
        }
    }

    pub(super) fn heading(&mut self, sep: Option<TokenKind>) {
        let Some(marker) = self.current() else {
            return;
        };
        let weight = marker.size.unwrap_or(1) as u8;
        self.pos += 1;
        let line = self.take_line();

        let subtitle = self.after_heading_line
            && sep == Some(TokenKind::Newline)
            && self.top_is_heading() == Some((weight, 1));
        if subtitle {
            let Inlines {
                nodes, annotations, ..
            } = parse_inlines(line, false);
            let range = span(line).unwrap_or_else(|| marker.range.clone());
            let mut node = Node::new(NodeKind::Subtitle, range).with_children(nodes);
            node.annotations = annotations;
            self.scopes.append(node);
            return;
        }

        while matches!(self.top_is_heading(), Some((open, _)) if open <= weight) {
            self.scopes.pop();
        }

        let Inlines {
            nodes,
            annotations,
            anchor,
        } = parse_inlines(line, true);
        let title_range = span(line).unwrap_or_else(|| marker.range.clone());
        let mut title = Node::new(NodeKind::Title, title_range).with_children(nodes);
        title.annotations = annotations;

        let heading = Node::new(
            NodeKind::Heading { weight, id: anchor },
            marker.range.clone(),
        )
        .with_children(vec![title]);
        self.scopes.push(Frame::new(heading));
    }

    pub(super) fn list_item(&mut self) {
        let Some(marker) = self.current() else {
            return;
        };
        let Some(kind) = marker_list_kind(marker) else {
            return;
        };
        self.pos += 1;

        let open = matches!(
            self.scopes.top().kind(),
            NodeKind::List { kind: open, .. } if *open == kind
        );
        if !open {
            let start = match kind {
                ListKind::Numbered => marker.text.trim().parse().unwrap_or(1),
                _ => 1,
            };
            let list = Node::new(NodeKind::List { kind, start }, marker.range.clone());
            let mut frame = Frame::new(list);
            frame.next_index = start;
            self.scopes.push(frame);
        }

        let list = self.scopes.top_mut();
        let index = list.next_index;
        list.next_index += 1;

        let item_kind = match kind {
            ListKind::Check => NodeKind::CheckItem {
                state: CheckState::from_ordinal(marker.size.unwrap_or(0)),
            },
            _ => NodeKind::Item { index },
        };
        let content = self.gather_lines();
        let Inlines {
            nodes, annotations, ..
        } = parse_inlines(content, false);
        let mut item = Node::new(item_kind, marker.range.clone()).with_children(nodes);
        item.annotations = annotations;
        self.scopes.push(Frame::new(item));
    }

    fn open_table(&mut self, at: &Token) {
        if !matches!(self.scopes.top().kind(), NodeKind::Table { .. }) {
            let table = NodeKind::Table {
                alignments: Vec::new(),
                header_rows: 0,
                footer_start: None,
            };
            self.scopes.push(Frame::new(Node::new(table, at.range.clone())));
        }
    }

    pub(super) fn table_row(&mut self) {
        let Some(pipe) = self.current() else {
            return;
        };
        self.open_table(pipe);
        let line = self.take_line();
        let role = next_row_role(&self.scopes.top().node);
        let row = build_row(line, role);
        self.scopes.append(row);
    }

    pub(super) fn table_separator(&mut self) {
        let Some(separator) = self.current() else {
            return;
        };
        self.open_table(separator);
        self.take_line();
        apply_separator(&mut self.scopes.top_mut().node, &separator.text);
    }

    pub(super) fn code_block(&mut self) {
        let Some(open) = self.current() else {
            return;
        };
        self.pos += 1;
        let mut range = open.range.clone();
        let mut source = String::new();
        if let Some(body) = self.current().filter(|token| token.kind == TokenKind::CodeBody) {
            source = body.text.clone();
            range = range.cover(&body.range);
            self.pos += 1;
        }
        if let Some(close) = self.current().filter(|token| token.kind == TokenKind::FenceClose) {
            range = range.cover(&close.range);
            self.pos += 1;
        }
        let language = Some(open.text.trim())
            .filter(|language| !language.is_empty())
            .map(str::to_string);
        self.scopes.append(Node::new(
            NodeKind::Code {
                mode: CodeMode::Block,
                language,
                source,
            },
            range,
        ));
    }

    /// Push `frame` and, when the marker line carries text, give it a first paragraph.
    fn open_with_paragraph(&mut self, frame: Frame) {
        self.scopes.push(frame);
        if !self.current().is_some_and(|token| token.kind.ends_line()) {
            self.paragraph();
        }
    }

    pub(super) fn admonition(&mut self) {
        let Some(marker) = self.current() else {
            return;
        };
        self.pos += 1;
        let node = Node::new(
            NodeKind::Admonition {
                label: marker.text.clone(),
            },
            marker.range.clone(),
        );
        self.open_with_paragraph(Frame::new(node));
    }

    pub(super) fn footnote_define(&mut self) {
        let Some(marker) = self.current() else {
            return;
        };
        self.pos += 1;
        let id = marker.text.clone();

        if !self.current().is_some_and(|token| token.kind.ends_line()) {
            let node = Node::new(NodeKind::FootnoteDescribe { id }, marker.range.clone());
            self.open_with_paragraph(Frame::new(node));
            return;
        }

        let reference = Node::new(
            NodeKind::Reference {
                id: id.clone(),
                info: Vec::new(),
            },
            marker.range.clone(),
        );
        let has_body = self.current().is_some_and(|token| token.kind.is_separator())
            && self.peek(1).is_some_and(|token| token.kind == TokenKind::IndentIncrease);
        if has_body {
            self.scopes.push(Frame::new(reference));
        } else {
            self.diagnose(
                Diagnostic::warning(
                    marker.range.clone(),
                    format!("reference `{}` has no body", id),
                )
                .with_code(codes::REFERENCE_WITHOUT_BODY),
            );
            self.scopes.append(reference);
        }
    }

    pub(super) fn definition_item(&mut self) {
        let Some(marker) = self.current() else {
            return;
        };
        self.pos += 1;
        if self.scopes.top().kind() != &NodeKind::DefinitionList {
            self.scopes.push(Frame::new(Node::new(
                NodeKind::DefinitionList,
                marker.range.clone(),
            )));
        }
        let line = self.take_line();
        let Inlines {
            nodes, annotations, ..
        } = parse_inlines(line, false);
        let range = span(line).unwrap_or_else(|| marker.range.clone());
        let mut term = Node::new(NodeKind::Term, range).with_children(nodes);
        term.annotations = annotations;
        self.scopes.push(Frame::new(
            Node::new(NodeKind::DefinitionItem, marker.range.clone()).with_children(vec![term]),
        ));
    }

    pub(super) fn leaf(&mut self, kind: NodeKind) {
        let Some(token) = self.current() else {
            return;
        };
        self.take_line();
        self.scopes.append(Node::new(kind, token.range.clone()));
    }

    pub(super) fn include(&mut self) {
        let Some(token) = self.current() else {
            return;
        };
        self.take_line();
        let path = token.text.clone();
        let mut node = Node::new(NodeKind::Include { path: path.clone() }, token.range.clone());

        let Some(context) = &self.include else {
            log::debug!("no include context, leaving `{}` unresolved", path);
            self.scopes.append(node);
            return;
        };

        match context.enter(&path, self.options.max_include_depth) {
            Ok((source, inner)) => {
                log::debug!("including `{}` at depth {}", path, inner.depth());
                let tokens = tokenize_with_options(&source, self.options.lexer.clone());
                let included =
                    Parser::with_context(&tokens, self.options.clone(), Some(inner)).parse();
                let (root, diagnostics) = included.into_parts();
                node.children = root.children;
                let source = format!("quill-parser:{}", path);
                self.diagnostics.extend(
                    diagnostics
                        .into_iter()
                        .map(|diagnostic| diagnostic.with_source(source.clone())),
                );
            }
            Err(error) => {
                self.diagnose(
                    Diagnostic::error(token.range.clone(), error.to_string())
                        .with_code(codes::INCLUDE_FAILED),
                );
            }
        }
        self.scopes.append(node);
    }

    pub(super) fn reference_entry(&mut self) {
        let line = self.take_line();
        let Some(range) = span(line) else {
            return;
        };
        let accepted = match parse_entry(line) {
            Some(entry) => self.scopes.append_reference_entry(entry),
            None => false,
        };
        if !accepted {
            self.diagnose(
                Diagnostic::warning(range, "reference entry is not `key: value`, skipped")
                    .with_code(codes::MALFORMED_REFERENCE_ENTRY),
            );
        }
    }

    pub(super) fn block_comment(&mut self) {
        let Some(token) = self.current() else {
            return;
        };
        self.pos += 1;
        self.scopes.append(Node::new(
            NodeKind::Comment(token.text.clone()),
            token.range.clone(),
        ));
    }

    pub(super) fn block_annotation(&mut self) {
        let Some(token) = self.current() else {
            return;
        };
        self.pos += 1;
        match Annotation::parse(&token.text) {
            Some(annotation) => self.scopes.top_mut().node.annotations.push(annotation),
            None => self.diagnose(
                Diagnostic::warning(token.range.clone(), "annotation is not `key: value`")
                    .with_code(codes::MALFORMED_ANNOTATION),
            ),
        }
    }

    pub(super) fn paragraph(&mut self) {
        let content = self.gather_lines();
        let Some(range) = span(content) else {
            return;
        };
        let Inlines {
            nodes, annotations, ..
        } = parse_inlines(content, false);

        if nodes.is_empty() {
            self.scopes.top_mut().node.annotations.extend(annotations);
            return;
        }

        let mut paragraph = Node::new(NodeKind::Paragraph, range).with_children(nodes);
        paragraph.annotations = annotations;
        self.scopes.append(promote_view(paragraph));
    }
}

/// A paragraph holding nothing but a view (and comments) becomes the view itself.
fn promote_view(mut paragraph: Node) -> Node {
    let is_filler = |child: &Node| {
        child.is_comment() || matches!(&child.kind, NodeKind::Text(text) if text.trim().is_empty())
    };
    let mut views = paragraph.children.iter().filter(|child| !is_filler(*child));
    let single_view = matches!(
        (views.next(), views.next()),
        (Some(Node { kind: NodeKind::View { .. }, .. }), None)
    );
    if !single_view {
        return paragraph;
    }

    let (comments, mut view): (Vec<Node>, Vec<Node>) = paragraph
        .children
        .drain(..)
        .filter(|child| child.is_comment() || !is_filler(child))
        .partition(|child| child.is_comment());
    match view.pop() {
        Some(mut view) => {
            view.children = comments;
            view.annotations.append(&mut paragraph.annotations);
            view.range = paragraph.range;
            view
        }
        None => paragraph,
    }
}
