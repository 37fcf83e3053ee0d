//! Table rows and separators
//!
//!     A row is the tokens of one line split on `Pipe`. A leading pipe opens the row and a
//!     trailing pipe is optional; every segment in between is a cell, parsed inline and trimmed.
//!
//!     Separator rows decide row roles after the fact. The first separator fixes the column
//!     alignments and turns every row above it into a header row. A second separator marks the
//!     start of the footer: rows below it are footer rows. Without any separator every row is
//!     a content row.

use super::inlines::parse_inlines;
use crate::quill::ast::{Alignment, Node, NodeKind, Range, RowRole};
use crate::quill::token::{Token, TokenKind};

/// Alignment of one separator cell: `:--` left, `--:` right, `:-:` center, `--` none.
pub fn cell_alignment(cell: &str) -> Alignment {
    let cell = cell.trim();
    match (cell.starts_with(':'), cell.ends_with(':') && cell.len() > 1) {
        (true, true) => Alignment::Center,
        (true, false) => Alignment::Left,
        (false, true) => Alignment::Right,
        (false, false) => Alignment::None,
    }
}

/// Column alignments of a separator row such as `|:--|:-:|--:|`.
pub fn parse_alignments(row: &str) -> Vec<Alignment> {
    let inner = row.trim();
    let inner = inner.strip_prefix('|').unwrap_or(inner);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(cell_alignment).collect()
}

/// Build a row from the tokens of one line, starting at its leading pipe.
pub fn build_row(tokens: &[Token], role: RowRole) -> Node {
    let mut cells = Vec::new();
    let mut segment_start = 1;

    for (index, token) in tokens.iter().enumerate().skip(1) {
        if token.kind == TokenKind::Pipe {
            cells.push(build_cell(&tokens[segment_start..index], &tokens[index - 1]));
            segment_start = index + 1;
        }
    }

    let tail = &tokens[segment_start.min(tokens.len())..];
    let tail_has_content = tail
        .iter()
        .any(|token| !(token.kind == TokenKind::Text && token.text.trim().is_empty()));
    if let (true, Some(last)) = (tail_has_content, tail.last()) {
        cells.push(build_cell(tail, last));
    }

    let range = tokens
        .first()
        .map(|first| match tokens.last() {
            Some(last) => first.range.cover(&last.range),
            None => first.range.clone(),
        })
        .unwrap_or_default();
    Node::new(NodeKind::Row { role }, range).with_children(cells)
}

fn build_cell(tokens: &[Token], fallback: &Token) -> Node {
    let inlines = parse_inlines(tokens, false);
    let range = Range::bounding_box(tokens.iter().map(|token| &token.range))
        .unwrap_or_else(|| fallback.range.clone());
    let mut cell = Node::new(NodeKind::Cell, range).with_children(inlines.nodes);
    cell.annotations = inlines.annotations;
    cell
}

/// Apply a separator row to an open table node.
pub fn apply_separator(table: &mut Node, separator: &str) {
    let rows = table.children.len();
    let NodeKind::Table {
        alignments,
        header_rows,
        footer_start,
    } = &mut table.kind
    else {
        return;
    };

    if alignments.is_empty() {
        *alignments = parse_alignments(separator);
        *header_rows = rows;
        for row in table.children.iter_mut() {
            row.kind = NodeKind::Row {
                role: RowRole::Header,
            };
        }
        log::trace!("table header boundary after {} rows", rows);
    } else if footer_start.is_none() {
        *footer_start = Some(rows);
        log::trace!("table footer starts at row {}", rows);
    }
}

/// Role for the next row appended to `table`.
pub fn next_row_role(table: &Node) -> RowRole {
    match &table.kind {
        NodeKind::Table {
            footer_start: Some(_),
            ..
        } => RowRole::Footer,
        _ => RowRole::Content,
    }
}
