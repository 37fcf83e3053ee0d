//! The lexer instance: scan state, newline runs and token emission.
//!
//!     The scan alternates between two modes. Line-start mode runs at offset zero and right
//!     after every newline run: it consumes the prefix, emits scope changes, and tries the
//!     line-start markers (see [line_start](super::line_start)). Inline mode consumes the rest
//!     of the line one glyph at a time (see [inline](super::inline)).
//!
//!     All state lives in the instance and is discarded with it: the previous line's prefix,
//!     whether the current line is a table row, and the tokens emitted so far (used for one
//!     token of lookback).

use super::common::LexerOptions;
use super::prefix::{self, PrefixUnit};
use crate::quill::ast::range::{LineIndex, Range};
use crate::quill::token::{Token, TokenKind};

pub struct Lexer<'a> {
    pub(super) source: &'a str,
    pub(super) bytes: &'a [u8],
    pub(super) pos: usize,
    pub(super) options: LexerOptions,
    pub(super) prefix: Vec<PrefixUnit>,
    pub(super) in_table_row: bool,
    lines: LineIndex,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, LexerOptions::default())
    }

    pub fn with_options(source: &'a str, options: LexerOptions) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            options,
            prefix: Vec::new(),
            in_table_row: false,
            lines: LineIndex::new(source),
            tokens: Vec::new(),
        }
    }

    /// Run the scan to completion. Never fails: unknown input degrades to text.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut at_line_start = true;

        while self.pos < self.bytes.len() {
            if at_line_start {
                at_line_start = false;
                if self.blank_line_at(self.pos) {
                    self.skip_to_line_end();
                    continue;
                }
                self.scan_line_start();
                continue;
            }

            if self.bytes[self.pos] == b'\n' {
                self.scan_newline_run();
                at_line_start = true;
            } else {
                self.scan_inline();
            }
        }

        self.finish();
        log::trace!("lexed {} tokens", self.tokens.len());
        self.tokens
    }

    pub(super) fn blank_line_at(&self, pos: usize) -> bool {
        prefix::line_is_blank(self.bytes, pos, self.options.spaces_per_indent)
    }

    /// Offset of the next `\n` at or after `pos`, or the end of the source.
    pub(super) fn line_end_from(&self, pos: usize) -> usize {
        self.bytes[pos..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|offset| pos + offset)
            .unwrap_or(self.bytes.len())
    }

    fn skip_to_line_end(&mut self) {
        self.pos = self.line_end_from(self.pos);
    }

    /// Collapse a run of line breaks (and the blank lines between them) into one separator.
    fn scan_newline_run(&mut self) {
        let start = self.pos;
        let mut count = 1u32;
        self.pos += 1;

        while self.blank_line_at(self.pos) {
            let end = self.line_end_from(self.pos);
            if end < self.bytes.len() {
                count += 1;
                self.pos = end + 1;
            } else {
                self.pos = end;
                break;
            }
        }

        let kind = if count == 1 {
            TokenKind::Newline
        } else {
            TokenKind::NewlinePlus
        };
        self.in_table_row = false;
        let run = self.slice(start, self.pos);
        self.emit(kind, start, self.pos, run, Some(count));
    }

    /// Emit the scope changes between the remembered prefix and `units`.
    pub(super) fn reconcile_prefix(&mut self, units: Vec<PrefixUnit>, start: usize, end: usize) {
        for kind in prefix::diff(&self.prefix, &units) {
            log::trace!("prefix change {} at {}", kind, start);
            self.emit_synthetic(kind, start, end);
        }
        self.prefix = units;
    }

    fn finish(&mut self) {
        let end = self.bytes.len();
        let closing = prefix::diff(&self.prefix, &[]);
        for kind in closing {
            self.emit_synthetic(kind, end, end);
        }
        self.prefix.clear();
        self.emit_synthetic(TokenKind::EndOfStream, end, end);
    }

    /// Source text between two offsets, borrowed from the input rather than the lexer.
    pub(super) fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    pub(super) fn range(&self, start: usize, end: usize) -> Range {
        self.lines.range(start..end)
    }

    pub(super) fn emit(
        &mut self,
        kind: TokenKind,
        start: usize,
        end: usize,
        text: &str,
        size: Option<u32>,
    ) {
        let mut token = Token::new(kind, self.range(start, end), text);
        token.size = size;
        self.tokens.push(token);
    }

    pub(super) fn emit_synthetic(&mut self, kind: TokenKind, start: usize, end: usize) {
        let token = Token::synthetic(kind, self.range(start, end));
        self.tokens.push(token);
    }

    /// Append text, extending the previous text token when it ends exactly at `start`.
    pub(super) fn push_text(&mut self, start: usize, end: usize, text: &str) {
        if let Some(last) = self.tokens.last_mut() {
            if last.kind == TokenKind::Text && last.range.span.end == start {
                last.text.push_str(text);
                last.range = last.range.cover(&self.lines.range(start..end));
                return;
            }
        }
        self.emit(TokenKind::Text, start, end, text, None);
    }

    pub(super) fn last_token(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// The character ending right before `pos`, if any.
    pub(super) fn char_before(&self, pos: usize) -> Option<char> {
        self.source[..pos].chars().next_back()
    }

    pub(super) fn char_at(&self, pos: usize) -> Option<char> {
        self.source.get(pos..).and_then(|rest| rest.chars().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input_is_just_end_of_stream() {
        assert_eq!(kinds(""), vec![TokenKind::EndOfStream]);
    }

    #[test]
    fn test_blank_run_collapses_to_one_separator() {
        let tokens = Lexer::new("a\n\n\n\nb").tokenize();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Text,
                TokenKind::NewlinePlus,
                TokenKind::Text,
                TokenKind::EndOfStream
            ]
        );
        assert_eq!(tokens[1].size, Some(4));
    }

    #[test]
    fn test_whitespace_only_lines_join_the_run() {
        assert_eq!(
            kinds("a\n   \t\nb"),
            vec![
                TokenKind::Text,
                TokenKind::NewlinePlus,
                TokenKind::Text,
                TokenKind::EndOfStream
            ]
        );
    }

    #[test]
    fn test_open_scopes_close_at_end_of_stream() {
        assert_eq!(
            kinds("a\n\t/ b"),
            vec![
                TokenKind::Text,
                TokenKind::Newline,
                TokenKind::IndentIncrease,
                TokenKind::BlockquoteIncrease,
                TokenKind::Text,
                TokenKind::BlockquoteDecrease,
                TokenKind::IndentDecrease,
                TokenKind::EndOfStream
            ]
        );
    }

    #[test]
    fn test_token_ranges_carry_line_and_column() {
        let tokens = Lexer::new("one\ntwo").tokenize();
        assert_eq!(tokens[2].text, "two");
        assert_eq!(tokens[2].range.start.line, 1);
        assert_eq!(tokens[2].range.start.column, 0);
        assert_eq!(tokens[2].range.span, 4..7);
    }
}
