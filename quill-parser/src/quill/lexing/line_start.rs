//! Line-start scanning
//!
//!     Runs once per non-blank line. The prefix is read and diffed against the remembered one,
//!     then the markers below are tried in order. At most one marker is emitted per line; the
//!     rest of the line is left to the inline scan. A marker that does not match leaves the
//!     position untouched, so failing is always a backtrack to inline text.
//!
//!         heading       `>`, `>>`, `>>>` followed by a space
//!         include       `<<path>>` alone on the line
//!         breaks        `***` (thematic) and `+++` (page) alone on the line
//!         fence         `---` (three or more) with an optional language word
//!         table         a separator row, or a leading `|`
//!         check         `[ ] `, `[x] `, `[-] `
//!         bullet        `- `, `+ `, `* `
//!         number        digits followed by `. `
//!         definition    `: `
//!         footnote      `^[id]:`
//!         admonition    `<word>` for a known admonition word

use super::common::{is_admonition_keyword, TABLE_SEPARATOR};
use super::lexer::Lexer;
use super::prefix;
use crate::quill::token::TokenKind;

impl<'a> Lexer<'a> {
    pub(super) fn scan_line_start(&mut self) {
        let start = self.pos;
        let (units, after) = prefix::read_prefix(self.bytes, start, self.options.spaces_per_indent);
        self.reconcile_prefix(units, start, after);
        self.pos = after;

        let matched = self.try_heading()
            || self.try_include()
            || self.try_break(b'*', TokenKind::ThematicBreak)
            || self.try_break(b'+', TokenKind::PageBreak)
            || self.try_fence()
            || self.try_table_row()
            || self.try_check()
            || self.try_bullet()
            || self.try_number()
            || self.try_definition()
            || self.try_footnote_define()
            || self.try_admonition();

        if matched {
            if let Some(token) = self.last_token() {
                log::trace!("line-start marker {}", token);
            }
        }
    }

    /// The rest of the current line, without the line break and trailing whitespace.
    fn line_rest(&self) -> &'a str {
        let end = self.line_end_from(self.pos);
        self.slice(self.pos, end).trim_end()
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.bytes.get(pos).copied()
    }

    fn try_heading(&mut self) -> bool {
        let weight = self.bytes[self.pos..]
            .iter()
            .take_while(|b| **b == b'>')
            .count();
        if !(1..=3).contains(&weight) || self.byte_at(self.pos + weight) != Some(b' ') {
            return false;
        }
        let start = self.pos;
        let marker = self.slice(start, start + weight);
        self.pos += weight + 1;
        self.emit(TokenKind::HeadingMarker, start, self.pos, marker, Some(weight as u32));
        true
    }

    fn try_include(&mut self) -> bool {
        let line = self.line_rest();
        let Some(inner) = line
            .strip_prefix("<<")
            .and_then(|rest| rest.strip_suffix(">>"))
        else {
            return false;
        };
        let path = inner.trim();
        if path.is_empty() || path.contains('>') || path.contains('<') {
            return false;
        }
        let start = self.pos;
        self.pos += line.len();
        self.emit(TokenKind::Include, start, self.pos, path, None);
        true
    }

    fn try_break(&mut self, glyph: u8, kind: TokenKind) -> bool {
        let line = self.line_rest();
        if line.len() != 3 || !line.bytes().all(|b| b == glyph) {
            return false;
        }
        let start = self.pos;
        self.pos += 3;
        self.emit(kind, start, self.pos, line, None);
        true
    }

    /// Fenced code: opening fence, verbatim body, and the closing fence when present.
    fn try_fence(&mut self) -> bool {
        let count = self.bytes[self.pos..]
            .iter()
            .take_while(|b| **b == b'-')
            .count();
        if count < 3 {
            return false;
        }

        let open_start = self.pos;
        let open_end = self.line_end_from(open_start);
        if open_end >= self.bytes.len() {
            // A fence needs a line break after it.
            return false;
        }
        let language = self.slice(open_start + count, open_end).trim();
        if !language.is_empty() && !is_language_word(language) {
            return false;
        }

        let fence_prefix = self.prefix.clone();
        let width = self.options.spaces_per_indent;
        let mut lines: Vec<&'a str> = Vec::new();
        let mut line_start = open_end + 1;
        let mut close = None;

        while line_start < self.bytes.len() {
            let line_end = self.line_end_from(line_start);
            let (content_start, complete) =
                prefix::strip_units(self.bytes, line_start, &fence_prefix, width);
            let content = self.slice(content_start, line_end);
            let dashes = content.trim_end();
            if complete && dashes.len() == count && dashes.bytes().all(|b| b == b'-') {
                close = Some((content_start, content_start + count));
                break;
            }
            lines.push(content.strip_suffix('\r').unwrap_or(content));
            if line_end >= self.bytes.len() {
                line_start = line_end;
                break;
            }
            line_start = line_end + 1;
        }

        if lines.first().is_some_and(|line| line.trim().is_empty()) {
            lines.remove(0);
        }
        if lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
        let body = lines.join("\n");

        self.emit(
            TokenKind::FenceOpen,
            open_start,
            open_end,
            language,
            Some(count as u32),
        );
        let body_start = open_end + 1;
        match close {
            Some((close_start, close_end)) => {
                let body_end = close_start.max(body_start);
                self.emit(TokenKind::CodeBody, body_start, body_end, &body, None);
                let dashes = self.slice(close_start, close_end);
                self.emit(TokenKind::FenceClose, close_start, close_end, dashes, None);
                self.pos = self.line_end_from(close_end);
            }
            None => {
                log::debug!("fence opened at byte {} runs to end of input", open_start);
                let body_end = line_start.max(body_start).min(self.bytes.len());
                self.emit(TokenKind::CodeBody, body_start, body_end, &body, None);
                self.pos = self.bytes.len();
            }
        }
        true
    }

    fn try_table_row(&mut self) -> bool {
        if self.byte_at(self.pos) != Some(b'|') {
            return false;
        }
        let line = self.line_rest();
        let start = self.pos;
        if TABLE_SEPARATOR.is_match(line) {
            self.pos += line.len();
            self.emit(TokenKind::TableSeparator, start, self.pos, line, None);
        } else {
            self.in_table_row = true;
            self.pos += 1;
            self.emit(TokenKind::Pipe, start, self.pos, "|", None);
        }
        true
    }

    fn try_check(&mut self) -> bool {
        let rest = &self.bytes[self.pos..];
        if rest.len() < 4 || rest[0] != b'[' || rest[2] != b']' || rest[3] != b' ' {
            return false;
        }
        let state = match rest[1] {
            b' ' => 0,
            b'x' | b'X' => 1,
            b'-' => 2,
            _ => return false,
        };
        let start = self.pos;
        let marker = self.slice(start, start + 3);
        self.pos += 4;
        self.emit(TokenKind::CheckMarker, start, self.pos, marker, Some(state));
        true
    }

    fn try_bullet(&mut self) -> bool {
        let weight = match self.byte_at(self.pos) {
            Some(b'-') => 1,
            Some(b'+') => 2,
            Some(b'*') => 3,
            _ => return false,
        };
        if self.byte_at(self.pos + 1) != Some(b' ') {
            return false;
        }
        let start = self.pos;
        let marker = self.slice(start, start + 1);
        self.pos += 2;
        self.emit(TokenKind::BulletMarker, start, self.pos, marker, Some(weight));
        true
    }

    fn try_number(&mut self) -> bool {
        let digits = self.bytes[self.pos..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0
            || self.byte_at(self.pos + digits) != Some(b'.')
            || self.byte_at(self.pos + digits + 1) != Some(b' ')
        {
            return false;
        }
        let start = self.pos;
        let number = self.slice(start, start + digits);
        self.pos += digits + 2;
        self.emit(TokenKind::NumberMarker, start, self.pos, number, None);
        true
    }

    fn try_definition(&mut self) -> bool {
        if self.byte_at(self.pos) != Some(b':') || self.byte_at(self.pos + 1) != Some(b' ') {
            return false;
        }
        let start = self.pos;
        self.pos += 2;
        self.emit(TokenKind::DefinitionMarker, start, self.pos, ":", None);
        true
    }

    fn try_footnote_define(&mut self) -> bool {
        let rest = self.slice(self.pos, self.bytes.len());
        let Some(inner) = rest.strip_prefix("^[") else {
            return false;
        };
        let Some(close) = inner.find(']') else {
            return false;
        };
        let id = &inner[..close];
        if !is_reference_id(id) || !inner[close + 1..].starts_with(':') {
            return false;
        }
        let start = self.pos;
        let mut end = start + 2 + close + 2;
        if self.byte_at(end) == Some(b' ') {
            end += 1;
        }
        self.pos = end;
        self.emit(TokenKind::FootnoteDefine, start, end, id, None);
        true
    }

    fn try_admonition(&mut self) -> bool {
        let rest = self.slice(self.pos, self.bytes.len());
        let Some(inner) = rest.strip_prefix('<') else {
            return false;
        };
        let Some(close) = inner.find('>') else {
            return false;
        };
        let word = &inner[..close];
        if !is_admonition_keyword(word) {
            return false;
        }
        let start = self.pos;
        let mut end = start + close + 2;
        match self.byte_at(end) {
            Some(b' ') => end += 1,
            None | Some(b'\n') => {}
            Some(_) => return false,
        }
        self.pos = end;
        self.emit(TokenKind::AdmonitionMarker, start, end, word, None);
        true
    }
}

fn is_language_word(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '#' | '.'))
}

/// Footnote and reference identifiers.
pub(super) fn is_reference_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}

#[cfg(test)]
mod tests {
    use crate::quill::lexing::tokenize;
    use crate::quill::token::{Token, TokenKind};

    fn first_content(source: &str) -> Token {
        tokenize(source)
            .into_iter()
            .find(|t| !t.kind.is_prefix())
            .unwrap()
    }

    #[test]
    fn test_heading_weight() {
        let token = first_content(">> Title");
        assert_eq!(token.kind, TokenKind::HeadingMarker);
        assert_eq!(token.size, Some(2));
        assert_eq!(token.text, ">>");

        assert_eq!(first_content(">>>> deep").kind, TokenKind::Text);
        assert_eq!(first_content(">no space").kind, TokenKind::Text);
    }

    #[test]
    fn test_list_markers() {
        let bullet = first_content("+ item");
        assert_eq!(bullet.kind, TokenKind::BulletMarker);
        assert_eq!(bullet.size, Some(2));

        let number = first_content("12. item");
        assert_eq!(number.kind, TokenKind::NumberMarker);
        assert_eq!(number.text, "12");

        let check = first_content("[-] dropped");
        assert_eq!(check.kind, TokenKind::CheckMarker);
        assert_eq!(check.size, Some(2));
    }

    #[test]
    fn test_fence_captures_body_verbatim() {
        let tokens = tokenize("---rust\n\nfn main() {\n    *x*\n}\n\n---\nafter");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            &kinds[..4],
            &[
                TokenKind::FenceOpen,
                TokenKind::CodeBody,
                TokenKind::FenceClose,
                TokenKind::Newline
            ]
        );
        assert_eq!(tokens[0].text, "rust");
        assert_eq!(tokens[0].size, Some(3));
        assert_eq!(tokens[1].text, "fn main() {\n    *x*\n}");
    }

    #[test]
    fn test_fence_needs_matching_count_to_close() {
        let tokens = tokenize("----\na\n---\nb\n----");
        assert_eq!(tokens[1].text, "a\n---\nb");
        assert_eq!(tokens[2].kind, TokenKind::FenceClose);
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let tokens = tokenize("---\ncode");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::FenceOpen, TokenKind::CodeBody, TokenKind::EndOfStream]
        );
        assert_eq!(tokens[1].text, "code");
    }

    #[test]
    fn test_failed_fence_is_em_dash() {
        assert_eq!(first_content("--- not a fence").kind, TokenKind::EmDash);
        assert_eq!(first_content("---").kind, TokenKind::EmDash);
    }

    #[test]
    fn test_table_rows() {
        let tokens = tokenize("| a | b |\n|:--|--:|");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Pipe,
                TokenKind::Text,
                TokenKind::Pipe,
                TokenKind::Text,
                TokenKind::Pipe,
                TokenKind::Newline,
                TokenKind::TableSeparator,
                TokenKind::EndOfStream
            ]
        );
    }

    #[test]
    fn test_footnote_define_and_admonition() {
        let define = first_content("^[smith]: see page 4");
        assert_eq!(define.kind, TokenKind::FootnoteDefine);
        assert_eq!(define.text, "smith");

        let note = first_content("<warning> hot");
        assert_eq!(note.kind, TokenKind::AdmonitionMarker);
        assert_eq!(note.text, "warning");

        assert_ne!(first_content("<banana> no").kind, TokenKind::AdmonitionMarker);
    }

    #[test]
    fn test_include_and_breaks() {
        let include = first_content("<<chapters/one.qd>>");
        assert_eq!(include.kind, TokenKind::Include);
        assert_eq!(include.text, "chapters/one.qd");

        assert_eq!(first_content("***").kind, TokenKind::ThematicBreak);
        assert_eq!(first_content("+++").kind, TokenKind::PageBreak);
    }
}
