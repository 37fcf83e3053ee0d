//! Inline scanning
//!
//!     Consumes one glyph (see [glyphs](super::glyphs)) and emits at most one token for it.
//!     Capture tokens look ahead on the current line only: resources and labels up to their
//!     matching unescaped closer, date/times and emoji up to their closing delimiter, comments
//!     and annotations up to the end of the line. When a capture does not complete, the opening
//!     glyph is emitted as text and scanning resumes right after it.

use super::common::{is_anchor_id, DATE_TIME, EMOJI_SHORTCODE};
use super::glyphs::{next_glyph, Glyph};
use super::lexer::Lexer;
use crate::quill::token::TokenKind;

impl<'a> Lexer<'a> {
    pub(super) fn scan_inline(&mut self) {
        let start = self.pos;
        let rest = self.slice(start, self.bytes.len());
        let Some((glyph, len)) = next_glyph(rest) else {
            self.pos = self.bytes.len();
            return;
        };
        let end = start + len;
        let literal = self.slice(start, end);

        match glyph {
            Glyph::Newline => return,
            Glyph::Plain => self.push_text(start, end, literal),
            Glyph::Star => self.emit(TokenKind::Star, start, end, literal, None),
            Glyph::Underscore => self.emit(TokenKind::Underscore, start, end, literal, None),
            Glyph::DoubleUnderscore => {
                self.emit(TokenKind::DoubleUnderscore, start, end, literal, None)
            }
            Glyph::Backtick => self.emit(TokenKind::Backtick, start, end, literal, None),
            Glyph::DoubleEquals => self.emit(TokenKind::Highlight, start, end, literal, None),
            Glyph::Caret => self.emit(TokenKind::Caret, start, end, literal, None),
            Glyph::Ampersand => self.emit(TokenKind::Ampersand, start, end, literal, None),
            Glyph::Bang => self.emit(TokenKind::Bang, start, end, literal, None),
            Glyph::AddedOpen => self.emit(TokenKind::AddedOpen, start, end, literal, None),
            Glyph::AddedClose => self.emit(TokenKind::AddedClose, start, end, literal, None),
            Glyph::RemovedOpen => self.emit(TokenKind::RemovedOpen, start, end, literal, None),
            Glyph::RemovedClose => self.emit(TokenKind::RemovedClose, start, end, literal, None),
            Glyph::OpenBrace => {
                if self.try_anchor(start) {
                    return;
                }
                self.push_text(start, end, literal);
            }
            Glyph::OpenBracket => {
                if self.try_capture(start, '[', ']', TokenKind::Resource) {
                    return;
                }
                self.push_text(start, end, literal);
            }
            Glyph::OpenParen => {
                let follows_target = self.last_token().is_some_and(|token| {
                    matches!(token.kind, TokenKind::Resource | TokenKind::Caret)
                        && token.range.span.end == start
                });
                if follows_target && self.try_capture(start, '(', ')', TokenKind::Label) {
                    return;
                }
                self.push_text(start, end, literal);
            }
            Glyph::OpenAngle => {
                if self.try_date_time(start) {
                    return;
                }
                self.push_text(start, end, literal);
            }
            Glyph::Colon => {
                if self.try_emoji(start) {
                    return;
                }
                self.emit(TokenKind::Colon, start, end, literal, None);
            }
            Glyph::Tilde => {
                if self.bytes.get(end) == Some(&b' ') {
                    let line_end = self.line_end_from(end);
                    let body = self.slice(end + 1, line_end).trim();
                    self.emit(TokenKind::Comment, start, line_end, body, None);
                    self.pos = line_end;
                    return;
                }
                self.push_text(start, end, literal);
            }
            Glyph::AnnotationMark => {
                if self.try_annotation(start, end) {
                    return;
                }
                self.push_text(start, end, literal);
            }
            Glyph::SingleQuote => {
                let kind = if self.quote_opens(start, TokenKind::DoubleQuoteOpen) {
                    TokenKind::SingleQuoteOpen
                } else {
                    TokenKind::SingleQuoteClose
                };
                self.emit(kind, start, end, literal, None);
            }
            Glyph::DoubleQuote => {
                let kind = if self.quote_opens(start, TokenKind::SingleQuoteOpen) {
                    TokenKind::DoubleQuoteOpen
                } else {
                    TokenKind::DoubleQuoteClose
                };
                self.emit(kind, start, end, literal, None);
            }
            Glyph::Dashes => match len {
                1 => self.emit(TokenKind::Hyphen, start, end, literal, None),
                2 => self.emit(TokenKind::EnDash, start, end, literal, None),
                3 => self.emit(TokenKind::EmDash, start, end, literal, None),
                _ => self.push_text(start, end, literal),
            },
            Glyph::At => {
                if self.try_tag(start, TokenKind::AccountTag) {
                    return;
                }
                self.push_text(start, end, literal);
            }
            Glyph::Hash => {
                if self.try_tag(start, TokenKind::HashTag) {
                    return;
                }
                self.push_text(start, end, literal);
            }
            Glyph::Backslash => match self.char_at(end).filter(|c| *c != '\n') {
                Some(escaped) => {
                    let escaped_end = end + escaped.len_utf8();
                    let text = self.slice(end, escaped_end);
                    self.push_text(start, escaped_end, text);
                    self.pos = escaped_end;
                    return;
                }
                None => self.push_text(start, end, literal),
            },
            Glyph::Pipe => {
                if self.in_table_row {
                    self.emit(TokenKind::Pipe, start, end, literal, None);
                } else {
                    self.push_text(start, end, literal);
                }
            }
        }

        self.pos = end;
    }

    /// A quote mark opens at buffer start, after whitespace, or right after an opening mark of
    /// the other family.
    fn quote_opens(&self, start: usize, other_open: TokenKind) -> bool {
        match self.char_before(start) {
            None | Some(' ') | Some('\t') | Some('\n') => true,
            Some(_) => self
                .last_token()
                .is_some_and(|token| token.kind == other_open && token.range.span.end == start),
        }
    }

    /// `{id}` heading anchors.
    fn try_anchor(&mut self, start: usize) -> bool {
        let line_end = self.line_end_from(start);
        let line = self.slice(start + 1, line_end);
        let Some(close) = line.find('}') else {
            return false;
        };
        let id = &line[..close];
        if !is_anchor_id(id) {
            return false;
        }
        let end = start + 1 + close + 1;
        self.emit(TokenKind::Anchor, start, end, id, None);
        self.pos = end;
        true
    }

    /// Bracketed captures: nested pairs are kept, `\x` yields `x`, and the capture must close on
    /// the same line with non-empty contents.
    fn try_capture(&mut self, start: usize, open: char, close: char, kind: TokenKind) -> bool {
        let line_end = self.line_end_from(start);
        let inner = self.slice(start + 1, line_end);
        let mut contents = String::new();
        let mut depth = 1usize;
        let mut chars = inner.char_indices();
        let mut end = None;

        while let Some((offset, c)) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some((_, escaped)) => contents.push(escaped),
                    None => contents.push(c),
                }
            } else if c == open {
                depth += 1;
                contents.push(c);
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    end = Some(start + 1 + offset + c.len_utf8());
                    break;
                }
                contents.push(c);
            } else {
                contents.push(c);
            }
        }

        match end {
            Some(end) if !contents.trim().is_empty() => {
                self.emit(kind, start, end, &contents, None);
                self.pos = end;
                true
            }
            _ => false,
        }
    }

    fn try_date_time(&mut self, start: usize) -> bool {
        let line_end = self.line_end_from(start);
        let line = self.slice(start + 1, line_end);
        let Some(close) = line.find('>') else {
            return false;
        };
        let literal = &line[..close];
        if !DATE_TIME.is_match(literal) {
            return false;
        }
        let end = start + 1 + close + 1;
        self.emit(TokenKind::DateTime, start, end, literal, None);
        self.pos = end;
        true
    }

    fn try_emoji(&mut self, start: usize) -> bool {
        let line_end = self.line_end_from(start);
        let line = self.slice(start + 1, line_end);
        let Some(close) = line.find(':') else {
            return false;
        };
        let shortcode = &line[..close];
        if !EMOJI_SHORTCODE.is_match(shortcode) {
            return false;
        }
        let end = start + 1 + close + 1;
        self.emit(TokenKind::Emoji, start, end, shortcode, None);
        self.pos = end;
        true
    }

    /// `~~ key: value` through the end of the line.
    fn try_annotation(&mut self, start: usize, body_start: usize) -> bool {
        let line_end = self.line_end_from(body_start);
        let body = self.slice(body_start, line_end).trim();
        let Some((key, _)) = body.split_once(':') else {
            return false;
        };
        if key.trim().is_empty() {
            return false;
        }
        self.emit(TokenKind::Annotation, start, line_end, body, None);
        self.pos = line_end;
        true
    }

    /// `@name` and `#name`, only at the start of a word.
    fn try_tag(&mut self, start: usize, kind: TokenKind) -> bool {
        if self
            .char_before(start)
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            return false;
        }
        let name_start = start + 1;
        let rest = self.slice(name_start, self.bytes.len());
        let mut name_len = rest
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || matches!(c, '_' | '-')))
            .map(|(offset, _)| offset)
            .unwrap_or(rest.len());
        while name_len > 0 && rest.as_bytes()[name_len - 1] == b'-' {
            name_len -= 1;
        }
        let name = &rest[..name_len];
        if !name.chars().next().is_some_and(char::is_alphanumeric) {
            return false;
        }
        let end = name_start + name_len;
        self.emit(kind, start, end, name, None);
        self.pos = end;
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::quill::lexing::tokenize;
    use crate::quill::token::TokenKind;

    fn lex(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .into_iter()
            .filter(|t| t.kind != TokenKind::EndOfStream)
            .map(|t| (t.kind, t.text))
            .collect()
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|(kind, _)| kind).collect()
    }

    #[test]
    fn test_adjacent_text_is_merged() {
        assert_eq!(lex("a=b+c"), vec![(TokenKind::Text, "a=b+c".to_string())]);
    }

    #[test]
    fn test_escapes_pass_the_character_through() {
        assert_eq!(lex(r"\*not bold\*"), vec![(TokenKind::Text, "*not bold*".to_string())]);
    }

    #[test]
    fn test_resource_and_label() {
        assert_eq!(
            lex("[a [b] c](label)"),
            vec![
                (TokenKind::Resource, "a [b] c".to_string()),
                (TokenKind::Label, "label".to_string())
            ]
        );
        // A label needs a resource or caret right before it.
        assert_eq!(kinds("(plain)"), vec![TokenKind::Text]);
        assert_eq!(kinds("[] x"), vec![TokenKind::Text]);
        assert_eq!(kinds("[ ]x"), vec![TokenKind::Text]);
        assert_eq!(kinds("[\t](label)"), vec![TokenKind::Text]);
        assert_eq!(kinds("[open"), vec![TokenKind::Text]);
    }

    #[test]
    fn test_anonymous_footnote_label() {
        assert_eq!(
            lex("^(aside)"),
            vec![
                (TokenKind::Caret, "^".to_string()),
                (TokenKind::Label, "aside".to_string())
            ]
        );
    }

    #[test]
    fn test_date_time_and_emoji() {
        assert_eq!(
            lex("<2024-01-31 10:00>"),
            vec![(TokenKind::DateTime, "2024-01-31 10:00".to_string())]
        );
        assert_eq!(kinds("<soon>"), vec![TokenKind::Text]);
        assert_eq!(lex(":smile:"), vec![(TokenKind::Emoji, "smile".to_string())]);
        assert_eq!(
            kinds("at 10:30"),
            vec![TokenKind::Text, TokenKind::Colon, TokenKind::Text]
        );
    }

    #[test]
    fn test_quote_disambiguation() {
        assert_eq!(
            kinds("say \"hi\" and don't"),
            vec![
                TokenKind::Text,
                TokenKind::DoubleQuoteOpen,
                TokenKind::Text,
                TokenKind::DoubleQuoteClose,
                TokenKind::Text,
                TokenKind::SingleQuoteClose,
                TokenKind::Text
            ]
        );
        assert_eq!(
            kinds("\"'nested"),
            vec![
                TokenKind::DoubleQuoteOpen,
                TokenKind::SingleQuoteOpen,
                TokenKind::Text
            ]
        );
    }

    #[test]
    fn test_dashes() {
        assert_eq!(
            kinds("a-b--c"),
            vec![
                TokenKind::Text,
                TokenKind::Hyphen,
                TokenKind::Text,
                TokenKind::EnDash,
                TokenKind::Text
            ]
        );
        assert_eq!(kinds("a----b"), vec![TokenKind::Text]);
    }

    #[test]
    fn test_comments_and_annotations() {
        assert_eq!(
            lex("text ~ a note"),
            vec![
                (TokenKind::Text, "text ".to_string()),
                (TokenKind::Comment, "a note".to_string())
            ]
        );
        assert_eq!(
            lex("~~ lang: en"),
            vec![(TokenKind::Annotation, "lang: en".to_string())]
        );
    }

    #[test]
    fn test_tags_only_at_word_start() {
        assert_eq!(
            lex("ping @ada about #rust-lang"),
            vec![
                (TokenKind::Text, "ping ".to_string()),
                (TokenKind::AccountTag, "ada".to_string()),
                (TokenKind::Text, " about ".to_string()),
                (TokenKind::HashTag, "rust-lang".to_string())
            ]
        );
        assert_eq!(kinds("mail@example.org"), vec![TokenKind::Text]);
    }

    #[test]
    fn test_pipe_outside_table_is_text() {
        assert_eq!(kinds("a | b"), vec![TokenKind::Text]);
    }
}
