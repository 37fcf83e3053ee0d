//! Detokenizer for the quill format
//!
//! Converts a token stream back into quill source text. The output is canonical rather than
//! byte-identical: indentation is re-emitted as tabs, quote marks and dashes keep the glyph the
//! lexer saw, and capture tokens (resources, labels, dates, code bodies) are re-wrapped in their
//! delimiters. Used for round-trip testing and for the `simple` token dump of the CLI.

use super::core::{Token, TokenKind};

/// Trait for converting a token to its quill surface syntax
pub trait ToQuillString {
    fn to_quill_string(&self) -> String;
}

impl ToQuillString for Token {
    fn to_quill_string(&self) -> String {
        match self.kind {
            TokenKind::EndOfStream
            | TokenKind::IndentIncrease
            | TokenKind::IndentDecrease
            | TokenKind::BlockquoteIncrease
            | TokenKind::BlockquoteDecrease => String::new(),
            TokenKind::Newline | TokenKind::NewlinePlus => {
                let run = self.size.unwrap_or(1).max(1) as usize;
                "\n".repeat(run)
            }
            TokenKind::HeadingMarker
            | TokenKind::BulletMarker
            | TokenKind::CheckMarker
            | TokenKind::DefinitionMarker => format!("{} ", self.text),
            TokenKind::NumberMarker => format!("{}. ", self.text),
            TokenKind::FootnoteDefine => format!("^[{}]: ", self.text),
            TokenKind::AdmonitionMarker => format!("<{}> ", self.text),
            TokenKind::Include => format!("<<{}>>", self.text),
            TokenKind::FenceOpen => {
                let fence = "-".repeat(self.size.unwrap_or(3) as usize);
                format!("{}{}\n", fence, self.text)
            }
            TokenKind::CodeBody => format!("{}\n", self.text),
            TokenKind::Anchor => format!("{{{}}}", self.text),
            TokenKind::Resource => format!("[{}]", self.text),
            TokenKind::Label => format!("({})", self.text),
            TokenKind::DateTime => format!("<{}>", self.text),
            TokenKind::Emoji => format!(":{}:", self.text),
            TokenKind::Comment => format!("~ {}", self.text),
            TokenKind::Annotation => format!("~~ {}", self.text),
            TokenKind::AccountTag => format!("@{}", self.text),
            TokenKind::HashTag => format!("#{}", self.text),
            _ => self.text.clone(),
        }
    }
}

/// Detokenize a stream of tokens into a string
///
/// Prefix scope tokens are tracked as a stack of units and the current prefix is written in
/// front of the first content token of every line.
pub fn detokenize(tokens: &[Token]) -> String {
    let mut result = String::new();
    let mut prefix: Vec<&'static str> = Vec::new();
    let mut at_line_start = true;

    for token in tokens {
        match token.kind {
            TokenKind::IndentIncrease => prefix.push("\t"),
            TokenKind::BlockquoteIncrease => prefix.push("/ "),
            TokenKind::IndentDecrease | TokenKind::BlockquoteDecrease => {
                prefix.pop();
            }
            TokenKind::EndOfStream => {}
            TokenKind::Newline | TokenKind::NewlinePlus => {
                result.push_str(&token.to_quill_string());
                at_line_start = true;
            }
            _ => {
                if at_line_start {
                    for unit in &prefix {
                        result.push_str(unit);
                    }
                    at_line_start = false;
                }
                result.push_str(&token.to_quill_string());
                if token.kind == TokenKind::FenceOpen || token.kind == TokenKind::CodeBody {
                    at_line_start = true;
                }
            }
        }
    }

    result
}

/// One token per line, `kind(text)` form, for quick inspection
pub fn to_simple_str(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| format!("{} {}\n", token.range.start, token))
        .collect()
}
