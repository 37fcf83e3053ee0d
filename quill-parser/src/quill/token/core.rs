//! Core token definitions produced by the lexer and consumed by the parser.
//!
//!     Every token carries its source [`Range`], the literal text it consumed (or its payload
//!     for capture tokens such as resources and code bodies) and an optional small integer
//!     `size`. The size collapses what would otherwise be families of near-identical kinds:
//!     heading weight, bullet weight, check state, fence repeat count and newline run length.

use crate::quill::ast::range::Range;
use serde::Serialize;
use std::fmt;

/// All token kinds the quill lexer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Stream structure
    EndOfStream,
    Newline,
    NewlinePlus,

    // Prefix scopes (synthesized, no text)
    IndentIncrease,
    IndentDecrease,
    BlockquoteIncrease,
    BlockquoteDecrease,

    // Line-start markers
    HeadingMarker,
    BulletMarker,
    NumberMarker,
    CheckMarker,
    DefinitionMarker,
    FootnoteDefine,
    AdmonitionMarker,
    ThematicBreak,
    PageBreak,
    Include,
    TableSeparator,
    Pipe,
    FenceOpen,
    CodeBody,
    FenceClose,

    // Inline content
    Text,
    Colon,
    Star,
    Underscore,
    DoubleUnderscore,
    Backtick,
    Highlight,
    AddedOpen,
    AddedClose,
    RemovedOpen,
    RemovedClose,
    Anchor,
    Caret,
    Ampersand,
    Bang,
    Resource,
    Label,
    DateTime,
    Emoji,
    Comment,
    Annotation,
    AccountTag,
    HashTag,
    DoubleQuoteOpen,
    DoubleQuoteClose,
    SingleQuoteOpen,
    SingleQuoteClose,
    Hyphen,
    EnDash,
    EmDash,
}

impl TokenKind {
    /// Newline runs separating lines and blocks.
    pub fn is_separator(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::NewlinePlus)
    }

    /// Synthesized indentation and block-quote scope tokens.
    pub fn is_prefix(self) -> bool {
        matches!(
            self,
            TokenKind::IndentIncrease
                | TokenKind::IndentDecrease
                | TokenKind::BlockquoteIncrease
                | TokenKind::BlockquoteDecrease
        )
    }

    /// Tokens that end the current line.
    pub fn ends_line(self) -> bool {
        self.is_separator() || self == TokenKind::EndOfStream
    }

    /// Markers only emitted at line start that begin a block of their own.
    pub fn starts_block(self) -> bool {
        matches!(
            self,
            TokenKind::HeadingMarker
                | TokenKind::BulletMarker
                | TokenKind::NumberMarker
                | TokenKind::CheckMarker
                | TokenKind::DefinitionMarker
                | TokenKind::FootnoteDefine
                | TokenKind::AdmonitionMarker
                | TokenKind::ThematicBreak
                | TokenKind::PageBreak
                | TokenKind::Include
                | TokenKind::TableSeparator
                | TokenKind::Pipe
                | TokenKind::FenceOpen
        )
    }

    pub fn is_list_marker(self) -> bool {
        matches!(
            self,
            TokenKind::BulletMarker | TokenKind::NumberMarker | TokenKind::CheckMarker
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::EndOfStream => "end-of-stream",
            TokenKind::Newline => "newline",
            TokenKind::NewlinePlus => "newline-plus",
            TokenKind::IndentIncrease => "indent+",
            TokenKind::IndentDecrease => "indent-",
            TokenKind::BlockquoteIncrease => "blockquote+",
            TokenKind::BlockquoteDecrease => "blockquote-",
            TokenKind::HeadingMarker => "heading",
            TokenKind::BulletMarker => "bullet",
            TokenKind::NumberMarker => "number",
            TokenKind::CheckMarker => "check",
            TokenKind::DefinitionMarker => "definition",
            TokenKind::FootnoteDefine => "footnote-define",
            TokenKind::AdmonitionMarker => "admonition",
            TokenKind::ThematicBreak => "thematic-break",
            TokenKind::PageBreak => "page-break",
            TokenKind::Include => "include",
            TokenKind::TableSeparator => "table-separator",
            TokenKind::Pipe => "pipe",
            TokenKind::FenceOpen => "fence-open",
            TokenKind::CodeBody => "code-body",
            TokenKind::FenceClose => "fence-close",
            TokenKind::Text => "text",
            TokenKind::Colon => "colon",
            TokenKind::Star => "star",
            TokenKind::Underscore => "underscore",
            TokenKind::DoubleUnderscore => "double-underscore",
            TokenKind::Backtick => "backtick",
            TokenKind::Highlight => "highlight",
            TokenKind::AddedOpen => "added-open",
            TokenKind::AddedClose => "added-close",
            TokenKind::RemovedOpen => "removed-open",
            TokenKind::RemovedClose => "removed-close",
            TokenKind::Anchor => "anchor",
            TokenKind::Caret => "caret",
            TokenKind::Ampersand => "ampersand",
            TokenKind::Bang => "bang",
            TokenKind::Resource => "resource",
            TokenKind::Label => "label",
            TokenKind::DateTime => "datetime",
            TokenKind::Emoji => "emoji",
            TokenKind::Comment => "comment",
            TokenKind::Annotation => "annotation",
            TokenKind::AccountTag => "account-tag",
            TokenKind::HashTag => "hash-tag",
            TokenKind::DoubleQuoteOpen => "dquote-open",
            TokenKind::DoubleQuoteClose => "dquote-close",
            TokenKind::SingleQuoteOpen => "squote-open",
            TokenKind::SingleQuoteClose => "squote-close",
            TokenKind::Hyphen => "hyphen",
            TokenKind::EnDash => "en-dash",
            TokenKind::EmDash => "em-dash",
        };
        f.write_str(name)
    }
}

/// A single lexed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl Token {
    pub fn new(kind: TokenKind, range: Range, text: impl Into<String>) -> Self {
        Self {
            kind,
            range,
            text: text.into(),
            size: None,
        }
    }

    /// Token without source text (scope changes, end of stream).
    pub fn synthetic(kind: TokenKind, range: Range) -> Self {
        Self::new(kind, range, String::new())
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(size) = self.size {
            write!(f, "/{}", size)?;
        }
        if !self.text.is_empty() {
            write!(f, "({:?})", self.text)?;
        }
        Ok(())
    }
}
