//! Character classification for the inline scan
//!
//!     The logos lexer recognises the context-free shape of the next glyph: a run of plain
//!     characters or one of the meaningful one/two-character sequences. Everything that depends
//!     on context (quote direction, bracket matching, whether a `(` follows a resource, line
//!     start) is decided by the hand-written [`Lexer`](super::lexer::Lexer) on top of this.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Anything that cannot start a meaningful token.
    #[regex(r#"[^\n*_`=^&!\[(<{:~'"’”\-+@#\\|]+"#)]
    Plain,

    #[token("\n")]
    Newline,

    #[token("*")]
    Star,

    #[token("__")]
    DoubleUnderscore,

    #[token("_")]
    Underscore,

    #[token("`")]
    Backtick,

    #[token("==")]
    DoubleEquals,

    #[token("^")]
    Caret,

    #[token("&")]
    Ampersand,

    #[token("!")]
    Bang,

    #[token("[")]
    OpenBracket,

    #[token("(")]
    OpenParen,

    #[token("<")]
    OpenAngle,

    #[token("{+")]
    AddedOpen,

    #[token("+}")]
    AddedClose,

    #[token("{-")]
    RemovedOpen,

    #[token("-}")]
    RemovedClose,

    #[token("{")]
    OpenBrace,

    #[token(":")]
    Colon,

    #[token("~~ ")]
    AnnotationMark,

    #[token("~")]
    Tilde,

    #[regex("['’]")]
    SingleQuote,

    #[regex("[\"”]")]
    DoubleQuote,

    #[regex("-+")]
    Dashes,

    #[token("@")]
    At,

    #[token("#")]
    Hash,

    #[token("\\")]
    Backslash,

    #[token("|")]
    Pipe,
}

/// Classify the glyph at the start of `rest`, returning it with its byte length.
///
/// Characters no rule accepts (a lone `=` or `+`) come back as a one-character `Plain`.
pub fn next_glyph(rest: &str) -> Option<(Glyph, usize)> {
    let mut lexer = Glyph::lexer(rest);
    match lexer.next()? {
        Ok(glyph) => Some((glyph, lexer.span().len())),
        Err(()) => {
            let width = rest.chars().next().map(char::len_utf8).unwrap_or(1);
            Some((Glyph::Plain, width))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyphs(input: &str) -> Vec<(Glyph, usize)> {
        let mut out = Vec::new();
        let mut rest = input;
        while let Some((glyph, len)) = next_glyph(rest) {
            out.push((glyph, len));
            rest = &rest[len..];
        }
        out
    }

    #[test]
    fn test_plain_runs_stop_at_meaningful_characters() {
        assert_eq!(
            glyphs("hello *world*"),
            vec![
                (Glyph::Plain, 6),
                (Glyph::Star, 1),
                (Glyph::Plain, 5),
                (Glyph::Star, 1)
            ]
        );
    }

    #[test]
    fn test_longest_match_wins() {
        assert_eq!(glyphs("__"), vec![(Glyph::DoubleUnderscore, 2)]);
        assert_eq!(glyphs("---"), vec![(Glyph::Dashes, 3)]);
        assert_eq!(glyphs("-}"), vec![(Glyph::RemovedClose, 2)]);
        assert_eq!(glyphs("~~ x"), vec![(Glyph::AnnotationMark, 3), (Glyph::Plain, 1)]);
    }

    #[test]
    fn test_unmatched_specials_become_plain() {
        assert_eq!(
            glyphs("a=b"),
            vec![(Glyph::Plain, 1), (Glyph::Plain, 1), (Glyph::Plain, 1)]
        );
    }

    #[test]
    fn test_curly_quotes_are_classified() {
        assert_eq!(glyphs("’"), vec![(Glyph::SingleQuote, 3)]);
        assert_eq!(glyphs("”"), vec![(Glyph::DoubleQuote, 3)]);
    }
}
