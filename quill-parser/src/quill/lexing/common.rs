//! Options and read-only tables shared by the lexer passes.

use once_cell::sync::Lazy;
use regex::Regex;

/// Knobs for the lexer. The defaults match the reference grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerOptions {
    /// How many leading spaces count as one indentation unit (a tab always does).
    /// Zero disables space indentation.
    pub spaces_per_indent: usize,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            spaces_per_indent: 4,
        }
    }
}

/// Words accepted inside an admonition marker (`<note>`, `<warning>`, ...).
pub const ADMONITION_KEYWORDS: &[&str] = &[
    "note",
    "tip",
    "info",
    "important",
    "warning",
    "caution",
    "danger",
    "example",
    "quote",
    "todo",
];

pub fn is_admonition_keyword(word: &str) -> bool {
    ADMONITION_KEYWORDS.contains(&word)
}

/// `YYYY-MM-DD`, `HH:MM[:SS]`, or both separated by a space or `T`.
pub static DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01]))(?:[ T]((?:[01]\d|2[0-3]):[0-5]\d(?::[0-5]\d)?))?|((?:[01]\d|2[0-3]):[0-5]\d(?::[0-5]\d)?))$")
        .expect("date/time pattern is valid")
});

/// Emoji shortcodes: lowercase words joined by hyphens.
pub static EMOJI_SHORTCODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z-]*$").expect("emoji pattern is valid"));

/// A table row made only of dash runs with optional alignment colons.
pub static TABLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\|(?:[ \t]*:?-+:?[ \t]*\|)*[ \t]*:?-+:?[ \t]*\|?[ \t]*$")
        .expect("table separator pattern is valid")
});

/// Heading anchors and emoji share the same lowercase identifier alphabet.
pub fn is_anchor_id(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Splits a validated date/time literal into its date and time parts.
pub fn split_date_time(literal: &str) -> Option<(Option<String>, Option<String>)> {
    let captures = DATE_TIME.captures(literal)?;
    let date = captures.get(1).map(|m| m.as_str().to_string());
    let time = captures
        .get(2)
        .or_else(|| captures.get(3))
        .map(|m| m.as_str().to_string());
    Some((date, time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_time_forms() {
        assert_eq!(
            split_date_time("2024-02-29"),
            Some((Some("2024-02-29".to_string()), None))
        );
        assert_eq!(
            split_date_time("09:30"),
            Some((None, Some("09:30".to_string())))
        );
        assert_eq!(
            split_date_time("2024-02-29 09:30:15"),
            Some((Some("2024-02-29".to_string()), Some("09:30:15".to_string())))
        );
        assert_eq!(split_date_time("2024-13-01"), None);
        assert_eq!(split_date_time("25:00"), None);
        assert_eq!(split_date_time("tomorrow"), None);
    }

    #[test]
    fn test_table_separator_pattern() {
        assert!(TABLE_SEPARATOR.is_match("|:--|--:|"));
        assert!(TABLE_SEPARATOR.is_match("| --- | :-: |"));
        assert!(TABLE_SEPARATOR.is_match("|---"));
        assert!(!TABLE_SEPARATOR.is_match("| a | b |"));
        assert!(!TABLE_SEPARATOR.is_match("||"));
    }

    #[test]
    fn test_identifiers() {
        assert!(is_anchor_id("intro-2"));
        assert!(!is_anchor_id("Intro"));
        assert!(!is_anchor_id(""));
        assert!(EMOJI_SHORTCODE.is_match("thumbs-up"));
        assert!(!EMOJI_SHORTCODE.is_match("-up"));
        assert!(is_admonition_keyword("warning"));
        assert!(!is_admonition_keyword("banana"));
    }
}
