//! Property-based tests: the lexer and parser are total over arbitrary input
//!
//! Inputs are built from the characters that drive the grammar (markers, delimiters, prefix
//! units, line breaks) so that generated documents hit the interesting paths rather than
//! being plain text.

use proptest::prelude::*;
use quill_parser::quill::lexing::tokenize;
use quill_parser::quill::parsing::parse;
use quill_parser::quill::token::TokenKind;

fn quill_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("\n".to_string()),
        Just("\n\n".to_string()),
        Just("\t".to_string()),
        Just("/ ".to_string()),
        Just("    ".to_string()),
        Just("> ".to_string()),
        Just(">> ".to_string()),
        Just("- ".to_string()),
        Just("1. ".to_string()),
        Just("[x] ".to_string()),
        Just(": ".to_string()),
        Just("|".to_string()),
        Just("|--|".to_string()),
        Just("---".to_string()),
        Just("^[a]:".to_string()),
        Just("<note>".to_string()),
        Just("<<x.qd>>".to_string()),
        Just("~~ k: v".to_string()),
        Just("~ ".to_string()),
        Just("*".to_string()),
        Just("_".to_string()),
        Just("`".to_string()),
        Just("==".to_string()),
        Just("{+".to_string()),
        Just("+}".to_string()),
        Just("{-".to_string()),
        Just("-}".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        Just("(".to_string()),
        Just("\"".to_string()),
        Just("'".to_string()),
        Just("{".to_string()),
        "[a-z ]{1,8}",
        "\\PC{1,3}",
    ]
}

fn quill_document() -> impl Strategy<Value = String> {
    prop::collection::vec(quill_fragment(), 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn lexer_always_terminates_with_one_end_of_stream(source in quill_document()) {
        let tokens = tokenize(&source);
        let ends = tokens.iter().filter(|t| t.kind == TokenKind::EndOfStream).count();
        prop_assert_eq!(ends, 1);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfStream));
    }

    #[test]
    fn prefix_scopes_are_balanced_and_nested(source in quill_document()) {
        let mut open: Vec<TokenKind> = Vec::new();
        for token in tokenize(&source) {
            match token.kind {
                TokenKind::IndentIncrease | TokenKind::BlockquoteIncrease => open.push(token.kind),
                TokenKind::IndentDecrease => {
                    prop_assert_eq!(open.pop(), Some(TokenKind::IndentIncrease));
                }
                TokenKind::BlockquoteDecrease => {
                    prop_assert_eq!(open.pop(), Some(TokenKind::BlockquoteIncrease));
                }
                _ => {}
            }
        }
        prop_assert!(open.is_empty());
    }

    #[test]
    fn separators_never_touch(source in quill_document()) {
        let tokens = tokenize(&source);
        for pair in tokens.windows(2) {
            prop_assert!(!(pair[0].kind.is_separator() && pair[1].kind.is_separator()));
        }
    }

    #[test]
    fn parser_never_panics_or_leaks_dedent_diagnostics(source in quill_document()) {
        let doc = parse(&tokenize(&source));
        prop_assert!(doc
            .diagnostics
            .iter()
            .all(|d| d.code.as_deref() != Some("unmatched-dedent")));
    }
}
