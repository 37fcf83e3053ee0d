//! Line prefixes: indentation and block-quote units
//!
//!     A prefix is the alternating run of indentation units (a tab, or `spaces_per_indent`
//!     spaces) and block-quote units (`/ ` or a line-final `/`) at the start of a line.
//!
//!     Consecutive prefixes are compared by their common unit sequence rather than by depth:
//!     if the new prefix diverges from the previous one at unit `k`, every old unit after `k`
//!     is closed innermost first and then every new unit after `k` is opened. This keeps the
//!     emitted scope tokens properly nested even when indentation and quotes interleave.

use crate::quill::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixUnit {
    Indent,
    Quote,
}

impl PrefixUnit {
    pub fn increase(self) -> TokenKind {
        match self {
            PrefixUnit::Indent => TokenKind::IndentIncrease,
            PrefixUnit::Quote => TokenKind::BlockquoteIncrease,
        }
    }

    pub fn decrease(self) -> TokenKind {
        match self {
            PrefixUnit::Indent => TokenKind::IndentDecrease,
            PrefixUnit::Quote => TokenKind::BlockquoteDecrease,
        }
    }
}

fn at_line_end(bytes: &[u8], pos: usize) -> bool {
    pos >= bytes.len() || bytes[pos] == b'\n'
}

/// Read the prefix starting at `pos`, returning its units and the offset after it.
///
/// Spaces short of a full indentation unit are skipped without producing a unit.
pub fn read_prefix(bytes: &[u8], mut pos: usize, spaces_per_indent: usize) -> (Vec<PrefixUnit>, usize) {
    let mut units = Vec::new();

    while pos < bytes.len() {
        match bytes[pos] {
            b'\t' => {
                units.push(PrefixUnit::Indent);
                pos += 1;
            }
            b' ' => {
                let run = bytes[pos..].iter().take_while(|b| **b == b' ').count();
                if spaces_per_indent > 0 && run >= spaces_per_indent {
                    units.push(PrefixUnit::Indent);
                    pos += spaces_per_indent;
                } else {
                    pos += run;
                }
            }
            b'/' if pos + 1 < bytes.len() && bytes[pos + 1] == b' ' => {
                units.push(PrefixUnit::Quote);
                pos += 2;
            }
            b'/' if at_line_end(bytes, pos + 1) => {
                units.push(PrefixUnit::Quote);
                pos += 1;
            }
            _ => break,
        }
    }

    (units, pos)
}

/// Strip exactly the given units from the line starting at `pos`.
///
/// Returns the offset after the stripped units and whether every unit was present.
pub fn strip_units(
    bytes: &[u8],
    mut pos: usize,
    units: &[PrefixUnit],
    spaces_per_indent: usize,
) -> (usize, bool) {
    for unit in units {
        match unit {
            PrefixUnit::Indent => {
                if pos < bytes.len() && bytes[pos] == b'\t' {
                    pos += 1;
                } else if spaces_per_indent > 0
                    && bytes[pos..].iter().take(spaces_per_indent).filter(|b| **b == b' ').count()
                        == spaces_per_indent
                {
                    pos += spaces_per_indent;
                } else {
                    return (pos, false);
                }
            }
            PrefixUnit::Quote => {
                if bytes[pos..].starts_with(b"/ ") {
                    pos += 2;
                } else if pos < bytes.len() && bytes[pos] == b'/' && at_line_end(bytes, pos + 1) {
                    pos += 1;
                } else {
                    return (pos, false);
                }
            }
        }
    }
    (pos, true)
}

/// True when the line starting at `pos` holds nothing but prefix units and whitespace.
pub fn line_is_blank(bytes: &[u8], pos: usize, spaces_per_indent: usize) -> bool {
    if pos >= bytes.len() {
        return false;
    }
    let (_, mut after) = read_prefix(bytes, pos, spaces_per_indent);
    while after < bytes.len() && matches!(bytes[after], b' ' | b'\t' | b'\r') {
        after += 1;
    }
    at_line_end(bytes, after)
}

/// Scope tokens needed to move from `old` to `new`: closes first (innermost first), then opens.
pub fn diff(old: &[PrefixUnit], new: &[PrefixUnit]) -> Vec<TokenKind> {
    let common = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let closes = old[common..].iter().rev().map(|unit| unit.decrease());
    let opens = new[common..].iter().map(|unit| unit.increase());
    closes.chain(opens).collect()
}
