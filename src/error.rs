//! Parse failures with the line they occurred on.

use pest::Position;
use std::fmt;

/// Failure while parsing definition source.
///
/// Every positional variant carries the absolute offset (into the
/// line-ending-normalized text) and the 1-indexed line of that offset.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Input was not text at all.
    #[error("input is not text")]
    NotText,
    /// A byte outside tab, newline and printable ASCII.
    #[error("line {line}: disallowed character 0x{byte:02x}")]
    Encoding { offset: usize, line: usize, byte: u8 },
    /// An expected token was absent.
    #[error("line {line}: expected {expected}")]
    Syntax {
        offset: usize,
        line: usize,
        expected: String,
    },
    /// A constraint whose low bound exceeds its high bound.
    #[error("line {line}: range low bound {} exceeds high bound {}", bound(.low), bound(.high))]
    Range {
        offset: usize,
        line: usize,
        low: f64,
        high: f64,
    },
    /// A brace-delimited body on a type that cannot hold items.
    #[error("line {line}: type {kind} cannot have items")]
    Structure {
        offset: usize,
        line: usize,
        kind: String,
    },
}

impl ParseError {
    pub(crate) fn syntax(text: &str, offset: usize, expected: impl Into<String>) -> Self {
        ParseError::Syntax {
            offset,
            line: line_of(text, offset),
            expected: expected.into(),
        }
    }

    pub(crate) fn range(text: &str, offset: usize, low: f64, high: f64) -> Self {
        ParseError::Range {
            offset,
            line: line_of(text, offset),
            low,
            high,
        }
    }

    pub(crate) fn structure(text: &str, offset: usize, kind: &str) -> Self {
        ParseError::Structure {
            offset,
            line: line_of(text, offset),
            kind: kind.to_string(),
        }
    }

    pub(crate) fn encoding(text: &str, offset: usize, byte: u8) -> Self {
        ParseError::Encoding {
            offset,
            line: line_of(text, offset),
            byte,
        }
    }

    /// Offset the failure was detected at; `None` for [`ParseError::NotText`].
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::NotText => None,
            ParseError::Encoding { offset, .. }
            | ParseError::Syntax { offset, .. }
            | ParseError::Range { offset, .. }
            | ParseError::Structure { offset, .. } => Some(*offset),
        }
    }

    /// 1-indexed line of [`ParseError::offset`].
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::NotText => None,
            ParseError::Encoding { line, .. }
            | ParseError::Syntax { line, .. }
            | ParseError::Range { line, .. }
            | ParseError::Structure { line, .. } => Some(*line),
        }
    }
}

/// 1-indexed line containing `offset`.
pub(crate) fn line_of(text: &str, offset: usize) -> usize {
    // Offsets always sit on char boundaries of ASCII-checked text; clamp for
    // the end-of-input case.
    let offset = offset.min(text.len());
    match Position::new(text, offset) {
        Some(pos) => pos.line_col().0,
        None => text[..offset].matches('\n').count() + 1,
    }
}

fn bound(value: &f64) -> Bound {
    Bound(*value)
}

/// Display helper rendering the infinity sentinels as `MIN` / `MAX`.
struct Bound(f64);

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == f64::NEG_INFINITY {
            f.write_str("MIN")
        } else if self.0 == f64::INFINITY {
            f.write_str("MAX")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_one_indexed() {
        let text = "A ::= B\nC ::= D\n\nE";
        assert_eq!(line_of(text, 0), 1);
        assert_eq!(line_of(text, 8), 2);
        assert_eq!(line_of(text, text.len() - 1), 4);
        assert_eq!(line_of(text, text.len()), 4);
    }

    #[test]
    fn range_message_names_sentinels() {
        let err = ParseError::range("X", 0, f64::INFINITY, 3.0);
        assert_eq!(err.to_string(), "line 1: range low bound MAX exceeds high bound 3");
    }
}
