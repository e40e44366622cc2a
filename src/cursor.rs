//! Scan position over normalized source text.
//!
//! The cursor skips whitespace and `--` line comments between tokens and
//! matches one token pattern at a time at its current position. Token
//! patterns are the rules of `grammar.pest`; a rule is tried against the
//! remaining input, so only a prefix match counts.

use crate::error::ParseError;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub(crate) struct TokenParser;

/// Result of skipping insignificant text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Skipped {
    /// True when input remains after the skip.
    pub remaining: bool,
    /// Comment lines skipped in this run, joined with single spaces.
    pub comment: Option<String>,
}

/// A successful match at the cursor.
#[derive(Debug, Clone)]
pub(crate) struct Matched<'src> {
    /// Matched token text.
    pub text: &'src str,
    /// Absolute offset where the token started.
    pub start: usize,
    /// Comment skipped after the token, if any.
    pub comment: Option<String>,
    pair: Option<Pair<'src, Rule>>,
}

impl<'src> Matched<'src> {
    /// First descendant token produced by `rule`, as text.
    pub fn capture(&self, rule: Rule) -> Option<&'src str> {
        self.captures(rule).into_iter().next()
    }

    /// All descendant tokens produced by `rule`, in source order.
    pub fn captures(&self, rule: Rule) -> Vec<&'src str> {
        match &self.pair {
            Some(pair) => pair
                .clone()
                .into_inner()
                .flatten()
                .filter(|p| p.as_rule() == rule)
                .map(|p| p.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Top-level inner pairs of the match.
    pub fn inner(&self) -> Vec<Pair<'src, Rule>> {
        match &self.pair {
            Some(pair) => pair.clone().into_inner().collect(),
            None => Vec::new(),
        }
    }
}

/// Cursor over the text being parsed.
pub(crate) struct Cursor<'src> {
    text: &'src str,
    pos: usize,
}

impl<'src> Cursor<'src> {
    pub fn new(text: &'src str) -> Self {
        Self { text, pos: 0 }
    }

    /// Current absolute offset.
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn text(&self) -> &'src str {
        self.text
    }

    /// Skip whitespace and comments. Consecutive comment lines in one run
    /// are joined into a single comment.
    pub fn skip(&mut self) -> Skipped {
        let bytes = self.text.as_bytes();
        let mut lines: Vec<&'src str> = Vec::new();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b' ' | b'\t' | b'\n' => self.pos += 1,
                b'-' if bytes.get(self.pos + 1) == Some(&b'-') => {
                    let body_start = self.pos + 2;
                    let end = self.text[body_start..]
                        .find('\n')
                        .map_or(bytes.len(), |i| body_start + i);
                    let body = self.text[body_start..end].trim();
                    if !body.is_empty() {
                        lines.push(body);
                    }
                    self.pos = end;
                }
                _ => break,
            }
        }
        Skipped {
            remaining: self.pos < bytes.len(),
            comment: if lines.is_empty() {
                None
            } else {
                Some(lines.join(" "))
            },
        }
    }

    /// Consume `literal` if the input continues with it.
    pub fn try_literal(&mut self, literal: &str) -> Option<Matched<'src>> {
        if !self.text[self.pos..].starts_with(literal) {
            return None;
        }
        let start = self.pos;
        self.pos += literal.len();
        let skipped = self.skip();
        Some(Matched {
            text: &self.text[start..start + literal.len()],
            start,
            comment: skipped.comment,
            pair: None,
        })
    }

    /// Consume a token matching `rule` if one starts here.
    pub fn try_rule(&mut self, rule: Rule) -> Option<Matched<'src>> {
        let start = self.pos;
        let rest = &self.text[start..];
        let pair = TokenParser::parse(rule, rest).ok()?.next()?;
        let len = pair.as_span().end();
        if len == 0 {
            return None;
        }
        self.pos += len;
        let skipped = self.skip();
        Some(Matched {
            text: &rest[..len],
            start,
            comment: skipped.comment,
            pair: Some(pair),
        })
    }

    /// Like [`Cursor::try_literal`], failing with a syntax error at the
    /// current offset when the literal is absent.
    pub fn require_literal(&mut self, literal: &str) -> Result<Matched<'src>, ParseError> {
        self.try_literal(literal)
            .ok_or_else(|| self.syntax_error(format!("'{}'", literal)))
    }

    /// Like [`Cursor::try_rule`], failing with a syntax error naming
    /// `expected` when no token matches.
    pub fn require_rule(
        &mut self,
        rule: Rule,
        expected: &str,
    ) -> Result<Matched<'src>, ParseError> {
        self.try_rule(rule).ok_or_else(|| self.syntax_error(expected))
    }

    pub fn syntax_error(&self, expected: impl Into<String>) -> ParseError {
        ParseError::syntax(self.text, self.pos, expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_collects_consecutive_comment_lines() {
        let mut c = Cursor::new("  -- first\n\t-- second\n  Foo");
        let s = c.skip();
        assert!(s.remaining);
        assert_eq!(s.comment.as_deref(), Some("first second"));
        assert_eq!(&c.text()[c.offset()..], "Foo");
    }

    #[test]
    fn skip_reports_end_of_input() {
        let mut c = Cursor::new("   -- trailing");
        let s = c.skip();
        assert!(!s.remaining);
        assert_eq!(s.comment.as_deref(), Some("trailing"));
    }

    #[test]
    fn try_rule_consumes_trailing_comment() {
        let mut c = Cursor::new("Foo ::= -- doc\n Unsigned");
        let m = c.try_rule(Rule::definition_header).expect("header");
        assert_eq!(m.capture(Rule::upper_name), Some("Foo"));
        assert_eq!(m.start, 0);
        assert_eq!(m.comment.as_deref(), Some("doc"));
        assert_eq!(&c.text()[c.offset()..], "Unsigned");
    }

    #[test]
    fn failed_match_leaves_position() {
        let mut c = Cursor::new("foo ::= Unsigned");
        assert!(c.try_rule(Rule::definition_header).is_none());
        assert_eq!(c.offset(), 0);
        let err = c.require_rule(Rule::definition_header, "definition").unwrap_err();
        assert_eq!(err.offset(), Some(0));
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn keywords_need_a_boundary() {
        let mut c = Cursor::new("ENUMERATEDS");
        assert!(c.try_rule(Rule::enumerated_type).is_none());
        let mut c = Cursor::new("OCTET  STRING (SIZE(6))");
        assert!(c.try_rule(Rule::octet_string_type).is_some());
        assert!(c.try_rule(Rule::parenthesized_size).is_some());
    }

    #[test]
    fn names_stop_before_comment_marker() {
        let mut c = Cursor::new("analog-input--note\n");
        let m = c.try_rule(Rule::lower_name).expect("name");
        assert_eq!(m.text, "analog-input");
        assert_eq!(m.comment.as_deref(), Some("note"));
    }
}
