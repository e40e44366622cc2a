//! Recursive-descent parser from source text to raw definitions.

use crate::ast::*;
use crate::cursor::{Cursor, Rule};
use crate::error::ParseError;
use std::borrow::Cow;
use tracing::trace;

/// Parse definition source into raw definitions, in source order.
///
/// Line endings are normalized to `\n` first; error offsets refer to the
/// normalized text.
pub fn parse(source: &str) -> Result<Vec<Definition>, ParseError> {
    let text = normalize_line_endings(source);
    check_charset(&text)?;
    Parser::new(&text).definitions()
}

/// Parse raw bytes. Fails with [`ParseError::NotText`] unless they are UTF-8.
pub fn parse_bytes(source: &[u8]) -> Result<Vec<Definition>, ParseError> {
    let text = std::str::from_utf8(source).map_err(|_| ParseError::NotText)?;
    parse(text)
}

fn normalize_line_endings(source: &str) -> Cow<'_, str> {
    if source.contains('\r') {
        Cow::Owned(source.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(source)
    }
}

fn check_charset(text: &str) -> Result<(), ParseError> {
    match text
        .bytes()
        .position(|b| !(b == b'\t' || b == b'\n' || (0x20..0x7f).contains(&b)))
    {
        Some(offset) => Err(ParseError::encoding(text, offset, text.as_bytes()[offset])),
        None => Ok(()),
    }
}

struct Parser<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Parser<'src> {
    fn new(text: &'src str) -> Self {
        Parser {
            cursor: Cursor::new(text),
        }
    }

    fn definitions(mut self) -> Result<Vec<Definition>, ParseError> {
        let mut definitions = Vec::new();
        while self.cursor.skip().remaining {
            let definition = self.definition()?;
            trace!(name = %definition.name, ty = %definition.shape.ty, "parsed definition");
            definitions.push(definition);
        }
        Ok(definitions)
    }

    /// `Name ::= [APPLICATION n]? TypeExpression`
    fn definition(&mut self) -> Result<Definition, ParseError> {
        let header = self
            .cursor
            .require_rule(Rule::definition_header, "definition 'Name ::='")?;
        let name = header
            .capture(Rule::upper_name)
            .ok_or_else(|| self.cursor.syntax_error("definition name"))?
            .to_string();
        let mut trailing = header.comment;
        let primitive = match self.cursor.try_rule(Rule::application_tag) {
            Some(tag) => {
                let number = self.number::<u32>(tag.capture(Rule::digits), tag.start)?;
                keep_latest(&mut trailing, tag.comment);
                Some(number)
            }
            None => None,
        };
        let mut shape = Shape::default();
        self.type_expression(&mut shape, trailing)?;
        Ok(Definition {
            name,
            primitive,
            shape,
        })
    }

    /// Fill `ty`, `series`, `size`, `range` and `items` of `shape`.
    ///
    /// `trailing` is the latest comment seen before the expression; the
    /// latest comment seen by the end of it becomes `shape.comment`.
    fn type_expression(
        &mut self,
        shape: &mut Shape,
        mut trailing: Option<String>,
    ) -> Result<(), ParseError> {
        if let Some(marker) = self.cursor.try_rule(Rule::series_marker) {
            shape.series = Some(match marker.capture(Rule::digits) {
                Some(count) => Series::Fixed(self.number(Some(count), marker.start)?),
                None => Series::Unbounded,
            });
            keep_latest(&mut trailing, marker.comment);
        }

        // Reserved words first; they would otherwise read as references.
        let (ty, matched) = if let Some(m) = self.cursor.try_rule(Rule::any_type) {
            ("Any", m)
        } else if let Some(m) = self.cursor.try_rule(Rule::enumerated_type) {
            ("Enumerated", m)
        } else if let Some(m) = self.cursor.try_rule(Rule::bit_string_type) {
            ("BitString", m)
        } else if let Some(m) = self.cursor.try_rule(Rule::octet_string_type) {
            ("OctetString", m)
        } else {
            let m = self.cursor.require_rule(Rule::upper_name, "type name")?;
            (m.text, m)
        };
        shape.ty = ty.to_string();
        keep_latest(&mut trailing, matched.comment);

        shape.size = self.size_constraint(&mut trailing)?;
        shape.range = self.constraint(false, &mut trailing)?;
        self.items(shape)?;
        if shape.comment.is_none() {
            shape.comment = trailing;
        }
        Ok(())
    }

    /// `SIZE(...)` or `(SIZE(...))`.
    fn size_constraint(
        &mut self,
        trailing: &mut Option<String>,
    ) -> Result<Option<Range>, ParseError> {
        if let Some(open) = self.cursor.try_rule(Rule::parenthesized_size) {
            keep_latest(trailing, open.comment);
            let range = self.constraint(true, trailing)?;
            let close = self.cursor.require_literal(")")?;
            keep_latest(trailing, close.comment);
            Ok(range)
        } else if let Some(keyword) = self.cursor.try_rule(Rule::size_keyword) {
            keep_latest(trailing, keyword.comment);
            self.constraint(true, trailing)
        } else {
            Ok(None)
        }
    }

    /// `(LOW)` or `(LOW..HIGH)`. Mandatory after `SIZE`, optional otherwise.
    fn constraint(
        &mut self,
        is_size: bool,
        trailing: &mut Option<String>,
    ) -> Result<Option<Range>, ParseError> {
        let start = self.cursor.offset();
        let matched = if is_size {
            self.cursor
                .require_rule(Rule::constraint, "constraint '(LOW..HIGH)'")?
        } else {
            match self.cursor.try_rule(Rule::constraint) {
                Some(m) => m,
                None => return Ok(None),
            }
        };
        let mut bounds = Vec::with_capacity(2);
        for bound in matched.inner() {
            bounds.push(self.bound(bound.as_str(), start)?);
        }
        let (min, max) = match bounds.as_slice() {
            [low] => (*low, *low),
            [low, high] => (*low, *high),
            _ => return Err(ParseError::syntax(self.cursor.text(), start, "constraint bounds")),
        };
        if min > max {
            return Err(ParseError::range(self.cursor.text(), start, min, max));
        }
        keep_latest(trailing, matched.comment);
        Ok(Some(Range { min, max }))
    }

    fn bound(&self, text: &str, start: usize) -> Result<f64, ParseError> {
        match text {
            "MIN" => Ok(f64::NEG_INFINITY),
            "MAX" => Ok(f64::INFINITY),
            _ => self.number(Some(text), start),
        }
    }

    /// `{ item, item, ... }` on structured kinds; no-op without a brace.
    fn items(&mut self, shape: &mut Shape) -> Result<(), ParseError> {
        let open_at = self.cursor.offset();
        let open = match self.cursor.try_literal("{") {
            Some(open) => open,
            None => return Ok(()),
        };
        let kind = shape.kind();
        let item_shape = match kind.item_shape() {
            Some(item_shape) => item_shape,
            None => return Err(ParseError::structure(self.cursor.text(), open_at, &shape.ty)),
        };

        let mut items = Vec::new();
        let mut leading = open.comment;
        loop {
            keep_latest(&mut leading, self.cursor.skip().comment);
            let mut item = self.item(item_shape, leading.take())?;

            let comma = self.cursor.try_literal(",");
            let more = comma.is_some();
            if let Some(comment) = comma.and_then(|c| c.comment) {
                set_item_comment(&mut item, comment);
            }
            items.push(item);
            if !more {
                break;
            }
            if kind.allows_extension() {
                if let Some(marker) = self.cursor.try_rule(Rule::extension_marker) {
                    shape.extensible = true;
                    keep_latest(&mut shape.comment, marker.comment);
                    break;
                }
            }
        }

        let close = self.cursor.require_literal("}")?;
        keep_latest(&mut shape.comment, close.comment);
        shape.items = Some(items);
        Ok(())
    }

    fn item(&mut self, item_shape: ItemShape, leading: Option<String>) -> Result<Item, ParseError> {
        let name = self.cursor.require_rule(Rule::lower_name, "item name")?;
        let mut comment = leading;
        keep_latest(&mut comment, name.comment);
        match item_shape {
            ItemShape::Simple => {
                let number = self
                    .cursor
                    .require_rule(Rule::item_number, "item number '(n)'")?;
                let value = self.number(number.capture(Rule::digits), number.start)?;
                keep_latest(&mut comment, number.comment);
                Ok(Item::Simple {
                    name: name.text.to_string(),
                    number: value,
                    comment,
                })
            }
            ItemShape::Complex => {
                let context = match self.cursor.try_rule(Rule::context_tag) {
                    Some(tag) => {
                        // Digits wider than u64 saturate; normalization drops the tag.
                        let number = tag
                            .capture(Rule::digits)
                            .map(|digits| digits.parse::<u64>().unwrap_or(u64::MAX));
                        keep_latest(&mut comment, tag.comment);
                        number
                    }
                    None => None,
                };
                let mut shape = Shape::default();
                self.type_expression(&mut shape, comment)?;
                let optional = match self.cursor.try_rule(Rule::optional_marker) {
                    Some(marker) => {
                        keep_latest(&mut shape.comment, marker.comment);
                        true
                    }
                    None => false,
                };
                Ok(Item::Field {
                    name: name.text.to_string(),
                    context,
                    shape,
                    optional,
                })
            }
        }
    }

    fn number<T: std::str::FromStr>(&self, text: Option<&str>, at: usize) -> Result<T, ParseError> {
        text.and_then(|t| t.parse().ok())
            .ok_or_else(|| ParseError::syntax(self.cursor.text(), at, "number in range"))
    }
}

/// Replace `slot` when a newer comment was captured.
fn keep_latest(slot: &mut Option<String>, newer: Option<String>) {
    if newer.is_some() {
        *slot = newer;
    }
}

fn set_item_comment(item: &mut Item, text: String) {
    match item {
        Item::Simple { comment, .. } => *comment = Some(text),
        Item::Field { shape, .. } => shape.comment = Some(text),
    }
}
