//! Normalization of raw definitions.
//!
//! Each definition is classified by [`Kind`] and handed to one enricher per
//! kind. Predefined types from the registry win over anything computed
//! here; normalization itself never fails.

use crate::ast::{Definition, Item, Kind, Shape};
use crate::casing::{camel_case, kebab_case};
use crate::normalized::*;
use crate::registry::PredefinedTypes;
use crate::special::{reserved_split, SpecialCases};
use tracing::debug;

/// Highest context tag number kept on options and fields.
pub const MAX_CONTEXT_TAG: u64 = 254;

/// Turns raw definitions into normalized ones.
pub struct Normalizer<'a> {
    registry: &'a dyn PredefinedTypes,
    special_cases: SpecialCases,
}

impl<'a> Normalizer<'a> {
    /// Normalizer consulting `registry` first, with the built-in
    /// well-known-name table.
    pub fn new(registry: &'a dyn PredefinedTypes) -> Self {
        Normalizer {
            registry,
            special_cases: SpecialCases::default(),
        }
    }

    pub fn with_special_cases(mut self, special_cases: SpecialCases) -> Self {
        self.special_cases = special_cases;
        self
    }

    pub fn special_cases(&self) -> &SpecialCases {
        &self.special_cases
    }

    pub fn normalize(&self, definition: &Definition) -> NormalizedDefinition {
        if let Some(record) = self.registry.lookup(&definition.name) {
            debug!(name = %definition.name, "using predefined type");
            return record.clone();
        }
        let shape = &definition.shape;
        NormalizedDefinition {
            name: kebab_case(&definition.name),
            original: definition.name.clone(),
            primitive: definition.primitive,
            series: shape.series,
            comment: shape.comment.clone(),
            ty: self.normalize_shape(Some(&definition.name), shape),
        }
    }

    /// Normalize each definition as the iterator is advanced.
    pub fn normalize_all<'d>(
        &'d self,
        definitions: &'d [Definition],
    ) -> Box<dyn Iterator<Item = NormalizedDefinition> + 'd> {
        Box::new(definitions.iter().map(move |d| self.normalize(d)))
    }

    /// `name` is the definition name for top-level shapes, used for the
    /// well-known-name lookups; nested shapes have none.
    fn normalize_shape(&self, name: Option<&str>, shape: &Shape) -> NormalizedType {
        match shape.kind() {
            kind @ (Kind::Unsigned | Kind::Integer | Kind::Real | Kind::Double) => {
                numeric(kind, shape)
            }
            kind @ (Kind::OctetString | Kind::CharacterString) => string(kind, shape),
            Kind::BitString => self.bit_string(name, shape),
            Kind::Enumerated => self.enumerated(name, shape),
            Kind::Choice => NormalizedType::Choice {
                base: Kind::Choice,
                options: fields(shape)
                    .map(|(option, context, inner, _)| ChoiceOption {
                        alias: camel_case(option),
                        name: option.to_string(),
                        ty: self.normalize_shape(None, inner),
                        series: inner.series,
                        context: context_tag(context),
                        comment: inner.comment.clone(),
                    })
                    .collect(),
            },
            Kind::Sequence => NormalizedType::Sequence {
                base: Kind::Sequence,
                fields: fields(shape)
                    .map(|(field, context, inner, optional)| SequenceField {
                        alias: camel_case(field),
                        name: field.to_string(),
                        ty: self.normalize_shape(None, inner),
                        series: inner.series,
                        context: context_tag(context),
                        optional,
                        comment: inner.comment.clone(),
                    })
                    .collect(),
            },
            Kind::Any | Kind::Reference => NormalizedType::reference(&shape.ty),
        }
    }

    fn bit_string(&self, name: Option<&str>, shape: &Shape) -> NormalizedType {
        let mut bits: Vec<NamedBit> = match &shape.items {
            Some(_) => numbered(shape)
                .map(|(bit, position)| NamedBit {
                    alias: camel_case(bit),
                    name: bit.to_string(),
                    position,
                })
                .collect(),
            None => return NormalizedType::reference(&shape.ty),
        };
        bits.sort_by_key(|b| b.position);
        let computed = bits.last().map_or(0, |b| b.position.saturating_add(1));

        let (length, extensible, proprietary) =
            match name.and_then(|n| self.special_cases.bit_string(n)) {
                Some(known) => (
                    Length::new(computed as f64, known.max_length as f64),
                    true,
                    Some(known.proprietary),
                ),
                None => (Length::Exact(computed as f64), shape.extensible, None),
            };
        NormalizedType::BitString {
            base: Kind::BitString,
            bits,
            length,
            extensible,
            proprietary,
        }
    }

    fn enumerated(&self, name: Option<&str>, shape: &Shape) -> NormalizedType {
        let mut values: Vec<NamedValue> = match &shape.items {
            Some(_) => numbered(shape)
                .map(|(value, constant)| NamedValue {
                    alias: camel_case(value),
                    name: value.to_string(),
                    constant,
                })
                .collect(),
            None => return NormalizedType::reference(&shape.ty),
        };
        values.sort_by_key(|v| v.constant);
        let mut range = ValueRange {
            minimum: values.first().map_or(0, |v| v.constant),
            maximum: values.last().map_or(0, |v| v.constant.saturating_add(1)),
        };

        let mut extensible = shape.extensible;
        let mut reserved = None;
        let mut proprietary = None;
        if let Some(known) = name.and_then(|n| self.special_cases.enumerated(n)) {
            range = known.range;
            extensible = true;
            reserved = Some(known.reserved);
            proprietary = Some(known.proprietary);
        } else if shape.extensible {
            match documented_split(shape) {
                Some((standard, custom)) => {
                    reserved = Some(standard);
                    proprietary = Some(custom);
                }
                None => {
                    debug!(name = name.unwrap_or("<inline>"), "extensible enumeration without documented split");
                    proprietary = Some(Span::UNSPECIFIED);
                }
            }
        }

        NormalizedType::Enumerated {
            base: Kind::Enumerated,
            values,
            range,
            extensible,
            reserved,
            proprietary,
        }
    }
}

fn numeric(base: Kind, shape: &Shape) -> NormalizedType {
    match shape.range {
        Some(range) => NormalizedType::Numeric {
            base,
            minimum: range.min,
            maximum: range.max,
        },
        None => NormalizedType::reference(&shape.ty),
    }
}

fn string(base: Kind, shape: &Shape) -> NormalizedType {
    match shape.size {
        Some(size) => NormalizedType::String {
            base,
            length: Length::new(size.min, size.max),
        },
        None => NormalizedType::reference(&shape.ty),
    }
}

/// `(name, number)` of simple items.
fn numbered(shape: &Shape) -> impl Iterator<Item = (&str, i64)> {
    shape.items.iter().flatten().filter_map(|item| match item {
        Item::Simple { name, number, .. } => Some((name.as_str(), *number)),
        Item::Field { .. } => None,
    })
}

/// `(name, context, shape, optional)` of field items.
fn fields(shape: &Shape) -> impl Iterator<Item = (&str, Option<u64>, &Shape, bool)> {
    shape.items.iter().flatten().filter_map(|item| match item {
        Item::Field {
            name,
            context,
            shape,
            optional,
        } => Some((name.as_str(), *context, shape, *optional)),
        Item::Simple { .. } => None,
    })
}

fn context_tag(context: Option<u64>) -> Option<u8> {
    context
        .filter(|&n| n <= MAX_CONTEXT_TAG)
        .and_then(|n| u8::try_from(n).ok())
}

/// Reserved/proprietary split from the definition comment, then from item
/// comments.
fn documented_split(shape: &Shape) -> Option<(Span, Span)> {
    shape
        .comment
        .as_deref()
        .into_iter()
        .chain(shape.items.iter().flatten().filter_map(Item::comment))
        .find_map(reserved_split)
}
