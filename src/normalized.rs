//! Normalized definitions: the shape handed to documentation, validator
//! and code generators.

use crate::ast::{Kind, Series};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Result of normalizing one top-level definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedDefinition {
    /// Kebab-case key.
    pub name: String,
    /// Name as written in the source.
    pub original: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primitive: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "type")]
    pub ty: NormalizedType,
}

/// Type description: an opaque reference or a base kind with its traits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedType {
    /// Names another type and adds nothing.
    Reference(TypeRef),
    /// `Unsigned`, `Integer`, `Real`, `Double` with a value range.
    Numeric {
        base: Kind,
        #[serde(serialize_with = "serialize_bound")]
        minimum: f64,
        #[serde(serialize_with = "serialize_bound")]
        maximum: f64,
    },
    /// `OctetString`, `CharacterString` with a size.
    String { base: Kind, length: Length },
    BitString {
        base: Kind,
        bits: Vec<NamedBit>,
        length: Length,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        extensible: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        proprietary: Option<Span>,
    },
    Enumerated {
        base: Kind,
        values: Vec<NamedValue>,
        range: ValueRange,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        extensible: bool,
        /// Span kept for the standard body.
        #[serde(skip_serializing_if = "Option::is_none")]
        reserved: Option<Span>,
        /// Span usable for vendor-specific values.
        #[serde(skip_serializing_if = "Option::is_none")]
        proprietary: Option<Span>,
    },
    Choice {
        base: Kind,
        options: Vec<ChoiceOption>,
    },
    Sequence {
        base: Kind,
        fields: Vec<SequenceField>,
    },
}

impl NormalizedType {
    pub fn reference(name: impl Into<String>) -> Self {
        NormalizedType::Reference(TypeRef { name: name.into() })
    }

    /// Base kind; `None` for opaque references.
    pub fn base(&self) -> Option<Kind> {
        match self {
            NormalizedType::Reference(_) => None,
            NormalizedType::Numeric { base, .. }
            | NormalizedType::String { base, .. }
            | NormalizedType::BitString { base, .. }
            | NormalizedType::Enumerated { base, .. }
            | NormalizedType::Choice { base, .. }
            | NormalizedType::Sequence { base, .. } => Some(*base),
        }
    }
}

/// Opaque reference to another type by its source name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
}

impl Serialize for TypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("alias", &Option::<&str>::None)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("base", &Option::<&str>::None)?;
        map.end()
    }
}

/// Size of a string or bit string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Length {
    Exact(#[serde(serialize_with = "serialize_bound")] f64),
    Between {
        #[serde(serialize_with = "serialize_bound")]
        minimum: f64,
        #[serde(serialize_with = "serialize_bound")]
        maximum: f64,
    },
}

impl Length {
    pub fn new(minimum: f64, maximum: f64) -> Self {
        if minimum == maximum {
            Length::Exact(minimum)
        } else {
            Length::Between { minimum, maximum }
        }
    }
}

/// Value range of an enumeration: `maximum` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueRange {
    pub minimum: i64,
    pub maximum: i64,
}

/// Inclusive span of values or bit positions.
///
/// `{from: 1, to: 0}` marks an extensible type whose proprietary span is
/// not specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub from: i64,
    pub to: i64,
}

impl Span {
    pub const UNSPECIFIED: Span = Span { from: 1, to: 0 };

    pub const fn new(from: i64, to: i64) -> Self {
        Span { from, to }
    }

    pub fn is_unspecified(&self) -> bool {
        *self == Span::UNSPECIFIED
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedValue {
    pub alias: String,
    pub name: String,
    pub constant: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedBit {
    pub alias: String,
    pub name: String,
    pub position: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceOption {
    pub alias: String,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: NormalizedType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceField {
    pub alias: String,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: NormalizedType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<u8>,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Integral bounds as integers, infinities as `MIN` / `MAX`.
pub(crate) fn serialize_bound<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if *value == f64::NEG_INFINITY {
        serializer.serialize_str("MIN")
    } else if *value == f64::INFINITY {
        serializer.serialize_str("MAX")
    } else if value.fract() == 0.0 && value.abs() < 9.0e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
