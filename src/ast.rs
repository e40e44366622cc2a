//! Raw definitions produced by the parser.

use serde::{Serialize, Serializer};

/// One top-level `Name ::= [APPLICATION n] Type` statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    pub name: String,
    /// Tag number from an `[APPLICATION n]` annotation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primitive: Option<u32>,
    #[serde(flatten)]
    pub shape: Shape,
}

/// A type usage: base type, repetition, constraints and nested items.
///
/// Shared by top-level definitions and by the nested type of choice options
/// and sequence fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Shape {
    /// Kind tag (`Enumerated`, `BitString`, ...) or a referenced type name.
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Range>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub extensible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Shape {
    pub fn kind(&self) -> Kind {
        Kind::of(&self.ty)
    }
}

/// Repeated occurrences of a type (`SEQUENCE OF` / `SEQUENCE SIZE(n) OF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Unbounded,
    Fixed(u64),
}

impl Serialize for Series {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Series::Unbounded => serializer.serialize_bool(true),
            Series::Fixed(n) => serializer.serialize_u64(*n),
        }
    }
}

/// Inclusive numeric bounds. `MIN` / `MAX` are the infinities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range {
    #[serde(serialize_with = "crate::normalized::serialize_bound")]
    pub min: f64,
    #[serde(serialize_with = "crate::normalized::serialize_bound")]
    pub max: f64,
}

impl Range {
    pub fn pinned(&self) -> bool {
        self.min == self.max
    }
}

/// Entry inside a brace-delimited body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Item {
    /// Enumeration value or named bit: `name (number)`.
    Simple {
        name: String,
        number: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        comment: Option<String>,
    },
    /// Choice option or sequence field: `name [tag] Type OPTIONAL`.
    Field {
        name: String,
        /// Context tag as written; validity is decided at normalization.
        #[serde(rename = "number", skip_serializing_if = "Option::is_none")]
        context: Option<u64>,
        #[serde(flatten)]
        shape: Shape,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        optional: bool,
    },
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::Simple { name, .. } | Item::Field { name, .. } => name,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            Item::Simple { comment, .. } => comment.as_deref(),
            Item::Field { shape, .. } => shape.comment.as_deref(),
        }
    }
}

/// Closed set of kinds the normalizer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Kind {
    Enumerated,
    BitString,
    OctetString,
    CharacterString,
    Unsigned,
    Integer,
    Real,
    Double,
    Any,
    #[serde(rename = "CHOICE")]
    Choice,
    #[serde(rename = "SEQUENCE")]
    Sequence,
    /// Any other name: a reference to another definition.
    #[serde(skip)]
    Reference,
}

/// How items inside braces are written for a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemShape {
    /// `name (number)`
    Simple,
    /// `name [tag]? Type OPTIONAL?`
    Complex,
}

impl Kind {
    /// Classify a raw `type` string.
    pub fn of(tag: &str) -> Kind {
        match tag {
            "Enumerated" => Kind::Enumerated,
            "BitString" => Kind::BitString,
            "OctetString" => Kind::OctetString,
            "CharacterString" => Kind::CharacterString,
            "Unsigned" => Kind::Unsigned,
            "Integer" => Kind::Integer,
            "Real" => Kind::Real,
            "Double" => Kind::Double,
            "Any" => Kind::Any,
            "CHOICE" => Kind::Choice,
            "SEQUENCE" => Kind::Sequence,
            _ => Kind::Reference,
        }
    }

    /// Item syntax for kinds that may carry a body; `None` for all others.
    pub fn item_shape(self) -> Option<ItemShape> {
        match self {
            Kind::Enumerated | Kind::BitString => Some(ItemShape::Simple),
            Kind::Choice | Kind::Sequence => Some(ItemShape::Complex),
            _ => None,
        }
    }

    /// Whether a trailing `, ...` may close the body.
    pub fn allows_extension(self) -> bool {
        self.item_shape().is_some() && self != Kind::Sequence
    }
}
