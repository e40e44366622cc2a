//! # asnnorm: ASN.1 Layout Definitions to a Normalized Tree
//!
//! Parses a constrained ASN.1 notation describing message field layouts into
//! raw definitions, then normalizes each definition for documentation,
//! validators and code generators.
//!
//! ## Notation
//!
//! - **Definition**: `Name ::= [APPLICATION n] Type`
//! - **Type**: `[SEQUENCE [SIZE(n)] OF] Base [SIZE(..)] [(..)] [{ items }]`
//! - **Base**: `ENUMERATED`, `BIT STRING`, `OCTET STRING`,
//!   `ABSTRACT-SYNTAX.&Type`, or a capitalized name (`Unsigned`, `CHOICE`,
//!   `SEQUENCE`, a reference to another definition)
//! - **Constraint**: `(LOW)` or `(LOW..HIGH)`; bounds are numbers, `MIN`, `MAX`
//! - **Items**: `name (n)` in enumerations and bit strings,
//!   `name [tag] Type OPTIONAL` in choices and sequences, optional `, ...`
//!   except in sequences
//! - **Comments**: `--` to end of line
//!
//! ## Example
//!
//! ```text
//! BACnetDoorStatus ::= ENUMERATED {
//!     closed (0),
//!     opened (1),
//!     ...
//! }
//! -- Enumerated values 0-1023 are reserved for definition by ASHRAE.
//! -- Enumerated values 1024-65535 may be used by others subject to the
//! -- procedures and constraints described in Clause 23.
//!
//! BACnetRecipient ::= CHOICE {
//!     device  [0] BACnetObjectIdentifier,
//!     address [1] BACnetAddress
//! }
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use asnnorm::{parse, Normalizer, Registry};
//!
//! let definitions = parse("Percent ::= Unsigned (0..100)")?;
//! let registry = Registry::new();
//! let normalizer = Normalizer::new(&registry);
//! for normalized in normalizer.normalize_all(&definitions) {
//!     println!("{}", serde_json::to_string(&normalized)?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ast;
pub mod casing;
mod cursor;
pub mod error;
pub mod normalize;
pub mod normalized;
pub mod parser;
pub mod registry;
pub mod special;

pub use ast::{Definition, Item, Kind, Range, Series, Shape};
pub use error::ParseError;
pub use normalize::Normalizer;
pub use normalized::{NormalizedDefinition, NormalizedType};
pub use parser::{parse, parse_bytes};
pub use registry::{PredefinedTypes, Registry, RegistryError};
pub use special::SpecialCases;
