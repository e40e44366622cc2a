//! Well-known type names whose value space is fixed by the standard, and
//! extraction of the reserved/proprietary split from documentation text.
//!
//! The tables are plain lookups so callers can add or replace entries
//! without touching the normalizer.

use crate::normalized::{Span, ValueRange};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Fixed value space of a well-known enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumeratedOverride {
    pub range: ValueRange,
    pub reserved: Span,
    pub proprietary: Span,
}

impl EnumeratedOverride {
    /// Standard values `0..=reserved_to`, vendor values up to `proprietary_to`.
    pub const fn split(reserved_to: i64, proprietary_to: i64) -> Self {
        EnumeratedOverride {
            range: ValueRange {
                minimum: 0,
                maximum: proprietary_to + 1,
            },
            reserved: Span::new(0, reserved_to),
            proprietary: Span::new(reserved_to + 1, proprietary_to),
        }
    }
}

/// Fixed size of a well-known bit string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitStringOverride {
    pub max_length: i64,
    pub proprietary: Span,
}

/// Lookup of overrides by source definition name.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialCases {
    enumerated: HashMap<String, EnumeratedOverride>,
    bit_strings: HashMap<String, BitStringOverride>,
}

impl Default for SpecialCases {
    fn default() -> Self {
        let mut cases = SpecialCases::empty();
        for (name, split) in [
            ("BACnetObjectType", EnumeratedOverride::split(127, 1023)),
            ("BACnetPropertyIdentifier", EnumeratedOverride::split(511, 4_194_303)),
            ("BACnetEngineeringUnits", EnumeratedOverride {
                range: ValueRange { minimum: 0, maximum: 65536 },
                reserved: Span::new(0, 255),
                proprietary: Span::new(256, 47807),
            }),
            ("BACnetEventType", EnumeratedOverride::split(63, 65535)),
            ("BACnetReliability", EnumeratedOverride::split(63, 65535)),
            ("BACnetLifeSafetyMode", EnumeratedOverride::split(255, 65535)),
            ("BACnetAuditOperation", EnumeratedOverride::split(31, 63)),
        ] {
            cases.insert_enumerated(name, split);
        }
        cases.insert_bit_string(
            "BACnetAuditOperationFlags",
            BitStringOverride {
                max_length: 64,
                proprietary: Span::new(32, 63),
            },
        );
        cases
    }
}

impl SpecialCases {
    /// No overrides at all.
    pub fn empty() -> Self {
        SpecialCases {
            enumerated: HashMap::new(),
            bit_strings: HashMap::new(),
        }
    }

    pub fn insert_enumerated(&mut self, name: impl Into<String>, value: EnumeratedOverride) {
        self.enumerated.insert(name.into(), value);
    }

    pub fn insert_bit_string(&mut self, name: impl Into<String>, value: BitStringOverride) {
        self.bit_strings.insert(name.into(), value);
    }

    /// Drop any override registered under `name`.
    pub fn remove(&mut self, name: &str) {
        self.enumerated.remove(name);
        self.bit_strings.remove(name);
    }

    pub fn enumerated(&self, name: &str) -> Option<&EnumeratedOverride> {
        self.enumerated.get(name)
    }

    pub fn bit_string(&self, name: &str) -> Option<&BitStringOverride> {
        self.bit_strings.get(name)
    }
}

static SPLIT_SENTENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)values\s+(\d+)\s*-\s*(\d+)\s+are\s+reserved\s+for\s+definition\s+by\s+ASHRAE\.?\s+Enumerated\s+values\s+(\d+)\s*-\s*(\d+)\s+may\s+be\s+used\s+by\s+others",
    )
    .expect("split sentence pattern")
});

/// Reserved and proprietary spans named by the standard documentation
/// sentence, if `text` contains it.
pub fn reserved_split(text: &str) -> Option<(Span, Span)> {
    let caps = SPLIT_SENTENCE.captures(text)?;
    let n = |i: usize| caps.get(i)?.as_str().parse::<i64>().ok();
    Some((Span::new(n(1)?, n(2)?), Span::new(n(3)?, n(4)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_split_from_wrapped_sentence() {
        let text = "Enumerated values 0-63 are reserved for definition by ASHRAE.  Enumerated values \
                    64-65535 may be used by others subject to the procedures and constraints described in Clause 23.";
        assert_eq!(
            reserved_split(text),
            Some((Span::new(0, 63), Span::new(64, 65535)))
        );
    }

    #[test]
    fn other_text_has_no_split() {
        assert_eq!(reserved_split("values 0-63 are reserved"), None);
        assert_eq!(reserved_split(""), None);
    }

    #[test]
    fn defaults_cover_object_type_and_audit_flags() {
        let cases = SpecialCases::default();
        let object_type = cases.enumerated("BACnetObjectType").unwrap();
        assert_eq!(object_type.range, ValueRange { minimum: 0, maximum: 1024 });
        assert_eq!(object_type.proprietary, Span::new(128, 1023));
        let flags = cases.bit_string("BACnetAuditOperationFlags").unwrap();
        assert_eq!(flags.max_length, 64);
        assert_eq!(flags.proprietary, Span::new(32, 63));
    }

    #[test]
    fn tables_can_be_edited() {
        let mut cases = SpecialCases::default();
        cases.remove("BACnetObjectType");
        assert!(cases.enumerated("BACnetObjectType").is_none());
        cases.insert_enumerated("VendorMode", EnumeratedOverride::split(9, 99));
        assert_eq!(cases.enumerated("VendorMode").unwrap().proprietary, Span::new(10, 99));
    }
}
