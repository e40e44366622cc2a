//! Predefined types whose normalized form takes precedence over what the
//! normalizer would compute.

use crate::casing::kebab_case;
use crate::error::ParseError;
use crate::normalize::Normalizer;
use crate::normalized::NormalizedDefinition;
use crate::parser::parse;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Lookup of already-normalized definitions by original or kebab-case name.
pub trait PredefinedTypes {
    fn lookup(&self, name: &str) -> Option<&NormalizedDefinition>;
}

/// Failure while building a [`Registry`] from sources.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: ParseError,
    },
}

/// In-memory registry, built once and then only read.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    records: Vec<NormalizedDefinition>,
    by_name: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `record` under both its original and kebab-case names. A later
    /// record with the same name replaces an earlier one.
    pub fn insert(&mut self, record: NormalizedDefinition) {
        if let Some(&index) = self.by_name.get(&record.original) {
            self.by_name.insert(record.name.clone(), index);
            self.records[index] = record;
            return;
        }
        let index = self.records.len();
        self.by_name.insert(record.original.clone(), index);
        self.by_name.insert(record.name.clone(), index);
        self.records.push(record);
    }

    /// Parse and normalize each `(origin, text)` source and index every
    /// definition. Definitions are normalized against the records gathered
    /// from earlier sources.
    pub fn from_sources<'a, I>(sources: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut registry = Registry::new();
        for (origin, text) in sources {
            let definitions = parse(text).map_err(|source| RegistryError::Parse {
                origin: origin.to_string(),
                source,
            })?;
            let normalized: Vec<_> = {
                let normalizer = Normalizer::new(&registry);
                definitions.iter().map(|d| normalizer.normalize(d)).collect()
            };
            for record in normalized {
                registry.insert(record);
            }
        }
        Ok(registry)
    }

    /// Read each file and build as [`Registry::from_sources`].
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self, RegistryError> {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            sources.push((path.display().to_string(), text));
        }
        Self::from_sources(sources.iter().map(|(o, t)| (o.as_str(), t.as_str())))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedDefinition> {
        self.records.iter()
    }
}

impl PredefinedTypes for Registry {
    fn lookup(&self, name: &str) -> Option<&NormalizedDefinition> {
        self.by_name
            .get(name)
            .or_else(|| self.by_name.get(&kebab_case(name)))
            .map(|&i| &self.records[i])
    }
}

impl PredefinedTypes for HashMap<String, NormalizedDefinition> {
    fn lookup(&self, name: &str) -> Option<&NormalizedDefinition> {
        self.get(name).or_else(|| self.get(&kebab_case(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalized::NormalizedType;

    fn record(original: &str) -> NormalizedDefinition {
        NormalizedDefinition {
            name: kebab_case(original),
            original: original.to_string(),
            primitive: None,
            series: None,
            comment: None,
            ty: NormalizedType::reference("Unsigned"),
        }
    }

    #[test]
    fn lookup_by_either_name() {
        let mut registry = Registry::new();
        registry.insert(record("BACnetDate"));
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("BACnetDate").is_some());
        assert!(registry.lookup("bacnet-date").is_some());
        assert!(registry.lookup("BACnetTime").is_none());
    }

    #[test]
    fn later_record_replaces_earlier() {
        let mut registry = Registry::new();
        registry.insert(record("Foo"));
        let mut newer = record("Foo");
        newer.comment = Some("newer".to_string());
        registry.insert(newer);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("Foo").unwrap().comment.as_deref(), Some("newer"));
    }

    #[test]
    fn from_sources_reports_origin_on_parse_failure() {
        let err = Registry::from_sources([("std.asn", "Foo ::= Unsigned (3..1)")]).unwrap_err();
        assert!(err.to_string().starts_with("std.asn: line 1"), "{err}");
    }
}
