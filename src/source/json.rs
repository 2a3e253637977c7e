//! JSON card profile loader.
//!
//! # Feature
//!
//! Requires the `json` feature.
//!
//! # Supported Formats
//!
//! ## Array format
//!
//! ```json
//! [
//!   {
//!     "name": "Napas",
//!     "alias": "napas",
//!     "type": "Debit Card",
//!     "breakpoint": [4, 8, 12],
//!     "code": ["CVC", 3],
//!     "length": [16, 19],
//!     "idRange": ["9704"]
//!   }
//! ]
//! ```
//!
//! ## Object format (keyed by record key)
//!
//! ```json
//! {
//!   "napas": {
//!     "name": "Napas",
//!     "alias": "napas",
//!     "code": ["CVC", 3],
//!     "length": [16, 19],
//!     "idRange": ["9704"]
//!   }
//! }
//! ```
//!
//! A single record object is accepted as well. Records keep file order.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{ensure_unique, ProfileSchema, ProfileSource, SourceError};
use crate::profile::CardProfile;

/// Loads card profiles from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    /// Creates a source reading `path` on every [`load`](ProfileSource::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads profiles from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Vec<CardProfile>, SourceError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        parse_document(&content, Some(path))
    }

    /// Loads profiles from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Vec<CardProfile>, SourceError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::parse(&content)
    }

    /// Loads profiles from a JSON string.
    ///
    /// ```
    /// use cc_cardtype::source::JsonSource;
    ///
    /// let profiles = JsonSource::parse(r#"[{
    ///     "name": "Napas", "alias": "napas", "type": "Debit Card",
    ///     "breakpoint": [4, 8, 12], "code": ["CVC", 3],
    ///     "length": [16, 19], "idRange": ["9704"]
    /// }]"#).unwrap();
    /// assert_eq!(profiles[0].kind(), "Debit Card");
    /// ```
    pub fn parse(json: &str) -> Result<Vec<CardProfile>, SourceError> {
        parse_document(json, None)
    }
}

impl ProfileSource for JsonSource {
    fn load(&self) -> Result<Vec<CardProfile>, SourceError> {
        Self::from_file(&self.path)
    }
}

fn parse_document(json: &str, path: Option<&Path>) -> Result<Vec<CardProfile>, SourceError> {
    let document: Value = serde_json::from_str(json)
        .map_err(|e| SourceError::Parse(format!("JSON parse error: {}", e)))?;

    let records: Vec<(Option<String>, Value)> = match document {
        Value::Array(items) => items.into_iter().map(|item| (None, item)).collect(),
        Value::Object(map) if is_single_record(&map) => vec![(None, Value::Object(map))],
        Value::Object(map) => map.into_iter().map(|(key, item)| (Some(key), item)).collect(),
        _ => {
            return Err(SourceError::Parse(
                "Invalid JSON format: expected array or object".to_string(),
            ))
        }
    };

    let mut profiles = Vec::with_capacity(records.len());
    for (index, (key, record)) in records.into_iter().enumerate() {
        let schema: ProfileSchema = serde_json::from_value(record).map_err(|e| {
            let key = key.clone().unwrap_or_else(|| format!("#{}", index));
            SourceError::Parse(format!("record \"{}\": {}", key, e))
        })?;
        let key = key.unwrap_or_else(|| schema.alias.clone());
        let profile = schema
            .into_profile()
            .map_err(|source| SourceError::InvalidRecord {
                key,
                path: path.map(Path::to_path_buf),
                source,
            })?;
        profiles.push(profile);
    }

    ensure_unique(&profiles)?;
    Ok(profiles)
}

fn is_single_record(map: &Map<String, Value>) -> bool {
    matches!(map.get("alias"), Some(Value::String(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Attribute, ConstraintError};
    use crate::profile::{IdRange, LengthConstraint};

    const NAPAS: &str = r#"{
        "name": "Napas",
        "alias": "napas",
        "type": "Debit Card",
        "breakpoint": [4, 8, 12],
        "code": ["CVC", 3],
        "length": [16, 19],
        "idRange": ["9704"]
    }"#;

    #[test]
    fn test_parse_array_format() {
        let json = format!(
            r#"[{}, {{
                "name": "Humo",
                "alias": "humo",
                "checkLuhn": false,
                "code": ["CVV", 3],
                "length": [[16, "19"]],
                "idRange": [9860, ["986000", 986099]]
            }}]"#,
            NAPAS
        );
        let profiles = JsonSource::parse(&json).unwrap();
        assert_eq!(profiles.len(), 2);

        let napas = &profiles[0];
        assert_eq!(napas.kind(), "Debit Card");
        assert_eq!(napas.security_code().label(), "CVC");
        assert!(napas.needs_checksum());

        let humo = &profiles[1];
        assert_eq!(humo.kind(), "Credit Card");
        assert!(!humo.needs_checksum());
        assert!(humo.breakpoints().is_empty());
        assert_eq!(humo.lengths(), &[LengthConstraint::Range { min: 16, max: 19 }]);
        assert_eq!(
            humo.id_ranges(),
            &[
                IdRange::Exact(9860),
                IdRange::Range {
                    min: 986000,
                    max: 986099
                }
            ]
        );
    }

    #[test]
    fn test_parse_object_format_keeps_order() {
        let json = format!(
            r#"{{
                "zzz": {},
                "aaa": {{
                    "name": "Humo", "alias": "humo",
                    "code": ["CVV", 3], "length": [16], "idRange": [9860]
                }}
            }}"#,
            NAPAS
        );
        let profiles = JsonSource::parse(&json).unwrap();
        let aliases: Vec<_> = profiles.iter().map(|p| p.alias()).collect();
        assert_eq!(aliases, ["napas", "humo"]);
    }

    #[test]
    fn test_parse_single_record() {
        let profiles = JsonSource::parse(NAPAS).unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].alias(), "napas");
    }

    #[test]
    fn test_invalid_record_reports_key() {
        let json = r#"{
            "broken": {
                "name": "Broken", "alias": "broken", "type": "Debit Card",
                "code": ["CVV", 3], "length": [[19, 16]], "idRange": [1]
            }
        }"#;
        let err = JsonSource::parse(json).unwrap_err();
        match err {
            SourceError::InvalidRecord { key, path, source } => {
                assert_eq!(key, "broken");
                assert!(path.is_none());
                assert!(matches!(source, ConstraintError::MinNotLessThanMax { .. }));
                assert_eq!(source.context().attribute, Attribute::Length);
                assert_eq!(source.context().card_type, "Debit Card");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_wrong_arity_rejected() {
        let json = r#"[{
            "name": "X", "alias": "x",
            "code": ["CVV", 3], "length": [[12, 16, 19]], "idRange": [1]
        }]"#;
        let err = JsonSource::parse(json).unwrap_err();
        assert!(matches!(
            err,
            SourceError::InvalidRecord {
                source: ConstraintError::NotAPair { elements: 3, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_wrong_types_rejected() {
        let json = r#"[{"name": "X", "alias": "x", "code": "CVV", "length": [16], "idRange": [1]}]"#;
        assert!(matches!(JsonSource::parse(json), Err(SourceError::Parse(_))));

        let json = r#"[{"name": "X", "alias": "x", "code": ["CVV", 3], "length": [16.5], "idRange": [1]}]"#;
        assert!(matches!(JsonSource::parse(json), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let json = format!("[{}, {}]", NAPAS, NAPAS);
        assert!(matches!(
            JsonSource::parse(&json),
            Err(SourceError::DuplicateAlias { .. })
        ));
    }

    #[test]
    fn test_empty_and_invalid_json() {
        assert!(JsonSource::parse("[]").unwrap().is_empty());
        assert!(matches!(JsonSource::parse("not valid json"), Err(SourceError::Parse(_))));
        assert!(matches!(JsonSource::parse("42"), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let source = JsonSource::new("/nonexistent/cards.json");
        assert!(matches!(source.load(), Err(SourceError::Io(_))));
    }
}
