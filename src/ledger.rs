//! Persisted algorithm-support ledger.
//!
//! The ledger is a JSON document preceded by a `#` comment header. Loading
//! strips comment lines, checks the document shape against the bundled JSON
//! Schema, and then deserializes into typed records; any failure aborts the
//! run before reconciliation starts. Struct fields are declared in
//! alphabetical order so serialized keys come out sorted.

use crate::error::LedgerError;
use crate::levels::SupportRange;
use crate::names::normalize_name;
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// First line of every ledger written to disk.
pub const LEDGER_HEADER: &str =
    "# This file is autogenerated.  See the crypto-support README for details.";

/// Format of `last_updated`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

const LEDGER_SCHEMA: &str = include_str!("../schema/ledger.schema.json");

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "api_level_text"
    )]
    pub api_level: Option<u32>,
    pub categories: Vec<CategoryRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub algorithms: Vec<AlgorithmRecord>,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmRecord {
    #[serde(default, skip_serializing_if = "is_false", with = "flag_text")]
    pub deprecated: bool,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub supported_api_levels: SupportRange,
}

impl CategoryRecord {
    pub fn empty(name: &str) -> Self {
        Self {
            algorithms: Vec::new(),
            name: name.to_string(),
        }
    }
}

/// Records looked up and sorted by their display name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for CategoryRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for AlgorithmRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

/// First record whose name matches exactly.
pub fn find_by_name<'a, T: Named>(seq: &'a [T], name: &str) -> Option<&'a T> {
    seq.iter().find(|item| item.name() == name)
}

/// First algorithm whose normalized name equals `key`.
pub fn find_by_normalized_name<'a>(
    seq: &'a [AlgorithmRecord],
    key: &str,
) -> Option<&'a AlgorithmRecord> {
    seq.iter().find(|item| normalize_name(&item.name) == key)
}

pub fn sort_by_name<T: Named>(seq: &mut [T]) {
    seq.sort_by(|a, b| a.name().cmp(b.name()));
}

/// Read and validate a ledger file.
pub fn load_ledger(path: &Path) -> Result<Ledger, LedgerError> {
    let text = fs::read_to_string(path).map_err(|source| LedgerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ledger(&text)
}

/// Parse ledger text, ignoring `#` comment lines.
pub fn parse_ledger(text: &str) -> Result<Ledger, LedgerError> {
    let stripped = strip_comment_lines(text);
    let value: Value = serde_json::from_str(&stripped)?;
    validate_shape(&value)?;
    Ok(serde_json::from_value(value)?)
}

fn strip_comment_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

fn validate_shape(value: &Value) -> Result<(), LedgerError> {
    let schema: Value = serde_json::from_str(LEDGER_SCHEMA)?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| LedgerError::Schema(format!("compiling ledger schema: {err}")))?;
    if let Err(errors) = compiled.validate(value) {
        let details = errors
            .map(|err| format!("{}: {}", err.instance_path, err))
            .collect::<Vec<_>>()
            .join("\n");
        return Err(LedgerError::Schema(details));
    }
    Ok(())
}

/// Serialize with 2-space indentation and sorted keys.
pub fn render_ledger_json(ledger: &Ledger) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(ledger)
}

/// Replace `path` with the header line plus the serialized ledger.
///
/// The document is written to a temporary file next to `path` and renamed
/// into place, so a failed run never leaves a half-written ledger.
pub fn write_ledger(path: &Path, ledger: &Ledger) -> Result<(), LedgerError> {
    let body = render_ledger_json(ledger)?;
    let write_err = |source: std::io::Error| LedgerError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    writeln!(tmp, "{LEDGER_HEADER}").map_err(write_err)?;
    writeln!(tmp, "{body}").map_err(write_err)?;
    tmp.persist(path).map_err(|err| write_err(err.error))?;
    Ok(())
}

fn is_false(value: &bool) -> bool {
    !*value
}

// `api_level` is stored as the string form of the integer.
mod api_level_text {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(level: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        match level {
            Some(level) => serializer.collect_str(level),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::String(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid api_level {raw:?}"))),
            Value::Number(num) => num
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid api_level {num}"))),
            other => Err(D::Error::custom(format!("invalid api_level {other}"))),
        }
    }
}

// `deprecated` is written as the string "true"; older files may carry a bool.
mod flag_text {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *flag { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Bool(flag) => Ok(flag),
            Value::String(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" | "" => Ok(false),
                _ => Err(D::Error::custom(format!("invalid deprecated flag {raw:?}"))),
            },
            other => Err(D::Error::custom(format!("invalid deprecated flag {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn algorithm(name: &str, levels: &str) -> AlgorithmRecord {
        AlgorithmRecord {
            deprecated: false,
            name: name.to_string(),
            note: None,
            supported_api_levels: levels.parse().unwrap(),
        }
    }

    #[test]
    fn comment_lines_are_stripped() {
        let text = "# This file is autogenerated.\n  # indented comment\n{\"categories\": []}";
        let ledger = parse_ledger(text).unwrap();
        assert!(ledger.categories.is_empty());
        assert_eq!(ledger.api_level, None);
    }

    #[test]
    fn serialized_keys_are_sorted() {
        let ledger = Ledger {
            api_level: Some(72),
            categories: vec![CategoryRecord {
                algorithms: vec![AlgorithmRecord {
                    deprecated: true,
                    name: "SHA-1".to_string(),
                    note: Some("legacy".to_string()),
                    supported_api_levels: "1-22".parse().unwrap(),
                }],
                name: "MessageDigest".to_string(),
            }],
            last_updated: Some("2009-02-13 23:31:30 UTC".to_string()),
        };
        let text = render_ledger_json(&ledger).unwrap();
        let expected = r#"{
  "api_level": "72",
  "categories": [
    {
      "algorithms": [
        {
          "deprecated": "true",
          "name": "SHA-1",
          "note": "legacy",
          "supported_api_levels": "1-22"
        }
      ],
      "name": "MessageDigest"
    }
  ],
  "last_updated": "2009-02-13 23:31:30 UTC"
}"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn accepts_numeric_api_level_and_bool_flag() {
        let value = json!({
            "api_level": 28,
            "categories": [{
                "name": "Mac",
                "algorithms": [{"name": "HmacSHA1", "supported_api_levels": "1+", "deprecated": false}]
            }]
        });
        let ledger = parse_ledger(&value.to_string()).unwrap();
        assert_eq!(ledger.api_level, Some(28));
        assert!(!ledger.categories[0].algorithms[0].deprecated);
    }

    #[test]
    fn algorithm_without_name_is_rejected() {
        let value = json!({
            "categories": [{
                "name": "Mac",
                "algorithms": [{"supported_api_levels": "1+"}]
            }]
        });
        assert!(matches!(
            parse_ledger(&value.to_string()),
            Err(LedgerError::Schema(_))
        ));
    }

    #[test]
    fn find_helpers_return_first_match() {
        let algorithms = vec![
            algorithm("foot", "1+"),
            algorithm("sha-1", "1+"),
            algorithm("SHA-1", "7+"),
        ];
        assert_eq!(find_by_name(&algorithms, "SHA-1").unwrap().name, "SHA-1");
        assert!(find_by_name(&algorithms, "foo").is_none());
        let found = find_by_normalized_name(&algorithms, "SHA-1").unwrap();
        assert_eq!(found.name, "sha-1");
    }

    #[test]
    fn sort_by_name_orders_bytewise() {
        let mut algorithms = vec![
            algorithm("foot", "1+"),
            algorithm("bar", "1+"),
            algorithm("SHA-3", "1+"),
        ];
        sort_by_name(&mut algorithms);
        let names: Vec<_> = algorithms.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["SHA-3", "bar", "foot"]);
    }
}
