//! Mapping document loading.
//!
//! Documents are parsed once, when a version-pair module is activated.
//! Translation traffic never touches the file system.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::{MappingError, Result};

/// A parsed mapping document: table names to identifier arrays or objects.
pub type MappingDocument = Map<String, Value>;

/// File name a version pair's diff document is stored under.
///
/// Other tooling builds and ships these files, so the shape is a contract:
/// `mapping-<new>to<old>.json`.
pub fn diff_file_name(new_version: &str, old_version: &str) -> String {
    format!("mapping-{new_version}to{old_version}.json")
}

/// Load and parse one mapping document.
pub fn load_document(path: &Path) -> Result<MappingDocument> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| MappingError::Malformed(format!("{}: {e}", path.display())))?;
    match value {
        Value::Object(document) => Ok(document),
        _ => Err(MappingError::Malformed(format!(
            "{}: expected a top-level object",
            path.display()
        ))),
    }
}

/// Load a version pair's diff document from `dir`, if the pair ships one.
///
/// A missing file means the pair has no overrides and is not an error. A
/// file that exists but does not parse aborts the load.
pub fn load_diff_document(
    dir: &Path,
    new_version: &str,
    old_version: &str,
) -> Result<Option<MappingDocument>> {
    let path = dir.join(diff_file_name(new_version, old_version));
    if !path.exists() {
        return Ok(None);
    }
    load_document(&path).map(Some)
}

/// Flatten a JSON object of string values into a plain map.
///
/// Scalar extra tables (sound keys, entity names) carry only
/// string-to-string entries; anything else is malformed.
pub fn object_to_string_map(name: &str, object: &Map<String, Value>) -> Result<HashMap<String, String>> {
    let mut map = HashMap::with_capacity(object.len());
    for (key, value) in object {
        match value {
            Value::String(s) => {
                map.insert(key.clone(), s.clone());
            }
            _ => {
                return Err(MappingError::Malformed(format!(
                    "{name} entry {key:?} is not a string"
                )))
            }
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_diff_file_name_contract() {
        assert_eq!(diff_file_name("1.11", "1.10"), "mapping-1.11to1.10.json");
    }

    #[test]
    fn test_load_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping-1.11.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{ "sounds": ["a", "b"] }}"#).unwrap();

        let document = load_document(&path).unwrap();
        assert_eq!(document["sounds"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_load_document_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(matches!(
            load_document(&path),
            Err(MappingError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_diff_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let diff = load_diff_document(dir.path(), "1.11", "1.10").unwrap();
        assert!(diff.is_none());
    }

    #[test]
    fn test_present_diff_is_loaded_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping-1.11to1.10.json");
        fs::write(&path, r#"{ "sounds": { "a": "b" } }"#).unwrap();

        let diff = load_diff_document(dir.path(), "1.11", "1.10").unwrap();
        assert!(diff.is_some());
    }

    #[test]
    fn test_malformed_diff_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping-1.11to1.10.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(load_diff_document(dir.path(), "1.11", "1.10").is_err());
    }

    #[test]
    fn test_object_to_string_map_rejects_non_strings() {
        let object = serde_json::json!({ "a": 1 });
        assert!(object_to_string_map("sounds", object.as_object().unwrap()).is_err());
    }
}
