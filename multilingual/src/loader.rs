use crate::dynamic::{SchemaDocument, SchemaRegistry};
use crate::error::LoadError;
use crate::record::TranslationRecord;
use serde_json::Value;
use std::fs;
use std::path::Path;

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Load a schema registry from a JSON file
///
/// The file holds a [`SchemaDocument`]:
/// ```json
/// {
///     "typeField": "@type",
///     "defaultType": "User",
///     "schemas": [{ "typeName": "User", "fields": ["status"] }]
/// }
/// ```
///
/// # Errors
/// - File read errors
/// - Invalid JSON
/// - Schemas with malformed names or duplicate fields
pub fn load_schemas_from_file(path: &Path) -> Result<SchemaRegistry, LoadError> {
    tracing::debug!("Loading schemas from: {}", path.display());
    let document: SchemaDocument = serde_json::from_str(&read(path)?)?;
    let registry = SchemaRegistry::from_document(document)?;
    tracing::debug!("Loaded {} schemas", registry.len());
    Ok(registry)
}

/// Load translation rows from a JSON array file
///
/// Each element is a serialized [`TranslationRecord`]. Elements that do not
/// decode are skipped with a warning so one bad row does not void a fixture.
pub fn load_records_from_file(path: &Path) -> Result<Vec<TranslationRecord>, LoadError> {
    tracing::debug!("Loading translation records from: {}", path.display());
    let rows: Vec<Value> = serde_json::from_str(&read(path)?)?;

    let mut records = Vec::with_capacity(rows.len());
    for (position, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<TranslationRecord>(row) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("Skipping record {} in {}: {}", position, path.display(), e),
        }
    }
    Ok(records)
}

/// Load a JSON document to resolve
pub fn load_document_from_file(path: &Path) -> Result<Value, LoadError> {
    Ok(serde_json::from_str(&read(path)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ClientType;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_schemas() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "schemas.json",
            r#"{
                "defaultType": "User",
                "schemas": [
                    {"typeName": "User", "fields": ["status", "nickname"]},
                    {"typeName": "UserVO", "scope": "User", "fields": ["status"]}
                ]
            }"#,
        );

        let registry = load_schemas_from_file(&path).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("UserVO").map(|schema| schema.resolved_scope()),
            Some("User".to_string())
        );
    }

    #[test]
    fn test_load_schemas_rejects_invalid_schema() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "schemas.json",
            r#"{"schemas": [{"typeName": "User", "fields": ["a#b"]}]}"#,
        );
        assert!(matches!(
            load_schemas_from_file(&path),
            Err(LoadError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_schemas_from_file(&dir.path().join("absent.json"));
        match result {
            Err(LoadError::Io { path, .. }) => assert!(path.ends_with("absent.json")),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_records_skips_bad_rows() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "records.json",
            r#"[
                {"wordKey": "User.status", "wordSourceValue": "ACTIVE", "wordTargetValue": "激活", "clientType": "WEB"},
                {"wordKey": "User.status", "clientType": "WEB"},
                {"wordKey": "User.status", "wordSourceValue": "LOCKED", "clientType": "KIOSK"}
            ]"#,
        );

        let records = load_records_from_file(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].client_type, ClientType::Web);
        assert_eq!(records[0].target(), Some("激活"));
    }

    #[test]
    fn test_load_records_requires_array() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "records.json", r#"{"wordKey": "User.status"}"#);
        assert!(matches!(
            load_records_from_file(&path),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn test_load_document() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "input.json", r#"[{"status": "ACTIVE"}, null]"#);
        let document = load_document_from_file(&path).unwrap();
        assert_eq!(document.as_array().map(Vec::len), Some(2));
    }
}
