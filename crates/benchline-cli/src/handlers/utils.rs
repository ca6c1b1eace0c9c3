//! Shared utilities for command handlers

use crate::error::{Error, Result};
use benchline_core::{Endpoint, SchemaNode};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Key under which endpoint definitions carry their input schema
const INPUT_SCHEMA_KEY: &str = "input_schema";

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Load a JSON or YAML document; `.yaml`/`.yml` files are read as YAML
pub fn load_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
        })
    } else {
        serde_json::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
        })
    }
}

/// Load a schema from a schema file or an endpoint definition
///
/// Endpoint definitions are recognized by their `input_schema` key; an
/// endpoint without one yields `None`.
pub fn load_schema(path: &Path) -> Result<Option<SchemaNode>> {
    let document = load_document(path)?;

    let schema = if looks_like_endpoint(&document) {
        match document.get(INPUT_SCHEMA_KEY) {
            Some(schema) => schema,
            None => return Ok(None),
        }
    } else {
        &document
    };

    SchemaNode::from_value(schema)
        .map(Some)
        .map_err(|source| Error::Schema {
            path: path.to_path_buf(),
            source,
        })
}

/// Load an endpoint definition; `id` defaults to `name` when omitted
pub fn load_endpoint(path: &Path) -> Result<Endpoint> {
    let mut document = load_document(path)?;

    if let Some(object) = document.as_object_mut() {
        if !object.contains_key("id") {
            if let Some(name) = object.get("name").cloned() {
                object.insert("id".to_string(), name);
            }
        }
    }

    serde_json::from_value(document).map_err(|e| {
        Error::other(format!(
            "Invalid endpoint definition in {}: {}",
            path.display(),
            e
        ))
    })
}

/// Write a document in the format implied by the path's extension
pub fn save_document(path: &Path, value: &Value) -> Result<()> {
    let content = if is_yaml(path) {
        serde_yaml::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    fs::write(path, content)?;
    Ok(())
}

fn looks_like_endpoint(document: &Value) -> bool {
    document.get(INPUT_SCHEMA_KEY).is_some()
        || (document.get("name").map_or(false, Value::is_string) && document.get("type").is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_schema_from_schema_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "schema.yaml", "type: string\nenum: [fast, slow]\n");
        let schema = load_schema(&path).unwrap().unwrap();
        assert_eq!(schema.type_name(), Some("string"));
    }

    #[test]
    fn test_load_schema_from_endpoint() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "endpoint.json",
            r#"{"name": "chat", "input_schema": {"type": "object", "properties": {"prompt": {"type": "string"}}}}"#,
        );
        let schema = load_schema(&path).unwrap().unwrap();
        assert_eq!(schema.type_name(), Some("object"));

        let path = write(&dir, "bare.json", r#"{"name": "ping", "method": "GET"}"#);
        assert!(load_schema(&path).unwrap().is_none());
    }

    #[test]
    fn test_invalid_schema_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "schema.json", r#"{"type": "string", "minLength": "two"}"#);
        let err = load_schema(&path).unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
        assert!(err.to_string().contains("schema.json"));
    }

    #[test]
    fn test_load_endpoint_defaults_id() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "endpoint.yaml", "name: summarize\nmethod: PUT\n");
        let endpoint = load_endpoint(&path).unwrap();
        assert_eq!(endpoint.id, "summarize");
        assert_eq!(endpoint.method, benchline_core::HttpMethod::Put);
    }

    #[test]
    fn test_missing_and_malformed_documents() {
        let dir = TempDir::new().unwrap();
        let err = load_document(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));

        let path = write(&dir, "broken.json", "{not json");
        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { .. }));
    }

    #[test]
    fn test_save_document_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.yaml");
        save_document(&path, &json!({"prompt": "sample string"})).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "prompt: sample string\n");
    }
}
