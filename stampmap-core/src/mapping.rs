//! Mapping file I/O
//!
//! Mapping documents persist as JSON (see the wire shape in `types`).
//! A failed load leaves the caller's current document untouched; saving
//! serializes a consistent snapshot with the field order preserved.

use crate::types::MappingDocument;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised by mapping load/save.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed mapping: {0}")]
    Malformed(String),
}

pub type MappingResult<T> = Result<T, MappingError>;

/// Parse a mapping document from JSON text.
///
/// Reserved metadata records (`ID_USER`) are stripped from the editable
/// field set; duplicate ids are tolerated (last write wins) but logged.
pub fn from_json(json: &str) -> MappingResult<MappingDocument> {
    let mut doc: MappingDocument =
        serde_json::from_str(json).map_err(|e| MappingError::Malformed(e.to_string()))?;

    let stripped = doc.strip_reserved();
    if stripped > 0 {
        log::debug!("filtered {stripped} reserved field record(s) from editable set");
    }
    let duplicates = doc.duplicate_ids();
    if !duplicates.is_empty() {
        log::warn!("mapping contains duplicate field ids (last wins): {duplicates:?}");
    }
    Ok(doc)
}

/// Serialize a mapping document to pretty-printed JSON.
pub fn to_json(doc: &MappingDocument) -> MappingResult<String> {
    serde_json::to_string_pretty(doc).map_err(|e| MappingError::Malformed(e.to_string()))
}

pub fn load(path: impl AsRef<Path>) -> MappingResult<MappingDocument> {
    from_json(&fs::read_to_string(path)?)
}

pub fn save(path: impl AsRef<Path>, doc: &MappingDocument) -> MappingResult<()> {
    fs::write(path, to_json(doc)?)?;
    Ok(())
}

/// Loaded example data: field id to stamp value, used for overlay samples
/// and test stamping.
pub type PreviewData = HashMap<String, String>;

/// Parse preview data from a flat JSON object. Non-string scalars are
/// coerced to their display form; null entries are dropped.
pub fn preview_from_json(json: &str) -> MappingResult<PreviewData> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| MappingError::Malformed(e.to_string()))?;
    let serde_json::Value::Object(object) = value else {
        return Err(MappingError::Malformed(
            "preview data must be a JSON object".to_string(),
        ));
    };

    let mut data = PreviewData::new();
    for (key, value) in object {
        let text = match value {
            serde_json::Value::Null => continue,
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        data.insert(key, text);
    }
    Ok(data)
}

pub fn load_preview(path: impl AsRef<Path>) -> MappingResult<PreviewData> {
    preview_from_json(&fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldRecord, RESERVED_USER_FIELD};

    const SAMPLE: &str = r#"{
        "template_sha256": "ab12",
        "template_source": "034122_mit.pdf",
        "font": "Helvetica",
        "size": 10,
        "status": "in-arbeit",
        "fields": [
            {"id": "ID_USER", "page": 1},
            {"id": "name", "page": 1, "type": "text", "x": 100, "y": 640, "w": 200},
            {"id": "zustimmung", "page": 1, "type": "boolean_pair", "x_true": 30, "y_true": 40,
             "x_false": 30, "y_false": 10},
            {"id": "datum", "page": 1, "type": "date_de"}
        ]
    }"#;

    #[test]
    fn test_load_strips_reserved() {
        let doc = from_json(SAMPLE).unwrap();
        assert_eq!(doc.len(), 3);
        assert!(doc.index_of(RESERVED_USER_FIELD).is_none());
        assert_eq!(doc.fields[0].id(), "name");
        assert_eq!(doc.template_sha256.as_deref(), Some("ab12"));
        assert_eq!(doc.font_size(), 10.0);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(from_json("{"), Err(MappingError::Malformed(_))));
    }

    #[test]
    fn test_missing_fields_array() {
        assert!(matches!(
            from_json(r#"{"font": "Helvetica"}"#),
            Err(MappingError::Malformed(_))
        ));
        assert!(matches!(
            from_json(r#"{"fields": "not-an-array"}"#),
            Err(MappingError::Malformed(_))
        ));
    }

    #[test]
    fn test_roundtrip_preserves_order() {
        let mut doc = from_json(SAMPLE).unwrap();
        doc.fields.push(FieldRecord::text("aaa_last"));
        let json = to_json(&doc).unwrap();
        let back = from_json(&json).unwrap();
        let ids: Vec<&str> = back.fields.iter().map(FieldRecord::id).collect();
        // Canonical order is insertion order, never sorted.
        assert_eq!(ids, vec!["name", "zustimmung", "datum", "aaa_last"]);
        assert_eq!(back, doc);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("034122-geld-manual-mapping-v1.json");
        let doc = from_json(SAMPLE).unwrap();
        save(&path, &doc).unwrap();
        assert_eq!(load(&path).unwrap(), doc);
    }

    #[test]
    fn test_preview_coercion() {
        let data = preview_from_json(
            r#"{"name": "Max", "wert": 500.5, "ok": true, "leer": null}"#,
        )
        .unwrap();
        assert_eq!(data.get("name").map(String::as_str), Some("Max"));
        assert_eq!(data.get("wert").map(String::as_str), Some("500.5"));
        assert_eq!(data.get("ok").map(String::as_str), Some("true"));
        assert!(!data.contains_key("leer"));
    }

    #[test]
    fn test_preview_rejects_non_object() {
        assert!(preview_from_json("[1, 2]").is_err());
    }
}
