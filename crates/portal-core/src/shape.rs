//! Response shape contracts.
//!
//! A backend response is trusted only when it decodes completely into the
//! declared shape: the top level is an array, every element carries the
//! entity's required fields with the right types, and ids are unique within
//! the collection. One bad element rejects the whole response.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use crate::models::{Bookmark, BookmarkSection, Record, Switch, Task};

/// Why a response failed its contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeViolation {
    #[error("response is not valid JSON: {0}")]
    NotJson(String),

    #[error("expected an array, found {found}")]
    NotAnArray { found: String },

    #[error("element {path}: {message}")]
    InvalidElement { path: String, message: String },

    #[error("duplicate id {id} at {path}")]
    DuplicateId { id: i64, path: String },

    #[error("expected {expected}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: String,
    },
}

/// A response type with a structural contract.
///
/// `from_response` is the validator and decoder in one step, so a value that
/// passes validation can never fail to decode afterwards.
pub trait Shape: Sized {
    /// Short description of the expected shape for diagnostics.
    const EXPECTED: &'static str;

    fn from_response(value: Value) -> Result<Self, ShapeViolation>;

    /// Whether `value` satisfies the contract.
    fn conforms(value: &Value) -> bool {
        Self::from_response(value.clone()).is_ok()
    }
}

impl Shape for Vec<Switch> {
    const EXPECTED: &'static str = "array of {id, name, ip, location?, notes?}";

    fn from_response(value: Value) -> Result<Self, ShapeViolation> {
        let mut seen = HashSet::new();
        decode_records(value, "", &mut seen)
    }
}

impl Shape for Vec<Task> {
    const EXPECTED: &'static str = "array of {id, title, completed (0/1), created_at}";

    fn from_response(value: Value) -> Result<Self, ShapeViolation> {
        let mut seen = HashSet::new();
        decode_records(value, "", &mut seen)
    }
}

impl Shape for Vec<BookmarkSection> {
    const EXPECTED: &'static str =
        "array of {id, title, links: array of {id, label, url, section, description?, tags?}}";

    fn from_response(value: Value) -> Result<Self, ShapeViolation> {
        #[derive(Deserialize)]
        struct RawSection {
            id: String,
            title: String,
            links: Value,
        }

        let items = expect_array(value)?;
        // Bookmark ids are unique across the whole collection, not per section.
        let mut seen = HashSet::new();
        let mut sections = Vec::with_capacity(items.len());

        for (index, item) in items.into_iter().enumerate() {
            let path = format!("[{}]", index);
            let raw: RawSection = decode_element(item, &path)?;
            let links: Vec<Bookmark> =
                decode_records(raw.links, &format!("{}.links", path), &mut seen)?;
            sections.push(BookmarkSection {
                id: raw.id,
                title: raw.title,
                links,
            });
        }

        Ok(sections)
    }
}

/// Acknowledgement of a write that returns nothing meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ack;

impl Shape for Ack {
    const EXPECTED: &'static str = "void/ack";

    fn from_response(_value: Value) -> Result<Self, ShapeViolation> {
        Ok(Ack)
    }
}

/// Id of a record created or saved by a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i64);

impl Shape for RecordId {
    const EXPECTED: &'static str = "integer id";

    fn from_response(value: Value) -> Result<Self, ShapeViolation> {
        value.as_i64().map(RecordId).ok_or_else(|| ShapeViolation::Unexpected {
            expected: Self::EXPECTED,
            found: json_kind(&value).to_string(),
        })
    }
}

/// JSON type name of a value, for messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expect_array(value: Value) -> Result<Vec<Value>, ShapeViolation> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(ShapeViolation::NotAnArray {
            found: json_kind(&other).to_string(),
        }),
    }
}

fn decode_element<T: DeserializeOwned>(item: Value, path: &str) -> Result<T, ShapeViolation> {
    serde_json::from_value(item).map_err(|e| ShapeViolation::InvalidElement {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn decode_records<T>(
    value: Value,
    prefix: &str,
    seen: &mut HashSet<i64>,
) -> Result<Vec<T>, ShapeViolation>
where
    T: DeserializeOwned + Record,
{
    let items = match value {
        Value::Array(items) => items,
        other if prefix.is_empty() => {
            return Err(ShapeViolation::NotAnArray {
                found: json_kind(&other).to_string(),
            })
        }
        other => {
            return Err(ShapeViolation::InvalidElement {
                path: prefix.to_string(),
                message: format!("expected an array, found {}", json_kind(&other)),
            })
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let path = format!("{}[{}]", prefix, index);
        let record: T = decode_element(item, &path)?;
        if !seen.insert(record.id()) {
            return Err(ShapeViolation::DuplicateId {
                id: record.id(),
                path,
            });
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_switches_valid_array() {
        let switches = Vec::<Switch>::from_response(json!([
            {"id": 1, "name": "Core Switch", "ip": "192.168.10.2"},
            {"id": 2, "name": "Switch Piso 2", "ip": "192.168.20.2", "location": "Piso 2"}
        ]))
        .unwrap();
        assert_eq!(switches.len(), 2);
        assert_eq!(switches[1].location.as_deref(), Some("Piso 2"));
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(Vec::<Task>::from_response(json!([])).unwrap().is_empty());
        assert!(Vec::<BookmarkSection>::conforms(&json!([])));
    }

    #[test]
    fn test_non_array_is_rejected() {
        let err = Vec::<Switch>::from_response(json!({"switches": []})).unwrap_err();
        assert_eq!(
            err,
            ShapeViolation::NotAnArray {
                found: "object".to_string()
            }
        );
        assert!(!Vec::<Task>::conforms(&json!(null)));
    }

    #[test]
    fn test_one_bad_element_rejects_whole_response() {
        let err = Vec::<Switch>::from_response(json!([
            {"id": 1, "name": "Core Switch", "ip": "192.168.10.2"},
            {"id": 2, "name": "Sin IP"}
        ]))
        .unwrap_err();
        match err {
            ShapeViolation::InvalidElement { path, message } => {
                assert_eq!(path, "[1]");
                assert!(message.contains("ip"));
            }
            other => panic!("Expected InvalidElement, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        assert!(!Vec::<Switch>::conforms(&json!([
            {"id": "uno", "name": "Core", "ip": "10.0.0.1"}
        ])));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let err = Vec::<Task>::from_response(json!([
            {"id": 4, "title": "a", "completed": 0, "created_at": "t"},
            {"id": 4, "title": "b", "completed": 1, "created_at": "t"}
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ShapeViolation::DuplicateId {
                id: 4,
                path: "[1]".to_string()
            }
        );
    }

    #[test]
    fn test_bookmark_sections_nested_path_in_error() {
        let err = Vec::<BookmarkSection>::from_response(json!([
            {"id": "admin", "title": "Admin", "links": [
                {"id": 1, "label": "Firewall", "url": "https://192.168.10.1", "section": "admin"},
                {"id": 2, "label": "NAS", "section": "admin"}
            ]}
        ]))
        .unwrap_err();
        match err {
            ShapeViolation::InvalidElement { path, .. } => assert_eq!(path, "[0].links[1]"),
            other => panic!("Expected InvalidElement, got {:?}", other),
        }
    }

    #[test]
    fn test_bookmark_ids_unique_across_sections() {
        let err = Vec::<BookmarkSection>::from_response(json!([
            {"id": "a", "title": "A", "links": [
                {"id": 1, "label": "x", "url": "u", "section": "a"}
            ]},
            {"id": "b", "title": "B", "links": [
                {"id": 1, "label": "y", "url": "v", "section": "b"}
            ]}
        ]))
        .unwrap_err();
        assert!(matches!(err, ShapeViolation::DuplicateId { id: 1, .. }));
    }

    #[test]
    fn test_section_links_must_be_array() {
        let err = Vec::<BookmarkSection>::from_response(json!([
            {"id": "a", "title": "A", "links": "none"}
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "element [0].links: expected an array, found string"
        );
    }

    #[test]
    fn test_ack_accepts_anything() {
        assert!(Ack::conforms(&json!(null)));
        assert!(Ack::conforms(&json!({"ok": true})));
    }

    #[test]
    fn test_record_id_requires_integer() {
        assert_eq!(RecordId::from_response(json!(42)).unwrap(), RecordId(42));
        let err = RecordId::from_response(json!("42")).unwrap_err();
        assert_eq!(err.to_string(), "expected integer id, found string");
    }
}
