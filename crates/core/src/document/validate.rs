//! Validation for content documents and for the names used to address
//! version, preview and template files on disk.

use serde_json::Value;
use thiserror::Error;

/// Longest accepted file name component.
const MAX_NAME_LEN: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("content document must be a JSON object")]
    NotAnObject,
    #[error("field {field} must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    #[error("invalid name: {0:?}")]
    UnsafeName(String),
    #[error("not a version file name: {0:?}")]
    NotAVersion(String),
}

/// Validate the reserved top-level fields of a content document.
///
/// Everything except `_template` and `_templateVersion` passes through
/// unchecked.
pub fn validate_document(value: &Value) -> Result<(), ValidationError> {
    let Value::Object(map) = value else {
        return Err(ValidationError::NotAnObject);
    };
    match map.get("_template") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => {
            return Err(ValidationError::InvalidField {
                field: "_template",
                expected: "a string or null",
            })
        }
    }
    match map.get("_templateVersion") {
        None | Some(Value::Null) | Some(Value::Number(_)) => {}
        Some(_) => {
            return Err(ValidationError::InvalidField {
                field: "_templateVersion",
                expected: "a number",
            })
        }
    }
    Ok(())
}

/// Check that `name` can be joined onto a store directory without escaping it.
///
/// Only ASCII letters, digits, `-`, `_` and `.` are accepted; leading dots
/// and `..` sequences are rejected.
pub fn validate_file_component(name: &str) -> Result<&str, ValidationError> {
    let safe = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && !name.starts_with('.')
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if safe {
        Ok(name)
    } else {
        Err(ValidationError::UnsafeName(name.to_string()))
    }
}

/// Require a non-empty string field from a request body.
pub fn require_str<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ValidationError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ValidationError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_must_be_object() {
        assert_eq!(
            validate_document(&json!([1, 2])),
            Err(ValidationError::NotAnObject)
        );
        assert!(validate_document(&json!({"hero": {"title": "hi"}})).is_ok());
    }

    #[test]
    fn reserved_fields_are_typed() {
        assert!(validate_document(&json!({"_template": "editorial", "_templateVersion": 3})).is_ok());
        assert!(validate_document(&json!({"_template": null})).is_ok());
        assert!(matches!(
            validate_document(&json!({"_template": 7})),
            Err(ValidationError::InvalidField { field: "_template", .. })
        ));
        assert!(matches!(
            validate_document(&json!({"_templateVersion": "two"})),
            Err(ValidationError::InvalidField { field: "_templateVersion", .. })
        ));
    }

    #[test]
    fn file_components_reject_traversal() {
        assert!(validate_file_component("content-2026-01-01T00-00-00.000000000Z.json").is_ok());
        assert!(validate_file_component("p1").is_ok());
        for bad in ["", "../content.json", "..", "a/b", "a\\b", ".hidden", "x..y", "name with space"] {
            assert!(validate_file_component(bad).is_err(), "{bad:?} should be rejected");
        }
        assert!(validate_file_component(&"a".repeat(200)).is_err());
    }

    #[test]
    fn require_str_rejects_blank() {
        assert_eq!(require_str(Some("p1"), "previewId"), Ok("p1"));
        assert_eq!(
            require_str(Some("  "), "previewId"),
            Err(ValidationError::MissingField("previewId"))
        );
        assert_eq!(
            require_str(None, "filename"),
            Err(ValidationError::MissingField("filename"))
        );
    }
}
