use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::validate::{validate_document, ValidationError};

/// Reserved field naming the persisted template override.
pub const TEMPLATE_FIELD: &str = "_template";
/// Reserved field bumped every time the template selection changes.
pub const TEMPLATE_VERSION_FIELD: &str = "_templateVersion";

/// Top-level sections the default page shell expects.
const SHELL_FIELDS: [&str; 2] = ["metadata", "nav"];

/// The whole site's copy as one open-ended JSON object.
///
/// The schema is intentionally loose: only the reserved template fields and
/// the shell sections have accessors, everything else passes through.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDocument(Map<String, Value>);

impl ContentDocument {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a document from an arbitrary JSON value, checking reserved fields.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        validate_document(&value)?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ValidationError::NotAnObject),
        }
    }

    /// Persisted template key, if one is set.
    pub fn template(&self) -> Option<&str> {
        self.0.get(TEMPLATE_FIELD).and_then(Value::as_str)
    }

    pub fn template_version(&self) -> Option<u64> {
        self.0.get(TEMPLATE_VERSION_FIELD).and_then(Value::as_u64)
    }

    /// Select (or clear) the persisted template and bump `_templateVersion`.
    pub fn set_template(&mut self, key: Option<&str>) {
        match key {
            Some(key) => {
                self.0
                    .insert(TEMPLATE_FIELD.to_string(), Value::String(key.to_string()));
            }
            None => {
                self.0.remove(TEMPLATE_FIELD);
            }
        }
        let next = self.template_version().unwrap_or(0) + 1;
        self.0
            .insert(TEMPLATE_VERSION_FIELD.to_string(), Value::from(next));
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.0.get("metadata")
    }

    pub fn nav(&self) -> Option<&Value> {
        self.0.get("nav")
    }

    /// Shell sections the default layout needs but this document lacks.
    pub fn missing_shell_fields(&self) -> Vec<&'static str> {
        SHELL_FIELDS
            .iter()
            .copied()
            .filter(|field| !self.0.contains_key(*field))
            .collect()
    }
}
