//! Validation error types
//!
//! A failed validation carries one [`ValidationDetail`] per violated
//! field. Details serialize to the shape clients already consume:
//!
//! ```json
//! { "message": "\"nome\" is required", "path": ["nome"],
//!   "type": "any.required", "context": { "label": "nome", "key": "nome" } }
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::types::FieldType;

/// Context attached to a violation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailContext {
    /// Human label of the offending field
    pub label: String,
    /// Field key (absent for root-level violations)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Length bound that was violated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Offending value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// A single field-level violation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationDetail {
    /// Human-readable message
    pub message: String,
    /// Path to the offending field
    pub path: Vec<String>,
    /// Violation type, e.g. `any.required` or `string.max`
    #[serde(rename = "type")]
    pub kind: String,
    /// Violation context
    pub context: DetailContext,
}

impl ValidationDetail {
    fn field(field: &str, kind: impl Into<String>, message: String) -> Self {
        Self {
            message,
            path: vec![field.to_string()],
            kind: kind.into(),
            context: DetailContext {
                label: field.to_string(),
                key: Some(field.to_string()),
                limit: None,
                value: None,
            },
        }
    }

    fn with_limit(mut self, limit: usize) -> Self {
        self.context.limit = Some(limit);
        self
    }

    fn with_value(mut self, value: &Value) -> Self {
        self.context.value = Some(value.clone());
        self
    }

    /// Required field is absent
    pub fn missing_field(field: &str) -> Self {
        Self::field(field, "any.required", format!("\"{}\" is required", field))
    }

    /// Value has the wrong JSON type
    pub fn type_mismatch(field: &str, expected: FieldType, actual: &Value) -> Self {
        let article = match expected {
            FieldType::String => "a string",
            FieldType::Bool => "a boolean",
        };
        Self::field(
            field,
            format!("{}.base", expected.type_name()),
            format!("\"{}\" must be {}", field, article),
        )
        .with_value(actual)
    }

    /// String is empty
    pub fn empty_string(field: &str) -> Self {
        Self::field(
            field,
            "string.empty",
            format!("\"{}\" is not allowed to be empty", field),
        )
        .with_value(&Value::String(String::new()))
    }

    /// String longer than allowed
    pub fn too_long(field: &str, limit: usize, actual: &Value) -> Self {
        Self::field(
            field,
            "string.max",
            format!(
                "\"{}\" length must be less than or equal to {} characters long",
                field, limit
            ),
        )
        .with_limit(limit)
        .with_value(actual)
    }

    /// String shorter than required
    pub fn too_short(field: &str, limit: usize, actual: &Value) -> Self {
        Self::field(
            field,
            "string.min",
            format!("\"{}\" length must be at least {} characters long", field, limit),
        )
        .with_limit(limit)
        .with_value(actual)
    }

    /// String is not an email address
    pub fn invalid_email(field: &str, actual: &Value) -> Self {
        Self::field(
            field,
            "string.email",
            format!("\"{}\" must be a valid email", field),
        )
        .with_value(actual)
    }

    /// Payload root is not an object
    pub fn not_an_object(actual: &Value) -> Self {
        Self {
            message: "\"value\" must be of type object".to_string(),
            path: Vec::new(),
            kind: "object.base".to_string(),
            context: DetailContext {
                label: "value".to_string(),
                key: None,
                limit: None,
                value: Some(actual.clone()),
            },
        }
    }

    /// Body could not be read as JSON
    pub fn unreadable_body(reason: impl Into<String>) -> Self {
        Self {
            message: reason.into(),
            path: Vec::new(),
            kind: "object.base".to_string(),
            context: DetailContext {
                label: "value".to_string(),
                key: None,
                limit: None,
                value: None,
            },
        }
    }
}

impl fmt::Display for ValidationDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Rejected payload with every reported violation
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", join_messages(.details))]
pub struct ValidationError {
    details: Vec<ValidationDetail>,
}

impl ValidationError {
    /// Create an error from a non-empty list of details
    pub fn new(details: Vec<ValidationDetail>) -> Self {
        Self { details }
    }

    /// Returns the reported violations
    pub fn details(&self) -> &[ValidationDetail] {
        &self.details
    }

    /// Returns whether a violation was reported for `field`
    pub fn mentions(&self, field: &str) -> bool {
        self.details
            .iter()
            .any(|d| d.path.first().map(String::as_str) == Some(field))
    }
}

impl From<ValidationDetail> for ValidationError {
    fn from(detail: ValidationDetail) -> Self {
        Self::new(vec![detail])
    }
}

fn join_messages(details: &[ValidationDetail]) -> String {
    details
        .iter()
        .map(|d| d.message.as_str())
        .collect::<Vec<_>>()
        .join(". ")
}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;
