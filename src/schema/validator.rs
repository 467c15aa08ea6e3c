//! Payload validation against a [`Schema`]
//!
//! Validation semantics:
//! - Every field is checked; violations are collected, not short-circuited
//! - At most one violation per field, the first failing rule wins
//!   (presence, type, empty, length, format)
//! - `null` is a type violation, not absence
//! - Lengths are counted in characters
//! - Undeclared fields are dropped from the normalized output
//! - Boolean fields accept `"true"` / `"false"` strings
//!
//! Validation is pure: the same input always yields the same result.

use std::sync::OnceLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::errors::{ValidationDetail, ValidationError, ValidationResult};
use super::types::{FieldRule, FieldType, Schema};

/// Validator bound to one rule set.
pub struct SchemaValidator<'a> {
    schema: &'a Schema,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a validator for the given rule set.
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Validates a payload and returns its normalized form.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every violated field when the
    /// payload is not an object or breaks any rule.
    pub fn validate(&self, input: &Value) -> ValidationResult<Map<String, Value>> {
        let obj = input
            .as_object()
            .ok_or_else(|| ValidationError::from(ValidationDetail::not_an_object(input)))?;

        let mut normalized = Map::new();
        let mut details = Vec::new();

        for rule in &self.schema.fields {
            match obj.get(&rule.name) {
                Some(value) => match check_value(rule, value) {
                    Ok(value) => {
                        normalized.insert(rule.name.clone(), value);
                    }
                    Err(detail) => details.push(detail),
                },
                None if rule.required => details.push(ValidationDetail::missing_field(&rule.name)),
                None => {}
            }
        }

        if details.is_empty() {
            Ok(normalized)
        } else {
            Err(ValidationError::new(details))
        }
    }

    /// Validates a payload and deserializes the normalized form into `T`.
    pub fn validate_into<T: DeserializeOwned>(&self, input: &Value) -> ValidationResult<T> {
        let normalized = self.validate(input)?;
        serde_json::from_value(Value::Object(normalized))
            .map_err(|e| ValidationDetail::unreadable_body(e.to_string()).into())
    }
}

/// Validates `input` against `schema` and deserializes it into `T`.
pub fn validate_into<T: DeserializeOwned>(schema: &Schema, input: &Value) -> ValidationResult<T> {
    SchemaValidator::new(schema).validate_into(input)
}

/// Checks one present value against its rule, returning the normalized value.
fn check_value(rule: &FieldRule, value: &Value) -> Result<Value, ValidationDetail> {
    match rule.field_type {
        FieldType::Bool => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            _ => Err(ValidationDetail::type_mismatch(&rule.name, FieldType::Bool, value)),
        },
        FieldType::String => {
            let s = value.as_str().ok_or_else(|| {
                ValidationDetail::type_mismatch(&rule.name, FieldType::String, value)
            })?;

            if s.is_empty() {
                return Err(ValidationDetail::empty_string(&rule.name));
            }

            let len = s.chars().count();
            if let Some(min) = rule.min_length {
                if len < min {
                    return Err(ValidationDetail::too_short(&rule.name, min, value));
                }
            }
            if let Some(max) = rule.max_length {
                if len > max {
                    return Err(ValidationDetail::too_long(&rule.name, max, value));
                }
            }

            if rule.email && !is_email(s) {
                return Err(ValidationDetail::invalid_email(&rule.name, value));
            }

            Ok(value.clone())
        }
    }
}

/// Returns whether `s` is shaped like `local@domain.tld`.
pub fn is_email(s: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(r"^[^\s@]+@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$")
                .expect("email pattern compiles")
        })
        .is_match(s)
}
