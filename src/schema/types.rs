//! Rule set definitions
//!
//! A [`Schema`] is an ordered list of [`FieldRule`]s. Each rule declares
//! the field's type, whether it must be present, and the constraints a
//! present value must satisfy. Rule order is the order in which
//! violations are reported.

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// Boolean (accepts `"true"` / `"false"` strings, normalized)
    Bool,
}

impl FieldType {
    /// Returns the type name used in violation types (`string.base`, ...)
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Bool => "boolean",
        }
    }
}

/// Declarative constraints for a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    /// Field name as it appears in the payload
    pub name: String,
    /// Field data type
    pub field_type: FieldType,
    /// Whether field must be present
    pub required: bool,
    /// Minimum length in characters (strings only)
    pub min_length: Option<usize>,
    /// Maximum length in characters (strings only)
    pub max_length: Option<usize>,
    /// Value must be an email address (strings only)
    pub email: bool,
}

impl FieldRule {
    /// Create a string field rule
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::String,
            required: false,
            min_length: None,
            max_length: None,
            email: false,
        }
    }

    /// Create a boolean field rule
    pub fn boolean(name: impl Into<String>) -> Self {
        Self {
            field_type: FieldType::Bool,
            ..Self::string(name)
        }
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Require at least `limit` characters
    pub fn min(mut self, limit: usize) -> Self {
        self.min_length = Some(limit);
        self
    }

    /// Allow at most `limit` characters
    pub fn max(mut self, limit: usize) -> Self {
        self.max_length = Some(limit);
        self
    }

    /// Require an email-shaped value
    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }
}

/// Complete rule set for one entity shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Rule set identifier (the entity name)
    pub name: String,
    /// Field rules, in reporting order
    pub fields: Vec<FieldRule>,
}

impl Schema {
    /// Create a new schema
    pub fn new(name: impl Into<String>, fields: Vec<FieldRule>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_constraints() {
        let rule = FieldRule::string("nome").required().max(150);
        assert_eq!(rule.field_type, FieldType::String);
        assert!(rule.required);
        assert_eq!(rule.max_length, Some(150));
        assert_eq!(rule.min_length, None);
        assert!(!rule.email);
    }

    #[test]
    fn test_boolean_rule_is_optional_by_default() {
        let rule = FieldRule::boolean("favorito");
        assert_eq!(rule.field_type, FieldType::Bool);
        assert!(!rule.required);
    }

    #[test]
    fn test_schema_keeps_rule_order() {
        let schema = Schema::new(
            "contato",
            vec![FieldRule::string("nome").required(), FieldRule::string("email").email()],
        );
        let names: Vec<_> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["nome", "email"]);
        assert!(schema.fields[1].email);
    }

    #[test]
    fn test_field_type_names() {
        assert_eq!(FieldType::String.type_name(), "string");
        assert_eq!(FieldType::Bool.type_name(), "boolean");
    }
}
