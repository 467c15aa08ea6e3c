//! Declarative payload validation
//!
//! Each entity declares its rule set once as a [`Schema`]; every incoming
//! payload goes through the same generic [`SchemaValidator`] before it
//! reaches the store.
//!
//! # Design Principles
//!
//! - Rule sets are data, not code
//! - Every violated field is reported
//! - Unknown fields are dropped, never persisted
//! - Validation has no side effects

mod errors;
mod types;
mod validator;

pub use errors::{DetailContext, ValidationDetail, ValidationError, ValidationResult};
pub use types::{FieldRule, FieldType, Schema};
pub use validator::{is_email, validate_into, SchemaValidator};
