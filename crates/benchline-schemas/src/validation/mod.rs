//! Structural validation of endpoint inputs
//!
//! This module checks values against a [`SchemaNode`](crate::SchemaNode) and
//! reports violations as path-qualified messages of the form
//! `"{path}: {message}"`, e.g. `root.messages[1].role: expected string, got number`.
//!
//! Copyright (c) 2025 Benchline Team
//! Licensed under the Apache-2.0 license

pub mod base;
pub mod error;
pub mod validator;

pub use base::{ValidationContext, ROOT_PATH};
pub use error::{ValidationError, ValidationErrors, ValidationResult};
pub use validator::SchemaValidator;

use crate::node::SchemaNode;
use serde_json::Value;

/// Validate `value` against `schema`, anchoring error paths at `path`
///
/// # Examples
///
/// ```rust
/// use benchline_schemas::{validate_value, SchemaNode};
/// use serde_json::json;
///
/// let schema = SchemaNode::from_value(&json!({"type": "integer"})).unwrap();
/// assert_eq!(
///     validate_value(&json!(5.5), &schema, "root"),
///     vec!["root: expected integer, got float".to_string()]
/// );
/// ```
pub fn validate_value(value: &Value, schema: &SchemaNode, path: &str) -> Vec<String> {
    SchemaValidator::new(schema)
        .validate_with_context(value, &ValidationContext::at(path))
        .into_messages()
}

/// Validate an optional input against an optional schema
///
/// A missing schema accepts everything; a missing value is treated like `null`.
pub fn validate_input(value: Option<&Value>, schema: Option<&SchemaNode>) -> ValidationResult {
    match (value, schema) {
        (Some(value), Some(schema)) => SchemaValidator::new(schema).validate(value).into(),
        _ => ValidationResult::valid(),
    }
}
