//! Benchline Schemas - schema model, sample generation and validation
//!
//! This crate holds the schema-driven half of the Benchline endpoint tester:
//!
//! - **Schema model**: [`SchemaNode`], a tagged tree over the JSON Schema
//!   subset endpoint definitions use (`type`, `enum`, `default`, `minimum`,
//!   `maximum`, `minLength`, `maxLength`, `items`, `properties`, `required`)
//! - **Sample generation**: [`generate_sample`] builds a deterministic value
//!   that conforms to a schema, used to pre-fill test inputs
//! - **Validation**: [`validate_value`] reports every structural violation as
//!   an ordered, path-qualified message
//!
//! ## Quick Start
//!
//! ```rust
//! use benchline_schemas::{generate_sample, validate_input, SchemaNode};
//! use serde_json::json;
//!
//! let schema = SchemaNode::from_value(&json!({
//!     "type": "object",
//!     "properties": {
//!         "prompt": {"type": "string"},
//!         "max_tokens": {"type": "integer", "minimum": 1}
//!     },
//!     "required": ["prompt"]
//! })).unwrap();
//!
//! let sample = generate_sample(&schema);
//! assert_eq!(sample, json!({"prompt": "sample string", "max_tokens": 1}));
//! assert!(validate_input(Some(&sample), Some(&schema)).is_valid());
//! ```
//!
//! Not supported: `$ref`, `allOf`/`anyOf`/`oneOf`, `pattern`, `format` and
//! `additionalProperties`. Undeclared object members are accepted silently.
//!
//! Copyright (c) 2025 Benchline Team
//! Licensed under the Apache-2.0 license

pub mod generator;
pub mod node;
pub mod validation;

use serde_json::{Map, Value};

// Re-export commonly used types for convenience
pub use generator::{generate_sample, SAMPLE_STRING};
pub use node::{
    json_type_name, ArraySchema, BooleanSchema, NumberSchema, ObjectSchema, SchemaError,
    SchemaNode, StringSchema, MAX_SCHEMA_DEPTH,
};
pub use validation::{
    validate_input, validate_value, SchemaValidator, ValidationContext, ValidationError,
    ValidationErrors, ValidationResult, ROOT_PATH,
};

/// Generate a sample input for an optional schema
///
/// Endpoints without an input schema get an empty object.
pub fn generate_sample_input(schema: Option<&SchemaNode>) -> Value {
    match schema {
        Some(schema) => generate_sample(schema),
        None => Value::Object(Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sample_input_without_schema() {
        assert_eq!(generate_sample_input(None), json!({}));
    }

    #[test]
    fn test_sample_input_with_untyped_schema() {
        assert_eq!(generate_sample_input(Some(&SchemaNode::Any)), Value::Null);
    }
}
