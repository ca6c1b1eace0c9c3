//! Deterministic sample generation from a [`SchemaNode`]
//!
//! Samples pre-fill endpoint test inputs. Generation never fails and never
//! draws randomness: the same schema always yields the same value, and that
//! value always validates against the schema it came from.

use crate::node::SchemaNode;
use serde_json::{Map, Value};

/// Placeholder used for unconstrained strings
pub const SAMPLE_STRING: &str = "sample string";

/// Produce a sample value that conforms to `schema`
pub fn generate_sample(schema: &SchemaNode) -> Value {
    match schema {
        SchemaNode::String(s) => {
            if let Some(first) = s.enum_values.as_ref().and_then(|values| values.first()) {
                return first.clone();
            }
            s.default
                .clone()
                .unwrap_or_else(|| Value::String(SAMPLE_STRING.to_string()))
        }
        SchemaNode::Number(n) | SchemaNode::Integer(n) => n
            .default
            .clone()
            .or_else(|| n.minimum.clone().map(Value::Number))
            .unwrap_or_else(|| Value::from(0)),
        SchemaNode::Boolean(b) => b.default.clone().unwrap_or(Value::Bool(true)),
        SchemaNode::Array(a) => match &a.items {
            Some(items) => Value::Array(vec![generate_sample(items)]),
            None => Value::Array(Vec::new()),
        },
        SchemaNode::Object(o) => {
            let members = o
                .properties
                .iter()
                .flatten()
                .map(|(name, property)| (name.clone(), generate_sample(property)))
                .collect::<Map<String, Value>>();
            Value::Object(members)
        }
        SchemaNode::Any => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample(schema: Value) -> Value {
        generate_sample(&SchemaNode::from_value(&schema).unwrap())
    }

    #[test]
    fn test_string_precedence() {
        assert_eq!(
            sample(json!({"type": "string", "enum": ["gpt", "claude"], "default": "x"})),
            json!("gpt")
        );
        assert_eq!(sample(json!({"type": "string", "enum": [], "default": "x"})), json!("x"));
        assert_eq!(sample(json!({"type": "string", "default": ""})), json!(""));
        assert_eq!(sample(json!({"type": "string"})), json!("sample string"));
    }

    #[test]
    fn test_number_precedence_without_coercion() {
        assert_eq!(sample(json!({"type": "number", "default": 0.5, "minimum": 1})), json!(0.5));
        assert_eq!(sample(json!({"type": "integer", "minimum": 2.5})), json!(2.5));
        assert_eq!(sample(json!({"type": "integer", "default": 0})), json!(0));
        assert_eq!(sample(json!({"type": "number"})), json!(0));
    }

    #[test]
    fn test_boolean_default() {
        assert_eq!(sample(json!({"type": "boolean", "default": false})), json!(false));
        assert_eq!(sample(json!({"type": "boolean"})), json!(true));
    }

    #[test]
    fn test_array_has_at_most_one_element() {
        assert_eq!(
            sample(json!({"type": "array", "items": {"type": "integer", "minimum": 3}})),
            json!([3])
        );
        assert_eq!(sample(json!({"type": "array"})), json!([]));
    }

    #[test]
    fn test_object_generates_every_property_in_order() {
        let value = sample(json!({
            "type": "object",
            "properties": {
                "prompt": {"type": "string"},
                "temperature": {"type": "number", "default": 0.7},
                "options": {
                    "type": "object",
                    "properties": {"stream": {"type": "boolean", "default": false}}
                }
            },
            "required": ["prompt"]
        }));
        assert_eq!(
            value,
            json!({
                "prompt": "sample string",
                "temperature": 0.7,
                "options": {"stream": false}
            })
        );
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["prompt", "temperature", "options"]);
    }

    #[test]
    fn test_object_without_properties() {
        assert_eq!(sample(json!({"type": "object", "required": ["x"]})), json!({}));
    }

    #[test]
    fn test_untyped_is_null() {
        assert_eq!(sample(json!({})), Value::Null);
        assert_eq!(sample(json!({"type": "date"})), Value::Null);
    }
}
