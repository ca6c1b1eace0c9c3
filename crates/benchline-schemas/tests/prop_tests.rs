//! Property-based tests binding sample generation to validation
//!
//! Schemas are generated self-consistent (required names are declared,
//! defaults and bounds agree with each other), which is the precondition
//! for a generated sample to validate against its own schema.

use benchline_schemas::{generate_sample, validate_input, validate_value, SchemaNode};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// Strategy for self-consistent string schemas
fn string_schema_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!({"type": "string"})),
        proptest::collection::vec("[a-z]{1,10}", 1..4)
            .prop_map(|values| json!({"type": "string", "enum": values})),
        "[a-z ]{0,10}".prop_map(|default| json!({"type": "string", "default": default})),
        (0u64..=13, 13u64..40).prop_map(|(min, max)| {
            json!({"type": "string", "minLength": min, "maxLength": max})
        }),
    ]
}

/// Strategy for numeric schemas whose generated value lands inside the bounds
fn number_schema_strategy() -> impl Strategy<Value = Value> {
    (
        prop_oneof![Just("number"), Just("integer")],
        proptest::option::of(-1000i64..1000),
        proptest::option::of(0i64..100),
        any::<bool>(),
    )
        .prop_map(|(kind, minimum, span, with_default)| {
            let mut schema = Map::new();
            schema.insert("type".to_string(), json!(kind));
            let floor = minimum.unwrap_or(0);
            if let Some(min) = minimum {
                schema.insert("minimum".to_string(), json!(min));
            }
            if let Some(span) = span {
                schema.insert("maximum".to_string(), json!(floor + span));
            }
            if with_default {
                schema.insert("default".to_string(), json!(floor));
            }
            Value::Object(schema)
        })
}

/// Strategy for leaf schemas
fn leaf_schema_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        string_schema_strategy(),
        number_schema_strategy(),
        proptest::option::of(any::<bool>()).prop_map(|default| match default {
            Some(default) => json!({"type": "boolean", "default": default}),
            None => json!({"type": "boolean"}),
        }),
        Just(json!({})),
    ]
}

/// Strategy for nested, self-consistent schemas
fn schema_strategy() -> impl Strategy<Value = Value> {
    leaf_schema_strategy().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            proptest::option::of(inner.clone()).prop_map(|items| match items {
                Some(items) => json!({"type": "array", "items": items}),
                None => json!({"type": "array"}),
            }),
            proptest::collection::btree_map("[a-z_]{1,8}", (inner, any::<bool>()), 0..5).prop_map(
                |members| {
                    let required: Vec<_> = members
                        .iter()
                        .filter(|(_, (_, required))| *required)
                        .map(|(name, _)| name.clone())
                        .collect();
                    let properties: Map<String, Value> = members
                        .into_iter()
                        .map(|(name, (schema, _))| (name, schema))
                        .collect();
                    json!({"type": "object", "properties": properties, "required": required})
                }
            ),
        ]
    })
}

/// Strategy for arbitrary JSON values with controlled complexity
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        (-1.0e6f64..1.0e6).prop_map(|f| json!(f)),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 16, 5, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            proptest::collection::btree_map("[a-z_]{1,8}", inner, 0..5)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Property: a generated sample always validates against its own schema
    #[test]
    fn prop_generated_sample_validates(schema in schema_strategy()) {
        let node = SchemaNode::from_value(&schema).unwrap();
        let sample = generate_sample(&node);
        let errors = validate_value(&sample, &node, "root");
        prop_assert!(errors.is_empty(), "sample {} failed: {:?}", sample, errors);
    }

    /// Property: generation is deterministic
    #[test]
    fn prop_generation_is_deterministic(schema in schema_strategy()) {
        let node = SchemaNode::from_value(&schema).unwrap();
        prop_assert_eq!(generate_sample(&node), generate_sample(&node));
    }

    /// Property: object samples have exactly the declared keys
    #[test]
    fn prop_object_sample_keys_match_properties(schema in schema_strategy()) {
        let node = SchemaNode::from_value(&schema).unwrap();
        if let SchemaNode::Object(object) = &node {
            let sample = generate_sample(&node);
            let sample = sample.as_object().unwrap();
            let properties = object.properties.clone().unwrap_or_default();
            prop_assert_eq!(sample.len(), properties.len());
            for (name, property) in &properties {
                prop_assert_eq!(sample.get(name), Some(&generate_sample(property)));
            }
        }
    }

    /// Property: validity is exactly the absence of errors, and validation never panics
    #[test]
    fn prop_validity_matches_errors(schema in schema_strategy(), value in json_value_strategy()) {
        let node = SchemaNode::from_value(&schema).unwrap();
        let result = validate_input(Some(&value), Some(&node));
        prop_assert_eq!(result.is_valid(), result.errors().is_empty());
        prop_assert_eq!(result.errors().to_vec(), validate_value(&value, &node, "root"));
    }

    /// Property: every error line is anchored at the root path
    #[test]
    fn prop_errors_are_path_qualified(schema in schema_strategy(), value in json_value_strategy()) {
        let node = SchemaNode::from_value(&schema).unwrap();
        for error in validate_value(&value, &node, "root") {
            prop_assert!(error.starts_with("root"), "unanchored error: {}", error);
            prop_assert!(error.contains(": "));
        }
    }
}
