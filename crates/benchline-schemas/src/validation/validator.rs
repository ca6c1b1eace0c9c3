//! Structural validation of values against a [`SchemaNode`]
//!
//! Every applicable violation at a level is reported, not just the first.
//! Errors come out in a fixed order: missing required properties (in
//! `required` order) before per-property errors (in the value's key order),
//! and array element errors in index order.
//!
//! Copyright (c) 2025 Benchline Team
//! Licensed under the Apache-2.0 license

use crate::node::{json_type_name, ArraySchema, NumberSchema, ObjectSchema, SchemaNode, StringSchema};
use crate::validation::base::ValidationContext;
use crate::validation::error::{ValidationError, ValidationErrors};
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Validates values against a borrowed schema tree
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator<'a> {
    schema: &'a SchemaNode,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a SchemaNode) -> Self {
        Self { schema }
    }

    /// Validate starting at the root path
    pub fn validate(&self, value: &Value) -> ValidationErrors {
        self.validate_with_context(value, &ValidationContext::root())
    }

    /// Validate with an explicit starting path
    pub fn validate_with_context(&self, value: &Value, context: &ValidationContext) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_node(value, self.schema, context, &mut errors);
        errors
    }
}

fn check_node(value: &Value, schema: &SchemaNode, context: &ValidationContext, errors: &mut ValidationErrors) {
    // Absence is checked by the parent's required scan, never by the child.
    if value.is_null() {
        return;
    }

    match schema {
        SchemaNode::String(s) => check_string(value, s, context, errors),
        SchemaNode::Number(n) => check_number(value, n, false, context, errors),
        SchemaNode::Integer(n) => check_number(value, n, true, context, errors),
        SchemaNode::Boolean(_) => {
            if !value.is_boolean() {
                errors.add(type_mismatch("boolean", value, context));
            }
        }
        SchemaNode::Array(a) => check_array(value, a, context, errors),
        SchemaNode::Object(o) => check_object(value, o, context, errors),
        SchemaNode::Any => {}
    }
}

fn type_mismatch(expected: &str, value: &Value, context: &ValidationContext) -> ValidationError {
    ValidationError::new(
        &context.path,
        format!("expected {}, got {}", expected, json_type_name(value)),
    )
}

fn check_string(value: &Value, schema: &StringSchema, context: &ValidationContext, errors: &mut ValidationErrors) {
    let Some(text) = value.as_str() else {
        errors.add(type_mismatch("string", value, context));
        return;
    };

    let length = text.chars().count() as u64;
    if let Some(min_length) = schema.min_length {
        if length < min_length {
            errors.add(ValidationError::new(
                &context.path,
                format!("string length {} is less than minLength {}", length, min_length),
            ));
        }
    }
    if let Some(max_length) = schema.max_length {
        if length > max_length {
            errors.add(ValidationError::new(
                &context.path,
                format!("string length {} is greater than maxLength {}", length, max_length),
            ));
        }
    }
    if let Some(allowed) = &schema.enum_values {
        if !allowed.is_empty() && !allowed.iter().any(|candidate| candidate == value) {
            let listed = allowed
                .iter()
                .map(|candidate| match candidate {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            errors.add(ValidationError::new(
                &context.path,
                format!("value \"{}\" is not one of [{}]", text, listed),
            ));
        }
    }
}

fn check_number(
    value: &Value,
    schema: &NumberSchema,
    integer: bool,
    context: &ValidationContext,
    errors: &mut ValidationErrors,
) {
    let Some(number) = value.as_number() else {
        errors.add(type_mismatch("number", value, context));
        return;
    };

    if integer && !is_whole(number) {
        errors.add(ValidationError::new(&context.path, "expected integer, got float"));
    }

    if let Some(minimum) = &schema.minimum {
        if compare(number, minimum) == Some(Ordering::Less) {
            errors.add(ValidationError::new(
                &context.path,
                format!("value {} is less than minimum {}", number, minimum),
            ));
        }
    }
    if let Some(maximum) = &schema.maximum {
        if compare(number, maximum) == Some(Ordering::Greater) {
            errors.add(ValidationError::new(
                &context.path,
                format!("value {} is greater than maximum {}", number, maximum),
            ));
        }
    }
}

/// Order two numbers, exactly when both are integers
fn compare(actual: &Number, bound: &Number) -> Option<Ordering> {
    match (as_i128(actual), as_i128(bound)) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => actual.as_f64()?.partial_cmp(&bound.as_f64()?),
    }
}

fn as_i128(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

/// Whole-number test; `5.0` counts as an integer
fn is_whole(number: &Number) -> bool {
    if number.is_i64() || number.is_u64() {
        return true;
    }
    number.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

fn check_array(value: &Value, schema: &ArraySchema, context: &ValidationContext, errors: &mut ValidationErrors) {
    let Some(elements) = value.as_array() else {
        errors.add(type_mismatch("array", value, context));
        return;
    };

    if let Some(items) = &schema.items {
        for (index, element) in elements.iter().enumerate() {
            check_node(element, items, &context.child_index(index), errors);
        }
    }
}

fn check_object(value: &Value, schema: &ObjectSchema, context: &ValidationContext, errors: &mut ValidationErrors) {
    let Some(members) = value.as_object() else {
        errors.add(type_mismatch("object", value, context));
        return;
    };

    for name in &schema.required {
        if !members.contains_key(name) {
            errors.add(ValidationError::new(
                &context.path,
                format!("missing required property \"{}\"", name),
            ));
        }
    }

    let Some(properties) = &schema.properties else {
        return;
    };
    // Undeclared keys are accepted without comment.
    for (key, member) in members {
        if let Some(property) = properties.get(key) {
            check_node(member, property, &context.child(key), errors);
        }
    }
}
