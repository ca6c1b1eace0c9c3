//! Schema tree model for endpoint inputs and outputs
//!
//! A [`SchemaNode`] covers the JSON Schema subset endpoint definitions use:
//! the six primitive/container type tags with their constraint keywords.
//! Anything without a recognized `type` parses to [`SchemaNode::Any`].
//!
//! Copyright (c) 2025 Benchline Team
//! Licensed under the Apache-2.0 license

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Maximum nesting accepted when parsing a schema document
pub const MAX_SCHEMA_DEPTH: usize = 64;

/// Errors produced while parsing a schema document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The schema (or a nested schema) is not a JSON object
    #[error("schema at '{path}' must be an object, got {actual}")]
    NotAnObject { path: String, actual: String },

    /// A keyword carries a value of the wrong JSON type
    #[error("invalid '{keyword}' at '{path}': expected {expected}")]
    InvalidKeyword {
        path: String,
        keyword: String,
        expected: String,
    },

    /// Nesting exceeds [`MAX_SCHEMA_DEPTH`]
    #[error("schema at '{path}' exceeds the maximum depth of {max_depth}")]
    TooDeep { path: String, max_depth: usize },
}

/// Constraints for `type: "string"`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    pub enum_values: Option<Vec<Value>>,
    pub default: Option<Value>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
}

/// Constraints shared by `type: "number"` and `type: "integer"`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub default: Option<Value>,
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
}

/// Constraints for `type: "boolean"`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BooleanSchema {
    pub default: Option<Value>,
}

/// Constraints for `type: "array"`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArraySchema {
    /// Element schema; arrays are never tuple-typed
    pub items: Option<Box<SchemaNode>>,
}

/// Constraints for `type: "object"`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub properties: Option<IndexMap<String, SchemaNode>>,
    pub required: Vec<String>,
}

/// A node in a schema tree
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    String(StringSchema),
    Number(NumberSchema),
    Integer(NumberSchema),
    Boolean(BooleanSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
    /// No (or an unrecognized) `type`; matches anything
    Any,
}

impl SchemaNode {
    /// Parse a schema document
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        parse_node(value, "#", 0)
    }

    /// The declared type tag, `None` for [`SchemaNode::Any`]
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            SchemaNode::String(_) => Some("string"),
            SchemaNode::Number(_) => Some("number"),
            SchemaNode::Integer(_) => Some("integer"),
            SchemaNode::Boolean(_) => Some("boolean"),
            SchemaNode::Array(_) => Some("array"),
            SchemaNode::Object(_) => Some("object"),
            SchemaNode::Any => None,
        }
    }

    /// Render the node back to its JSON form
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(name) = self.type_name() {
            map.insert("type".to_string(), Value::String(name.to_string()));
        }

        match self {
            SchemaNode::String(s) => {
                if let Some(values) = &s.enum_values {
                    map.insert("enum".to_string(), Value::Array(values.clone()));
                }
                insert_opt(&mut map, "default", s.default.clone());
                insert_opt(&mut map, "minLength", s.min_length.map(Value::from));
                insert_opt(&mut map, "maxLength", s.max_length.map(Value::from));
            }
            SchemaNode::Number(n) | SchemaNode::Integer(n) => {
                insert_opt(&mut map, "default", n.default.clone());
                insert_opt(&mut map, "minimum", n.minimum.clone().map(Value::Number));
                insert_opt(&mut map, "maximum", n.maximum.clone().map(Value::Number));
            }
            SchemaNode::Boolean(b) => {
                insert_opt(&mut map, "default", b.default.clone());
            }
            SchemaNode::Array(a) => {
                insert_opt(&mut map, "items", a.items.as_ref().map(|items| items.to_value()));
            }
            SchemaNode::Object(o) => {
                if let Some(properties) = &o.properties {
                    let rendered = properties
                        .iter()
                        .map(|(name, node)| (name.clone(), node.to_value()))
                        .collect::<Map<String, Value>>();
                    map.insert("properties".to_string(), Value::Object(rendered));
                }
                if !o.required.is_empty() {
                    let required = o.required.iter().cloned().map(Value::String).collect();
                    map.insert("required".to_string(), Value::Array(required));
                }
            }
            SchemaNode::Any => {}
        }

        Value::Object(map)
    }
}

fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value);
    }
}

fn parse_node(value: &Value, path: &str, depth: usize) -> Result<SchemaNode, SchemaError> {
    if depth > MAX_SCHEMA_DEPTH {
        return Err(SchemaError::TooDeep {
            path: path.to_string(),
            max_depth: MAX_SCHEMA_DEPTH,
        });
    }

    let obj = value.as_object().ok_or_else(|| SchemaError::NotAnObject {
        path: path.to_string(),
        actual: json_type_name(value).to_string(),
    })?;

    let node = match obj.get("type").and_then(Value::as_str) {
        Some("string") => SchemaNode::String(StringSchema {
            enum_values: enum_keyword(obj, path)?,
            default: obj.get("default").cloned(),
            min_length: length_keyword(obj, "minLength", path)?,
            max_length: length_keyword(obj, "maxLength", path)?,
        }),
        Some(tag @ ("number" | "integer")) => {
            let schema = NumberSchema {
                default: obj.get("default").cloned(),
                minimum: number_keyword(obj, "minimum", path)?,
                maximum: number_keyword(obj, "maximum", path)?,
            };
            if tag == "integer" {
                SchemaNode::Integer(schema)
            } else {
                SchemaNode::Number(schema)
            }
        }
        Some("boolean") => SchemaNode::Boolean(BooleanSchema {
            default: obj.get("default").cloned(),
        }),
        Some("array") => {
            let items = match obj.get("items") {
                Some(items) => Some(Box::new(parse_node(
                    items,
                    &format!("{}/items", path),
                    depth + 1,
                )?)),
                None => None,
            };
            SchemaNode::Array(ArraySchema { items })
        }
        Some("object") => SchemaNode::Object(ObjectSchema {
            properties: properties_keyword(obj, path, depth)?,
            required: required_keyword(obj, path)?,
        }),
        _ => SchemaNode::Any,
    };

    Ok(node)
}

fn invalid(path: &str, keyword: &str, expected: &str) -> SchemaError {
    SchemaError::InvalidKeyword {
        path: path.to_string(),
        keyword: keyword.to_string(),
        expected: expected.to_string(),
    }
}

fn enum_keyword(obj: &Map<String, Value>, path: &str) -> Result<Option<Vec<Value>>, SchemaError> {
    match obj.get("enum") {
        None => Ok(None),
        Some(Value::Array(values)) => Ok(Some(values.clone())),
        Some(_) => Err(invalid(path, "enum", "an array")),
    }
}

fn length_keyword(
    obj: &Map<String, Value>,
    keyword: &str,
    path: &str,
) -> Result<Option<u64>, SchemaError> {
    match obj.get(keyword) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| invalid(path, keyword, "a non-negative integer")),
    }
}

fn number_keyword(
    obj: &Map<String, Value>,
    keyword: &str,
    path: &str,
) -> Result<Option<Number>, SchemaError> {
    match obj.get(keyword) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.clone())),
        Some(_) => Err(invalid(path, keyword, "a number")),
    }
}

fn properties_keyword(
    obj: &Map<String, Value>,
    path: &str,
    depth: usize,
) -> Result<Option<IndexMap<String, SchemaNode>>, SchemaError> {
    let properties = match obj.get("properties") {
        None => return Ok(None),
        Some(Value::Object(properties)) => properties,
        Some(_) => return Err(invalid(path, "properties", "an object")),
    };

    let mut parsed = IndexMap::with_capacity(properties.len());
    for (name, child) in properties {
        let child_path = format!("{}/properties/{}", path, name);
        parsed.insert(name.clone(), parse_node(child, &child_path, depth + 1)?);
    }
    Ok(Some(parsed))
}

fn required_keyword(obj: &Map<String, Value>, path: &str) -> Result<Vec<String>, SchemaError> {
    match obj.get("required") {
        None => Ok(Vec::new()),
        Some(Value::Array(names)) => names
            .iter()
            .map(|name| {
                name.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid(path, "required", "an array of strings"))
            })
            .collect(),
        Some(_) => Err(invalid(path, "required", "an array of strings")),
    }
}

/// Name of a JSON value's type as used in validation messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl TryFrom<&Value> for SchemaNode {
    type Error = SchemaError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        SchemaNode::from_value(value)
    }
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        SchemaNode::from_value(&value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for SchemaNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}
