//! Core types and data structures for the Benchline test runner
//!
//! This module defines the endpoint definitions under test, the replies of
//! execution collaborators, and the immutable result records a test run
//! produces.

use benchline_schemas::SchemaNode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// HTTP method an endpoint is invoked with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An LLM-backed endpoint definition under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Endpoint identifier
    pub id: String,

    /// Endpoint name, used by collaborators to route the call
    pub name: String,

    /// HTTP method
    #[serde(default)]
    pub method: HttpMethod,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Schema test inputs must satisfy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<SchemaNode>,

    /// Schema of the endpoint's output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<SchemaNode>,
}

impl Endpoint {
    /// Create an endpoint with no schemas
    pub fn new(id: impl Into<String>, name: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            method,
            description: None,
            input_schema: None,
            output_schema: None,
        }
    }

    /// Attach an input schema
    pub fn with_input_schema(mut self, schema: SchemaNode) -> Self {
        self.input_schema = Some(schema);
        self
    }

    /// Attach an output schema
    pub fn with_output_schema(mut self, schema: SchemaNode) -> Self {
        self.output_schema = Some(schema);
        self
    }
}

/// Reply from an execution collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    /// Whether the endpoint ran successfully
    #[serde(default)]
    pub success: bool,

    /// Payload returned by the endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Failure message reported by the collaborator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResponse {
    /// A successful reply carrying `data`
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failed reply carrying an error message
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Token counts reported by an endpoint payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
}

impl TokenUsage {
    /// Read token counts from a payload's `usage` object
    ///
    /// Accepts `input_tokens`/`output_tokens` as well as
    /// `prompt_tokens`/`completion_tokens`. Returns `None` when the payload
    /// has no `usage` object or it carries neither count.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let usage = payload.get("usage")?.as_object()?;
        let count = |primary: &str, fallback: &str| {
            usage
                .get(primary)
                .or_else(|| usage.get(fallback))
                .and_then(Value::as_u64)
        };

        let tokens = Self {
            input_tokens: count("input_tokens", "prompt_tokens"),
            output_tokens: count("output_tokens", "completion_tokens"),
        };

        if tokens.input_tokens.is_none() && tokens.output_tokens.is_none() {
            None
        } else {
            Some(tokens)
        }
    }
}

/// Record of one endpoint test invocation
///
/// Created once per invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: String,
    pub endpoint_id: String,
    pub endpoint_name: String,
    pub input: Value,
    pub output: Value,
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,

    /// Round-trip latency; absent when the collaborator was never called
    pub latency_ms: Option<u64>,

    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
}

impl TestResult {
    /// Total tokens, when at least one count is known
    ///
    /// Counts come from the collaborator and saturate at `u64::MAX`.
    pub fn total_tokens(&self) -> Option<u64> {
        match (self.input_tokens, self.output_tokens) {
            (None, None) => None,
            (input, output) => Some(input.unwrap_or(0).saturating_add(output.unwrap_or(0))),
        }
    }
}

/// Aggregate view over a result log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Mean latency over results that recorded one
    pub average_latency_ms: Option<f64>,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TestSummary {
    /// Summarize a sequence of results
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a TestResult>) -> Self {
        let mut summary = Self::default();
        let mut latency_total = 0u64;
        let mut latency_count = 0u64;

        for result in results {
            summary.total += 1;
            if result.success {
                summary.passed += 1;
            } else {
                summary.failed += 1;
            }
            if let Some(latency) = result.latency_ms {
                latency_total = latency_total.saturating_add(latency);
                latency_count += 1;
            }
            summary.input_tokens = summary.input_tokens.saturating_add(result.input_tokens.unwrap_or(0));
            summary.output_tokens = summary.output_tokens.saturating_add(result.output_tokens.unwrap_or(0));
        }

        if latency_count > 0 {
            summary.average_latency_ms = Some(latency_total as f64 / latency_count as f64);
        }
        summary
    }

    /// Fraction of passing results, `None` for an empty log
    pub fn pass_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.passed as f64 / self.total as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(success: bool, latency_ms: Option<u64>, tokens: (Option<u64>, Option<u64>)) -> TestResult {
        let now = Utc::now();
        TestResult {
            id: "r1".to_string(),
            endpoint_id: "ep".to_string(),
            endpoint_name: "summarize".to_string(),
            input: json!({}),
            output: Value::Null,
            success,
            error: None,
            started_at: now,
            completed_at: now,
            latency_ms,
            input_tokens: tokens.0,
            output_tokens: tokens.1,
        }
    }

    #[test]
    fn test_http_method_serialization() {
        assert_eq!(serde_json::to_string(&HttpMethod::Patch).unwrap(), "\"PATCH\"");
        let method: HttpMethod = serde_json::from_str("\"GET\"").unwrap();
        assert_eq!(method, HttpMethod::Get);
        assert_eq!(HttpMethod::default().to_string(), "POST");
    }

    #[test]
    fn test_endpoint_deserializes_schemas() {
        let endpoint: Endpoint = serde_json::from_value(json!({
            "id": "ep_1",
            "name": "classify",
            "input_schema": {
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            }
        }))
        .unwrap();
        assert_eq!(endpoint.method, HttpMethod::Post);
        assert!(matches!(endpoint.input_schema, Some(SchemaNode::Object(_))));
        assert!(endpoint.output_schema.is_none());
    }

    #[test]
    fn test_token_usage_extraction() {
        let usage = TokenUsage::from_payload(&json!({
            "text": "hi",
            "usage": {"input_tokens": 12, "output_tokens": 3}
        }));
        assert_eq!(
            usage,
            Some(TokenUsage {
                input_tokens: Some(12),
                output_tokens: Some(3)
            })
        );

        let usage = TokenUsage::from_payload(&json!({
            "usage": {"prompt_tokens": 7, "completion_tokens": 9, "total_tokens": 16}
        }));
        assert_eq!(usage.and_then(|u| u.output_tokens), Some(9));

        assert_eq!(TokenUsage::from_payload(&json!({"text": "hi"})), None);
        assert_eq!(TokenUsage::from_payload(&json!({"usage": "n/a"})), None);
        assert_eq!(TokenUsage::from_payload(&json!({"usage": {}})), None);
        assert_eq!(TokenUsage::from_payload(&json!("plain text")), None);
    }

    #[test]
    fn test_summary() {
        let results = vec![
            result(true, Some(100), (Some(10), Some(5))),
            result(false, None, (None, None)),
            result(false, Some(300), (Some(2), None)),
        ];
        let summary = TestSummary::from_results(&results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.average_latency_ms, Some(200.0));
        assert_eq!(summary.input_tokens, 12);
        assert_eq!(summary.output_tokens, 5);
        assert!((summary.pass_rate().unwrap() - 1.0 / 3.0).abs() < f64::EPSILON);

        assert_eq!(TestSummary::from_results(&Vec::new()).pass_rate(), None);
    }

    #[test]
    fn test_total_tokens() {
        assert_eq!(result(true, None, (Some(4), None)).total_tokens(), Some(4));
        assert_eq!(result(true, None, (None, None)).total_tokens(), None);
    }

    #[test]
    fn test_huge_token_counts_saturate() {
        assert_eq!(
            result(true, None, (Some(u64::MAX), Some(1))).total_tokens(),
            Some(u64::MAX)
        );

        let results = vec![
            result(true, Some(u64::MAX), (Some(u64::MAX), Some(3))),
            result(true, Some(10), (Some(u64::MAX), Some(4))),
        ];
        let summary = TestSummary::from_results(&results);
        assert_eq!(summary.input_tokens, u64::MAX);
        assert_eq!(summary.output_tokens, 7);
        assert!(summary.average_latency_ms.is_some());
    }
}
