//! Execution collaborators
//!
//! The runner never talks to an endpoint itself. It hands the validated input
//! to an [`EndpointExecutor`], which may reply with an [`ExecutionResponse`]
//! (success or a reported failure) or fault with an [`Error`].

use crate::error::{Error, Result};
use crate::types::{ExecutionResponse, HttpMethod};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Runs an endpoint against an input
#[async_trait]
pub trait EndpointExecutor: Send + Sync {
    /// Execute `endpoint_name` within `context_id` (user or project scope)
    ///
    /// `Err` is a fault: the call never produced a reply at all.
    async fn execute(
        &self,
        context_id: &str,
        endpoint_name: &str,
        input: &Value,
        method: HttpMethod,
    ) -> Result<ExecutionResponse>;
}

/// One recorded reply in a fixture file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(flatten)]
    pub response: ExecutionResponse,

    /// Artificial delay before replying
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,

    /// Fault instead of replying, with this message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
}

/// Executor that replays recorded replies keyed by endpoint name
///
/// Fixture files are JSON or YAML maps:
///
/// ```yaml
/// summarize:
///   success: true
///   data: { summary: "...", usage: { input_tokens: 120, output_tokens: 24 } }
///   delay_ms: 40
/// flaky:
///   fault: "connection reset by peer"
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureExecutor {
    fixtures: HashMap<String, Fixture>,
}

impl FixtureExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixture for an endpoint name
    pub fn with_fixture(mut self, endpoint_name: impl Into<String>, fixture: Fixture) -> Self {
        self.fixtures.insert(endpoint_name.into(), fixture);
        self
    }

    /// Register a plain reply for an endpoint name
    pub fn with_response(self, endpoint_name: impl Into<String>, response: ExecutionResponse) -> Self {
        self.with_fixture(
            endpoint_name,
            Fixture {
                response,
                delay_ms: None,
                fault: None,
            },
        )
    }

    /// Parse fixtures from JSON or YAML text
    pub fn from_content(content: &str, yaml: bool) -> Result<Self> {
        let fixtures: HashMap<String, Fixture> = if yaml {
            serde_yaml::from_str(content)?
        } else {
            serde_json::from_str(content)?
        };
        Ok(Self { fixtures })
    }

    /// Load fixtures from a file; `.yaml`/`.yml` files are read as YAML
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Fixture {
            message: format!("Failed to read fixtures from {}: {}", path.display(), e),
        })?;
        let yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        Self::from_content(&content, yaml)
    }

    /// Names with a recorded fixture, sorted
    pub fn endpoint_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.fixtures.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[async_trait]
impl EndpointExecutor for FixtureExecutor {
    async fn execute(
        &self,
        context_id: &str,
        endpoint_name: &str,
        _input: &Value,
        method: HttpMethod,
    ) -> Result<ExecutionResponse> {
        let fixture = self
            .fixtures
            .get(endpoint_name)
            .ok_or_else(|| Error::execution(endpoint_name, "no fixture recorded for endpoint"))?;

        debug!(context_id, endpoint_name, %method, "Replaying fixture");

        if let Some(delay_ms) = fixture.delay_ms {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        match &fixture.fault {
            Some(message) => Err(Error::execution(endpoint_name, message.clone())),
            None => Ok(fixture.response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_replays_recorded_response() {
        let executor = FixtureExecutor::new()
            .with_response("summarize", ExecutionResponse::ok(json!({"summary": "short"})));

        let response = executor
            .execute("proj_1", "summarize", &json!({}), HttpMethod::Post)
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(response.data, Some(json!({"summary": "short"})));
    }

    #[tokio::test]
    async fn test_unknown_endpoint_is_a_fault() {
        let executor = FixtureExecutor::new();
        let err = executor
            .execute("proj_1", "missing", &json!({}), HttpMethod::Get)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "no fixture recorded for endpoint");
    }

    #[tokio::test]
    async fn test_fault_fixture() {
        let executor = FixtureExecutor::from_content(
            r#"{"flaky": {"success": false, "fault": "connection reset"}}"#,
            false,
        )
        .unwrap();
        let err = executor
            .execute("proj_1", "flaky", &json!({}), HttpMethod::Post)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "connection reset");
    }

    #[test]
    fn test_yaml_fixtures() {
        let executor = FixtureExecutor::from_content(
            "summarize:\n  success: true\n  data:\n    text: ok\n  delay_ms: 5\nbroken:\n  success: false\n  error: quota exceeded\n",
            true,
        )
        .unwrap();
        assert_eq!(executor.endpoint_names(), vec!["broken", "summarize"]);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixtures.json");
        std::fs::write(&path, r#"{"echo": {"success": true, "data": 1}}"#).unwrap();
        let executor = FixtureExecutor::from_file(&path).unwrap();
        assert_eq!(executor.endpoint_names(), vec!["echo"]);

        let err = FixtureExecutor::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Fixture { .. }));
    }
}
