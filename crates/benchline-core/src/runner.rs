//! Endpoint test orchestration
//!
//! A [`TestRunner`] validates a test input against the endpoint's input
//! schema, hands valid inputs to its [`EndpointExecutor`], measures the round
//! trip and records a [`TestResult`] at the head of its session log. Every
//! outcome (invalid input, reported failure, fault) becomes data on the
//! result; `test_endpoint` itself cannot fail.

use crate::executor::EndpointExecutor;
use crate::session::{Session, SessionSnapshot};
use crate::types::{Endpoint, ExecutionResponse, TestResult, TokenUsage};
use benchline_schemas::{SchemaNode, ValidationResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Prefix of the error recorded when an input fails validation
pub const VALIDATION_FAILED_PREFIX: &str = "Input validation failed: ";

/// Error recorded when a fault carries no message
pub const FAULT_FALLBACK_MESSAGE: &str = "Test execution failed";

/// Error recorded when a reported failure carries no message
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Runner settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Keep at most this many results; unbounded when `None`
    pub max_results: Option<usize>,
}

/// What one invocation produced, before it is stamped into a [`TestResult`]
struct Outcome {
    success: bool,
    output: Value,
    error: Option<String>,
    latency_ms: Option<u64>,
    tokens: Option<TokenUsage>,
}

impl Outcome {
    fn invalid(validation: &ValidationResult) -> Self {
        Self {
            success: false,
            output: Value::Null,
            error: Some(format!(
                "{}{}",
                VALIDATION_FAILED_PREFIX,
                validation.errors().join(", ")
            )),
            latency_ms: None,
            tokens: None,
        }
    }

    fn from_response(response: ExecutionResponse, latency_ms: u64) -> Self {
        if response.success {
            let output = response.data.unwrap_or(Value::Null);
            Self {
                success: true,
                tokens: TokenUsage::from_payload(&output),
                output,
                error: None,
                latency_ms: Some(latency_ms),
            }
        } else {
            Self {
                success: false,
                output: Value::Null,
                error: Some(
                    response
                        .error
                        .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
                ),
                latency_ms: Some(latency_ms),
                tokens: None,
            }
        }
    }

    fn fault(message: &str, latency_ms: u64) -> Self {
        let message = if message.is_empty() {
            FAULT_FALLBACK_MESSAGE
        } else {
            message
        };
        Self {
            success: false,
            output: Value::Null,
            error: Some(message.to_string()),
            latency_ms: Some(latency_ms),
            tokens: None,
        }
    }
}

/// Runs endpoint tests and keeps an observable log of their results
pub struct TestRunner {
    executor: Arc<dyn EndpointExecutor>,
    config: RunnerConfig,
    session: Session,
}

impl TestRunner {
    /// Create a runner with an unbounded result log
    pub fn new(executor: Arc<dyn EndpointExecutor>) -> Self {
        Self::with_config(executor, RunnerConfig::default())
    }

    pub fn with_config(executor: Arc<dyn EndpointExecutor>, config: RunnerConfig) -> Self {
        Self {
            executor,
            config,
            session: Session::new(),
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Generate a sample input for an endpoint's input schema
    pub fn generate_sample_input(&self, schema: Option<&SchemaNode>) -> Value {
        benchline_schemas::generate_sample_input(schema)
    }

    /// Validate an input without running anything
    pub fn validate_input(&self, input: Option<&Value>, schema: Option<&SchemaNode>) -> ValidationResult {
        benchline_schemas::validate_input(input, schema)
    }

    /// Run one test of `endpoint` with `input`
    ///
    /// The result is prepended to the session log before it is returned.
    /// Concurrent calls are allowed; the log is ordered by completion.
    #[instrument(skip(self, endpoint, input), fields(endpoint = %endpoint.name, method = %endpoint.method))]
    pub async fn test_endpoint(&self, context_id: &str, endpoint: &Endpoint, input: Value) -> TestResult {
        let _running = self.session.begin();
        let id = Uuid::new_v4().to_string();
        let started_at = Utc::now();

        let validation = self.validate_input(Some(&input), endpoint.input_schema.as_ref());
        let mut fault = None;

        let outcome = if !validation.is_valid() {
            warn!(
                errors = validation.errors().len(),
                "Input failed validation, endpoint not called"
            );
            Outcome::invalid(&validation)
        } else {
            let start = Instant::now();
            let reply = self
                .executor
                .execute(context_id, &endpoint.name, &input, endpoint.method)
                .await;
            let latency_ms = start.elapsed().as_millis() as u64;

            match reply {
                Ok(response) if response.success => {
                    info!(latency_ms, "Endpoint test passed");
                    Outcome::from_response(response, latency_ms)
                }
                Ok(response) => {
                    warn!(latency_ms, error = ?response.error, "Endpoint reported failure");
                    Outcome::from_response(response, latency_ms)
                }
                Err(e) => {
                    warn!(latency_ms, error = %e, "Endpoint execution faulted");
                    let outcome = Outcome::fault(e.message(), latency_ms);
                    fault = outcome.error.clone();
                    outcome
                }
            }
        };

        let result = TestResult {
            id,
            endpoint_id: endpoint.id.clone(),
            endpoint_name: endpoint.name.clone(),
            input,
            output: outcome.output,
            success: outcome.success,
            error: outcome.error,
            started_at,
            completed_at: Utc::now(),
            latency_ms: outcome.latency_ms,
            input_tokens: outcome.tokens.and_then(|t| t.input_tokens),
            output_tokens: outcome.tokens.and_then(|t| t.output_tokens),
        };

        debug!(result_id = %result.id, success = result.success, "Recording test result");
        self.session
            .record(result.clone(), fault.as_deref(), self.config.max_results);
        result
    }

    /// Empty the result log and clear the standing error
    pub fn clear_results(&self) {
        debug!("Clearing test results");
        self.session.clear();
    }

    /// Current session state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Receive a new snapshot whenever the session changes
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.session.subscribe()
    }
}
