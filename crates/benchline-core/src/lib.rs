//! Benchline Core - run and record tests of LLM-backed endpoints
//!
//! This crate drives endpoint tests on top of `benchline-schemas`:
//!
//! # Main Components
//!
//! - **Error Handling**: Error types using `thiserror` and `anyhow`
//! - **Core Types**: Endpoint definitions, collaborator replies and test results
//! - **Executors**: The [`EndpointExecutor`] seam and a fixture-replaying implementation
//! - **Test Runner**: Validation, execution, timing and an observable result log
//!
//! # Example
//!
//! ```no_run
//! use benchline_core::{Endpoint, FixtureExecutor, HttpMethod, TestRunner};
//! use std::sync::Arc;
//!
//! # async fn example() -> benchline_core::Result<()> {
//! let executor = FixtureExecutor::from_file("fixtures.yaml".as_ref())?;
//! let runner = TestRunner::new(Arc::new(executor));
//!
//! let endpoint = Endpoint::new("ep_1", "summarize", HttpMethod::Post);
//! let input = runner.generate_sample_input(endpoint.input_schema.as_ref());
//! let result = runner.test_endpoint("proj_1", &endpoint, input).await;
//! println!("passed: {}", result.success);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod executor;
pub mod runner;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use executor::{EndpointExecutor, Fixture, FixtureExecutor};
pub use runner::{
    RunnerConfig, TestRunner, FAULT_FALLBACK_MESSAGE, UNKNOWN_ERROR_MESSAGE,
    VALIDATION_FAILED_PREFIX,
};
pub use session::SessionSnapshot;
pub use types::{
    Endpoint, ExecutionResponse, HttpMethod, TestResult, TestSummary, TokenUsage,
};

// Schema types used in the public API
pub use benchline_schemas::{SchemaNode, ValidationResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
