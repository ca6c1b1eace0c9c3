//! Error types for the Benchline core library
//!
//! This module defines the error handling system for Benchline, using
//! thiserror for error definitions and anyhow for flexible error contexts.
//!
//! Test outcomes are not errors: validation failures, collaborator-reported
//! failures and collaborator faults all end up as data in a
//! [`TestResult`](crate::types::TestResult). These variants cover loading
//! endpoint definitions and fixtures, and faults raised by executors.

use benchline_schemas::SchemaError;
use thiserror::Error;

/// Main error type for Benchline operations
#[derive(Error, Debug)]
pub enum Error {
    /// A schema document could not be parsed
    #[error("Schema error: {message}")]
    Schema {
        message: String,
        #[source]
        source: Option<SchemaError>,
    },

    /// An execution collaborator faulted while running an endpoint
    #[error("Execution failed for '{endpoint}': {message}")]
    Execution {
        endpoint: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Fixture file problems
    #[error("Fixture error: {message}")]
    Fixture { message: String },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an execution fault for an endpoint
    pub fn execution(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Execution {
            endpoint: endpoint.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Message of the error without its category prefix
    ///
    /// Used when a fault is recorded on a test result.
    pub fn message(&self) -> &str {
        match self {
            Error::Schema { message, .. }
            | Error::Execution { message, .. }
            | Error::Fixture { message }
            | Error::Json { message, .. }
            | Error::Yaml { message, .. }
            | Error::Io { message, .. }
            | Error::Configuration { message }
            | Error::Internal { message, .. } => message,
        }
    }
}

// Conversion implementations
impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Error::Schema {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
