//! Error types for the linker and validator
//!
//! Absence of data is never an error here: resolution returns sentinels and
//! validation returns a verdict. These types only describe infrastructure
//! failures (the remote service could not answer) and invalid configuration.

use thiserror::Error;

/// Failure talking to an external service (search index, redirect index,
/// SPARQL endpoint, key-value store).
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Malformed response from {endpoint}: {message}")]
    Malformed { endpoint: String, message: String },
}

impl ClientError {
    pub fn malformed(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// True when the request ran past its configured timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }
}

/// Invalid configuration. This is the only error that escapes constructors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
