//! Error types for the widget query engine

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A supplied aggregation parameter was rejected by its rule.
    #[error("Invalid value for '{aggregation}.{parameter}': {reason}")]
    Validation {
        aggregation: String,
        parameter: String,
        reason: String,
        /// The offending value, `None` when the parameter was missing.
        value: Option<Value>,
    },

    #[error("Unknown aggregation type: {0}")]
    UnknownAggregation(String),

    #[error("Cannot build query: {0}")]
    Build(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed search response: {0}")]
    MalformedResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn validation(
        aggregation: &str,
        parameter: &str,
        reason: impl Into<String>,
        value: Option<&Value>,
    ) -> Self {
        Self::Validation {
            aggregation: aggregation.to_string(),
            parameter: parameter.to_string(),
            reason: reason.into(),
            value: value.cloned(),
        }
    }

    /// True for errors detected before any network call is made.
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::UnknownAggregation(_) | Self::Build(_)
        )
    }

    /// True when the transport failed or answered with an unusable body.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::MalformedResponse(_))
    }

    /// The parameter id reported by a validation failure.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::Validation { parameter, .. } => Some(parameter),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
