//! Unified error type surfaced by the runtime.
//!
//! Wraps kernel failures (construction, parsing, stepping) together with the
//! I/O and decoding errors of scenario files and action logs.
use std::io;

use grid_core::{ActionParseError, BuildError, ErrorSeverity, GameError, StepError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Action(#[from] ActionParseError),

    #[error("snapshot has no agent to drive")]
    NoAgent,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("replay diverged at entry {index}: expected {expected}, got {actual}")]
    ReplayDivergence {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("bincode codec failed for {what}")]
    Bincode {
        what: &'static str,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to encode {what} as JSON")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {what} as RON")]
    Ron {
        what: &'static str,
        #[source]
        source: ron::Error,
    },

    #[error("failed to access {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Build(err) => err.severity(),
            Self::Step(err) => err.severity(),
            Self::Action(err) => err.severity(),
            Self::NoAgent | Self::InvalidConfig(_) => ErrorSeverity::Validation,
            Self::ReplayDivergence { .. }
            | Self::Bincode { .. }
            | Self::Json { .. }
            | Self::Ron { .. } => ErrorSeverity::Internal,
            Self::Io { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Build(err) => err.error_code(),
            Self::Step(err) => err.error_code(),
            Self::Action(err) => err.error_code(),
            Self::NoAgent => "RUNTIME_NO_AGENT",
            Self::InvalidConfig(_) => "RUNTIME_INVALID_CONFIG",
            Self::ReplayDivergence { .. } => "RUNTIME_REPLAY_DIVERGENCE",
            Self::Bincode { .. } => "RUNTIME_BINCODE",
            Self::Json { .. } => "RUNTIME_JSON",
            Self::Ron { .. } => "RUNTIME_RON",
            Self::Io { .. } => "RUNTIME_IO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_failures_are_internal_encoding_errors() {
        let source = serde_json::from_str::<u8>("not json").expect_err("invalid json");
        let err = RuntimeError::Json {
            what: "observation",
            source,
        };
        assert_eq!(err.error_code(), "RUNTIME_JSON");
        assert!(err.severity().is_internal());
        assert_eq!(err.to_string(), "failed to encode observation as JSON");
    }

    #[test]
    fn configuration_problems_are_validation_errors() {
        let err = RuntimeError::InvalidConfig("width must be positive".into());
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.severity().as_str(), "validation");
        assert!(!err.severity().is_recoverable());
    }
}
