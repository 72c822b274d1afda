//! Error types for the generation pipeline
//!
//! - [`PipelineError`]: fatal failures that abort a run
//! - [`CollaboratorError`]: what every external collaborator returns
//! - [`StageWarning`]: degraded, non-blocking failures recorded on the result
//! - [`ConfigError`]: configuration loading failures

use crate::types::Stage;
use serde::{Deserialize, Serialize};

/// Fatal pipeline error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// Request rejected before any stage ran
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Prepare or Generate produced nothing after all fallbacks
    #[error("{stage} stage failed: {reason}")]
    StageFailed {
        /// Failing stage
        stage: Stage,
        /// Human-readable reason
        reason: String,
    },
}

impl PipelineError {
    /// Create a stage failure
    #[inline]
    pub fn stage(stage: Stage, reason: impl Into<String>) -> Self {
        Self::StageFailed {
            stage,
            reason: reason.into(),
        }
    }

    /// Check if re-running Prepare/Generate could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StageFailed { .. })
    }

    /// Stage the error belongs to, if any
    #[inline]
    #[must_use]
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Self::InvalidInput(_) => None,
            Self::StageFailed { stage, .. } => Some(*stage),
        }
    }
}

/// Error returned by an external collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// Collaborator cannot be reached or is not configured
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// Collaborator ran and reported a failure
    #[error("collaborator failed: {0}")]
    Failed(String),

    /// Collaborator replied with something unusable
    #[error("invalid collaborator response: {0}")]
    InvalidResponse(String),

    /// Collaborator did not answer in time
    #[error("collaborator timed out after {duration_secs}s")]
    Timeout {
        /// Elapsed time
        duration_secs: u64,
    },
}

/// Non-blocking failure recorded during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageWarning {
    /// Stage that degraded
    pub stage: Stage,
    /// Affected file, when the failure was per-file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// What went wrong
    pub message: String,
}

impl StageWarning {
    /// Stage-wide warning
    #[inline]
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            path: None,
            message: message.into(),
        }
    }

    /// Warning about one file
    #[inline]
    pub fn for_file(stage: Stage, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage,
            path: Some(path.into()),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for StageWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} ({path}): {}", self.stage, self.message),
            None => write!(f, "{}: {}", self.stage, self.message),
        }
    }
}

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid TOML for [`crate::PipelineConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parse but are inconsistent
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_error_display() {
        let err = PipelineError::InvalidInput("prompt is empty".to_string());
        assert_eq!(err.to_string(), "invalid input: prompt is empty");

        let err = PipelineError::stage(Stage::Generate, "generator unavailable");
        assert_eq!(err.to_string(), "generate stage failed: generator unavailable");
    }

    #[test]
    fn pipeline_error_is_retryable() {
        assert!(PipelineError::stage(Stage::Prepare, "x").is_retryable());
        assert!(!PipelineError::InvalidInput("x".to_string()).is_retryable());
    }

    #[test]
    fn failed_stage() {
        assert_eq!(
            PipelineError::stage(Stage::Generate, "x").failed_stage(),
            Some(Stage::Generate)
        );
        assert_eq!(PipelineError::InvalidInput("x".into()).failed_stage(), None);
    }

    #[test]
    fn warning_display() {
        let w = StageWarning::for_file(Stage::Validate, "src/App.tsx", "validator offline");
        assert_eq!(w.to_string(), "validate (src/App.tsx): validator offline");
        assert_eq!(StageWarning::new(Stage::Optimize, "skipped").to_string(), "optimize: skipped");
    }

    #[test]
    fn collaborator_error_display() {
        assert!(CollaboratorError::Timeout { duration_secs: 30 }
            .to_string()
            .contains("30s"));
    }
}
