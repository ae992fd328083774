//! Analysis error types.

use std::time::Duration;
use thiserror::Error;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur while talking to the analysis service.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Service request failed: {0}")]
    Transport(String),

    #[error("Remote job failed: {0}")]
    JobFailed(String),

    #[error("Remote job still processing after {:.1} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an error from a non-success HTTP status.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        Self::Transport(format!("HTTP {}: {}", status, body))
    }

    /// True when the remote service itself rejected the media.
    pub fn is_job_failure(&self) -> bool {
        matches!(self, AnalysisError::JobFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_keeps_fractional_seconds() {
        let err = AnalysisError::Timeout(Duration::from_millis(500));
        assert_eq!(err.to_string(), "Remote job still processing after 0.5 seconds");
    }

    #[test]
    fn test_job_failure_classification() {
        assert!(AnalysisError::job_failed("files/x").is_job_failure());
        assert!(!AnalysisError::from_http_status(503, "busy").is_job_failure());
    }
}
