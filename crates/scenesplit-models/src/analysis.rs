//! Remote analysis job model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of an uploaded file on the remote analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteHandle(String);

impl RemoteHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Processing state reported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisState {
    /// Bytes accepted, processing not yet reported
    Uploaded,
    /// Service is still ingesting the media
    Processing,
    /// Media can be analyzed
    Ready,
    /// Service gave up on the media
    Failed,
}

impl AnalysisState {
    /// Whether polling should stop at this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisState::Ready | AnalysisState::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisState::Uploaded => "uploaded",
            AnalysisState::Processing => "processing",
            AnalysisState::Ready => "ready",
            AnalysisState::Failed => "failed",
        }
    }
}

impl fmt::Display for AnalysisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One upload-and-analyze request against the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisJob {
    /// Remote resource name, used for status, analysis and release
    pub handle: RemoteHandle,
    /// URI the service uses to reference the uploaded file in prompts
    pub file_uri: String,
    /// MIME type reported for the upload
    pub mime_type: String,
    /// Last observed state
    pub state: AnalysisState,
}

impl AnalysisJob {
    pub fn new(
        handle: RemoteHandle,
        file_uri: impl Into<String>,
        mime_type: impl Into<String>,
        state: AnalysisState,
    ) -> Self {
        Self {
            handle,
            file_uri: file_uri.into(),
            mime_type: mime_type.into(),
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!AnalysisState::Uploaded.is_terminal());
        assert!(!AnalysisState::Processing.is_terminal());
        assert!(AnalysisState::Ready.is_terminal());
        assert!(AnalysisState::Failed.is_terminal());
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&AnalysisState::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }
}
