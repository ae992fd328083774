//! Pipeline error types.

use thiserror::Error;

use scenesplit_analysis::AnalysisError;
use scenesplit_media::MediaError;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Status reported when no boundary survives normalization.
pub const NO_SCENES_STATUS: &str = "No scenes detected.";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Source unavailable: {0}")]
    Acquisition(String),

    #[error("Scene analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// Not a failure: the source simply has no scene changes to split on.
    #[error("No scenes detected")]
    NoScenes,

    #[error("Slicing failed at clip {ordinal}: {source}")]
    Slicing {
        ordinal: usize,
        #[source]
        source: MediaError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Workspace error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::Acquisition(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn slicing(ordinal: usize, source: MediaError) -> Self {
        Self::Slicing { ordinal, source }
    }

    /// False only for the "no scenes" terminal outcome.
    pub fn is_failure(&self) -> bool {
        !matches!(self, PipelineError::NoScenes)
    }

    /// Human-readable status for the result surface.
    pub fn status_message(&self) -> String {
        match self {
            PipelineError::NoScenes => NO_SCENES_STATUS.to_string(),
            PipelineError::Analysis(e) if e.is_job_failure() => {
                "Scene analysis failed: the analysis service could not process the video."
                    .to_string()
            }
            PipelineError::Analysis(AnalysisError::Config(msg)) => {
                format!("Configuration error: {}", msg)
            }
            other => other.to_string(),
        }
    }

    /// Stable label for metrics.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            PipelineError::Acquisition(_) => "acquisition_error",
            PipelineError::Analysis(_) => "analysis_error",
            PipelineError::NoScenes => "no_scenes",
            PipelineError::Slicing { .. } => "slicing_error",
            PipelineError::Config(_) => "config_error",
            PipelineError::Io(_) => "workspace_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_scenes_is_not_a_failure() {
        assert!(!PipelineError::NoScenes.is_failure());
        assert_eq!(PipelineError::NoScenes.status_message(), NO_SCENES_STATUS);
        assert!(PipelineError::acquisition("gone").is_failure());
    }

    #[test]
    fn test_status_messages() {
        let err = PipelineError::from(AnalysisError::job_failed("files/x"));
        assert!(err.status_message().starts_with("Scene analysis failed"));

        let err = PipelineError::from(AnalysisError::config("GEMINI_API_KEY environment variable not set"));
        assert!(err.status_message().starts_with("Configuration error"));

        let err = PipelineError::slicing(2, MediaError::ffmpeg_failed("boom", None, Some(1)));
        assert_eq!(err.status_message(), "Slicing failed at clip 2: FFmpeg command failed: boom");

        let err = PipelineError::acquisition("file too large");
        assert_eq!(err.status_message(), "Source unavailable: file too large");
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(PipelineError::NoScenes.outcome_label(), "no_scenes");
        assert_eq!(
            PipelineError::from(AnalysisError::upload("x")).outcome_label(),
            "analysis_error"
        );
    }
}
