//! Source media model.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fixed name of the acquired input inside a run's work directory.
pub const WORKING_INPUT_NAME: &str = "input_video.mp4";

/// File stem shared by the working input and its partial downloads or copies.
const WORKING_INPUT_STEM: &str = "input_video";

/// True for the working input and any leftover from acquiring it
/// (`input_video.tmp`, `input_video.mp4.part`, `input_video.f137.mp4`, ...).
pub fn is_working_input_file_name(name: &str) -> bool {
    name.strip_prefix(WORKING_INPUT_STEM)
        .is_some_and(|rest| rest.starts_with('.'))
}

/// Where the user wants the source video to come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SourceRequest {
    /// Remote page or media URL, fetched with yt-dlp
    Url(String),
    /// File already present on the local filesystem
    LocalFile(PathBuf),
}

impl SourceRequest {
    /// Interpret free-form user input as a URL or a local path.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.starts_with("http://") || input.starts_with("https://") {
            SourceRequest::Url(input.to_string())
        } else {
            SourceRequest::LocalFile(PathBuf::from(input))
        }
    }
}

/// An acquired local source for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaSource {
    path: PathBuf,
    size_bytes: u64,
}

impl MediaSource {
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            size_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Size in mebibytes, for logs and status messages.
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_request() {
        assert_eq!(
            SourceRequest::parse(" https://youtu.be/abc "),
            SourceRequest::Url("https://youtu.be/abc".to_string())
        );
        assert_eq!(
            SourceRequest::parse("/videos/in.mp4"),
            SourceRequest::LocalFile(PathBuf::from("/videos/in.mp4"))
        );
    }

    #[test]
    fn test_working_input_file_names() {
        assert!(is_working_input_file_name(WORKING_INPUT_NAME));
        assert!(is_working_input_file_name("input_video.tmp"));
        assert!(is_working_input_file_name("input_video.mp4.part"));
        assert!(is_working_input_file_name("input_video.f137.mp4"));
        assert!(!is_working_input_file_name("input_video"));
        assert!(!is_working_input_file_name("input_videos.mp4"));
        assert!(!is_working_input_file_name("my_input_video.mp4"));
    }

    #[test]
    fn test_size_mb() {
        let source = MediaSource::new("in.mp4", 150 * 1024 * 1024);
        assert!((source.size_mb() - 150.0).abs() < f64::EPSILON);
    }
}
