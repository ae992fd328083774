//! Segment slicing.
//!
//! A segment is cut with stream copy: `-ss start [-t duration] -i source -c copy`.
//! The final segment of a plan has no end; FFmpeg runs to the natural end of
//! the source instead of being given a computed duration.

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// External slicing tool.
#[async_trait]
pub trait Slicer: Send + Sync {
    /// Write `[start, end)` of `source` to `output`; `end = None` means
    /// "to the end of the source". Blocks until the output is fully written.
    async fn slice(
        &self,
        source: &Path,
        start: f64,
        end: Option<f64>,
        output: &Path,
    ) -> MediaResult<()>;
}

/// FFmpeg-backed slicer.
#[derive(Debug, Clone, Default)]
pub struct FfmpegSlicer {
    timeout: Option<Duration>,
}

impl FfmpegSlicer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill FFmpeg if a single slice takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn runner(&self) -> FfmpegRunner {
        match self.timeout {
            Some(timeout) => FfmpegRunner::new().with_timeout(timeout),
            None => FfmpegRunner::new(),
        }
    }

    /// Build the FFmpeg invocation for one segment.
    pub fn build_command(
        source: &Path,
        start: f64,
        end: Option<f64>,
        output: &Path,
    ) -> FfmpegCommand {
        let cmd = FfmpegCommand::new(source, output).seek(start);
        let cmd = match end {
            Some(end) => cmd.duration(end - start),
            None => cmd,
        };
        cmd.codec_copy()
    }
}

#[async_trait]
impl Slicer for FfmpegSlicer {
    async fn slice(
        &self,
        source: &Path,
        start: f64,
        end: Option<f64>,
        output: &Path,
    ) -> MediaResult<()> {
        if !source.exists() {
            return Err(MediaError::FileNotFound(source.to_path_buf()));
        }

        info!(
            source = %source.display(),
            output = %output.display(),
            start = start,
            end = ?end,
            "Slicing segment"
        );

        let cmd = Self::build_command(source, start, end, output);

        self.runner().run(&cmd).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_segment_passes_duration() {
        let args = FfmpegSlicer::build_command(
            Path::new("input_video.mp4"),
            5.0,
            Some(12.0),
            Path::new("clip_002.mp4"),
        )
        .build_args();

        let t = args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(args[t + 1], "7.000");
        assert!(args.contains(&"copy".to_string()));
    }

    #[test]
    fn test_final_segment_has_no_end() {
        let args = FfmpegSlicer::build_command(
            Path::new("input_video.mp4"),
            12.0,
            None,
            Path::new("clip_003.mp4"),
        )
        .build_args();

        assert!(!args.contains(&"-t".to_string()));
        assert!(!args.contains(&"-to".to_string()));
        assert!(args.contains(&"12.000".to_string()));
        assert_eq!(args.last().unwrap(), "clip_003.mp4");
    }

    #[test]
    fn test_runner_keeps_fractional_timeout() {
        let slicer = FfmpegSlicer::new().with_timeout(Some(Duration::from_millis(2500)));
        assert_eq!(
            slicer.runner(),
            FfmpegRunner::new().with_timeout(Duration::from_millis(2500))
        );
        assert_eq!(FfmpegSlicer::new().runner(), FfmpegRunner::new());
    }

    #[tokio::test]
    async fn test_missing_source_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = FfmpegSlicer::new()
            .slice(
                &dir.path().join("missing.mp4"),
                0.0,
                None,
                &dir.path().join("clip_001.mp4"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
