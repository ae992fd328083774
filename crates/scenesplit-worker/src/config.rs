//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

use scenesplit_models::WORKING_INPUT_NAME;

use crate::error::{PipelineError, PipelineResult};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Pipeline configuration.
///
/// Built once (usually from the environment by the binary) and handed to the
/// orchestrator; components never read the environment themselves.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum accepted gap between consecutive boundaries, in seconds
    pub min_scene_duration: f64,
    /// Largest source accepted for upload, in MiB
    pub max_source_size_mb: u64,
    /// Delay between analysis status checks
    pub poll_interval: Duration,
    /// Upper bound on analysis polling; `None` waits indefinitely
    pub analysis_timeout: Option<Duration>,
    /// Upper bound on a single slicing call; `None` waits indefinitely
    pub slice_timeout: Option<Duration>,
    /// Directory exclusively owned by the run (input and clips)
    pub work_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_scene_duration: 2.0,
            max_source_size_mb: 100,
            poll_interval: Duration::from_secs(3),
            analysis_timeout: None,
            slice_timeout: None,
            work_dir: PathBuf::from("/tmp/scenesplit"),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_scene_duration: std::env::var("SCENESPLIT_MIN_SCENE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.min_scene_duration),
            max_source_size_mb: std::env::var("SCENESPLIT_MAX_SOURCE_MB")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_source_size_mb),
            poll_interval: env_duration_secs("SCENESPLIT_POLL_INTERVAL_SECS")
                .unwrap_or(defaults.poll_interval),
            analysis_timeout: env_duration_secs("SCENESPLIT_ANALYSIS_TIMEOUT_SECS"),
            slice_timeout: env_duration_secs("SCENESPLIT_SLICE_TIMEOUT_SECS"),
            work_dir: std::env::var("SCENESPLIT_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
        }
    }

    /// Reject settings the pipeline cannot honor.
    pub fn validate(&self) -> PipelineResult<()> {
        if !self.min_scene_duration.is_finite() || self.min_scene_duration <= 0.0 {
            return Err(PipelineError::config(format!(
                "minimum scene duration must be a positive number of seconds, got {}",
                self.min_scene_duration
            )));
        }
        if self.max_source_size_mb == 0 {
            return Err(PipelineError::config("maximum source size must be at least 1 MB"));
        }
        if self.work_dir.as_os_str().is_empty() {
            return Err(PipelineError::config("work directory must be set"));
        }
        Ok(())
    }

    /// Upload ceiling in bytes.
    pub fn max_source_size_bytes(&self) -> u64 {
        self.max_source_size_mb.saturating_mul(BYTES_PER_MB)
    }

    /// Fixed location of the acquired input.
    pub fn input_path(&self) -> PathBuf {
        self.work_dir.join(WORKING_INPUT_NAME)
    }
}

/// Parse a non-negative, finite number of seconds from the environment.
fn env_duration_secs(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.min_scene_duration, 2.0);
        assert_eq!(config.max_source_size_mb, 100);
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert!(config.analysis_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_min_duration() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = PipelineConfig {
                min_scene_duration: bad,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
        }
    }

    #[test]
    fn test_validate_rejects_zero_ceiling() {
        let config = PipelineConfig {
            max_source_size_mb: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_size_and_paths() {
        let config = PipelineConfig {
            work_dir: PathBuf::from("/work"),
            ..Default::default()
        };
        assert_eq!(config.max_source_size_bytes(), 100 * 1024 * 1024);
        assert_eq!(config.input_path(), PathBuf::from("/work/input_video.mp4"));
    }
}
