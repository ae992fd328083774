//! Pipeline orchestrator.
//!
//! One run, one sequential flow:
//! 1. Clear the previous run's input and clips from the work directory
//! 2. Acquire the source into the fixed working input path
//! 3. Enforce the upload size ceiling (before any remote call)
//! 4. Remote analysis → raw cut candidates
//! 5. Normalize → boundaries (empty means "no scenes")
//! 6. Plan → segments
//! 7. Materialize → clips
//!
//! Every failure is folded into the status string of [`PipelineOutcome`];
//! [`ScenePipeline::process`] never returns an error.

use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, Instrument};

use scenesplit_analysis::{AnalysisService, RemoteAnalysisClient};
use scenesplit_media::{acquire_source, Slicer};
use scenesplit_models::{
    is_clip_file_name, is_working_input_file_name, MediaSource, OutputClip, SourceRequest,
};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::RunLogger;
use crate::materializer::materialize;
use crate::metrics::{record_rejected_cuts, record_run};
use crate::normalizer::normalize;
use crate::planner::plan;

/// Result surface consumed by front-ends: ordered clips plus a status line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub clips: Vec<OutputClip>,
    pub status: String,
    /// False when the run ended in an error (a "no scenes" run is not one)
    pub succeeded: bool,
}

impl PipelineOutcome {
    pub fn completed(clips: Vec<OutputClip>) -> Self {
        let status = format!("Success! Video split into {} scenes.", clips.len());
        Self {
            clips,
            status,
            succeeded: true,
        }
    }

    pub fn from_error(error: &PipelineError) -> Self {
        Self {
            clips: Vec::new(),
            status: error.status_message(),
            succeeded: !error.is_failure(),
        }
    }

    pub fn from_result(result: PipelineResult<Vec<OutputClip>>) -> Self {
        match result {
            Ok(clips) => Self::completed(clips),
            Err(e) => Self::from_error(&e),
        }
    }

    /// Clip paths in timeline order.
    pub fn clip_paths(&self) -> Vec<&Path> {
        self.clips.iter().map(|c| c.path.as_path()).collect()
    }
}

/// Scene segmentation pipeline bound to one work directory.
pub struct ScenePipeline<S, L> {
    config: PipelineConfig,
    analysis: RemoteAnalysisClient<S>,
    slicer: L,
}

impl<S, L> ScenePipeline<S, L>
where
    S: AnalysisService,
    L: Slicer,
{
    /// Create a pipeline; fails on invalid configuration.
    pub fn new(config: PipelineConfig, service: S, slicer: L) -> PipelineResult<Self> {
        config.validate()?;

        let analysis = RemoteAnalysisClient::new(service)
            .with_poll_interval(config.poll_interval)
            .with_timeout(config.analysis_timeout);

        Ok(Self {
            config,
            analysis,
            slicer,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn analysis(&self) -> &RemoteAnalysisClient<S> {
        &self.analysis
    }

    pub fn slicer(&self) -> &L {
        &self.slicer
    }

    /// Run the full pipeline for a user request.
    pub async fn process(&self, request: &SourceRequest) -> PipelineOutcome {
        let logger = RunLogger::new("scene_split");
        let span = logger.create_span();

        async {
            logger.log_start(&format!("{:?}", request));
            let started = Instant::now();

            let result = self.try_process(request, &logger).await;

            let elapsed = started.elapsed().as_secs_f64();
            match &result {
                Ok(clips) => {
                    record_run("success", elapsed);
                    logger.log_completion(&format!("{} clips in {:.1}s", clips.len(), elapsed));
                }
                Err(e) if !e.is_failure() => {
                    record_run(e.outcome_label(), elapsed);
                    logger.log_completion("no scene changes detected, source not split");
                }
                Err(e) => {
                    record_run(e.outcome_label(), elapsed);
                    logger.log_error(&e.to_string());
                }
            }

            PipelineOutcome::from_result(result)
        }
        .instrument(span)
        .await
    }

    async fn try_process(
        &self,
        request: &SourceRequest,
        logger: &RunLogger,
    ) -> PipelineResult<Vec<OutputClip>> {
        let removed = self.prepare_workspace().await?;
        if removed > 0 {
            logger.log_warning(&format!("removed {} stale files from previous run", removed));
        }

        let source = acquire_source(request, self.config.input_path())
            .await
            .map_err(|e| PipelineError::acquisition(e.to_string()))?;
        logger.log_progress(&format!("source acquired ({:.1} MB)", source.size_mb()));

        self.split_source(&source).await
    }

    /// Split an already acquired source into clips in the work directory.
    pub async fn split_source(&self, source: &MediaSource) -> PipelineResult<Vec<OutputClip>> {
        self.check_source_size(source)?;

        let raw = self.analysis.detect_cuts(source.path()).await?;

        let boundaries = normalize(&raw, self.config.min_scene_duration);
        record_rejected_cuts(raw.len() - boundaries.len());
        debug!(
            candidates = raw.len(),
            boundaries = ?boundaries.as_slice(),
            min_gap = self.config.min_scene_duration,
            "Normalized cut candidates"
        );

        if boundaries.is_empty() {
            return Err(PipelineError::NoScenes);
        }

        let segments = plan(&boundaries);
        materialize(&self.slicer, source, &segments, &self.config.work_dir).await
    }

    /// Reject sources above the upload ceiling.
    fn check_source_size(&self, source: &MediaSource) -> PipelineResult<()> {
        if source.size_bytes() > self.config.max_source_size_bytes() {
            return Err(PipelineError::acquisition(format!(
                "video is {:.1} MB, the limit is {} MB",
                source.size_mb(),
                self.config.max_source_size_mb
            )));
        }
        Ok(())
    }

    /// Remove the previous run's working input, its partial copies or
    /// downloads, and its clips.
    ///
    /// Creates the work directory when missing. Returns how many files were
    /// removed.
    pub async fn prepare_workspace(&self) -> PipelineResult<usize> {
        let work_dir = &self.config.work_dir;
        tokio::fs::create_dir_all(work_dir).await?;

        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(work_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if is_working_input_file_name(&name) || is_clip_file_name(&name) {
                tokio::fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
