//! Remote analysis service seam.

use async_trait::async_trait;
use std::path::Path;

use scenesplit_models::{AnalysisJob, AnalysisState, CutTimestamp};

use crate::error::AnalysisResult;

/// Operations the pipeline needs from a video-understanding service.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Upload the file's bytes and return the new remote job.
    async fn upload(&self, path: &Path) -> AnalysisResult<AnalysisJob>;

    /// Query the current processing state of an uploaded file.
    async fn get_status(&self, job: &AnalysisJob) -> AnalysisResult<AnalysisState>;

    /// Request the structured list of cut candidates for a ready file.
    ///
    /// A malformed or empty structured body yields an empty list.
    async fn analyze(&self, job: &AnalysisJob, instructions: &str)
        -> AnalysisResult<Vec<CutTimestamp>>;

    /// Delete the remote resource backing `job`.
    async fn release(&self, job: &AnalysisJob) -> AnalysisResult<()>;
}
