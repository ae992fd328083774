//! Remote analysis job driver.
//!
//! One call to [`RemoteAnalysisClient::detect_cuts`] runs the whole job
//! lifecycle: upload, poll until the state is terminal, request the
//! structured cut list, and release the remote file. Polling is a blocking
//! sequential wait; nothing else in the run proceeds meanwhile.

use std::path::Path;
use std::time::{Duration, Instant};

use metrics::counter;
use tracing::{debug, info, warn};

use scenesplit_models::{AnalysisJob, AnalysisState, CutTimestamp};

use crate::error::{AnalysisError, AnalysisResult};
use crate::gemini::DEFAULT_INSTRUCTIONS;
use crate::service::AnalysisService;

/// Default delay between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Drives a single analysis job to a list of raw cut candidates.
pub struct RemoteAnalysisClient<S> {
    service: S,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl<S: AnalysisService> RemoteAnalysisClient<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Bound the poll loop. `None` polls until the service reports a
    /// terminal state.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Upload `source` and return the service's raw cut candidates.
    ///
    /// Once the upload succeeded the remote file is released exactly once,
    /// whatever the outcome. An empty result is a valid "no scenes" answer.
    pub async fn detect_cuts(&self, source: &Path) -> AnalysisResult<Vec<CutTimestamp>> {
        let job = self.service.upload(source).await?;
        info!(handle = %job.handle, state = %job.state, "Analysis job created");

        let result = self.run_job(&job).await;
        self.release(&job).await;

        match &result {
            Ok(cuts) => info!(handle = %job.handle, candidates = cuts.len(), "Analysis complete"),
            Err(e) => warn!(handle = %job.handle, "Analysis failed: {}", e),
        }
        result
    }

    async fn run_job(&self, job: &AnalysisJob) -> AnalysisResult<Vec<CutTimestamp>> {
        let state = self.wait_until_terminal(job).await?;

        if state == AnalysisState::Failed {
            return Err(AnalysisError::job_failed(format!(
                "service could not process {}",
                job.handle
            )));
        }

        self.service.analyze(job, DEFAULT_INSTRUCTIONS).await
    }

    /// Poll until the job reaches `Ready` or `Failed`.
    async fn wait_until_terminal(&self, job: &AnalysisJob) -> AnalysisResult<AnalysisState> {
        let started = Instant::now();
        let mut state = job.state;
        let mut polls: u32 = 0;

        while !state.is_terminal() {
            if let Some(limit) = self.timeout {
                if started.elapsed() >= limit {
                    return Err(AnalysisError::Timeout(limit));
                }
            }

            tokio::time::sleep(self.poll_interval).await;
            state = self.service.get_status(job).await?;
            polls += 1;
            counter!("scenesplit_analysis_polls_total").increment(1);
            debug!(handle = %job.handle, state = %state, polls, "Polled analysis job");
        }

        info!(
            handle = %job.handle,
            state = %state,
            polls,
            waited_secs = started.elapsed().as_secs_f64(),
            "Analysis job reached terminal state"
        );
        Ok(state)
    }

    /// Best-effort release; failures never affect the run.
    async fn release(&self, job: &AnalysisJob) {
        if let Err(e) = self.service.release(job).await {
            warn!(handle = %job.handle, "Failed to release remote file: {}", e);
        }
    }
}
