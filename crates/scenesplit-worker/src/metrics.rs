//! Pipeline metrics.
//!
//! Recorded through the `metrics` facade; without an installed recorder
//! every call is a no-op.

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Finished runs by outcome.
    pub const RUNS_TOTAL: &str = "scenesplit_runs_total";

    /// Wall-clock duration of a run in seconds.
    pub const RUN_SECONDS: &str = "scenesplit_run_seconds";

    /// Clips written by the materializer.
    pub const CLIPS_TOTAL: &str = "scenesplit_clips_total";

    /// Cut candidates discarded by normalization.
    pub const REJECTED_CUTS_TOTAL: &str = "scenesplit_rejected_cuts_total";
}

/// Record a finished run.
pub fn record_run(outcome: &'static str, elapsed_secs: f64) {
    counter!(names::RUNS_TOTAL, "outcome" => outcome).increment(1);
    histogram!(names::RUN_SECONDS, "outcome" => outcome).record(elapsed_secs);
}

/// Record one written clip.
pub fn record_clip() {
    counter!(names::CLIPS_TOTAL).increment(1);
}

/// Record candidates dropped by the normalizer.
pub fn record_rejected_cuts(count: usize) {
    counter!(names::REJECTED_CUTS_TOTAL).increment(count as u64);
}
