//! Scene segmentation pipeline.
//!
//! This crate provides:
//! - Timestamp normalization into a minimum-duration boundary sequence
//! - Segment planning over the source timeline
//! - Clip materialization through the slicing tool
//! - The pipeline orchestrator and its user-facing outcome
//! - Configuration, run logging and metrics

pub mod config;
pub mod error;
pub mod logging;
pub mod materializer;
pub mod metrics;
pub mod normalizer;
pub mod pipeline;
pub mod planner;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use logging::RunLogger;
pub use materializer::materialize;
pub use normalizer::normalize;
pub use pipeline::{PipelineOutcome, ScenePipeline};
pub use planner::plan;
