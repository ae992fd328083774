//! Shared data models for the SceneSplit pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Source requests and acquired media sources
//! - Remote analysis jobs and their states
//! - Boundary sequences and segment specifications
//! - Produced output clips

pub mod analysis;
pub mod clip;
pub mod source;
pub mod timeline;

// Re-export common types
pub use analysis::{AnalysisJob, AnalysisState, RemoteHandle};
pub use clip::{clip_file_name, is_clip_file_name, ordinal_width, OutputClip};
pub use source::{is_working_input_file_name, MediaSource, SourceRequest, WORKING_INPUT_NAME};
pub use timeline::{format_seconds, BoundaryError, BoundarySequence, CutTimestamp, SegmentEnd, SegmentSpec};
