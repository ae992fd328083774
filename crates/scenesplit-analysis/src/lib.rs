//! Remote scene analysis.
//!
//! This crate provides:
//! - The `AnalysisService` seam (upload, status, structured analysis, release)
//! - A Gemini Files API implementation of that seam
//! - `RemoteAnalysisClient`, which drives one upload through polling to a
//!   list of raw cut candidates and always releases the remote file

pub mod client;
pub mod error;
pub mod gemini;
pub mod service;

pub use client::RemoteAnalysisClient;
pub use error::{AnalysisError, AnalysisResult};
pub use gemini::{parse_cut_timestamps, GeminiConfig, GeminiFilesClient, DEFAULT_INSTRUCTIONS};
pub use service::AnalysisService;
