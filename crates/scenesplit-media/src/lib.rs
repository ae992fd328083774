//! FFmpeg and yt-dlp CLI wrappers for scene slicing.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - A runner with optional timeout
//! - The `Slicer` seam used to materialize segments
//! - Source acquisition from URLs (yt-dlp) or local files

pub mod command;
pub mod download;
pub mod error;
pub mod fs_utils;
pub mod slice;

pub use command::{check_ffmpeg, check_ytdlp, FfmpegCommand, FfmpegRunner};
pub use download::{acquire_source, download_video, import_local_file};
pub use error::{MediaError, MediaResult};
pub use slice::{FfmpegSlicer, Slicer};
