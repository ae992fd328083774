//! Source acquisition.
//!
//! A run always works on a local copy of its source at a fixed path inside
//! the run's work directory. URLs are fetched with yt-dlp; local files are
//! copied so the user's original is never touched by cleanup.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use scenesplit_models::{MediaSource, SourceRequest};

use crate::command::check_ytdlp;
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::{copy_file_atomic, file_size};

/// Acquire the requested source into `dest`.
pub async fn acquire_source(
    request: &SourceRequest,
    dest: impl AsRef<Path>,
) -> MediaResult<MediaSource> {
    let dest = dest.as_ref();

    match request {
        SourceRequest::Url(url) => download_video(url, dest).await?,
        SourceRequest::LocalFile(path) => import_local_file(path, dest).await?,
    }

    let size = file_size(dest).await?;
    Ok(MediaSource::new(dest, size))
}

/// Download a video from URL using yt-dlp, in mp4 format.
pub async fn download_video(url: &str, output_path: impl AsRef<Path>) -> MediaResult<()> {
    let output_path = output_path.as_ref();

    check_ytdlp()?;

    info!(
        "Downloading video from {} to {}",
        url,
        output_path.display()
    );

    let output_path_str = output_path.to_string_lossy();
    let args = [
        "--quiet",
        "--no-warnings",
        "--no-playlist",
        "--force-overwrites",
        "-f",
        "mp4/bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]",
        "-o",
        &*output_path_str,
        url,
    ];

    let output = Command::new("yt-dlp")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("yt-dlp stderr: {}", stderr);

        let error_msg = stderr
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("Unknown error");
        return Err(MediaError::download_failed(format!(
            "yt-dlp failed: {}",
            error_msg
        )));
    }

    if !output_path.exists() {
        return Err(MediaError::download_failed("Output file not created"));
    }

    let file_size = output_path.metadata()?.len();
    info!(
        output = %output_path.display(),
        size_mb = file_size as f64 / (1024.0 * 1024.0),
        "Downloaded video successfully"
    );

    Ok(())
}

/// Copy a local file into the work directory.
pub async fn import_local_file(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> MediaResult<()> {
    let src = src.as_ref();
    let dest = dest.as_ref();

    let copied = copy_file_atomic(src, dest).await?;
    info!(
        source = %src.display(),
        output = %dest.display(),
        size_mb = copied as f64 / (1024.0 * 1024.0),
        "Imported local video"
    );
    Ok(())
}
