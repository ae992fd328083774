//! Filesystem helpers for the run workspace.

use std::path::Path;
use tokio::fs;

use crate::error::{MediaError, MediaResult};

/// Remove a file, treating "already gone" as success.
///
/// Returns whether a file was actually removed.
pub async fn remove_if_exists(path: impl AsRef<Path>) -> MediaResult<bool> {
    match fs::remove_file(path.as_ref()).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(MediaError::from(e)),
    }
}

/// Copy `src` to `dst` through a temporary sibling, then rename into place.
///
/// A reader never observes a half-written `dst`.
pub async fn copy_file_atomic(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> MediaResult<u64> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    if !src.is_file() {
        return Err(MediaError::FileNotFound(src.to_path_buf()));
    }

    if let Some(parent) = dst.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let tmp_dst = dst.with_extension("tmp");

    let result = async {
        let copied = fs::copy(src, &tmp_dst).await?;
        fs::rename(&tmp_dst, dst).await?;
        Ok::<u64, std::io::Error>(copied)
    }
    .await;

    match result {
        Ok(copied) => Ok(copied),
        Err(e) => {
            // The temp file may be partially written whichever step failed.
            let _ = fs::remove_file(&tmp_dst).await;
            tracing::error!(
                "Failed to copy file: {} -> {}: {}",
                src.display(),
                dst.display(),
                e
            );
            Err(MediaError::from(e))
        }
    }
}

/// Size of a file in bytes.
pub async fn file_size(path: impl AsRef<Path>) -> MediaResult<u64> {
    let path = path.as_ref();
    match fs::metadata(path).await {
        Ok(metadata) => Ok(metadata.len()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(MediaError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => Err(MediaError::from(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_remove_if_exists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip_001.mp4");
        fs::write(&path, b"data").await.unwrap();

        assert!(remove_if_exists(&path).await.unwrap());
        assert!(!path.exists());
        assert!(!remove_if_exists(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_copy_file_atomic_into_new_directory() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("source.mp4");
        let dst = dir.path().join("work").join("input_video.mp4");
        fs::write(&src, b"video bytes").await.unwrap();

        let copied = copy_file_atomic(&src, &dst).await.unwrap();

        assert_eq!(copied, 11);
        assert!(src.exists(), "Source must be left in place");
        assert_eq!(fs::read(&dst).await.unwrap(), b"video bytes");
        assert!(!dst.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_copy_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("source.mp4");
        fs::write(&src, b"video bytes").await.unwrap();

        // A non-empty directory at the destination makes the final step fail.
        let dst = dir.path().join("input_video.mp4");
        fs::create_dir_all(dst.join("occupied")).await.unwrap();

        let err = copy_file_atomic(&src, &dst).await.unwrap_err();

        assert!(matches!(err, MediaError::Io(_)));
        assert!(!dir.path().join("input_video.tmp").exists());
    }

    #[tokio::test]
    async fn test_copy_missing_source() {
        let dir = TempDir::new().unwrap();
        let err = copy_file_atomic(dir.path().join("nope.mp4"), dir.path().join("out.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_file_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.bin");
        fs::write(&path, vec![0u8; 1234]).await.unwrap();
        assert_eq!(file_size(&path).await.unwrap(), 1234);
        assert!(matches!(
            file_size(dir.path().join("missing")).await,
            Err(MediaError::FileNotFound(_))
        ));
    }
}
