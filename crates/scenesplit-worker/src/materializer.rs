//! Clip materialization.
//!
//! Slices every planned segment, in timeline order, into its own
//! `clip_NNN.mp4` inside the run's work directory. A slicing failure aborts
//! the whole run: clips already written by this run are removed so the
//! workspace never holds a partial result set.

use std::path::Path;

use tracing::{info, warn};

use scenesplit_media::fs_utils::remove_if_exists;
use scenesplit_media::Slicer;
use scenesplit_models::{clip_file_name, ordinal_width, MediaSource, OutputClip, SegmentSpec};

use crate::error::{PipelineError, PipelineResult};
use crate::metrics::record_clip;

/// Slice `segments` of `source` into `output_dir`, one clip per segment.
pub async fn materialize<L>(
    slicer: &L,
    source: &MediaSource,
    segments: &[SegmentSpec],
    output_dir: &Path,
) -> PipelineResult<Vec<OutputClip>>
where
    L: Slicer + ?Sized,
{
    let width = ordinal_width(segments.len());
    let mut clips: Vec<OutputClip> = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        let ordinal = index + 1;
        let path = output_dir.join(clip_file_name(ordinal, width));

        info!(
            ordinal,
            total = segments.len(),
            segment = %segment,
            duration = ?segment.duration(),
            "Materializing clip"
        );

        if let Err(e) = slicer
            .slice(source.path(), segment.start, segment.end.seconds(), &path)
            .await
        {
            warn!(
                ordinal,
                exit_code = ?e.exit_code(),
                "Slicing failed, discarding {} written clips: {}",
                clips.len(),
                e
            );
            discard_partial(&clips, &path).await;
            return Err(PipelineError::slicing(ordinal, e));
        }

        record_clip();
        clips.push(OutputClip {
            ordinal,
            path,
            segment: *segment,
        });
    }

    Ok(clips)
}

/// Remove the clips of an aborted run, including the failed one.
async fn discard_partial(written: &[OutputClip], failed: &Path) {
    let paths = written.iter().map(|c| c.path.as_path()).chain(std::iter::once(failed));
    for path in paths {
        if let Err(e) = remove_if_exists(path).await {
            warn!(path = %path.display(), "Failed to remove partial clip: {}", e);
        }
    }
}
