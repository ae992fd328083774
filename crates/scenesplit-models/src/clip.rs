//! Output clip model and naming.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::timeline::SegmentSpec;

/// File name prefix shared by every produced clip.
pub const CLIP_PREFIX: &str = "clip_";

/// Extension of produced clips.
pub const CLIP_EXTENSION: &str = "mp4";

/// Minimum zero-padded ordinal width.
const MIN_ORDINAL_WIDTH: usize = 3;

/// A produced file and the segment it was sliced from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputClip {
    /// 1-based position in timeline order
    pub ordinal: usize,
    pub path: PathBuf,
    pub segment: SegmentSpec,
}

/// Ordinal width for a run producing `segment_count` clips.
///
/// Never narrower than three digits so lexicographic order matches timeline
/// order for every plan.
pub fn ordinal_width(segment_count: usize) -> usize {
    segment_count.to_string().len().max(MIN_ORDINAL_WIDTH)
}

/// Clip file name for a 1-based ordinal, e.g. `clip_007.mp4`.
pub fn clip_file_name(ordinal: usize, width: usize) -> String {
    format!(
        "{}{:0width$}.{}",
        CLIP_PREFIX,
        ordinal,
        CLIP_EXTENSION,
        width = width
    )
}

/// Whether a file name follows the clip naming scheme.
pub fn is_clip_file_name(name: &str) -> bool {
    name.strip_prefix(CLIP_PREFIX)
        .and_then(|rest| rest.strip_suffix(&format!(".{}", CLIP_EXTENSION)))
        .map_or(false, |digits| {
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_file_name() {
        assert_eq!(clip_file_name(1, 3), "clip_001.mp4");
        assert_eq!(clip_file_name(42, 3), "clip_042.mp4");
        assert_eq!(clip_file_name(7, 4), "clip_0007.mp4");
    }

    #[test]
    fn test_ordinal_width() {
        assert_eq!(ordinal_width(0), 3);
        assert_eq!(ordinal_width(3), 3);
        assert_eq!(ordinal_width(999), 3);
        assert_eq!(ordinal_width(1000), 4);
    }

    #[test]
    fn test_names_sort_in_timeline_order() {
        let width = ordinal_width(120);
        let mut names: Vec<String> = (1..=120).map(|i| clip_file_name(i, width)).collect();
        let expected = names.clone();
        names.sort();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_is_clip_file_name() {
        assert!(is_clip_file_name("clip_001.mp4"));
        assert!(is_clip_file_name("clip_1234.mp4"));
        assert!(!is_clip_file_name("clip_.mp4"));
        assert!(!is_clip_file_name("clip_001.jpg"));
        assert!(!is_clip_file_name("input_video.mp4"));
        assert!(!is_clip_file_name("clip_abc.mp4"));
    }
}
