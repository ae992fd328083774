//! Timeline types: cut candidates, accepted boundaries and segment specs.
//!
//! All times are seconds from the start of the source.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raw, untrusted cut candidate as returned by the analysis service.
pub type CutTimestamp = f64;

/// Errors raised when validating a boundary sequence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundaryError {
    #[error("Boundary {0} is not a finite number")]
    NotFinite(usize),

    #[error("Boundary {index} at {value}s is closer than {min_gap}s to the previous one")]
    GapTooSmall { index: usize, value: f64, min_gap: f64 },
}

/// Strictly increasing accepted boundaries, each at least the minimum scene
/// duration after its predecessor (the first one after 0).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundarySequence(Vec<f64>);

impl BoundarySequence {
    /// An empty sequence: the source is not split.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Validate an externally supplied sequence against `min_gap`.
    pub fn try_new(values: Vec<f64>, min_gap: f64) -> Result<Self, BoundaryError> {
        let mut previous = 0.0;
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(BoundaryError::NotFinite(index));
            }
            if value - previous < min_gap {
                return Err(BoundaryError::GapTooSmall {
                    index,
                    value,
                    min_gap,
                });
            }
            previous = value;
        }
        Ok(Self(values))
    }

    /// Wrap boundaries produced by the greedy normalizer.
    ///
    /// The caller guarantees the sequence is strictly increasing and starts
    /// above zero.
    pub fn from_accepted(values: Vec<f64>) -> Self {
        debug_assert!(values.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(values.first().map_or(true, |&first| first > 0.0));
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

/// End of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum SegmentEnd {
    /// Explicit end time in seconds (exclusive)
    At(f64),
    /// Run to the natural end of the source
    EndOfSource,
}

impl SegmentEnd {
    /// Numeric end, or `None` for the end of the source.
    pub fn seconds(&self) -> Option<f64> {
        match self {
            SegmentEnd::At(secs) => Some(*secs),
            SegmentEnd::EndOfSource => None,
        }
    }

    pub fn is_end_of_source(&self) -> bool {
        matches!(self, SegmentEnd::EndOfSource)
    }
}

/// One contiguous range of the source to be sliced into its own clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub start: f64,
    pub end: SegmentEnd,
}

impl SegmentSpec {
    pub fn new(start: f64, end: SegmentEnd) -> Self {
        Self { start, end }
    }

    /// Segment length, unknown for the final segment.
    pub fn duration(&self) -> Option<f64> {
        self.end.seconds().map(|end| end - self.start)
    }
}

impl fmt::Display for SegmentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            SegmentEnd::At(end) => write!(
                f,
                "{} - {}",
                format_seconds(self.start),
                format_seconds(end)
            ),
            SegmentEnd::EndOfSource => write!(f, "{} - end", format_seconds(self.start)),
        }
    }
}

/// Format seconds into HH:MM:SS or HH:MM:SS.mmm string.
pub fn format_seconds(total_secs: f64) -> String {
    let total_secs = total_secs.max(0.0);
    let hours = (total_secs / 3600.0).floor() as u32;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u32;
    let secs = total_secs % 60.0;

    if (secs - secs.floor()).abs() > 0.0001 {
        format!("{:02}:{:02}:{:06.3}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs.floor() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_accepts_valid_sequence() {
        let seq = BoundarySequence::try_new(vec![5.0, 12.0], 2.0).unwrap();
        assert_eq!(seq.as_slice(), &[5.0, 12.0]);
    }

    #[test]
    fn test_try_new_rejects_leading_gap() {
        let err = BoundarySequence::try_new(vec![1.0, 5.0], 2.0).unwrap_err();
        assert_eq!(
            err,
            BoundaryError::GapTooSmall {
                index: 0,
                value: 1.0,
                min_gap: 2.0
            }
        );
    }

    #[test]
    fn test_try_new_rejects_unordered() {
        assert!(BoundarySequence::try_new(vec![12.0, 5.0], 2.0).is_err());
        assert!(BoundarySequence::try_new(vec![f64::NAN], 2.0).is_err());
    }

    #[test]
    fn test_segment_end_sentinel() {
        let last = SegmentSpec::new(12.0, SegmentEnd::EndOfSource);
        assert!(last.end.is_end_of_source());
        assert_eq!(last.duration(), None);

        let middle = SegmentSpec::new(5.0, SegmentEnd::At(12.0));
        assert_eq!(middle.duration(), Some(7.0));
    }

    #[test]
    fn test_segment_display() {
        assert_eq!(
            SegmentSpec::new(5.0, SegmentEnd::At(72.5)).to_string(),
            "00:00:05 - 00:01:12.500"
        );
        assert_eq!(
            SegmentSpec::new(3600.0, SegmentEnd::EndOfSource).to_string(),
            "01:00:00 - end"
        );
    }
}
