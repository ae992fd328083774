//! Segment planning.

use scenesplit_models::{BoundarySequence, SegmentEnd, SegmentSpec};

/// Partition the source timeline at `boundaries`.
///
/// Yields `len + 1` segments starting at 0, each ending where the next one
/// starts, with the last one running to the end of the source. An empty
/// sequence yields no segments. The boundary invariant (first boundary
/// strictly after 0) is trusted, not re-checked.
pub fn plan(boundaries: &BoundarySequence) -> Vec<SegmentSpec> {
    if boundaries.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::with_capacity(boundaries.len() + 1);
    let mut start = 0.0;
    for boundary in boundaries.iter() {
        segments.push(SegmentSpec::new(start, SegmentEnd::At(boundary)));
        start = boundary;
    }
    segments.push(SegmentSpec::new(start, SegmentEnd::EndOfSource));

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;

    fn boundaries(values: &[f64]) -> BoundarySequence {
        BoundarySequence::try_new(values.to_vec(), 2.0).unwrap()
    }

    /// Segments must tile [0, END) with no gap or overlap.
    fn assert_covers_timeline(segments: &[SegmentSpec]) {
        assert_eq!(segments[0].start, 0.0);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end, SegmentEnd::At(pair[1].start));
            assert!(pair[0].start < pair[1].start);
        }
        let sentinels = segments.iter().filter(|s| s.end.is_end_of_source()).count();
        assert_eq!(sentinels, 1);
        assert!(segments.last().unwrap().end.is_end_of_source());
    }

    #[test]
    fn test_empty_boundaries_yield_no_segments() {
        assert!(plan(&BoundarySequence::empty()).is_empty());
    }

    #[test]
    fn test_two_boundaries() {
        let segments = plan(&boundaries(&[5.0, 12.0]));
        assert_eq!(
            segments,
            vec![
                SegmentSpec::new(0.0, SegmentEnd::At(5.0)),
                SegmentSpec::new(5.0, SegmentEnd::At(12.0)),
                SegmentSpec::new(12.0, SegmentEnd::EndOfSource),
            ]
        );
    }

    #[test]
    fn test_single_boundary() {
        let segments = plan(&boundaries(&[3.0]));
        assert_eq!(
            segments,
            vec![
                SegmentSpec::new(0.0, SegmentEnd::At(3.0)),
                SegmentSpec::new(3.0, SegmentEnd::EndOfSource),
            ]
        );
    }

    #[test]
    fn test_totality() {
        let inputs: [&[f64]; 4] = [
            &[2.0],
            &[5.0, 12.0],
            &[2.5, 4.5, 6.5, 100.0],
            &[10.0, 20.0, 30.0, 40.0, 50.0, 60.0],
        ];
        for values in inputs {
            let segments = plan(&boundaries(values));
            assert_eq!(segments.len(), values.len() + 1);
            assert_covers_timeline(&segments);
        }
    }

    #[test]
    fn test_plan_of_normalized_candidates() {
        let segments = plan(&normalize(&[1.0, 1.2, 5.0, 5.1, 12.0], 2.0));
        assert_eq!(segments.len(), 3);
        assert_covers_timeline(&segments);
    }
}
