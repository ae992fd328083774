//! Cut candidate normalization.
//!
//! Turns the analysis service's noisy multiset of cut times into a
//! [`BoundarySequence`]: sorted, deduplicated, and with every boundary at
//! least `min_gap` seconds after the previous one (the first one at least
//! `min_gap` after 0).
//!
//! The scan is greedy and keeps the earliest admissible candidate. Picking
//! earliest-first never leaves a shorter accepted gap than any other
//! admissible choice, so it also retains the most boundaries.

use scenesplit_models::{BoundarySequence, CutTimestamp};

/// Normalize raw cut candidates against a minimum scene duration.
///
/// `min_gap` must be positive. Non-finite candidates are dropped. An empty
/// result means "do not split".
pub fn normalize(raw: &[CutTimestamp], min_gap: f64) -> BoundarySequence {
    debug_assert!(min_gap > 0.0, "minimum scene duration must be positive");

    let mut candidates: Vec<f64> = raw.iter().copied().filter(|t| t.is_finite()).collect();
    candidates.sort_by(f64::total_cmp);

    let mut accepted = Vec::new();
    let mut last_accepted = 0.0;
    for t in candidates {
        if t > last_accepted && t - last_accepted >= min_gap {
            accepted.push(t);
            last_accepted = t;
        }
    }

    BoundarySequence::from_accepted(accepted)
}
