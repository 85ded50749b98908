//! Geometric metrics between a reference and a target interval.

use crate::types::{GenomicInterval, Strand};

/// Spanning length of two intervals.
///
/// Takes the lowest start and the highest end, so this is the length of the
/// union span, not of the intersection: disjoint intervals still report a
/// positive value. Downstream consumers depend on these numbers, keep the
/// formula as is.
pub fn overlap_extent(a: &GenomicInterval, b: &GenomicInterval) -> i64 {
    let istart = a.start.min(b.start);
    let istop = a.end.max(b.end);
    if istart > istop {
        0
    } else {
        istop.saturating_sub(istart).saturating_add(1)
    }
}

/// Signed distance between the 5' ends of reference and target.
///
/// The 5' end is `start` on the forward strand and `end` on the reverse
/// strand; unstranded intervals count as forward.
pub fn distance_from_start(
    reference: &GenomicInterval,
    reference_strand: Strand,
    target: &GenomicInterval,
    target_strand: Strand,
) -> i64 {
    match (reference_strand.is_forward(), target_strand.is_forward()) {
        (true, true) => target.start - reference.start,
        (true, false) => target.end - reference.start,
        (false, true) => target.start - reference.end,
        (false, false) => target.end - reference.end,
    }
}

/// Distance between midpoints, rounded half up (toward positive infinity).
///
/// Midpoints are real-valued, so half-base differences are common.
pub fn distance_from_midpoint(reference: &GenomicInterval, target: &GenomicInterval) -> i64 {
    let reference_mid = (reference.start as f64 + reference.end as f64) / 2.0;
    let target_mid = (target.start as f64 + target.end as f64) / 2.0;
    (target_mid - reference_mid + 0.5).floor() as i64
}
