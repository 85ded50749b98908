//! Query region construction.
//!
//! A query region is derived from the reference interval in priority order:
//! symmetric `extend` padding, then anchored start/stop offsets, then the
//! reference interval itself. The result is clamped to the sequence.

use tracing::{debug, warn};

use crate::config::Config;
use crate::store::{ChromosomeLengthTable, FeatureStore};
use crate::types::{Anchor, GenomicInterval, ReferenceRecord, Strand};

/// A reference interval and the region searched on its behalf.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRegion {
    pub reference: GenomicInterval,
    pub region: GenomicInterval,
}

/// Builds query regions from reference records.
#[derive(Debug, Clone, Copy)]
pub struct RegionBuilder<'a> {
    config: &'a Config,
}

impl<'a> RegionBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        RegionBuilder { config }
    }

    /// Establish the reference interval for a record and derive its region.
    ///
    /// Named references are resolved through the store. Returns `None`, after
    /// logging a warning, when no reference interval can be established.
    pub fn build<S: FeatureStore + ?Sized>(
        &self,
        record: &ReferenceRecord,
        store: &S,
    ) -> Option<QueryRegion> {
        match record {
            ReferenceRecord::Interval(reference) => {
                let region = self.region_for(reference, Some(store.lengths()));
                Some(QueryRegion {
                    reference: reference.clone(),
                    region,
                })
            }
            ReferenceRecord::Named(name) => {
                let mut found = store.features_by_name(name);
                if found.is_empty() {
                    warn!(name = name.as_str(), "reference feature not found");
                    return None;
                }
                if found.len() > 1 {
                    debug!(
                        name = name.as_str(),
                        count = found.len(),
                        "reference name is ambiguous, using the first one in the annotation"
                    );
                }
                let reference = found.swap_remove(0).interval;
                let region = self.region_for(&reference, Some(store.lengths()));
                Some(QueryRegion { reference, region })
            }
            ReferenceRecord::Invalid(reason) => {
                warn!(reason = reason.as_str(), "cannot build a region for row");
                None
            }
        }
    }

    /// Derive the query region for a reference interval.
    ///
    /// With `lengths`, the region end is clamped to the sequence length when
    /// that length is known. The start is always clamped to 1. Bounds
    /// saturate instead of overflowing for extreme extensions.
    pub fn region_for(
        &self,
        reference: &GenomicInterval,
        lengths: Option<&ChromosomeLengthTable>,
    ) -> GenomicInterval {
        let (mut start, mut end, strand) = if let Some(extend) = self.config.extend {
            (
                reference.start.saturating_sub(extend),
                reference.end.saturating_add(extend),
                Strand::Unstranded,
            )
        } else if let Some((start_offset, stop_offset)) = self.config.offsets() {
            let (start, end) =
                anchored_bounds(reference, self.config.anchor, start_offset, stop_offset);
            (start, end, reference.strand)
        } else {
            (reference.start, reference.end, reference.strand)
        };

        if start < 1 {
            start = 1;
        }
        if let Some(length) = lengths.and_then(|l| l.get(&reference.seq_id)) {
            if end > *length {
                end = *length;
            }
        }

        GenomicInterval::new(reference.seq_id.clone(), start, end, strand)
    }
}

/// Region bounds for offsets measured from an anchor.
///
/// Five- and three-prime anchors mirror on the reverse strand. The midpoint
/// anchor uses the forward form whatever the strand.
fn anchored_bounds(
    reference: &GenomicInterval,
    anchor: Anchor,
    start_offset: i64,
    stop_offset: i64,
) -> (i64, i64) {
    let forward = reference.strand.is_forward();
    match anchor {
        Anchor::Five if forward => (
            reference.start.saturating_add(start_offset),
            reference.start.saturating_add(stop_offset),
        ),
        Anchor::Five => (
            reference.end.saturating_sub(stop_offset),
            reference.end.saturating_sub(start_offset),
        ),
        Anchor::Three if forward => (
            reference.end.saturating_add(start_offset),
            reference.end.saturating_add(stop_offset),
        ),
        Anchor::Three => (
            reference.start.saturating_sub(stop_offset),
            reference.start.saturating_sub(start_offset),
        ),
        Anchor::Mid => {
            let mid = reference.midpoint();
            (mid.saturating_add(start_offset), mid.saturating_add(stop_offset))
        }
    }
}
