//! Feature resolution for a query region.
//!
//! Queries the store for features of the requested types and reduces the
//! candidates to at most one.

use tracing::debug;

use crate::engine::interval::overlap_extent;
use crate::store::FeatureStore;
use crate::types::{Feature, GenomicInterval};

/// Outcome of resolving one region.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Number of candidates the store returned, before selection.
    pub match_count: usize,
    pub selected: Option<Feature>,
}

/// Resolves query regions against a store for a fixed set of types.
#[derive(Debug, Clone, Copy)]
pub struct FeatureResolver<'a> {
    types: &'a [String],
}

impl<'a> FeatureResolver<'a> {
    pub fn new(types: &'a [String]) -> Self {
        FeatureResolver { types }
    }

    /// Query the store and pick a feature.
    ///
    /// An inverted region matches nothing and is not sent to the store.
    pub fn resolve<S: FeatureStore + ?Sized>(
        &self,
        store: &S,
        region: &GenomicInterval,
    ) -> Resolution {
        if !region.is_valid() {
            debug!(region = %region, "inverted region, no candidates");
            return Resolution {
                match_count: 0,
                selected: None,
            };
        }

        let candidates = store.query(&region.seq_id, region.start, region.end, self.types);
        let match_count = candidates.len();
        if match_count > 1 {
            debug!(region = %region, candidates = match_count, "resolving multiple candidates");
        }

        Resolution {
            match_count,
            selected: select_best(region, candidates),
        }
    }
}

/// Pick the candidate with the largest overlap extent against `region`.
///
/// Ties go to the candidate seen last, so the result follows the store's
/// iteration order.
pub fn select_best(region: &GenomicInterval, candidates: Vec<Feature>) -> Option<Feature> {
    let mut best: Option<(i64, Feature)> = None;

    for candidate in candidates {
        let extent = overlap_extent(region, &candidate.interval);
        match &best {
            Some((best_extent, _)) if extent < *best_extent => {}
            _ => best = Some((extent, candidate)),
        }
    }

    best.map(|(_, feature)| feature)
}
