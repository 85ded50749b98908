//! Per-row orchestration.
//!
//! Each reference row goes through region construction, feature resolution
//! and metric computation, producing exactly one [`ResultRow`]. Rows are
//! independent; the only state carried across rows is the [`Summary`].

use crate::config::Config;
use crate::engine::interval::{distance_from_midpoint, distance_from_start, overlap_extent};
use crate::engine::region::RegionBuilder;
use crate::engine::resolver::FeatureResolver;
use crate::store::FeatureStore;
use crate::types::{ReferenceRecord, ReferencePoint, ResultRow};

/// Match-count tallies over processed rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub zero: usize,
    pub one: usize,
    pub multiple: usize,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one row by its match count.
    pub fn record(&mut self, match_count: usize) {
        match match_count {
            0 => self.zero += 1,
            1 => self.one += 1,
            _ => self.multiple += 1,
        }
    }

    /// Fold another summary into this one.
    pub fn merge(&mut self, other: &Summary) {
        self.zero += other.zero;
        self.one += other.one;
        self.multiple += other.multiple;
    }

    pub fn total(&self) -> usize {
        self.zero + self.one + self.multiple
    }

    /// Percentage of all rows represented by `count`; 0 when no rows were seen.
    pub fn percent(&self, count: usize) -> f64 {
        let total = self.total();
        if total == 0 || count == 0 {
            0.0
        } else {
            count as f64 * 100.0 / total as f64
        }
    }
}

/// Runs the per-row pipeline against a feature store.
pub struct RowProcessor<'a, S: FeatureStore + ?Sized> {
    store: &'a S,
    config: &'a Config,
    regions: RegionBuilder<'a>,
    resolver: FeatureResolver<'a>,
}

impl<'a, S: FeatureStore + ?Sized> RowProcessor<'a, S> {
    pub fn new(store: &'a S, config: &'a Config) -> Self {
        RowProcessor {
            store,
            config,
            regions: RegionBuilder::new(config),
            resolver: FeatureResolver::new(&config.types),
        }
    }

    /// Compute the result for one reference without touching any counters.
    pub fn evaluate(&self, record: &ReferenceRecord) -> ResultRow {
        let Some(query) = self.regions.build(record, self.store) else {
            return ResultRow::empty();
        };

        let resolution = self.resolver.resolve(self.store, &query.region);
        let Some(feature) = resolution.selected else {
            return ResultRow {
                match_count: resolution.match_count,
                ..ResultRow::empty()
            };
        };

        let distance = match self.config.reference_point {
            ReferencePoint::Start => distance_from_start(
                &query.reference,
                query.reference.strand,
                &feature.interval,
                feature.strand(),
            ),
            ReferencePoint::Mid => distance_from_midpoint(&query.reference, &feature.interval),
        };
        let overlap = overlap_extent(&query.region, &feature.interval);

        ResultRow {
            match_count: resolution.match_count,
            strand: Some(feature.strand()),
            name: Some(feature.name),
            feature_type: Some(feature.feature_type),
            distance: Some(distance),
            overlap: Some(overlap),
        }
    }

    /// Process one reference and count it in `summary`.
    pub fn process(&self, record: &ReferenceRecord, summary: &mut Summary) -> ResultRow {
        let result = self.evaluate(record);
        summary.record(result.match_count);
        result
    }

    /// Process a batch in order, returning its results and its own summary.
    pub fn process_batch<'r, I>(&self, records: I) -> (Vec<ResultRow>, Summary)
    where
        I: IntoIterator<Item = &'r ReferenceRecord>,
    {
        let mut summary = Summary::new();
        let results = records
            .into_iter()
            .map(|record| self.process(record, &mut summary))
            .collect();
        (results, summary)
    }
}
