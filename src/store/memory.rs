//! In-memory feature store.
//!
//! Features are grouped by sequence and sorted by start. Overlap queries
//! binary-search to the first feature that could still reach the query
//! start (using the longest feature on that sequence as lookback) and scan
//! forward until features start past the query end.

use ahash::AHashMap;

use crate::store::{ChromosomeLengthTable, FeatureStore};
use crate::types::{Feature, GenomicInterval, Strand};

/// Feature store backed by sorted per-sequence vectors.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    features_by_seq: AHashMap<String, Vec<Feature>>,
    /// Maximum feature span (end - start) per sequence.
    max_lengths: AHashMap<String, i64>,
    /// Feature name -> (sequence, index into that sequence's vector), in file order.
    name_index: AHashMap<String, Vec<(String, usize)>>,
    lengths: ChromosomeLengthTable,
}

impl AnnotationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from features in file order.
    ///
    /// Features sharing a start coordinate keep their file order, which is
    /// the iteration order queries report them in.
    pub fn from_features(features: Vec<Feature>, lengths: ChromosomeLengthTable) -> Self {
        let mut grouped: AHashMap<String, Vec<(usize, Feature)>> = AHashMap::new();
        for (ordinal, feature) in features.into_iter().enumerate() {
            grouped
                .entry(feature.interval.seq_id.clone())
                .or_default()
                .push((ordinal, feature));
        }

        let mut features_by_seq = AHashMap::with_capacity(grouped.len());
        let mut max_lengths = AHashMap::new();
        let mut named: AHashMap<String, Vec<(usize, String, usize)>> = AHashMap::new();

        for (seq_id, mut entries) in grouped {
            // Stable sort keeps file order among equal starts
            entries.sort_by_key(|(_, f)| f.interval.start);

            let max_len = entries
                .iter()
                .map(|(_, f)| f.interval.end.saturating_sub(f.interval.start))
                .max()
                .unwrap_or(0);
            max_lengths.insert(seq_id.clone(), max_len);

            for (idx, (ordinal, feature)) in entries.iter().enumerate() {
                named
                    .entry(feature.name.clone())
                    .or_default()
                    .push((*ordinal, seq_id.clone(), idx));
            }

            let features: Vec<Feature> = entries.into_iter().map(|(_, f)| f).collect();
            features_by_seq.insert(seq_id, features);
        }

        // Sequences were visited in hash order; name lookups follow the file
        let name_index: AHashMap<String, Vec<(String, usize)>> = named
            .into_iter()
            .map(|(name, mut entries)| {
                entries.sort_by_key(|(ordinal, _, _)| *ordinal);
                let entries: Vec<(String, usize)> = entries
                    .into_iter()
                    .map(|(_, seq_id, idx)| (seq_id, idx))
                    .collect();
                (name, entries)
            })
            .collect();

        AnnotationStore {
            features_by_seq,
            max_lengths,
            name_index,
            lengths,
        }
    }

    /// Number of features held.
    pub fn len(&self) -> usize {
        self.features_by_seq.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of sequences with at least one feature.
    pub fn num_sequences(&self) -> usize {
        self.features_by_seq.len()
    }

    /// Add sequence lengths, replacing known values for the same sequence.
    pub fn extend_lengths(&mut self, lengths: ChromosomeLengthTable) {
        self.lengths.extend(lengths);
    }
}

/// Index of the first feature whose start is not below `search_start`.
pub fn find_search_start_index(features: &[Feature], search_start: i64) -> usize {
    features.partition_point(|f| f.interval.start < search_start)
}

impl FeatureStore for AnnotationStore {
    fn query(&self, seq_id: &str, start: i64, end: i64, types: &[String]) -> Vec<Feature> {
        if start > end {
            return Vec::new();
        }
        let Some(features) = self.features_by_seq.get(seq_id) else {
            return Vec::new();
        };

        let max_len = self.max_lengths.get(seq_id).copied().unwrap_or(0);
        let search_start = start.saturating_sub(max_len);
        let first = find_search_start_index(features, search_start);

        let region = GenomicInterval::new(seq_id, start, end, Strand::Unstranded);
        features[first..]
            .iter()
            .take_while(|f| f.interval.start <= end)
            .filter(|f| f.interval.overlaps(&region))
            .filter(|f| types.iter().any(|t| f.matches_type(t)))
            .cloned()
            .collect()
    }

    fn lengths(&self) -> &ChromosomeLengthTable {
        &self.lengths
    }

    fn features_by_name(&self, name: &str) -> Vec<Feature> {
        let Some(entries) = self.name_index.get(name) else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|(seq_id, idx)| self.features_by_seq.get(seq_id)?.get(*idx))
            .cloned()
            .collect()
    }
}
