//! Engine tests against a scripted feature store.
//!
//! The store double returns candidates in exactly the order it was given,
//! which pins down tie-breaking and lets each component be checked without
//! an annotation file.

use featint::config::Config;
use featint::engine::{
    distance_from_midpoint, distance_from_start, overlap_extent, select_best, FeatureResolver,
    RegionBuilder, RowProcessor, Summary,
};
use featint::store::{ChromosomeLengthTable, FeatureStore};
use featint::types::{
    Anchor, Feature, GenomicInterval, ReferencePoint, ReferenceRecord, ResultRow, Strand,
};

// -------------------------------------------------------------------------
// Helper functions
// -------------------------------------------------------------------------

/// Linear-scan store preserving insertion order.
#[derive(Default)]
struct ScriptedStore {
    features: Vec<Feature>,
    lengths: ChromosomeLengthTable,
}

impl ScriptedStore {
    fn new(features: Vec<Feature>) -> Self {
        ScriptedStore {
            features,
            lengths: ChromosomeLengthTable::new(),
        }
    }
}

impl FeatureStore for ScriptedStore {
    fn query(&self, seq_id: &str, start: i64, end: i64, types: &[String]) -> Vec<Feature> {
        let region = GenomicInterval::new(seq_id, start, end, Strand::Unstranded);
        self.features
            .iter()
            .filter(|f| f.interval.overlaps(&region))
            .filter(|f| types.iter().any(|t| f.matches_type(t)))
            .cloned()
            .collect()
    }

    fn lengths(&self) -> &ChromosomeLengthTable {
        &self.lengths
    }

    fn features_by_name(&self, name: &str) -> Vec<Feature> {
        self.features
            .iter()
            .filter(|f| f.name == name)
            .cloned()
            .collect()
    }
}

fn iv(start: i64, end: i64, strand: Strand) -> GenomicInterval {
    GenomicInterval::new("chr1", start, end, strand)
}

fn gene(name: &str, start: i64, end: i64, strand: Strand) -> Feature {
    Feature::new(name, "gene", "test", iv(start, end, strand))
}

fn gene_config() -> Config {
    let mut config = Config::new();
    config.parse_types("gene").unwrap();
    config
}

// -------------------------------------------------------------------------
// 1. Interval math
// -------------------------------------------------------------------------

mod test_interval_math {
    use super::*;

    #[test]
    fn test_disjoint_intervals_report_union_span() {
        let a = iv(100, 200, Strand::Positive);
        let b = iv(500, 600, Strand::Positive);
        assert_eq!(overlap_extent(&a, &b), 501);
        assert_ne!(overlap_extent(&a, &b), 0);
    }

    #[test]
    fn test_identical_intervals_report_length() {
        for (start, end) in [(1, 1), (100, 200), (1000, 1999)] {
            let a = iv(start, end, Strand::Positive);
            assert_eq!(overlap_extent(&a, &a), a.length());
        }
    }

    #[test]
    fn test_nested_interval_reports_outer_length() {
        let outer = iv(1000, 2000, Strand::Positive);
        let inner = iv(1500, 1800, Strand::Positive);
        assert_eq!(overlap_extent(&outer, &inner), 1001);
    }

    #[test]
    fn test_distance_fixtures() {
        let reference = iv(100, 200, Strand::Positive);
        let target = iv(250, 300, Strand::Positive);
        assert_eq!(
            distance_from_start(&reference, Strand::Positive, &target, Strand::Positive),
            150
        );
        assert_eq!(
            distance_from_start(&reference, Strand::Negative, &target, Strand::Negative),
            100
        );
    }

    #[test]
    fn test_distance_upstream_is_negative() {
        let reference = iv(1000, 2000, Strand::Positive);
        let target = iv(100, 200, Strand::Positive);
        assert_eq!(
            distance_from_start(&reference, Strand::Positive, &target, Strand::Positive),
            -900
        );
    }

    #[test]
    fn test_midpoint_distance_half_values() {
        // 150.5 - 100 = 50.5 -> 51
        assert_eq!(
            distance_from_midpoint(&iv(50, 150, Strand::Positive), &iv(100, 201, Strand::Positive)),
            51
        );
    }

    #[test]
    fn test_midpoint_distance_rounds_half_up_across_signs() {
        let reference = iv(100, 200, Strand::Positive);
        // (target start, target end, expected): reference midpoint is 150
        let cases = [
            (96, 200, -2),   // -2.0
            (95, 200, -2),   // -2.5 rounds up to -2
            (96, 201, -1),   // -1.5 rounds up to -1
            (99, 200, 0),    // -0.5 rounds up to 0
            (99, 201, 0),    // 0.0
            (100, 201, 1),   // 0.5 rounds up to 1
            (104, 200, 2),   // 2.0
        ];
        for (start, end, expected) in cases {
            let target = iv(start, end, Strand::Positive);
            assert_eq!(
                distance_from_midpoint(&reference, &target),
                expected,
                "target {start}-{end}"
            );
        }
    }
}

// -------------------------------------------------------------------------
// 2. Region construction
// -------------------------------------------------------------------------

mod test_region_builder {
    use super::*;

    #[test]
    fn test_extend_ignores_strand() {
        let mut config = gene_config();
        config.extend = Some(50);
        let builder = RegionBuilder::new(&config);

        for strand in [Strand::Positive, Strand::Negative] {
            let region = builder.region_for(&iv(1000, 1100, strand), None);
            assert_eq!((region.start, region.end), (950, 1150));
        }
    }

    #[test]
    fn test_five_prime_reverse_strand() {
        let mut config = gene_config();
        config.start_offset = Some(-200);
        config.stop_offset = Some(0);
        config.anchor = Anchor::Five;
        let builder = RegionBuilder::new(&config);

        let region = builder.region_for(&iv(1000, 2000, Strand::Negative), None);
        assert_eq!((region.start, region.end), (1800, 2000));
    }

    #[test]
    fn test_extend_takes_priority_over_offsets() {
        let mut config = gene_config();
        config.extend = Some(10);
        config.start_offset = Some(-200);
        config.stop_offset = Some(0);
        let builder = RegionBuilder::new(&config);

        let region = builder.region_for(&iv(1000, 2000, Strand::Positive), None);
        assert_eq!((region.start, region.end), (990, 2010));
    }

    #[test]
    fn test_start_never_below_one() {
        let mut config = gene_config();
        config.start_offset = Some(-5000);
        config.stop_offset = Some(-1);
        let builder = RegionBuilder::new(&config);

        let region = builder.region_for(&iv(100, 200, Strand::Positive), None);
        assert_eq!((region.start, region.end), (1, 99));
    }

    #[test]
    fn test_inverted_offsets_are_not_corrected() {
        let mut config = gene_config();
        config.start_offset = Some(100);
        config.stop_offset = Some(-100);
        let builder = RegionBuilder::new(&config);

        let region = builder.region_for(&iv(1000, 2000, Strand::Positive), None);
        assert!(region.start > region.end);
    }

    #[test]
    fn test_coordinate_reference_clamped_by_store_lengths() {
        let mut store = ScriptedStore::default();
        store.lengths.insert("chr1".to_string(), 1050);
        let mut config = gene_config();
        config.extend = Some(100);
        let builder = RegionBuilder::new(&config);

        let query = builder
            .build(
                &ReferenceRecord::Interval(iv(900, 1000, Strand::Positive)),
                &store,
            )
            .unwrap();
        assert_eq!((query.region.start, query.region.end), (800, 1050));
        assert_eq!(query.reference, iv(900, 1000, Strand::Positive));
    }
}

// -------------------------------------------------------------------------
// 3. Feature resolution
// -------------------------------------------------------------------------

mod test_feature_resolver {
    use super::*;

    #[test]
    fn test_strict_maximum_wins_in_any_order() {
        let region = iv(1000, 2000, Strand::Positive);
        let a = gene("a", 1200, 1300, Strand::Positive); // 1001
        let b = gene("b", 500, 1500, Strand::Positive); // 1501
        let c = gene("c", 1900, 2200, Strand::Positive); // 1201

        for order in [
            vec![a.clone(), b.clone(), c.clone()],
            vec![b.clone(), c.clone(), a.clone()],
            vec![c.clone(), a.clone(), b.clone()],
        ] {
            assert_eq!(select_best(&region, order).unwrap().name, "b");
        }
    }

    #[test]
    fn test_equal_overlap_picks_later_candidate() {
        let store = ScriptedStore::new(vec![
            gene("early", 1100, 1200, Strand::Positive),
            gene("late", 1300, 1400, Strand::Negative),
        ]);
        let config = gene_config();
        let resolver = FeatureResolver::new(&config.types);
        let region = iv(1000, 2000, Strand::Positive);

        let first = resolver.resolve(&store, &region);
        assert_eq!(first.match_count, 2);
        assert_eq!(first.selected.as_ref().unwrap().name, "late");

        // Same input, same answer
        for _ in 0..10 {
            assert_eq!(resolver.resolve(&store, &region), first);
        }
    }

    #[test]
    fn test_reversed_store_order_flips_tie() {
        let store = ScriptedStore::new(vec![
            gene("late", 1300, 1400, Strand::Negative),
            gene("early", 1100, 1200, Strand::Positive),
        ]);
        let config = gene_config();
        let resolver = FeatureResolver::new(&config.types);

        let resolution = resolver.resolve(&store, &iv(1000, 2000, Strand::Positive));
        assert_eq!(resolution.selected.unwrap().name, "early");
    }

    #[test]
    fn test_type_filter_applies() {
        let store = ScriptedStore::new(vec![Feature::new(
            "e1",
            "exon",
            "test",
            iv(1100, 1200, Strand::Positive),
        )]);
        let config = gene_config();
        let resolver = FeatureResolver::new(&config.types);

        let resolution = resolver.resolve(&store, &iv(1000, 2000, Strand::Positive));
        assert_eq!(resolution.match_count, 0);
        assert!(resolution.selected.is_none());
    }
}

// -------------------------------------------------------------------------
// 4. Row processing
// -------------------------------------------------------------------------

mod test_row_processor {
    use super::*;

    #[test]
    fn test_end_to_end_single_gene() {
        let store = ScriptedStore::new(vec![gene("GENE1", 1500, 1800, Strand::Positive)]);
        let config = gene_config();
        let processor = RowProcessor::new(&store, &config);
        let mut summary = Summary::new();

        let row = processor.process(
            &ReferenceRecord::Interval(iv(1000, 2000, Strand::Positive)),
            &mut summary,
        );

        assert_eq!(row.match_count, 1);
        assert_eq!(row.name.as_deref(), Some("GENE1"));
        assert_eq!(row.feature_type.as_deref(), Some("gene"));
        assert_eq!(row.strand, Some(Strand::Positive));
        assert_eq!(row.overlap, Some(1001));
        assert_eq!(row.distance, Some(500));
        assert_eq!(summary, Summary { zero: 0, one: 1, multiple: 0 });
    }

    #[test]
    fn test_no_candidates_gives_empty_row() {
        let store = ScriptedStore::new(vec![gene("GENE1", 1500, 1800, Strand::Positive)]);
        let config = gene_config();
        let processor = RowProcessor::new(&store, &config);
        let mut summary = Summary::new();

        let row = processor.process(
            &ReferenceRecord::Interval(iv(5000, 6000, Strand::Positive)),
            &mut summary,
        );

        assert_eq!(row, ResultRow::empty());
        assert_eq!(summary.zero, 1);
        assert_eq!(summary.total(), 1);
    }

    #[test]
    fn test_named_reference_resolved_through_store() {
        let store = ScriptedStore::new(vec![
            gene("REF", 1000, 2000, Strand::Negative),
            gene("NEIGHBOUR", 2100, 2300, Strand::Positive),
        ]);
        let mut config = gene_config();
        config.start_offset = Some(-500);
        config.stop_offset = Some(-1);
        config.anchor = Anchor::Three;
        let processor = RowProcessor::new(&store, &config);

        // Reverse-strand 3' end is the start: region is [1001, 1500]
        let row = processor.evaluate(&ReferenceRecord::Named("REF".to_string()));
        assert_eq!(row.match_count, 1);
        assert_eq!(row.name.as_deref(), Some("REF"));
    }

    #[test]
    fn test_midpoint_distance_upstream_feature() {
        let store = ScriptedStore::new(vec![gene("UP", 900, 1100, Strand::Positive)]);
        let mut config = gene_config();
        config.reference_point = ReferencePoint::Mid;
        let processor = RowProcessor::new(&store, &config);

        let row = processor.evaluate(&ReferenceRecord::Interval(iv(1000, 1200, Strand::Positive)));
        assert_eq!(row.name.as_deref(), Some("UP"));
        assert_eq!(row.distance, Some(-100));
    }

    #[test]
    fn test_named_reference_region_stays_inside_sequence() {
        let mut store = ScriptedStore::new(vec![gene("G1", 1000, 1040, Strand::Positive)]);
        store.lengths.insert("chr1".to_string(), 1050);
        let mut config = gene_config();
        config.extend = Some(100);
        let processor = RowProcessor::new(&store, &config);

        // Region 900-1140 is cut back to 900-1050
        let row = processor.evaluate(&ReferenceRecord::Named("G1".to_string()));
        assert_eq!(row.match_count, 1);
        assert_eq!(row.overlap, Some(151));
    }

    #[test]
    fn test_batches_merge_like_one_run() {
        let store = ScriptedStore::new(vec![
            gene("A", 100, 200, Strand::Positive),
            gene("B", 150, 250, Strand::Positive),
        ]);
        let config = gene_config();
        let processor = RowProcessor::new(&store, &config);

        let records: Vec<ReferenceRecord> = [(90, 95), (120, 130), (160, 170), (210, 220), (300, 400)]
            .iter()
            .map(|&(s, e)| ReferenceRecord::Interval(iv(s, e, Strand::Positive)))
            .collect();

        let (all_results, whole) = processor.process_batch(&records);

        let mut merged = Summary::new();
        let mut split_results = Vec::new();
        for chunk in records.chunks(2) {
            let (results, summary) = processor.process_batch(chunk);
            split_results.extend(results);
            merged.merge(&summary);
        }

        assert_eq!(all_results, split_results);
        assert_eq!(whole, merged);
        assert_eq!(whole, Summary { zero: 2, one: 2, multiple: 1 });
    }
}
