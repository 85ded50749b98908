//! featint - Genomic interval intersection and nearest-feature resolution.
//!
//! For each reference interval or named feature, featint derives a query
//! region, finds annotated features of the requested types overlapping it,
//! picks one when several overlap, and reports a signed distance and an
//! overlap extent between the reference and the chosen feature.
//!
//! # Features
//!
//! - Load GTF/GFF3 annotations (with gzip support) into an in-memory store
//! - Read references from BED files or headed tables of coordinates or names
//! - Derive regions by symmetric extension or strand-aware anchored offsets
//! - Plug in any spatial index through the [`FeatureStore`] trait
//!
//! # Example
//!
//! ```ignore
//! use featint::config::Config;
//! use featint::engine::{RowProcessor, Summary};
//! use featint::parser::parse_annotation;
//! use featint::types::{GenomicInterval, ReferenceRecord, Strand};
//! use std::path::Path;
//!
//! let mut config = Config::default();
//! config.parse_types("gene")?;
//! let store = parse_annotation(Path::new("annotation.gff3"), &config.name_tags)?;
//!
//! let processor = RowProcessor::new(&store, &config);
//! let mut summary = Summary::new();
//! let record = ReferenceRecord::Interval(GenomicInterval::new("chr1", 1000, 2000, Strand::Positive));
//! let result = processor.process(&record, &mut summary);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod parser;
pub mod store;
pub mod types;

pub use config::Config;
pub use engine::{RowProcessor, Summary};
pub use error::FeatintError;
pub use store::{AnnotationStore, ChromosomeLengthTable, FeatureStore};
pub use types::{Feature, GenomicInterval, ReferenceRecord, ResultRow, Strand};
