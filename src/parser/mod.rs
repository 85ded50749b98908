//! Parsers for annotation, reference and sequence-length files.

pub mod annotation;
pub mod chrom_sizes;
pub mod reference;
pub mod util;

pub use annotation::parse_annotation;
pub use chrom_sizes::parse_chrom_sizes;
pub use reference::{ReferenceReader, ReferenceRow};
