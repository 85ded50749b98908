//! Intersection engine: region construction, feature resolution and metrics.

pub mod interval;
pub mod processor;
pub mod region;
pub mod resolver;

pub use interval::{distance_from_midpoint, distance_from_start, overlap_extent};
pub use processor::{RowProcessor, Summary};
pub use region::{QueryRegion, RegionBuilder};
pub use resolver::{select_best, FeatureResolver, Resolution};
