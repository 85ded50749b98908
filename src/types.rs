//! Core data structures for featint.
//!
//! This module contains the fundamental types shared by the store, the
//! intersection engine and the output layer.

use std::fmt;
use std::str::FromStr;

/// Strand orientation for genomic intervals and features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strand {
    Positive,
    Negative,
    #[default]
    Unstranded,
}

/// Error type for parsing strand from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrandError;

impl fmt::Display for ParseStrandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid strand: expected '+', '-', '.', 1, -1 or 0")
    }
}

impl std::error::Error for ParseStrandError {}

impl FromStr for Strand {
    type Err = ParseStrandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" | "1" | "+1" => Ok(Strand::Positive),
            "-" | "-1" => Ok(Strand::Negative),
            "." | "0" | "?" => Ok(Strand::Unstranded),
            _ => Err(ParseStrandError),
        }
    }
}

impl Strand {
    /// Numeric strand: 1, -1 or 0.
    pub fn sign(&self) -> i8 {
        match self {
            Strand::Positive => 1,
            Strand::Negative => -1,
            Strand::Unstranded => 0,
        }
    }

    /// Unstranded intervals are treated as forward for all coordinate math.
    pub fn is_forward(&self) -> bool {
        self.sign() >= 0
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sign())
    }
}

/// A 1-based, fully closed interval on a named sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomicInterval {
    pub seq_id: String,
    pub start: i64,
    pub end: i64,
    pub strand: Strand,
}

impl GenomicInterval {
    /// Create a new interval.
    pub fn new(seq_id: impl Into<String>, start: i64, end: i64, strand: Strand) -> Self {
        GenomicInterval {
            seq_id: seq_id.into(),
            start,
            end,
            strand,
        }
    }

    /// Get interval length (end - start + 1).
    pub fn length(&self) -> i64 {
        self.end - self.start + 1
    }

    /// Get the midpoint of the interval (integer division).
    pub fn midpoint(&self) -> i64 {
        self.start.saturating_add(self.end) / 2
    }

    /// True when the interval covers at least one base.
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    /// True when both intervals share at least one base on the same sequence.
    pub fn overlaps(&self, other: &GenomicInterval) -> bool {
        self.seq_id == other.seq_id && self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.seq_id, self.start, self.end)
    }
}

/// An annotated feature held by a feature store.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    pub feature_type: String,
    /// Annotation source column (e.g. "ensembl", "HAVANA").
    pub source: String,
    pub interval: GenomicInterval,
}

impl Feature {
    /// Create a new feature.
    pub fn new(
        name: impl Into<String>,
        feature_type: impl Into<String>,
        source: impl Into<String>,
        interval: GenomicInterval,
    ) -> Self {
        Feature {
            name: name.into(),
            feature_type: feature_type.into(),
            source: source.into(),
            interval,
        }
    }

    pub fn strand(&self) -> Strand {
        self.interval.strand
    }

    /// Check this feature against a type filter.
    ///
    /// A filter is either a bare type ("gene") or "type:source" ("gene:ensembl").
    pub fn matches_type(&self, filter: &str) -> bool {
        match filter.split_once(':') {
            Some((feature_type, source)) => {
                self.feature_type == feature_type && self.source == source
            }
            None => self.feature_type == filter,
        }
    }
}

/// The reference an input row stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceRecord {
    /// Explicit coordinates given in the row.
    Interval(GenomicInterval),
    /// A feature name, resolved lazily through the store.
    Named(String),
    /// The row could not be read as a reference; it still gets an empty result.
    Invalid(String),
}

/// Which representation a reference source uses. Decided once per input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Coordinates,
    Names,
}

/// Point of the reference the start/stop offsets are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Five,
    Three,
    Mid,
}

/// Error type for parsing anchor from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAnchorError;

impl fmt::Display for ParseAnchorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid anchor: expected 'five', 'three' or 'mid'")
    }
}

impl std::error::Error for ParseAnchorError {}

impl FromStr for Anchor {
    type Err = ParseAnchorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "five" | "5" => Ok(Anchor::Five),
            "three" | "3" => Ok(Anchor::Three),
            "mid" | "middle" => Ok(Anchor::Mid),
            _ => Err(ParseAnchorError),
        }
    }
}

/// Reference coordinate used when reporting the distance to a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferencePoint {
    #[default]
    Start,
    Mid,
}

/// Error type for parsing reference point from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReferencePointError;

impl fmt::Display for ParseReferencePointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid reference point: expected 'start' or 'mid'")
    }
}

impl std::error::Error for ParseReferencePointError {}

impl FromStr for ReferencePoint {
    type Err = ParseReferencePointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" => Ok(ReferencePoint::Start),
            "mid" | "middle" => Ok(ReferencePoint::Mid),
            _ => Err(ParseReferencePointError),
        }
    }
}

/// Result fields appended to one reference row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultRow {
    pub match_count: usize,
    pub name: Option<String>,
    pub feature_type: Option<String>,
    pub strand: Option<Strand>,
    pub distance: Option<i64>,
    pub overlap: Option<i64>,
}

impl ResultRow {
    /// A row with no match: zero count and every other field empty.
    pub fn empty() -> Self {
        Self::default()
    }
}
