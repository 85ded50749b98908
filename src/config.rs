//! Configuration and defaults for featint.
//!
//! This module contains the configuration structure that controls how query
//! regions are derived and how distances are reported.

use crate::error::{FeatintError, Result};
use crate::types::{Anchor, ReferencePoint};

/// Attribute tags tried, in order, when naming a feature from an annotation file.
pub const DEFAULT_NAME_TAGS: [&str; 6] = [
    "Name",
    "ID",
    "gene_name",
    "gene_id",
    "transcript_name",
    "transcript_id",
];

/// Configuration for the intersection run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Feature types to search for ("type" or "type:source").
    pub types: Vec<String>,
    /// Symmetric padding added to both ends of the reference.
    pub extend: Option<i64>,
    /// Offset of the region start relative to the anchor.
    pub start_offset: Option<i64>,
    /// Offset of the region stop relative to the anchor.
    pub stop_offset: Option<i64>,
    /// Reference point the offsets are measured from.
    pub anchor: Anchor,
    /// Reference coordinate used for reporting distance.
    pub reference_point: ReferencePoint,
    /// Attribute tags used to name annotation features.
    pub name_tags: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            types: Vec::new(),
            extend: None,
            start_offset: None,
            stop_offset: None,
            anchor: Anchor::Five,
            reference_point: ReferencePoint::Start,
            name_tags: DEFAULT_NAME_TAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list of feature types.
    ///
    /// Duplicates are dropped and order of first appearance is kept.
    pub fn parse_types(&mut self, types_str: &str) -> Result<()> {
        let mut new_types: Vec<String> = Vec::new();

        for tag in types_str.split(',') {
            let tag = tag.trim();
            if tag.is_empty() {
                continue;
            }
            if tag.starts_with(':') || tag.ends_with(':') || tag.matches(':').count() > 1 {
                return Err(FeatintError::InvalidType(tag.to_string()));
            }
            if !new_types.iter().any(|t| t == tag) {
                new_types.push(tag.to_string());
            }
        }

        if new_types.is_empty() {
            return Err(FeatintError::EmptyTypeList);
        }
        self.types = new_types;
        Ok(())
    }

    /// Set the offset anchor from its command-line name.
    pub fn parse_anchor(&mut self, value: &str) -> Result<()> {
        self.anchor = value
            .parse()
            .map_err(|_| FeatintError::InvalidAnchor(value.to_string()))?;
        Ok(())
    }

    /// Set the distance reference point from its command-line name.
    pub fn parse_reference_point(&mut self, value: &str) -> Result<()> {
        self.reference_point = value
            .parse()
            .map_err(|_| FeatintError::InvalidReferencePoint(value.to_string()))?;
        Ok(())
    }

    /// Both offsets, when both are set.
    pub fn offsets(&self) -> Option<(i64, i64)> {
        match (self.start_offset, self.stop_offset) {
            (Some(start), Some(stop)) => Some((start, stop)),
            _ => None,
        }
    }

    /// Check the configuration before any row is processed.
    pub fn validate(&self) -> Result<()> {
        if self.types.is_empty() {
            return Err(FeatintError::EmptyTypeList);
        }
        if let Some(extend) = self.extend {
            if extend < 0 {
                return Err(FeatintError::NegativeExtend(extend));
            }
        }
        if self.start_offset.is_some() != self.stop_offset.is_some() {
            return Err(FeatintError::IncompleteOffsets);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.types.is_empty());
        assert_eq!(config.extend, None);
        assert_eq!(config.offsets(), None);
        assert_eq!(config.anchor, Anchor::Five);
        assert_eq!(config.reference_point, ReferencePoint::Start);
        assert_eq!(config.name_tags[0], "Name");
    }

    #[test]
    fn test_parse_types_valid() {
        let mut config = Config::new();
        config.parse_types("gene,mRNA,gene:ensembl").unwrap();
        assert_eq!(config.types, vec!["gene", "mRNA", "gene:ensembl"]);
    }

    #[test]
    fn test_parse_types_duplicates_and_whitespace() {
        let mut config = Config::new();
        config.parse_types("gene, gene ,exon,,").unwrap();
        assert_eq!(config.types, vec!["gene", "exon"]);
    }

    #[test]
    fn test_parse_types_empty() {
        let mut config = Config::new();
        assert!(matches!(
            config.parse_types(""),
            Err(FeatintError::EmptyTypeList)
        ));
        assert!(matches!(
            config.parse_types(" , ,"),
            Err(FeatintError::EmptyTypeList)
        ));
    }

    #[test]
    fn test_parse_types_malformed_source() {
        let mut config = Config::new();
        assert!(matches!(
            config.parse_types("gene:"),
            Err(FeatintError::InvalidType(_))
        ));
        assert!(matches!(
            config.parse_types("a:b:c"),
            Err(FeatintError::InvalidType(_))
        ));
    }

    #[test]
    fn test_parse_anchor_and_reference_point() {
        let mut config = Config::new();
        config.parse_anchor("three").unwrap();
        config.parse_reference_point("MID").unwrap();
        assert_eq!(config.anchor, Anchor::Three);
        assert_eq!(config.reference_point, ReferencePoint::Mid);

        match config.parse_anchor("upstream") {
            Err(FeatintError::InvalidAnchor(value)) => assert_eq!(value, "upstream"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            config.parse_reference_point("end"),
            Err(FeatintError::InvalidReferencePoint(_))
        ));
        // Failed parses leave the previous values in place
        assert_eq!(config.anchor, Anchor::Three);
        assert_eq!(config.reference_point, ReferencePoint::Mid);
    }

    #[test]
    fn test_validate_requires_types() {
        let config = Config::new();
        assert!(matches!(config.validate(), Err(FeatintError::EmptyTypeList)));
    }

    #[test]
    fn test_validate_offsets_together() {
        let mut config = Config::new();
        config.types = vec!["gene".to_string()];
        config.start_offset = Some(-200);
        assert!(matches!(
            config.validate(),
            Err(FeatintError::IncompleteOffsets)
        ));

        config.stop_offset = Some(0);
        assert!(config.validate().is_ok());
        assert_eq!(config.offsets(), Some((-200, 0)));
    }

    #[test]
    fn test_validate_negative_extend() {
        let mut config = Config::new();
        config.types = vec!["gene".to_string()];
        config.extend = Some(-5);
        assert!(matches!(
            config.validate(),
            Err(FeatintError::NegativeExtend(-5))
        ));
    }
}
