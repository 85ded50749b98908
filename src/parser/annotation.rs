//! GTF/GFF3 annotation parser with gzip support.
//!
//! Every feature line becomes one [`Feature`] in an [`AnnotationStore`],
//! whatever its type. Both attribute syntaxes are accepted: GTF
//! (`key "value";`) and GFF3 (`key=value;`). GFF3 `##sequence-region`
//! pragmas and full-length `region`/`chromosome` features also feed the
//! store's chromosome length table.

use std::io::BufRead;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{FeatintError, Result};
use crate::parser::util::open_reader;
use crate::store::{AnnotationStore, ChromosomeLengthTable};
use crate::types::{Feature, GenomicInterval, Strand};

/// Parse an annotation file into an in-memory store.
///
/// Supports both plain text and gzip-compressed files.
pub fn parse_annotation(path: &Path, name_tags: &[String]) -> Result<AnnotationStore> {
    let reader = open_reader(path)?;
    parse_annotation_reader(reader, path, name_tags)
}

/// Parse annotation data from a reader.
fn parse_annotation_reader<R: BufRead>(
    reader: R,
    path: &Path,
    name_tags: &[String],
) -> Result<AnnotationStore> {
    let mut features = Vec::new();
    let mut lengths = ChromosomeLengthTable::new();
    let mut skipped = 0usize;

    for (idx, line_result) in reader.lines().enumerate() {
        let line_number = idx + 1;
        let line = line_result.map_err(|source| FeatintError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if line.starts_with("##FASTA") {
            break;
        }
        if let Some(pragma) = line.strip_prefix("##sequence-region") {
            if let Some((seq_id, length)) = parse_sequence_region(pragma) {
                lengths.insert(seq_id, length);
            }
            continue;
        }
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 9 {
            skipped += 1;
            continue;
        }

        let parse_err = |message: String| FeatintError::Parse {
            path: path.to_path_buf(),
            line: line_number,
            message,
        };

        let seq_id = fields[0];
        let source = fields[1];
        let feature_type = fields[2];
        let start: i64 = fields[3]
            .parse()
            .map_err(|_| parse_err(format!("invalid start coordinate '{}'", fields[3])))?;
        let end: i64 = fields[4]
            .parse()
            .map_err(|_| parse_err(format!("invalid end coordinate '{}'", fields[4])))?;
        let strand = fields[6].parse::<Strand>().unwrap_or_else(|_| {
            warn!(
                line = line_number,
                strand = fields[6],
                "unrecognised strand, treating as unstranded"
            );
            Strand::Unstranded
        });

        if (feature_type == "region" || feature_type == "chromosome") && start == 1 {
            lengths.entry(seq_id.to_string()).or_insert(end);
        }

        let name = feature_name(fields[8], name_tags)
            .unwrap_or_else(|| format!("{}:{}:{}-{}", feature_type, seq_id, start, end));

        features.push(Feature::new(
            name,
            feature_type,
            source,
            GenomicInterval::new(seq_id, start, end, strand),
        ));
    }

    if skipped > 0 {
        warn!(skipped, "skipped annotation lines with fewer than 9 columns");
    }
    debug!(features = features.len(), sequences = lengths.len(), "annotation parsed");

    Ok(AnnotationStore::from_features(features, lengths))
}

/// Name a feature from the first attribute tag present.
fn feature_name(attributes: &str, name_tags: &[String]) -> Option<String> {
    name_tags
        .iter()
        .find_map(|tag| extract_attribute(attributes, tag))
}

/// Extract an attribute value from a GTF or GFF3 attribute column.
///
/// GTF attributes are `key "value"; key "value"; ...`, GFF3 attributes are
/// `key=value;key=value`. GFF3 values are percent-decoded for the common
/// escapes.
fn extract_attribute(attributes: &str, key: &str) -> Option<String> {
    for entry in attributes.split(';') {
        let entry = entry.trim();
        if let Some(value) = entry.strip_prefix(key) {
            if let Some(value) = value.strip_prefix('=') {
                if value.is_empty() {
                    return None;
                }
                return Some(unescape_gff3(value));
            }
            if value.starts_with(' ') {
                let value = value.trim();
                let value = value
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .unwrap_or(value);
                if value.is_empty() {
                    return None;
                }
                return Some(value.to_string());
            }
        }
    }
    None
}

fn unescape_gff3(value: &str) -> String {
    value
        .replace("%3B", ";")
        .replace("%3D", "=")
        .replace("%26", "&")
        .replace("%2C", ",")
        .replace("%09", "\t")
        .replace("%25", "%")
}

/// Parse the body of a `##sequence-region seqid start end` pragma.
fn parse_sequence_region(pragma: &str) -> Option<(String, i64)> {
    let mut parts = pragma.split_whitespace();
    let seq_id = parts.next()?;
    let _start = parts.next()?;
    let end: i64 = parts.next()?.parse().ok()?;
    Some((seq_id.to_string(), end))
}
