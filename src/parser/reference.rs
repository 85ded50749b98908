//! Reference table reader with gzip support.
//!
//! Two layouts are understood:
//! - BED (by file extension): no header, 0-based half-open coordinates
//!   converted to 1-based closed, strand from column 6 when present;
//! - tab-delimited tables with a header line, whose columns are located by
//!   name. A table carrying chromosome/start/stop columns is read as
//!   coordinates; otherwise a name column makes it a table of feature names.
//!
//! The layout and the [`ReferenceKind`] are decided once, when the reader is
//! opened. Rows keep their original text fields so results can be appended.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::error::{FeatintError, Result};
use crate::parser::util::{open_reader, plain_extension};
use crate::types::{GenomicInterval, ReferenceKind, ReferenceRecord, Strand};

const CHROM_COLUMNS: [&str; 6] = ["chromosome", "chrom", "chr", "seq_id", "seqid", "seqname"];
const START_COLUMNS: [&str; 2] = ["start", "chromstart"];
const STOP_COLUMNS: [&str; 3] = ["stop", "end", "chromend"];
const STRAND_COLUMNS: [&str; 1] = ["strand"];
const NAME_COLUMNS: [&str; 5] = ["name", "feature", "gene", "id", "primary_id"];

/// Explicit column names overriding the defaults searched in a table header.
#[derive(Debug, Clone, Default)]
pub struct ColumnSpec {
    pub chrom: Option<String>,
    pub start: Option<String>,
    pub stop: Option<String>,
    pub strand: Option<String>,
    /// Setting this forces name mode.
    pub name: Option<String>,
}

/// One input row: its original fields and the reference it stands for.
#[derive(Debug, Clone)]
pub struct ReferenceRow {
    pub fields: Vec<String>,
    pub record: ReferenceRecord,
}

#[derive(Debug, Clone, Copy)]
enum Layout {
    Bed,
    TableCoordinates {
        chrom: usize,
        start: usize,
        stop: usize,
        strand: Option<usize>,
    },
    TableNames {
        name: usize,
    },
}

/// Streaming reader over reference rows.
pub struct ReferenceReader {
    reader: Box<dyn BufRead + Send>,
    path: PathBuf,
    layout: Layout,
    header: Option<Vec<String>>,
    line_number: usize,
}

impl ReferenceReader {
    /// Open a reference file (supports .gz).
    pub fn new(path: &Path, columns: &ColumnSpec) -> Result<Self> {
        let reader = open_reader(path)?;
        let is_bed = plain_extension(path).as_deref() == Some("bed");
        Self::from_reader(reader, path, is_bed, columns)
    }

    /// Wrap an already open reader. `is_bed` selects the headerless BED layout.
    pub fn from_reader(
        reader: Box<dyn BufRead + Send>,
        path: &Path,
        is_bed: bool,
        columns: &ColumnSpec,
    ) -> Result<Self> {
        let mut this = ReferenceReader {
            reader,
            path: path.to_path_buf(),
            layout: Layout::Bed,
            header: None,
            line_number: 0,
        };

        if !is_bed {
            let header = this.read_header()?;
            this.layout = locate_columns(&header, columns)?;
            this.header = Some(header);
        }

        Ok(this)
    }

    /// Whether rows carry coordinates or feature names.
    pub fn kind(&self) -> ReferenceKind {
        match self.layout {
            Layout::Bed | Layout::TableCoordinates { .. } => ReferenceKind::Coordinates,
            Layout::TableNames { .. } => ReferenceKind::Names,
        }
    }

    /// Header fields for table inputs; BED inputs have none.
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Read the next chunk of rows.
    ///
    /// Returns `None` when EOF is reached. Rows are returned in file order.
    pub fn read_chunk(&mut self, size: usize) -> Result<Option<Vec<ReferenceRow>>> {
        let mut rows = Vec::with_capacity(size);
        let mut line = String::new();

        while rows.len() < size {
            line.clear();
            if !self.next_line(&mut line)? {
                break;
            }

            let trimmed = line.trim_end_matches(['\n', '\r']);
            if trimmed.trim().is_empty() || self.is_comment(trimmed) {
                continue;
            }

            let fields: Vec<String> = trimmed.split('\t').map(|s| s.to_string()).collect();
            let record = self.parse_record(&fields);
            rows.push(ReferenceRow { fields, record });
        }

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows))
        }
    }

    fn next_line(&mut self, line: &mut String) -> Result<bool> {
        let bytes_read = self
            .reader
            .read_line(line)
            .map_err(|source| FeatintError::Io {
                path: self.path.clone(),
                source,
            })?;
        self.line_number += 1;
        Ok(bytes_read > 0)
    }

    fn read_header(&mut self) -> Result<Vec<String>> {
        let mut line = String::new();
        loop {
            line.clear();
            if !self.next_line(&mut line)? {
                return Err(FeatintError::Parse {
                    path: self.path.clone(),
                    line: self.line_number,
                    message: "reference table is empty, expected a header line".to_string(),
                });
            }
            let trimmed = line.trim_end_matches(['\n', '\r']);
            if trimmed.trim().is_empty() {
                continue;
            }
            let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed);
            return Ok(trimmed.split('\t').map(|s| s.trim().to_string()).collect());
        }
    }

    fn is_comment(&self, line: &str) -> bool {
        match self.layout {
            Layout::Bed => {
                line.starts_with('#') || line.starts_with("track") || line.starts_with("browser")
            }
            _ => line.starts_with('#'),
        }
    }

    fn parse_record(&self, fields: &[String]) -> ReferenceRecord {
        match self.layout {
            Layout::Bed => {
                if fields.len() < 3 {
                    return self.invalid(format!(
                        "expected at least 3 BED columns, found {}",
                        fields.len()
                    ));
                }
                let strand = fields.get(5).map(|s| parse_strand(s)).unwrap_or_default();
                // BED starts are 0-based
                self.interval_record(&fields[0], &fields[1], &fields[2], strand, 1)
            }
            Layout::TableCoordinates {
                chrom,
                start,
                stop,
                strand,
            } => {
                let max_idx = chrom.max(start).max(stop);
                if fields.len() <= max_idx {
                    return self.invalid(format!(
                        "expected at least {} columns, found {}",
                        max_idx + 1,
                        fields.len()
                    ));
                }
                let strand = strand
                    .and_then(|idx| fields.get(idx))
                    .map(|s| parse_strand(s))
                    .unwrap_or_default();
                self.interval_record(&fields[chrom], &fields[start], &fields[stop], strand, 0)
            }
            Layout::TableNames { name } => match fields.get(name).map(|s| s.trim()) {
                Some(value) if !value.is_empty() && value != "." => {
                    ReferenceRecord::Named(value.to_string())
                }
                _ => self.invalid("missing feature name".to_string()),
            },
        }
    }

    fn interval_record(
        &self,
        seq_id: &str,
        start: &str,
        stop: &str,
        strand: Strand,
        start_shift: i64,
    ) -> ReferenceRecord {
        let seq_id = seq_id.trim();
        match (start.trim().parse::<i64>(), stop.trim().parse::<i64>()) {
            (Ok(start), Ok(stop)) if !seq_id.is_empty() => ReferenceRecord::Interval(
                GenomicInterval::new(seq_id, start + start_shift, stop, strand),
            ),
            _ => self.invalid(format!(
                "invalid coordinates '{}:{}-{}'",
                seq_id,
                start.trim(),
                stop.trim()
            )),
        }
    }

    fn invalid(&self, message: String) -> ReferenceRecord {
        ReferenceRecord::Invalid(format!("line {}: {}", self.line_number, message))
    }
}

/// Strand columns that do not parse count as unstranded.
fn parse_strand(value: &str) -> Strand {
    value.trim().parse().unwrap_or_default()
}

fn find_column(header: &[String], explicit: Option<&String>, defaults: &[&str]) -> Option<usize> {
    match explicit {
        Some(name) => header.iter().position(|h| h == name),
        None => header
            .iter()
            .position(|h| defaults.contains(&h.to_lowercase().as_str())),
    }
}

fn locate_columns(header: &[String], columns: &ColumnSpec) -> Result<Layout> {
    if columns.name.is_some() {
        return find_column(header, columns.name.as_ref(), &NAME_COLUMNS)
            .map(|name| Layout::TableNames { name })
            .ok_or(FeatintError::UnknownReferenceLayout);
    }

    let chrom = find_column(header, columns.chrom.as_ref(), &CHROM_COLUMNS);
    let start = find_column(header, columns.start.as_ref(), &START_COLUMNS);
    let stop = find_column(header, columns.stop.as_ref(), &STOP_COLUMNS);
    let strand = find_column(header, columns.strand.as_ref(), &STRAND_COLUMNS);

    if let (Some(chrom), Some(start), Some(stop)) = (chrom, start, stop) {
        return Ok(Layout::TableCoordinates {
            chrom,
            start,
            stop,
            strand,
        });
    }

    find_column(header, None, &NAME_COLUMNS)
        .map(|name| Layout::TableNames { name })
        .ok_or(FeatintError::UnknownReferenceLayout)
}
