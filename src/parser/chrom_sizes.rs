//! Chromosome sizes parser.
//!
//! Reads two-column `name<TAB>length` files. Extra columns are ignored, so
//! samtools `.fai` indexes load directly.

use std::io::BufRead;
use std::path::Path;

use crate::error::{FeatintError, Result};
use crate::parser::util::open_reader;
use crate::store::ChromosomeLengthTable;

/// Parse a chromosome sizes file.
pub fn parse_chrom_sizes(path: &Path) -> Result<ChromosomeLengthTable> {
    let reader = open_reader(path)?;
    parse_chrom_sizes_reader(reader, path)
}

fn parse_chrom_sizes_reader<R: BufRead>(reader: R, path: &Path) -> Result<ChromosomeLengthTable> {
    let mut lengths = ChromosomeLengthTable::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|source| FeatintError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(name), Some(length)) = (fields.next(), fields.next()) else {
            return Err(FeatintError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
                message: "expected name and length columns".to_string(),
            });
        };
        let length: i64 = length.parse().map_err(|_| FeatintError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            message: format!("invalid length '{}'", length),
        })?;

        lengths.insert(name.to_string(), length);
    }

    Ok(lengths)
}
