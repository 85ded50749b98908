//! Utility functions for file parsing.

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{FeatintError, Result};

/// Creates a buffered reader that automatically handles gzip-compressed files.
///
/// Paths ending in ".gz" are wrapped in a multi-member gzip decoder so that
/// bgzip output reads through to the end.
pub fn create_buffered_reader(file: File, path: &Path) -> Box<dyn BufRead + Send> {
    if is_gzipped(path) {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    }
}

/// Open a path for buffered line reading.
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let file = File::open(path).map_err(|source| FeatintError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(create_buffered_reader(file, path))
}

/// File name with any trailing ".gz" removed, lowercased.
pub fn plain_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().to_lowercase();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_string())
}

fn is_gzipped(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".gz")
}
