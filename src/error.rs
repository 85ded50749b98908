//! Error types for featint.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring a run or loading its inputs.
///
/// Per-row problems are not errors: they are logged and the row gets an
/// empty result. Everything here is fatal and surfaces before any row is
/// processed.
#[derive(Debug, Error)]
pub enum FeatintError {
    #[error("no feature types requested")]
    EmptyTypeList,

    #[error("invalid feature type '{0}'")]
    InvalidType(String),

    #[error("start and stop offsets must be given together")]
    IncompleteOffsets,

    #[error("extension cannot be negative: {0}")]
    NegativeExtend(i64),

    #[error("invalid anchor '{0}': expected 'five', 'three' or 'mid'")]
    InvalidAnchor(String),

    #[error("invalid reference point '{0}': expected 'start' or 'mid'")]
    InvalidReferencePoint(String),

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("reference table has neither coordinate columns nor a name column")]
    UnknownReferenceLayout,

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FeatintError>;
