//! Error type for preprocessor construction, batch runs and table I/O.
//!
//! Cleaning a string never fails; every variant here is raised either while
//! a [`TextPreprocessor`](crate::TextPreprocessor) is being built or at the
//! table/file boundary.

use std::io;
use std::path::PathBuf;

use postclean_types::{RangeError, TableError};

/// Result alias used across the crate.
pub type Result<T, E = PreprocessError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("no stopword list for language `{0}`")]
    UnknownLanguage(String),

    #[error("failed to read stopword file {path}: {source}")]
    StopwordFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid emoji range: {0}")]
    InvalidRange(#[from] RangeError),

    #[error("failed to compile pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("column `{0}` not found")]
    ColumnNotFound(String),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
