//! Error handling

use std::path::PathBuf;
use thiserror::Error;

pub type LabelResult<T> = Result<T, LabelError>;

#[derive(Debug, Error)]
pub enum LabelError {
    // File errors
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Input errors
    #[error("malformed record in {path:?} at line {line}: {source}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error on {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid label value {value:?}")]
    InvalidLabel { value: String },

    #[error("{path:?} has no {column} column")]
    MissingColumn { path: PathBuf, column: String },
}

impl LabelError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LabelError::Io { path: path.into(), source }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        LabelError::Csv { path: path.into(), source }
    }
}
