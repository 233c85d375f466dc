// In: src/error.rs

//! This module defines the single, unified error type for the entire dimsplit
//! crate. It uses the `thiserror` crate to provide ergonomic, context-aware
//! error handling, and every fallible operation in the library returns it.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DimsplitError {
    // =========================================================================
    // === High-Level, Semantic Errors
    // =========================================================================
    /// A data line had fewer fields than the category column requires.
    #[error("Malformed row at line {line}: expected at least {expected} fields, found {found}")]
    MalformedRow {
        /// 1-based line number in the source file (the header is line 1).
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // === External Error Wrappers
    // =========================================================================
    /// An I/O failure tied to a specific input or output file.
    #[error("I/O error on '{}': {source}", .path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An error originating from the underlying I/O subsystem with no file context.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading a config file.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl DimsplitError {
    /// Wraps an `io::Error` with the path of the file it happened on.
    pub(crate) fn file_io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        DimsplitError::FileIo {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Attaches `path` to a bare `Io` error; every other variant passes through.
    pub(crate) fn with_path(self, path: impl AsRef<Path>) -> Self {
        match self {
            DimsplitError::Io(source) => DimsplitError::file_io(path, source),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, DimsplitError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_with_path_only_rewraps_bare_io() {
        let err = DimsplitError::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = err.with_path("nyc_jobs.csv");
        assert!(matches!(err, DimsplitError::FileIo { .. }));
        assert!(err.to_string().contains("nyc_jobs.csv"));

        let err = DimsplitError::MalformedRow {
            line: 3,
            expected: 2,
            found: 1,
        }
        .with_path("nyc_jobs.csv");
        assert!(matches!(err, DimsplitError::MalformedRow { line: 3, .. }));
    }

    #[test]
    fn test_malformed_row_message() {
        let err = DimsplitError::MalformedRow {
            line: 7,
            expected: 2,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "Malformed row at line 7: expected at least 2 fields, found 1"
        );
    }
}
