//! Error types for resmerge
//!
//! Uses `thiserror` for library errors. Source problems render as
//! `<path>[:<line>[:<col>]]: Error: <message>` so editors can jump to them.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for merge operations
pub type MergeResult<T> = Result<T, MergeError>;

/// Main error type for merge operations
#[derive(Error, Debug)]
pub enum MergeError {
    /// Two sources of one set define the same item identity
    #[error("{}\t{}: Error: Duplicate resources: {key}", first.display(), second.display())]
    DuplicateKey {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// XML or structural parse failure in a source file
    #[error("{}: Error: {message}", SourcePosition::new(file, *line, *column))]
    MalformedSource {
        file: PathBuf,
        line: Option<u32>,
        column: Option<u32>,
        message: String,
    },

    /// Resource or asset name violates the lexical rules of its category
    #[error("{}: Error: {message}", file.display())]
    InvalidName { file: PathBuf, message: String },

    /// A persisted snapshot cannot be reused
    #[error("incompatible merge snapshot: {reason}")]
    IncompatibleSnapshot { reason: String },

    /// Output could not be written or deleted
    #[error("{}: Error: failed to write output: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A merge consumer rejected an item
    #[error("merge consumer failed: {message}")]
    Consumer { message: String },

    /// Invalid configuration
    #[error("{}: Error: invalid configuration: {message}", file.display())]
    Config { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MergeError {
    /// Build a duplicate error with both paths in deterministic order.
    pub fn duplicate(key: impl Into<String>, a: &Path, b: &Path) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        MergeError::DuplicateKey {
            key: key.into(),
            first: first.to_path_buf(),
            second: second.to_path_buf(),
        }
    }

    pub fn malformed(file: &Path, message: impl Into<String>) -> Self {
        MergeError::MalformedSource {
            file: file.to_path_buf(),
            line: None,
            column: None,
            message: message.into(),
        }
    }

    pub fn write_failure(path: &Path, source: std::io::Error) -> Self {
        MergeError::WriteFailure {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether the caller should discard incremental state and rescan.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MergeError::IncompatibleSnapshot { .. })
    }
}

/// `path[:line[:col]]` rendering used by source errors.
struct SourcePosition<'a> {
    file: &'a Path,
    line: Option<u32>,
    column: Option<u32>,
}

impl<'a> SourcePosition<'a> {
    fn new(file: &'a Path, line: Option<u32>, column: Option<u32>) -> Self {
        Self { file, line, column }
    }
}

impl fmt::Display for SourcePosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
            if let Some(column) = self.column {
                write!(f, ":{column}")?;
            }
        }
        Ok(())
    }
}
