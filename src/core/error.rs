//! Error types for GeneLocator
//!
//! Defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for GeneLocator operations
#[derive(Debug, Error)]
pub enum GeneLocatorError {
    /// Record-level parse errors
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// Annotation join errors
    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    /// Record error located in a specific file
    #[error("{}: {source}", .path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: RecordError,
    },

    /// A file could not be opened or created
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid run configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeneLocatorError {
    /// Attach a path to an open/create failure
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GeneLocatorError::File {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while reading position pairs, feature tables or joined tables
#[derive(Debug, Error)]
pub enum RecordError {
    /// Too few fields or a field that fails numeric conversion
    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    /// A matched gene/CDS header ran out of follow-on qualifier lines
    #[error(
        "Truncated {kind} feature at line {header_line}: expected qualifier at offset {offset}, \
         last available line is {last_line}"
    )]
    TruncatedFeature {
        kind: String,
        header_line: usize,
        offset: usize,
        last_line: usize,
    },

    /// I/O error during parsing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecordError {
    /// Create a malformed-record error
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        RecordError::MalformedRecord {
            line,
            message: message.into(),
        }
    }

    /// Create a too-few-fields error
    pub fn too_few_fields(line: usize, expected: usize, found: usize) -> Self {
        Self::malformed(
            line,
            format!("expected at least {} fields, found {}", expected, found),
        )
    }

    /// Create an invalid number error
    pub fn invalid_number(line: usize, field: &str, value: &str) -> Self {
        Self::malformed(line, format!("invalid {} value '{}'", field, value))
    }

    /// Attach the file the record came from
    pub fn in_file(self, path: impl Into<PathBuf>) -> GeneLocatorError {
        GeneLocatorError::InFile {
            path: path.into(),
            source: self,
        }
    }
}

/// Errors that can occur while joining pairs with resolved annotations
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// A pair references a coordinate that was never resolved
    #[error("No annotation entry for position '{0}'")]
    MissingAnnotation(String),
}

/// Result type alias for GeneLocator operations
pub type Result<T> = std::result::Result<T, GeneLocatorError>;

/// Result type alias for record parsing operations
pub type RecordResult<T> = std::result::Result<T, RecordError>;
