//! Error types for STL file operations.

use thiserror::Error;

/// Errors that can occur while reading or writing STL data.
#[derive(Error, Debug)]
pub enum StlError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File content is not valid UTF-8 text.
    #[error("file is not valid UTF-8 text: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// A required keyword was not found at the current position.
    #[error("failed to match token ({expected}), line {line} (got '{found}')")]
    TokenMismatch {
        /// Keyword the grammar required.
        expected: String,
        /// Token actually read (empty at end of input).
        found: String,
        /// Line number (1-indexed).
        line: usize,
    },

    /// A token that should be a number could not be parsed as one.
    #[error("invalid number '{token}', line {line}")]
    NumericMismatch {
        /// Offending token.
        token: String,
        /// Line number (1-indexed).
        line: usize,
    },

    /// Content ended in the middle of a construct.
    #[error("unexpected end of input, line {line} (expected {expected})")]
    UnexpectedEof {
        /// What the grammar was waiting for.
        expected: &'static str,
        /// Line number (1-indexed).
        line: usize,
    },

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StlError {
    /// Create a token mismatch error.
    pub fn token_mismatch(
        expected: impl Into<String>,
        found: impl Into<String>,
        line: usize,
    ) -> Self {
        Self::TokenMismatch {
            expected: expected.into(),
            found: found.into(),
            line,
        }
    }

    /// Line number the error refers to, if it came from the parser.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::TokenMismatch { line, .. }
            | Self::NumericMismatch { line, .. }
            | Self::UnexpectedEof { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Result type for STL operations.
pub type Result<T> = std::result::Result<T, StlError>;
