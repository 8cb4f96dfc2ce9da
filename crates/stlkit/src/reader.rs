//! STL file reader: sniffs the encoding and parses ASCII content.

use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::parser::{ParseOptions, Parsed, Parser};
use crate::sniff::{sniff, StlFormat};

/// Content of an STL file after format detection.
#[derive(Debug, Clone, PartialEq)]
pub enum StlContent {
    /// Parsed ASCII document.
    Ascii(Parsed),
    /// Binary STL, detected but not decoded.
    Binary {
        /// Size of the file in bytes.
        len: usize,
    },
}

impl StlContent {
    /// Detected encoding.
    pub fn format(&self) -> StlFormat {
        match self {
            StlContent::Ascii(_) => StlFormat::Ascii,
            StlContent::Binary { .. } => StlFormat::Binary,
        }
    }
}

/// Read an STL file from a path.
pub fn read_stl(path: impl AsRef<Path>) -> Result<StlContent> {
    read_stl_file(path.as_ref(), ParseOptions::default())
}

/// Read an STL file from a path with explicit parser options.
pub fn read_stl_file(path: &Path, options: ParseOptions) -> Result<StlContent> {
    let data = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = data.len(), "read file");
    read_stl_with(&data, options)
}

/// Read STL content from a byte buffer.
pub fn read_stl_from_buffer(data: &[u8]) -> Result<StlContent> {
    read_stl_with(data, ParseOptions::default())
}

/// Read STL content from a byte buffer with explicit parser options.
///
/// ASCII content must be valid UTF-8.
pub fn read_stl_with(data: &[u8], options: ParseOptions) -> Result<StlContent> {
    match sniff(data) {
        StlFormat::Ascii => {
            let text = std::str::from_utf8(data)?;
            let parsed = Parser::parse_with(text, options)?;
            info!(
                solids = parsed.document.solids.len(),
                facets = parsed.document.facet_count(),
                "parsed ASCII STL"
            );
            Ok(StlContent::Ascii(parsed))
        }
        StlFormat::Binary => {
            info!(bytes = data.len(), "binary STL detected, not decoded");
            Ok(StlContent::Binary { len: data.len() })
        }
    }
}
