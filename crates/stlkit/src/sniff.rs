//! ASCII vs. binary STL detection.

use crate::lexer::Lexer;

/// Number of leading bytes inspected by [`sniff`].
pub const SNIFF_LEN: usize = 10;

/// Encoding of an STL file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StlFormat {
    /// Keyword-based text format.
    Ascii,
    /// 80-byte header, little-endian triangle count, 50-byte triangle records.
    Binary,
}

/// Classify STL content by looking for the `solid` keyword in its first
/// [`SNIFF_LEN`] bytes.
pub fn sniff(data: &[u8]) -> StlFormat {
    let head = String::from_utf8_lossy(&data[..data.len().min(SNIFF_LEN)]);
    if Lexer::new(&head).next_token() == "solid" {
        StlFormat::Ascii
    } else {
        StlFormat::Binary
    }
}
