//! JSON export of parsed STL documents.

use std::path::Path;

use crate::error::Result;
use crate::model::Document;

/// Serialize a document to pretty-printed JSON.
pub fn to_json(doc: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Write a document as JSON to a file.
pub fn write_json(doc: &Document, path: impl AsRef<Path>) -> Result<()> {
    let json = to_json(doc)?;
    std::fs::write(path, json)?;
    Ok(())
}
