#![warn(missing_docs)]

//! ASCII STL parsing for 3D-printing pipelines.
//!
//! Reads the text variant of the STL format into a [`Document`] of solids and
//! facets, with line-accurate errors on malformed input, and exports the
//! result as JSON. Binary STL is detected but not decoded.
//!
//! # Example
//!
//! ```no_run
//! use stlkit::{read_stl, write_json, StlContent};
//!
//! if let StlContent::Ascii(parsed) = read_stl("part.stl").unwrap() {
//!     for event in &parsed.events {
//!         println!("{event}");
//!     }
//!     write_json(&parsed.document, "part.json").unwrap();
//! }
//! ```

mod error;
mod lexer;
mod model;
mod parser;
mod reader;
mod sniff;
mod writer;

pub use error::{Result, StlError};
pub use lexer::{Cursor, Lexer};
pub use model::{Document, Facet, Solid, Vector3};
pub use parser::{ParseEvent, ParseOptions, Parsed, Parser, VertexPolicy};
pub use reader::{read_stl, read_stl_file, read_stl_from_buffer, read_stl_with, StlContent};
pub use sniff::{sniff, StlFormat, SNIFF_LEN};
pub use writer::{to_json, write_json};
