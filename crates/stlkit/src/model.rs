//! In-memory representation of a parsed STL document.
//!
//! Coordinates are kept exactly as written in the file. STL files are
//! conventionally in millimeters, but no unit conversion is applied.

use serde::{Deserialize, Serialize};

/// 3D vector with f64 components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vector3 {
    /// Create a new Vector3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One face of a mesh: a normal and its bounding vertices in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    /// Normal as written in the file (not recomputed or normalized).
    pub normal: Vector3,
    /// Loop vertices in file order.
    pub vertices: Vec<Vector3>,
}

impl Facet {
    /// Whether the facet has exactly three vertices.
    ///
    /// Slicers only accept triangles, even though the text grammar allows
    /// any number of vertices per loop.
    pub fn is_triangle(&self) -> bool {
        self.vertices.len() == 3
    }
}

/// A `solid ... endsolid` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Solid {
    /// Name following the `solid` keyword, if any.
    pub name: Option<String>,
    /// Facets in file order.
    pub facets: Vec<Facet>,
}

impl Solid {
    /// Number of facets in this solid.
    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }
}

/// A whole ASCII STL file: its solids in file order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Solids in file order.
    pub solids: Vec<Solid>,
}

impl Document {
    /// Total number of facets across all solids.
    pub fn facet_count(&self) -> usize {
        self.solids.iter().map(Solid::facet_count).sum()
    }

    /// Facets that are not triangles.
    pub fn non_triangles(&self) -> impl Iterator<Item = &Facet> {
        self.solids
            .iter()
            .flat_map(|s| s.facets.iter())
            .filter(|f| !f.is_triangle())
    }
}
