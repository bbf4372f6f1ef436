//! # Mesh Geometry
//!
//! This module holds the renderable geometry representation shared by every
//! stage of the fusion pipeline, plus procedural generators for the primitive
//! shapes used as fallbacks and structural surfaces.
//!
//! ## Supported Primitives
//!
//! - **Box**: axis-aligned box sized to an object's bounding dimensions
//! - **Plane**: flat quad sized to a structural surface's footprint
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Vector3;
//! use roomfuse::geometry::{generate_box, generate_plane};
//!
//! // Fallback box for a 1x1x2 object
//! let box_data = generate_box(Vector3::new(1.0, 1.0, 2.0));
//!
//! // Flat surface mesh for a 4m x 3m floor
//! let plane_data = generate_plane(4.0, 3.0);
//! ```

pub mod primitives;

pub use primitives::*;

/// Renderable mesh buffers produced by the fusion pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z); empty when normal computation is left to
    /// the presentation layer
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
