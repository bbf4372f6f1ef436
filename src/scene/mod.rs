//! # Fused Scene
//!
//! Output side of the fusion pipeline: renderable entities carrying a mesh,
//! a material and a world transform, and the material tables that map
//! parametric semantics onto appearance.
//!
//! A [`FusedScene`] is produced whole by one fusion pass and never mutated
//! afterwards; a later pass replaces it entirely.

pub mod material;

pub use material::Material;

use cgmath::Matrix4;

use crate::geometry::GeometryData;

/// How a fused entity's mesh was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshOrigin {
    /// Flat plane synthesized for a structural surface
    StructuralPlane,
    /// Dense fragment geometry selected by the matcher
    DenseFragment,
    /// Primitive box fallback (no matching fragment, or the fragment's
    /// geometry was rejected by the builder)
    FallbackBox,
}

/// One renderable element of the fused scene
#[derive(Debug, Clone)]
pub struct FusedEntity {
    pub mesh: GeometryData,
    pub material: Material,
    pub transform: Matrix4<f32>,
    pub origin: MeshOrigin,
}

/// Complete output of one fusion pass
///
/// Entity order is structural surfaces first, then object instances, each in
/// snapshot input order. Every surface and instance yields exactly one
/// entity.
#[derive(Debug, Clone, Default)]
pub struct FusedScene {
    pub entities: Vec<FusedEntity>,
}

impl FusedScene {
    /// Gets the total number of entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Gets statistics about the scene
    pub fn statistics(&self) -> SceneStatistics {
        let total_triangles = self.entities.iter().map(|e| e.mesh.triangle_count()).sum();
        let total_vertices = self.entities.iter().map(|e| e.mesh.vertex_count()).sum();

        SceneStatistics {
            entity_count: self.entities.len(),
            total_triangles,
            total_vertices,
        }
    }
}

/// Scene statistics for debugging and diagnostics
#[derive(Debug)]
pub struct SceneStatistics {
    pub entity_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}
