//! Parametric room model captured once at scan finalization.

use cgmath::{Matrix4, Vector3};

/// Kind of planar structural surface reported by the parametric source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Wall,
    Floor,
    Ceiling,
    Opening,
    Door,
    Window,
}

/// Semantic category of a detected object instance
///
/// Closed set: material and fallback-mesh dispatch match exhaustively over
/// these variants, so a new category added here is a compile error until
/// every table handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectCategory {
    Storage,
    Cabinet,
    Refrigerator,
    Stove,
    Oven,
    Dishwasher,
    WasherDryer,
    Fireplace,
    Bed,
    Table,
    Desk,
    Chair,
    Sofa,
    Couch,
    Toilet,
    Bathtub,
    Sink,
    Television,
    Staircase,
    Unknown,
}

/// A planar structural element (wall, floor, ...) of the scanned room
///
/// Dimensions are full extents; for planar surfaces `x` is the width and `z`
/// the depth of the footprint. The pose transform places the surface in
/// world space.
#[derive(Debug, Clone)]
pub struct StructuralSurface {
    pub kind: SurfaceKind,
    pub dimensions: Vector3<f32>,
    pub transform: Matrix4<f32>,
}

/// A bounding-box object detection with a semantic category
#[derive(Debug, Clone)]
pub struct ObjectInstance {
    pub category: ObjectCategory,
    pub dimensions: Vector3<f32>,
    pub transform: Matrix4<f32>,
}

impl ObjectInstance {
    /// World-space center of the object's bounding volume
    pub fn center(&self) -> Vector3<f32> {
        Vector3::new(self.transform.w.x, self.transform.w.y, self.transform.w.z)
    }
}

/// Immutable snapshot of the parametric room model
///
/// Captured exactly once per successful finalize and never altered by later
/// fragment updates.
#[derive(Debug, Clone, Default)]
pub struct ParametricSnapshot {
    pub surfaces: Vec<StructuralSurface>,
    pub objects: Vec<ObjectInstance>,
}

impl ParametricSnapshot {
    /// Total number of entities a fusion pass over this snapshot must yield
    pub fn entity_count(&self) -> usize {
        self.surfaces.len() + self.objects.len()
    }
}
