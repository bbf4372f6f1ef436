//! Material definitions and the fixed appearance tables for structural
//! surfaces and object categories.

use crate::model::{ObjectCategory, SurfaceKind};

/// Simple PBR-style material parameters
///
/// Rendering is out of scope here; these parameters are handed verbatim to
/// the presentation layer or the export serializer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
}

impl Material {
    pub fn new(base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            base_color,
            metallic,
            roughness,
        }
    }

    /// Fixed material for a structural surface kind
    pub fn for_surface(kind: SurfaceKind) -> Self {
        match kind {
            SurfaceKind::Wall => Self::new([0.75, 0.75, 0.75, 1.0], 0.0, 0.5),
            SurfaceKind::Floor => Self::new([0.76, 0.70, 0.50, 1.0], 0.0, 0.3),
            SurfaceKind::Ceiling => Self::new([1.0, 1.0, 1.0, 1.0], 0.0, 0.3),
            SurfaceKind::Door => Self::new([0.55, 0.35, 0.20, 1.0], 0.0, 0.3),
            SurfaceKind::Window => Self::new([0.68, 0.85, 0.90, 0.7], 1.0, 0.1),
            SurfaceKind::Opening => Self::new([0.75, 0.75, 0.75, 1.0], 0.0, 0.5),
        }
    }

    /// Fixed material for an object category
    pub fn for_category(category: ObjectCategory) -> Self {
        use ObjectCategory::*;
        match category {
            Storage | Cabinet | Refrigerator => Self::new([0.25, 0.25, 0.25, 1.0], 1.0, 0.2),
            Bed => Self::new([0.0, 0.0, 1.0, 1.0], 0.0, 0.7),
            Table | Desk => Self::new([0.55, 0.35, 0.20, 1.0], 0.0, 0.5),
            Chair | Sofa | Couch => Self::new([0.0, 0.30, 0.0, 1.0], 0.0, 0.8),
            Toilet | Bathtub | Sink => Self::new([1.0, 1.0, 1.0, 1.0], 1.0, 0.1),
            Television => Self::new([0.0, 0.0, 0.0, 1.0], 1.0, 0.1),
            Staircase => Self::new([0.5, 0.5, 0.5, 1.0], 0.0, 0.4),
            Stove | Oven | Dishwasher | WasherDryer | Fireplace | Unknown => {
                Self::new([0.75, 0.75, 0.75, 1.0], 0.0, 0.5)
            }
        }
    }
}
