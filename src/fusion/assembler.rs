//! Scene assembly: the two-pass fusion of a parametric snapshot with the
//! dense fragment collection.

use crate::fusion::builder::build_mesh;
use crate::fusion::matcher::MatcherConfig;
use crate::geometry::{generate_box, generate_plane};
use crate::model::{MeshFragment, ObjectInstance, ParametricSnapshot, StructuralSurface};
use crate::scene::{FusedEntity, FusedScene, Material, MeshOrigin};

/// Run one full fusion pass.
///
/// Pass one synthesizes a flat plane for every structural surface; pass two
/// attaches the best-matching dense fragment to every object instance,
/// falling back to a primitive box when no fragment qualifies or its
/// geometry is rejected. Entity order is surfaces then objects, each in
/// snapshot order, so identical inputs produce structurally identical
/// output.
///
/// Every surface and object yields exactly one entity; nothing is dropped.
pub fn assemble(
    snapshot: &ParametricSnapshot,
    fragments: &[MeshFragment],
    config: &MatcherConfig,
) -> FusedScene {
    let mut entities = Vec::with_capacity(snapshot.entity_count());

    for surface in &snapshot.surfaces {
        entities.push(structural_entity(surface));
    }

    for object in &snapshot.objects {
        entities.push(object_entity(object, fragments, config));
    }

    let scene = FusedScene { entities };
    log::info!(
        "fusion pass complete: {} surfaces + {} objects -> {} entities",
        snapshot.surfaces.len(),
        snapshot.objects.len(),
        scene.entity_count()
    );
    scene
}

fn structural_entity(surface: &StructuralSurface) -> FusedEntity {
    FusedEntity {
        mesh: generate_plane(surface.dimensions.x, surface.dimensions.z),
        material: Material::for_surface(surface.kind),
        transform: surface.transform,
        origin: MeshOrigin::StructuralPlane,
    }
}

fn object_entity(
    object: &ObjectInstance,
    fragments: &[MeshFragment],
    config: &MatcherConfig,
) -> FusedEntity {
    let material = Material::for_category(object.category);

    if let Some(id) = config.best_fragment(object, fragments) {
        // The store guarantees the matched id is present in the snapshot
        // the matcher just scanned.
        if let Some(fragment) = fragments.iter().find(|f| f.id == id) {
            match build_mesh(fragment) {
                Ok(mesh) => {
                    return FusedEntity {
                        mesh,
                        material,
                        transform: object.transform,
                        origin: MeshOrigin::DenseFragment,
                    };
                }
                Err(err) => {
                    log::debug!(
                        "builder rejected {} for {:?} object, using box fallback: {}",
                        id,
                        object.category,
                        err
                    );
                }
            }
        }
    }

    FusedEntity {
        mesh: generate_box(object.dimensions),
        material,
        transform: object.transform,
        origin: MeshOrigin::FallbackBox,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FragmentId, ObjectCategory, SurfaceKind};
    use cgmath::{Matrix4, Vector3};

    fn surface(kind: SurfaceKind, width: f32, depth: f32) -> StructuralSurface {
        StructuralSurface {
            kind,
            dimensions: Vector3::new(width, 0.0, depth),
            transform: Matrix4::from_translation(Vector3::new(0.0, 0.0, 0.0)),
        }
    }

    fn object(category: ObjectCategory, dims: [f32; 3], center: [f32; 3]) -> ObjectInstance {
        ObjectInstance {
            category,
            dimensions: Vector3::from(dims),
            transform: Matrix4::from_translation(Vector3::from(center)),
        }
    }

    #[test]
    fn test_entity_count_invariant() {
        let snapshot = ParametricSnapshot {
            surfaces: vec![
                surface(SurfaceKind::Wall, 4.0, 2.5),
                surface(SurfaceKind::Floor, 4.0, 3.0),
                surface(SurfaceKind::Window, 1.0, 1.2),
            ],
            objects: vec![
                object(ObjectCategory::Chair, [0.5, 1.0, 0.5], [1.0, 0.5, 1.0]),
                object(ObjectCategory::Table, [1.5, 0.8, 0.9], [0.0, 0.4, 0.0]),
            ],
        };

        let scene = assemble(&snapshot, &[], &MatcherConfig::default());
        assert_eq!(scene.entity_count(), snapshot.entity_count());
        assert_eq!(scene.entity_count(), 5);
    }

    #[test]
    fn test_bed_without_fragments_falls_back_to_blue_box() {
        let snapshot = ParametricSnapshot {
            surfaces: vec![],
            objects: vec![object(ObjectCategory::Bed, [1.0, 1.0, 2.0], [0.0, 0.5, 0.0])],
        };

        let scene = assemble(&snapshot, &[], &MatcherConfig::default());
        assert_eq!(scene.entity_count(), 1);

        let entity = &scene.entities[0];
        assert_eq!(entity.origin, MeshOrigin::FallbackBox);
        assert_eq!(entity.material, Material::for_category(ObjectCategory::Bed));
        assert_eq!(entity.material.base_color, [0.0, 0.0, 1.0, 1.0]);

        // Box sized to the instance dimensions
        assert!(entity.mesh.positions.iter().any(|p| p[2] == 1.0));
        assert!(entity.mesh.positions.iter().all(|p| p[0].abs() <= 0.5));
    }

    #[test]
    fn test_matched_fragment_buffers_flow_through_unchanged() {
        // 100 vertices, 80 of them inside the expanded box
        let mut positions: Vec<[f32; 3]> = (0..80).map(|_| [0.0, 0.0, 0.0]).collect();
        positions.extend((0..20).map(|_| [50.0, 50.0, 50.0]));
        let indices: Vec<u32> = (0..99).flat_map(|i| [i, i + 1, (i + 2) % 100]).collect();

        let fragment = MeshFragment {
            id: FragmentId(9),
            positions: positions.clone(),
            indices: indices.clone(),
            normals: None,
        };

        let snapshot = ParametricSnapshot {
            surfaces: vec![],
            objects: vec![object(ObjectCategory::Sofa, [2.0, 1.0, 1.0], [0.0, 0.0, 0.0])],
        };

        let scene = assemble(&snapshot, &[fragment], &MatcherConfig::default());
        let entity = &scene.entities[0];
        assert_eq!(entity.origin, MeshOrigin::DenseFragment);
        assert_eq!(entity.mesh.positions, positions);
        assert_eq!(entity.mesh.indices, indices);
    }

    #[test]
    fn test_rejected_fragment_falls_back_without_surfacing_error() {
        // Matches the object but carries a broken index buffer
        let fragment = MeshFragment {
            id: FragmentId(4),
            positions: vec![[0.0, 0.0, 0.0]; 10],
            indices: vec![0, 1], // not a multiple of 3
            normals: None,
        };

        let snapshot = ParametricSnapshot {
            surfaces: vec![],
            objects: vec![object(ObjectCategory::Desk, [1.0, 1.0, 1.0], [0.0, 0.0, 0.0])],
        };

        let scene = assemble(&snapshot, &[fragment], &MatcherConfig::default());
        let entity = &scene.entities[0];
        assert_eq!(entity.origin, MeshOrigin::FallbackBox);
        assert_eq!(entity.mesh.vertex_count(), 24);
    }

    #[test]
    fn test_structural_pass_materials_and_order() {
        let snapshot = ParametricSnapshot {
            surfaces: vec![
                surface(SurfaceKind::Floor, 5.0, 4.0),
                surface(SurfaceKind::Door, 0.9, 2.0),
            ],
            objects: vec![object(ObjectCategory::Television, [1.2, 0.7, 0.1], [0.0, 1.0, 2.0])],
        };

        let scene = assemble(&snapshot, &[], &MatcherConfig::default());
        assert_eq!(scene.entities[0].material, Material::for_surface(SurfaceKind::Floor));
        assert_eq!(scene.entities[0].origin, MeshOrigin::StructuralPlane);
        assert_eq!(scene.entities[1].material, Material::for_surface(SurfaceKind::Door));
        assert_eq!(
            scene.entities[2].material,
            Material::for_category(ObjectCategory::Television)
        );
    }

    #[test]
    fn test_fusion_is_idempotent() {
        let fragment = MeshFragment {
            id: FragmentId(1),
            positions: vec![[0.0, 0.5, 0.0]; 30],
            indices: (0..30).collect(),
            normals: None,
        };
        let snapshot = ParametricSnapshot {
            surfaces: vec![surface(SurfaceKind::Wall, 4.0, 2.5)],
            objects: vec![
                object(ObjectCategory::Chair, [1.0, 1.0, 1.0], [0.0, 0.5, 0.0]),
                object(ObjectCategory::Bed, [2.0, 1.0, 2.0], [10.0, 0.0, 0.0]),
            ],
        };

        let config = MatcherConfig::default();
        let first = assemble(&snapshot, std::slice::from_ref(&fragment), &config);
        let second = assemble(&snapshot, std::slice::from_ref(&fragment), &config);

        assert_eq!(first.entity_count(), second.entity_count());
        for (a, b) in first.entities.iter().zip(second.entities.iter()) {
            assert_eq!(a.origin, b.origin);
            assert_eq!(a.material, b.material);
            assert_eq!(a.mesh, b.mesh);
        }
    }
}
