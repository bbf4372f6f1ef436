//! # Primitive Shape Generation
//!
//! Generators for the two primitive shapes the fusion pipeline synthesizes
//! itself: boxes (fallback meshes for objects without a usable dense
//! fragment) and planes (structural surfaces). Both are generated with
//! outward-facing normals.

use cgmath::Vector3;

use super::GeometryData;

/// Generate an axis-aligned box centered at the origin
///
/// # Arguments
/// * `dimensions` - Full extents along X, Y and Z
///
/// Returns a box with 24 vertices (4 per face) so each face carries its own
/// outward normal, and 36 indices in counter-clockwise winding.
pub fn generate_box(dimensions: Vector3<f32>) -> GeometryData {
    let mut data = GeometryData::new();

    let hx = dimensions.x * 0.5;
    let hy = dimensions.y * 0.5;
    let hz = dimensions.z * 0.5;

    let positions = [
        // Front face (positive Z)
        [-hx, -hy, hz],
        [hx, -hy, hz],
        [hx, hy, hz],
        [-hx, hy, hz],
        // Back face (negative Z)
        [-hx, -hy, -hz],
        [-hx, hy, -hz],
        [hx, hy, -hz],
        [hx, -hy, -hz],
        // Left face (negative X)
        [-hx, -hy, -hz],
        [-hx, -hy, hz],
        [-hx, hy, hz],
        [-hx, hy, -hz],
        // Right face (positive X)
        [hx, -hy, hz],
        [hx, -hy, -hz],
        [hx, hy, -hz],
        [hx, hy, hz],
        // Top face (positive Y)
        [-hx, hy, hz],
        [hx, hy, hz],
        [hx, hy, -hz],
        [-hx, hy, -hz],
        // Bottom face (negative Y)
        [-hx, -hy, -hz],
        [hx, -hy, -hz],
        [hx, -hy, hz],
        [-hx, -hy, hz],
    ];

    let normals = [
        // Front face
        [0.0, 0.0, 1.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, 1.0],
        // Back face
        [0.0, 0.0, -1.0],
        [0.0, 0.0, -1.0],
        [0.0, 0.0, -1.0],
        [0.0, 0.0, -1.0],
        // Left face
        [-1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        // Right face
        [1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        // Top face
        [0.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        // Bottom face
        [0.0, -1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.positions = positions.to_vec();
    data.normals = normals.to_vec();

    // Indices for each face (2 triangles per face, counter-clockwise)
    data.indices = vec![
        // Front face
        0, 1, 2, 2, 3, 0, // Back face
        4, 5, 6, 6, 7, 4, // Left face
        8, 9, 10, 10, 11, 8, // Right face
        12, 13, 14, 14, 15, 12, // Top face
        16, 17, 18, 18, 19, 16, // Bottom face
        20, 21, 22, 22, 23, 20,
    ];

    data
}

/// Generate a flat plane in the XZ plane
///
/// # Arguments
/// * `width` - Extent along X
/// * `depth` - Extent along Z
///
/// Returns a single quad centered at the origin with normals pointing up
/// (positive Y). Structural surfaces carry their orientation in their pose
/// transform, so a single upward-facing quad is sufficient here.
pub fn generate_plane(width: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let hw = width * 0.5;
    let hd = depth * 0.5;

    data.positions = vec![[-hw, 0.0, -hd], [-hw, 0.0, hd], [hw, 0.0, hd], [hw, 0.0, -hd]];
    data.normals = vec![
        [0.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ];

    // Counter-clockwise when viewed from above
    data.indices = vec![0, 1, 2, 2, 3, 0];

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_generation() {
        let cube = generate_box(Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(cube.positions.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_box_respects_dimensions() {
        let data = generate_box(Vector3::new(1.0, 1.0, 2.0));
        for p in &data.positions {
            assert!(p[0].abs() <= 0.5 + f32::EPSILON);
            assert!(p[1].abs() <= 0.5 + f32::EPSILON);
            assert!(p[2].abs() <= 1.0 + f32::EPSILON);
        }
        // Corners actually reach the half extents
        assert!(data.positions.iter().any(|p| p[2] == 1.0));
        assert!(data.positions.iter().any(|p| p[2] == -1.0));
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(4.0, 3.0);
        assert_eq!(plane.positions.len(), 4);
        assert_eq!(plane.indices.len(), 6); // 1 quad * 2 triangles * 3 indices
        assert_eq!(plane.triangle_count(), 2);
        for n in &plane.normals {
            assert_eq!(*n, [0.0, 1.0, 0.0]);
        }
        for p in &plane.positions {
            assert!(p[0].abs() <= 2.0);
            assert_eq!(p[1], 0.0);
            assert!(p[2].abs() <= 1.5);
        }
    }
}
