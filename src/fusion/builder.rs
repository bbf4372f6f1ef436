//! Mesh building: turn a raw fragment's buffers into renderable geometry.

use thiserror::Error;

use crate::geometry::GeometryData;
use crate::model::MeshFragment;

/// Rejection of a fragment's geometry by the mesh builder
///
/// Always recoverable: callers fall back to a primitive box and never
/// propagate this further.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("fragment has no vertices")]
    EmptyPositions,

    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("normal count {normals} does not match vertex count {vertices}")]
    NormalCountMismatch { normals: usize, vertices: usize },
}

/// Build renderable geometry from a fragment, preserving exact vertex order
/// and index topology.
///
/// Index `i` of the output references position slot `i` unchanged. Normals
/// are attached verbatim when present and non-empty; otherwise the output
/// carries no normals and their computation is left to the presentation
/// layer.
pub fn build_mesh(fragment: &MeshFragment) -> Result<GeometryData, BuildError> {
    if fragment.positions.is_empty() {
        return Err(BuildError::EmptyPositions);
    }

    if fragment.indices.len() % 3 != 0 {
        return Err(BuildError::IncompleteTriangle(fragment.indices.len()));
    }

    let vertex_count = fragment.positions.len();
    if let Some(&index) = fragment
        .indices
        .iter()
        .find(|&&i| i as usize >= vertex_count)
    {
        return Err(BuildError::IndexOutOfRange {
            index,
            vertex_count,
        });
    }

    let normals = match &fragment.normals {
        Some(normals) if !normals.is_empty() => {
            if normals.len() != vertex_count {
                return Err(BuildError::NormalCountMismatch {
                    normals: normals.len(),
                    vertices: vertex_count,
                });
            }
            normals.clone()
        }
        _ => Vec::new(),
    };

    Ok(GeometryData {
        positions: fragment.positions.clone(),
        normals,
        indices: fragment.indices.clone(),
    })
}
