//! # Scene Export
//!
//! Writes a finalized scan to a standalone interchange artifact. Export
//! re-runs fragment matching and mesh building against the freshest fragment
//! state at call time, independent of the published fused scene, applying
//! the same box-fallback policy as a regular fusion pass.
//!
//! The byte-level artifact format is delegated to a [`SceneSerializer`]
//! implementation; this module's contract is exactly one artifact per
//! successful call and no partially-written file on failure.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::fusion::{assemble, MatcherConfig};
use crate::model::{MeshFragment, ParametricSnapshot};
use crate::scene::FusedScene;

/// Export failure surfaced to the caller
#[derive(Debug, Error)]
pub enum ExportError {
    /// No parametric snapshot has been finalized yet; no I/O was attempted
    #[error("no finalized scan available to export")]
    NoSnapshot,

    /// The serializer or the filesystem write failed; the original cause is
    /// preserved
    #[error("failed to write scan artifact: {source}")]
    Serialization {
        #[source]
        source: io::Error,
    },
}

/// Byte-level artifact writer; the external serialization seam
pub trait SceneSerializer {
    /// Serialize the fused scene (geometry, materials, transforms) into
    /// `out`
    fn serialize(&self, scene: &FusedScene, out: &mut dyn Write) -> io::Result<()>;
}

/// Run one export: fuse the snapshot with the supplied fragments, serialize,
/// and write the artifact to `path`.
///
/// Serialization goes through an in-memory buffer first, and the bytes are
/// written to a sibling temporary file that is renamed onto `path` only once
/// fully written. A failure at any step (serializer, disk capacity, rename)
/// never leaves a partial artifact at `path`.
pub fn export_scene(
    snapshot: &ParametricSnapshot,
    fragments: &[MeshFragment],
    config: &MatcherConfig,
    serializer: &dyn SceneSerializer,
    path: &Path,
) -> Result<PathBuf, ExportError> {
    let scene = assemble(snapshot, fragments, config);

    let mut buffer = Vec::new();
    serializer
        .serialize(&scene, &mut buffer)
        .map_err(|source| ExportError::Serialization { source })?;

    persist_artifact(path, &buffer).map_err(|source| ExportError::Serialization { source })?;

    log::info!(
        "exported {} entities ({} bytes) to {}",
        scene.entity_count(),
        buffer.len(),
        path.display()
    );
    Ok(path.to_path_buf())
}

/// Write the artifact bytes atomically: serialize into a sibling `.tmp`
/// file, then rename it onto the target. A write that dies partway (out of
/// space, permissions) truncates only the temporary file, which is cleaned
/// up before the error is returned.
fn persist_artifact(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("artifact path {} has no file name", path.display()),
        )
    })?;

    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    if let Err(source) = fs::write(&tmp_path, bytes).and_then(|_| fs::rename(&tmp_path, path)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(source);
    }
    Ok(())
}

/// Plain-text scene serializer
///
/// One block per entity: material parameters, the row-major pose transform,
/// then `v`/`vn`/`f` lines in the style of a Wavefront dump. Ships as the
/// default so the demo and tests have a working artifact format; production
/// embedders supply their own [`SceneSerializer`].
pub struct TextSceneSerializer;

impl SceneSerializer for TextSceneSerializer {
    fn serialize(&self, scene: &FusedScene, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "# roomfuse scene, {} entities", scene.entity_count())?;

        for (index, entity) in scene.entities.iter().enumerate() {
            writeln!(out, "entity {} {:?}", index, entity.origin)?;
            let c = entity.material.base_color;
            writeln!(
                out,
                "material {} {} {} {} metallic {} roughness {}",
                c[0], c[1], c[2], c[3], entity.material.metallic, entity.material.roughness
            )?;

            let m = entity.transform;
            for row in 0..4 {
                writeln!(
                    out,
                    "t {} {} {} {}",
                    m.x[row], m.y[row], m.z[row], m.w[row]
                )?;
            }

            for p in &entity.mesh.positions {
                writeln!(out, "v {} {} {}", p[0], p[1], p[2])?;
            }
            for n in &entity.mesh.normals {
                writeln!(out, "vn {} {} {}", n[0], n[1], n[2])?;
            }
            for triangle in entity.mesh.indices.chunks(3) {
                writeln!(out, "f {} {} {}", triangle[0], triangle[1], triangle[2])?;
            }
        }

        Ok(())
    }
}
