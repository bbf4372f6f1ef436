//! Replays a small synthetic scan through the session controller and exports
//! the fused result.
//!
//! Run with `RUST_LOG=debug cargo run --example scan_replay` to watch the
//! state machine and match decisions.

use anyhow::Result;
use cgmath::{Matrix4, Vector3};

use roomfuse::model::{
    FragmentId, MeshFragment, ObjectCategory, ObjectInstance, ParametricSnapshot,
    StructuralSurface, SurfaceKind,
};
use roomfuse::session::SessionEvent;
use roomfuse::{ScanStatus, TrackingEvent};

fn main() -> Result<()> {
    env_logger::init();

    let session = roomfuse::default();
    let events = session.subscribe();

    session.start()?;

    // A fragment cloud hugging the table, refined once mid-scan
    let table_cloud = |spread: f32| -> Vec<[f32; 3]> {
        (0..120)
            .map(|i| {
                let t = i as f32 / 120.0;
                [
                    2.0 + spread * (t - 0.5),
                    0.4 + 0.4 * t,
                    1.0 + spread * (0.5 - t),
                ]
            })
            .collect()
    };

    session.handle_event(TrackingEvent::FragmentAdded(MeshFragment {
        id: FragmentId(1),
        positions: table_cloud(1.5),
        indices: (0..120).collect(),
        normals: None,
    }));
    session.handle_event(TrackingEvent::Progress(0.4));
    session.handle_event(TrackingEvent::FragmentUpdated(MeshFragment {
        id: FragmentId(1),
        positions: table_cloud(0.8),
        indices: (0..120).collect(),
        normals: None,
    }));
    session.handle_event(TrackingEvent::Progress(0.9));

    session.stop();
    session.handle_event(TrackingEvent::ParametricFinalized(Ok(ParametricSnapshot {
        surfaces: vec![
            StructuralSurface {
                kind: SurfaceKind::Floor,
                dimensions: Vector3::new(5.0, 0.0, 4.0),
                transform: Matrix4::from_translation(Vector3::new(0.0, 0.0, 0.0)),
            },
            StructuralSurface {
                kind: SurfaceKind::Wall,
                dimensions: Vector3::new(5.0, 0.0, 2.5),
                transform: Matrix4::from_translation(Vector3::new(0.0, 1.25, -2.0)),
            },
        ],
        objects: vec![
            ObjectInstance {
                category: ObjectCategory::Table,
                dimensions: Vector3::new(1.6, 0.8, 0.9),
                transform: Matrix4::from_translation(Vector3::new(2.0, 0.6, 1.0)),
            },
            ObjectInstance {
                category: ObjectCategory::Bed,
                dimensions: Vector3::new(1.0, 1.0, 2.0),
                transform: Matrix4::from_translation(Vector3::new(-1.5, 0.5, 0.5)),
            },
        ],
    })));

    // Wait for the background fusion pass to publish
    while session.status() != ScanStatus::Ready {
        if let Ok(SessionEvent::StatusChanged { status, message }) = events.recv() {
            println!("[{:?}] {}", status, message);
            if status == ScanStatus::Failed {
                anyhow::bail!("scan failed: {}", message);
            }
        }
    }

    let scene = session.fused_scene().expect("scene published at Ready");
    let stats = scene.statistics();
    println!(
        "fused {} entities, {} vertices, {} triangles",
        stats.entity_count, stats.total_vertices, stats.total_triangles
    );
    for (i, entity) in scene.entities.iter().enumerate() {
        println!("  entity {}: {:?}", i, entity.origin);
    }

    let path = std::env::temp_dir().join("roomfuse_scan_replay.scene");
    let written = session.export_to(&path)?;
    println!("artifact written to {}", written.display());

    Ok(())
}
