// src/lib.rs
//! Roomfuse Spatial Fusion Engine
//!
//! Fuses the two outputs of a live interior scan: the coarse parametric room
//! model (structural surfaces and bounding-box objects) and the dense
//! triangulated mesh streamed incrementally by the tracking source. The
//! result is a single renderable scene in which every object carries either
//! its best-overlapping dense fragment or a primitive fallback.

pub mod export;
pub mod fusion;
pub mod geometry;
pub mod model;
pub mod scene;
pub mod session;

// Re-export main types for convenience
pub use session::{ScanSessionController, ScanStatus, TrackingEvent};

/// Creates a session controller with default settings and no capture driver
pub fn default() -> ScanSessionController {
    ScanSessionController::new(Box::new(session::NullDriver))
}
