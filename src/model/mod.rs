//! # Scan Data Model
//!
//! Types describing the two inputs of the fusion pipeline:
//!
//! - **Parametric model** ([`parametric`]) - the coarse room description
//!   produced at scan finalization: planar structural surfaces and
//!   bounding-box object instances with semantic categories.
//! - **Dense fragments** ([`fragment`]) - incrementally streamed chunks of
//!   triangulated mesh geometry, keyed by identifier and replaced in place
//!   when the tracking source refines them.

pub mod fragment;
pub mod parametric;

pub use fragment::{FragmentId, FragmentStore, MeshFragment};
pub use parametric::{ObjectCategory, ObjectInstance, ParametricSnapshot, StructuralSurface, SurfaceKind};
