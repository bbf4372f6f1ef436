//! # Spatial Fusion
//!
//! The core of the engine: combining the coarse parametric room model with
//! the dense mesh fragments streamed during the scan.
//!
//! ## Architecture
//!
//! - **Matcher** ([`matcher`]) - scores fragments against an object's
//!   margin-expanded bounding volume and selects the best overlap.
//! - **Builder** ([`builder`]) - converts a raw fragment's buffers into
//!   renderable geometry, rejecting degenerate topology.
//! - **Assembler** ([`assembler`]) - runs the structural and object passes
//!   over a parametric snapshot, producing the complete fused scene with
//!   deterministic primitive fallbacks.
//!
//! Given identical inputs, every stage is deterministic: fragment iteration
//! follows the store's stable first-seen order and ties break on the earliest
//! candidate.

pub mod assembler;
pub mod builder;
pub mod matcher;

pub use assembler::assemble;
pub use builder::{build_mesh, BuildError};
pub use matcher::MatcherConfig;
