//! Fragment matching: find the dense mesh fragment that best overlaps an
//! object's bounding volume.

use crate::model::{FragmentId, MeshFragment, ObjectInstance};

/// Configuration for fragment matching.
#[derive(Clone, Copy, Debug)]
pub struct MatcherConfig {
    /// Factor applied to the object's half-extents before testing vertex
    /// containment, tolerating registration error between the parametric
    /// model and the dense mesh.
    /// Default: 1.2
    pub margin_factor: f32,

    /// Minimum relevance fraction a fragment must exceed to qualify.
    /// Default: 0.1 (at least 10% of its vertices inside the expanded box)
    pub min_relevance: f32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            margin_factor: 1.2,
            min_relevance: 0.1,
        }
    }
}

impl MatcherConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the bounding-box margin factor.
    pub fn with_margin_factor(mut self, factor: f32) -> Self {
        self.margin_factor = factor;
        self
    }

    /// Builder-style setter for the relevance threshold.
    pub fn with_min_relevance(mut self, threshold: f32) -> Self {
        self.min_relevance = threshold;
        self
    }

    /// Fraction of the fragment's vertices lying inside the object's
    /// margin-expanded bounding box. A fragment with no vertices scores 0.
    pub fn relevance(&self, object: &ObjectInstance, fragment: &MeshFragment) -> f32 {
        if fragment.positions.is_empty() {
            return 0.0;
        }

        let center = object.center();
        let half = object.dimensions * 0.5 * self.margin_factor;

        let inside = fragment
            .positions
            .iter()
            .filter(|v| {
                (v[0] - center.x).abs() <= half.x
                    && (v[1] - center.y).abs() <= half.y
                    && (v[2] - center.z).abs() <= half.z
            })
            .count();

        inside as f32 / fragment.positions.len() as f32
    }

    /// Select the best-matching fragment for an object, or `None` when no
    /// fragment qualifies.
    ///
    /// Fragments are scanned in the slice's order; among qualifying
    /// fragments the maximum relevance wins and ties break on the earliest
    /// candidate, so identical inputs always select the same fragment.
    ///
    /// Complexity is O(total vertices across all fragments). Callers with
    /// very large fragment sets should precede this with a cheap
    /// per-fragment bounding-box precheck.
    pub fn best_fragment(
        &self,
        object: &ObjectInstance,
        fragments: &[MeshFragment],
    ) -> Option<FragmentId> {
        let mut best: Option<(FragmentId, f32)> = None;

        for fragment in fragments {
            let relevance = self.relevance(object, fragment);
            if relevance <= self.min_relevance {
                continue;
            }
            // Strictly greater keeps the earliest fragment on ties
            match best {
                Some((_, best_relevance)) if relevance <= best_relevance => {}
                _ => best = Some((fragment.id, relevance)),
            }
        }

        if let Some((id, relevance)) = best {
            log::debug!(
                "matched {} for {:?} object (relevance {:.3})",
                id,
                object.category,
                relevance
            );
        }

        best.map(|(id, _)| id)
    }
}
