//! Dense mesh fragments streamed from the depth-sensing tracking source.

/// Identifier assigned to a fragment by the tracking source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentId(pub u64);

impl std::fmt::Display for FragmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fragment#{}", self.0)
    }
}

/// One chunk of dense triangulated geometry
///
/// Positions are world-space. The engine holds its own copy of the buffers;
/// the tracking source remains the canonical owner and supersedes content by
/// re-sending the same id.
#[derive(Debug, Clone)]
pub struct MeshFragment {
    pub id: FragmentId,
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Triangle indices into the position buffer
    pub indices: Vec<u32>,
    /// Per-vertex normals, when the source supplies them
    pub normals: Option<Vec<[f32; 3]>>,
}

/// Arrival-ordered, id-keyed collection of mesh fragments
///
/// The store preserves the order in which ids were first seen: an update to
/// a known id replaces its content in place without moving it. Fragment
/// matching iterates this order for its tie-break, so keeping it stable is
/// what makes matching deterministic across passes.
///
/// Only the session controller writes to the store; fusion and export take a
/// [`snapshot`](FragmentStore::snapshot) before iterating.
#[derive(Debug, Clone, Default)]
pub struct FragmentStore {
    fragments: Vec<MeshFragment>,
}

impl FragmentStore {
    pub fn new() -> Self {
        Self {
            fragments: Vec::new(),
        }
    }

    /// Apply an incoming fragment: replace the existing entry with the same
    /// id in place, or append when the id is new. Never duplicates an id.
    pub fn apply(&mut self, fragment: MeshFragment) {
        match self.fragments.iter().position(|f| f.id == fragment.id) {
            Some(index) => self.fragments[index] = fragment,
            None => self.fragments.push(fragment),
        }
    }

    /// Fragments in stable first-seen order
    pub fn fragments(&self) -> &[MeshFragment] {
        &self.fragments
    }

    pub fn get(&self, id: FragmentId) -> Option<&MeshFragment> {
        self.fragments.iter().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Discard all fragments (session reset)
    pub fn clear(&mut self) {
        self.fragments.clear();
    }

    /// Immutable copy for consumers running outside the controller's lock
    pub fn snapshot(&self) -> Vec<MeshFragment> {
        self.fragments.clone()
    }
}
