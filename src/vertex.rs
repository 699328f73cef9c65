use alloc::vec::Vec;

/// A 1-based vertex identifier.
pub type VertexId = usize;

/// An ordered pair of vertices `(tail, head)`.
pub type Edge = (VertexId, VertexId);

/// A vertex together with the heads of the edges it is the tail of, in insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vertex {
    id: VertexId,
    neighbors: Vec<VertexId>,
}

impl Vertex {
    pub fn new(id: VertexId) -> Self {
        Self {
            id,
            neighbors: Vec::new(),
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn neighbors(&self) -> &[VertexId] {
        &self.neighbors
    }

    pub fn has_neighbor(&self, head: VertexId) -> bool {
        self.neighbors.contains(&head)
    }

    /// Appends `head` unless it is already a neighbor. Returns whether it was added.
    pub(crate) fn add_neighbor(&mut self, head: VertexId) -> bool {
        if self.has_neighbor(head) {
            false
        } else {
            self.neighbors.push(head);
            true
        }
    }
}
