use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::Error;
use crate::graph::FlowGraph;
use crate::vertex::VertexId;

/// A capacitated edge as it appears in input, before it is inserted into a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct EdgeSpec<Int> {
    pub tail: VertexId,
    pub head: VertexId,
    pub capacity: Int,
}

impl<Int> From<(VertexId, VertexId, Int)> for EdgeSpec<Int> {
    fn from((tail, head, capacity): (VertexId, VertexId, Int)) -> Self {
        Self {
            tail,
            head,
            capacity,
        }
    }
}

impl<Int: Amount> FlowGraph<Int> {
    /// Builds a graph of `order` vertices from `edges`, normalizing anti-parallel edges.
    pub fn from_edges<I>(order: usize, edges: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: Into<EdgeSpec<Int>>,
    {
        let mut graph = Self::new(order);
        graph.extend_normalized(edges)?;
        Ok(graph)
    }

    /// Inserts every edge with [`FlowGraph::add_edge_normalized`], stopping at the first error.
    pub fn extend_normalized<I>(&mut self, edges: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: Into<EdgeSpec<Int>>,
    {
        edges
            .into_iter()
            .map(Into::into)
            .try_for_each(|e: EdgeSpec<Int>| self.add_edge_normalized(e.tail, e.head, e.capacity))
    }
}
