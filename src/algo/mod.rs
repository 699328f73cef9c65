use core::fmt::Debug;

use displaydoc::Display;

use crate::amount::Amount;
use crate::error::Error;
use crate::graph::FlowGraph;
use crate::vertex::VertexId;

pub mod edmonds_karp;
pub mod push_relabel;

use edmonds_karp::solve_augmenting_path;
use push_relabel::solve_push_relabel;

/// A maximum flow algorithm.
pub trait MaxFlow<Int> {
    type Error: Debug;

    /// Run the algorithm from `source` to `sink` and return the maximum flow value. The flow
    /// itself is left in `graph`.
    fn max_flow(
        &mut self,
        graph: &mut FlowGraph<Int>,
        source: VertexId,
        sink: VertexId,
    ) -> Result<Int, Self::Error>;
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Algorithm {
    /// edmonds-karp
    EdmondsKarp,
    /// push-relabel
    PushRelabel,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::EdmondsKarp, Algorithm::PushRelabel];

    pub fn solve<Int: Amount>(
        self,
        graph: &mut FlowGraph<Int>,
        source: VertexId,
        sink: VertexId,
    ) -> Result<Int, Error> {
        match self {
            Algorithm::EdmondsKarp => solve_augmenting_path(graph, source, sink),
            Algorithm::PushRelabel => solve_push_relabel(graph, source, sink),
        }
    }
}
