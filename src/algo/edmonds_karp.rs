use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::min;

use itertools::Itertools;

use crate::algo::MaxFlow;
use crate::amount::Amount;
use crate::error::Error;
use crate::graph::FlowGraph;
use crate::residual::ResidualNetwork;
use crate::vertex::{Edge, VertexId};

/// A source-to-sink path in a residual network together with its bottleneck capacity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AugmentingPath<Int> {
    vertices: Vec<VertexId>,
    bottleneck: Int,
}

impl<Int: Amount> AugmentingPath<Int> {
    /// The vertices of the path, starting at the source.
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    pub fn bottleneck(&self) -> Int {
        self.bottleneck
    }

    /// Number of edges on the path.
    pub fn len(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.vertices.iter().copied().tuple_windows()
    }
}

/// Finds a path with the fewest edges from `source` to `sink` using breadth-first search.
///
/// Neighbors are visited in residual adjacency order, so the result is deterministic. Returns
/// `None` if `sink` is unreachable.
pub fn shortest_augmenting_path<Int: Amount>(
    residual: &ResidualNetwork<Int>,
    source: VertexId,
    sink: VertexId,
) -> Option<AugmentingPath<Int>> {
    let size = residual.order() + 1;
    let mut visited = vec![false; size];
    let mut parent: Vec<Option<VertexId>> = vec![None; size];
    // smallest residual capacity on the tree path from `source`
    let mut bottleneck = vec![Int::zero(); size];

    visited[source] = true;
    let mut queue = VecDeque::from([source]);
    while let Some(u) = queue.pop_front() {
        if u == sink {
            break;
        }

        for &v in residual.neighbors(u) {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            parent[v] = Some(u);

            let capacity = residual.residual_capacity(u, v);
            bottleneck[v] = if u == source {
                capacity
            } else {
                min(bottleneck[u], capacity)
            };
            queue.push_back(v);
        }
    }

    if !visited[sink] {
        return None;
    }

    let mut vertices = vec![sink];
    let mut v = sink;
    while let Some(u) = parent[v] {
        vertices.push(u);
        v = u;
    }
    vertices.reverse();

    Some(AugmentingPath {
        vertices,
        bottleneck: bottleneck[sink],
    })
}

/// The Edmonds-Karp algorithm: augment along shortest residual paths until none is left.
///
/// The paths used by the last solve are kept and can be inspected through
/// [`EdmondsKarp::paths`].
#[derive(Clone, Debug, Default)]
pub struct EdmondsKarp<Int> {
    paths: Vec<AugmentingPath<Int>>,
}

impl<Int: Amount> EdmondsKarp<Int> {
    pub fn new() -> Self {
        Self { paths: Vec::new() }
    }

    /// The augmenting paths of the last solve, in the order they were used.
    pub fn paths(&self) -> &[AugmentingPath<Int>] {
        &self.paths
    }
}

impl<Int: Amount> MaxFlow<Int> for EdmondsKarp<Int> {
    type Error = Error;

    fn max_flow(
        &mut self,
        graph: &mut FlowGraph<Int>,
        source: VertexId,
        sink: VertexId,
    ) -> Result<Int, Error> {
        graph.check_query(source, sink)?;
        graph.reset_flow();
        self.paths.clear();

        let mut residual = ResidualNetwork::derive(graph)?;
        let mut value = Int::zero();

        while let Some(path) = shortest_augmenting_path(&residual, source, sink) {
            let delta = path.bottleneck();
            log::trace!("augmenting {delta} along {:?}", path.vertices());

            for (u, v) in path.edges() {
                residual.push(graph, u, v, delta)?;
            }
            value = value
                .checked_add(&delta)
                .ok_or(Error::ArithmeticOverflow)?;
            self.paths.push(path);
        }

        log::debug!(
            "edmonds-karp: max flow {value} from {source} to {sink} after {} augmentations",
            self.paths.len()
        );
        Ok(value)
    }
}

/// Computes the maximum flow from `source` to `sink` with the Edmonds-Karp algorithm.
///
/// Any previous flow in `graph` is discarded; on success the graph holds a maximum flow.
pub fn solve_augmenting_path<Int: Amount>(
    graph: &mut FlowGraph<Int>,
    source: VertexId,
    sink: VertexId,
) -> Result<Int, Error> {
    EdmondsKarp::new().max_flow(graph, source, sink)
}
