use petgraph::graph::{Graph, IndexType};
use petgraph::visit::EdgeRef;
use petgraph::Directed;

use crate::amount::Amount;
use crate::error::Error;
use crate::graph::FlowGraph;

impl<Int: Amount> FlowGraph<Int> {
    /// Converts a petgraph digraph whose edge weights are capacities.
    ///
    /// Node index `i` becomes vertex `i + 1`. Edges are inserted in index order with
    /// [`FlowGraph::add_edge_normalized`].
    pub fn from_petgraph<N, Ix: IndexType>(g: &Graph<N, Int, Directed, Ix>) -> Result<Self, Error> {
        let mut graph = Self::new(g.node_count());
        for e in g.edge_references() {
            graph.add_edge_normalized(e.source().index() + 1, e.target().index() + 1, *e.weight())?;
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::solve_push_relabel;

    #[test]
    fn converts_nodes_and_edges() {
        let mut pg = Graph::<&str, i64>::new();
        let s = pg.add_node("s");
        let a = pg.add_node("a");
        let t = pg.add_node("t");
        pg.add_edge(s, a, 10);
        pg.add_edge(a, t, 2);
        pg.add_edge(t, a, 1);

        let mut g = FlowGraph::from_petgraph(&pg).unwrap();
        assert_eq!(g.order(), 4);
        assert_eq!(g.capacity(1, 2), Some(10));
        assert_eq!(g.detour(3, 2), Some(4));
        assert_eq!(solve_push_relabel(&mut g, 1, 3), Ok(2));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut pg = Graph::<(), i64>::new();
        let a = pg.add_node(());
        let b = pg.add_node(());
        pg.add_edge(a, b, -3);
        assert_eq!(
            FlowGraph::from_petgraph(&pg).unwrap_err(),
            Error::NegativeCapacity
        );
    }
}
