use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::amount::Amount;
use crate::error::Error;
use crate::graph::FlowGraph;
use crate::residual::ResidualNetwork;
use crate::vertex::{Edge, VertexId};

/// An s-t cut given by the vertices on the source side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinCut<Int> {
    pub source_side: BTreeSet<VertexId>,
    /// Real edges leaving the source side.
    pub edges: Vec<Edge>,
    pub capacity: Int,
}

impl<Int: Amount> FlowGraph<Int> {
    /// The cut induced by the vertices reachable from `source` in the residual network of the
    /// current flow.
    ///
    /// After a maximum flow has been computed its capacity equals the flow value.
    pub fn min_cut(&self, source: VertexId) -> Result<MinCut<Int>, Error> {
        self.check_vertex(source)?;
        let source_side = ResidualNetwork::derive(self)?.reachable_from(source);

        let (edges, capacities): (Vec<_>, Vec<_>) = self
            .edges()
            .filter(|((tail, head), _)| {
                source_side.contains(tail) && !source_side.contains(head)
            })
            .unzip();

        let capacity = Int::checked_sum(capacities).ok_or(Error::ArithmeticOverflow)?;

        Ok(MinCut {
            source_side,
            edges,
            capacity,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algo::Algorithm;
    use rstest::rstest;

    #[rstest]
    fn cut_matches_flow(#[values(Algorithm::EdmondsKarp, Algorithm::PushRelabel)] algo: Algorithm) {
        let mut g = FlowGraph::<i64>::new(4);
        g.add_edge_normalized(1, 2, 3).unwrap();
        g.add_edge_normalized(1, 3, 2).unwrap();
        g.add_edge_normalized(2, 3, 1).unwrap();
        g.add_edge_normalized(2, 4, 2).unwrap();
        g.add_edge_normalized(3, 4, 3).unwrap();

        let value = algo.solve(&mut g, 1, 4).unwrap();
        let cut = g.min_cut(1).unwrap();
        assert_eq!(cut.capacity, value);
        assert!(cut.source_side.contains(&1));
        assert!(!cut.source_side.contains(&4));
    }

    #[test]
    fn bottleneck_edge_is_the_cut() {
        let mut g = FlowGraph::<i64>::new(3);
        g.add_edge(1, 2, 10).unwrap();
        g.add_edge(2, 3, 2).unwrap();
        crate::solve_augmenting_path(&mut g, 1, 3).unwrap();

        let cut = g.min_cut(1).unwrap();
        assert_eq!(cut.source_side, BTreeSet::from([1, 2]));
        assert_eq!(cut.edges, vec![(2, 3)]);
        assert_eq!(cut.capacity, 2);
    }

    #[test]
    fn without_flow_everything_reachable_is_on_source_side() {
        let mut g = FlowGraph::<i64>::new(3);
        g.add_edge(1, 2, 1).unwrap();
        let cut = g.min_cut(1).unwrap();
        assert_eq!(cut.source_side, BTreeSet::from([1, 2]));
        assert!(cut.edges.is_empty());
        assert_eq!(cut.capacity, 0);
        assert_eq!(
            g.min_cut(9),
            Err(Error::InvalidVertexId { id: 9, order: 3 })
        );
    }
}
