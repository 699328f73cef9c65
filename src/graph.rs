use alloc::collections::btree_map::Entry;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::cmp::min;

use crate::amount::Amount;
use crate::error::Error;
use crate::vertex::{Edge, Vertex, VertexId};

/// A directed, capacitated graph with 1-based vertex ids and the flow currently assigned to its
/// edges.
///
/// Capacities and flows are stored in maps keyed by `(tail, head)`. An edge exists iff it has a
/// capacity entry and `head` appears in the adjacency of `tail`.
#[derive(Clone, Debug)]
pub struct FlowGraph<Int = i64> {
    vertices: Vec<Vertex>,
    capacity: BTreeMap<Edge, Int>,
    flow: BTreeMap<Edge, Int>,
    // ordered pairs that were routed through an intermediate vertex by `add_edge_normalized`
    detours: BTreeMap<Edge, VertexId>,
}

impl<Int: Amount> FlowGraph<Int> {
    /// Creates a graph with vertices `1..=order` and no edges.
    pub fn new(order: usize) -> Self {
        Self {
            vertices: (1..=order).map(Vertex::new).collect(),
            capacity: BTreeMap::new(),
            flow: BTreeMap::new(),
            detours: BTreeMap::new(),
        }
    }

    /// Number of vertices, including the ones created by anti-parallel normalization.
    pub fn order(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.capacity.len()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        id.checked_sub(1).and_then(|idx| self.vertices.get(idx))
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter()
    }

    /// Heads of the edges leaving `id`, in insertion order. Empty for unknown ids.
    pub fn neighbors(&self, id: VertexId) -> &[VertexId] {
        self.vertex(id).map_or(&[][..], Vertex::neighbors)
    }

    pub fn contains_edge(&self, tail: VertexId, head: VertexId) -> bool {
        self.capacity.contains_key(&(tail, head))
    }

    pub fn capacity(&self, tail: VertexId, head: VertexId) -> Option<Int> {
        self.capacity.get(&(tail, head)).copied()
    }

    /// Flow on the edge `(tail, head)`; zero if there is no such edge or no flow on it.
    pub fn flow(&self, tail: VertexId, head: VertexId) -> Int {
        self.flow
            .get(&(tail, head))
            .copied()
            .unwrap_or_else(Int::zero)
    }

    /// Remaining capacity `capacity - flow` of a real edge, zero for non-edges.
    pub fn slack(&self, tail: VertexId, head: VertexId) -> Int {
        self.capacity(tail, head)
            .map_or_else(Int::zero, |c| c - self.flow(tail, head))
    }

    /// All edges with their capacity, ordered by tail id and then by insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (Edge, Int)> + '_ {
        self.vertices.iter().flat_map(move |v| {
            v.neighbors()
                .iter()
                .map(move |&head| ((v.id(), head), self.capacity[&(v.id(), head)]))
        })
    }

    /// Edges carrying non-zero flow.
    pub fn flows(&self) -> impl Iterator<Item = (Edge, Int)> + '_ {
        self.flow
            .iter()
            .filter(|(_, f)| !f.is_zero())
            .map(|(e, f)| (*e, *f))
    }

    pub fn check_vertex(&self, id: VertexId) -> Result<(), Error> {
        if self.vertex(id).is_some() {
            Ok(())
        } else {
            Err(Error::InvalidVertexId {
                id,
                order: self.order(),
            })
        }
    }

    /// Validates a `(source, sink)` query against this graph.
    pub fn check_query(&self, source: VertexId, sink: VertexId) -> Result<(), Error> {
        self.check_vertex(source)?;
        self.check_vertex(sink)?;
        if source == sink {
            return Err(Error::DegenerateQuery(source));
        }
        Ok(())
    }

    /// Adds `capacity` to the edge `(tail, head)`, creating the edge if needed.
    pub fn add_edge(&mut self, tail: VertexId, head: VertexId, capacity: Int) -> Result<(), Error> {
        self.check_edge(tail, head, capacity)?;
        let total = self.accumulated((tail, head), capacity)?;
        self.set_capacity((tail, head), total);
        Ok(())
    }

    /// Like [`FlowGraph::add_edge`], but never lets two vertices be joined in both directions.
    ///
    /// If `(head, tail)` already exists, the new edge is routed `tail -> w -> head` through a
    /// fresh vertex `w`. Later insertions of the same ordered pair accumulate on that detour.
    pub fn add_edge_normalized(
        &mut self,
        tail: VertexId,
        head: VertexId,
        capacity: Int,
    ) -> Result<(), Error> {
        self.check_edge(tail, head, capacity)?;

        if let Some(&via) = self.detours.get(&(tail, head)) {
            return self.add_detour(tail, via, head, capacity);
        }

        if tail != head && self.contains_edge(head, tail) && !self.contains_edge(tail, head) {
            let via = self.add_vertex();
            log::trace!("routing anti-parallel edge {tail} -> {head} through vertex {via}");
            self.add_detour(tail, via, head, capacity)?;
            self.detours.insert((tail, head), via);
            return Ok(());
        }

        self.add_edge(tail, head, capacity)
    }

    /// The vertex an anti-parallel edge `(tail, head)` was routed through, if any.
    pub fn detour(&self, tail: VertexId, head: VertexId) -> Option<VertexId> {
        self.detours.get(&(tail, head)).copied()
    }

    /// Net flow into `id`, i.e. inflow minus outflow.
    pub fn net_flow(&self, id: VertexId) -> Int {
        self.flow
            .iter()
            .fold(Int::zero(), |acc, (&(tail, head), &f)| {
                if tail == head {
                    acc
                } else if head == id {
                    acc + f
                } else if tail == id {
                    acc - f
                } else {
                    acc
                }
            })
    }

    /// Net flow leaving `source`.
    pub fn flow_value(&self, source: VertexId) -> Int {
        -self.net_flow(source)
    }

    /// Whether `0 <= flow <= capacity` holds on every edge.
    pub fn is_feasible(&self) -> bool {
        self.flow.iter().all(|(edge, &f)| {
            self.capacity
                .get(edge)
                .map_or(false, |&c| f >= Int::zero() && f <= c)
        })
    }

    /// Whether inflow equals outflow at every vertex other than `source` and `sink`.
    pub fn is_conserved(&self, source: VertexId, sink: VertexId) -> bool {
        let net = self
            .flow
            .iter()
            .filter(|((tail, head), _)| tail != head)
            .fold(BTreeMap::new(), |mut acc, (&(tail, head), &f)| {
                *acc.entry(head).or_insert_with(Int::zero) += f;
                *acc.entry(tail).or_insert_with(Int::zero) -= f;
                acc
            });

        net.into_iter()
            .filter(|(v, _)| *v != source && *v != sink)
            .all(|(_, balance)| balance.is_zero())
    }

    pub(crate) fn reset_flow(&mut self) {
        self.flow.clear();
    }

    /// Moves `amount` (possibly negative) onto the real edge `edge`.
    pub(crate) fn add_flow(&mut self, edge: Edge, amount: Int) -> Result<(), Error> {
        debug_assert!(self.capacity.contains_key(&edge));

        let f = self.flow.entry(edge).or_insert_with(Int::zero);
        *f = f.checked_add(&amount).ok_or(Error::ArithmeticOverflow)?;
        debug_assert!(*f >= Int::zero() && *f <= self.capacity[&edge]);
        Ok(())
    }

    /// Splits `delta` units along residual edge `(tail, head)` into an increase of the real
    /// edge `(tail, head)` and a cancellation on the real edge `(head, tail)`.
    pub(crate) fn route(&mut self, tail: VertexId, head: VertexId, delta: Int) -> Result<(), Error> {
        let forward = min(delta, self.slack(tail, head));
        if forward > Int::zero() {
            self.add_flow((tail, head), forward)?;
        }

        let cancelled = delta - forward;
        if cancelled > Int::zero() {
            debug_assert!(self.flow(head, tail) >= cancelled);
            self.add_flow((head, tail), -cancelled)?;
        }
        Ok(())
    }

    fn check_edge(&self, tail: VertexId, head: VertexId, capacity: Int) -> Result<(), Error> {
        self.check_vertex(tail)?;
        self.check_vertex(head)?;
        if capacity < Int::zero() {
            return Err(Error::NegativeCapacity);
        }
        Ok(())
    }

    fn add_vertex(&mut self) -> VertexId {
        let id = self.order() + 1;
        self.vertices.push(Vertex::new(id));
        id
    }

    fn add_detour(
        &mut self,
        tail: VertexId,
        via: VertexId,
        head: VertexId,
        capacity: Int,
    ) -> Result<(), Error> {
        // both halves are computed up front so an overflow leaves the graph untouched
        let first = self.accumulated((tail, via), capacity)?;
        let second = self.accumulated((via, head), capacity)?;
        self.set_capacity((tail, via), first);
        self.set_capacity((via, head), second);
        Ok(())
    }

    fn accumulated(&self, edge: Edge, capacity: Int) -> Result<Int, Error> {
        match self.capacity.get(&edge) {
            Some(c) => c.checked_add(&capacity).ok_or(Error::ArithmeticOverflow),
            None => Ok(capacity),
        }
    }

    fn set_capacity(&mut self, (tail, head): Edge, capacity: Int) {
        match self.capacity.entry((tail, head)) {
            Entry::Vacant(e) => {
                e.insert(capacity);
                self.vertices[tail - 1].add_neighbor(head);
            }
            Entry::Occupied(mut e) => {
                e.insert(capacity);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[test]
    fn new_graph_has_vertices_and_no_edges() {
        let g = FlowGraph::<i64>::new(4);
        assert_eq!(g.order(), 4);
        assert_eq!(g.edge_count(), 0);
        assert!(g.vertex(0).is_none());
        assert_eq!(g.vertex(4).map(Vertex::id), Some(4));
        assert!(g.vertex(5).is_none());
    }

    #[test]
    fn repeated_edges_accumulate_capacity() {
        let mut g = FlowGraph::<i64>::new(2);
        g.add_edge(1, 2, 3).unwrap();
        g.add_edge(1, 2, 4).unwrap();
        assert_eq!(g.capacity(1, 2), Some(7));
        assert_eq!(g.neighbors(1), &[2]);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn zero_capacity_edge_exists() {
        let mut g = FlowGraph::<i64>::new(2);
        g.add_edge(1, 2, 0).unwrap();
        assert!(g.contains_edge(1, 2));
        assert_eq!(g.capacity(1, 2), Some(0));
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 4)]
    #[case(7, 2)]
    fn invalid_vertex_is_rejected(#[case] tail: VertexId, #[case] head: VertexId) {
        let mut g = FlowGraph::<i64>::new(3);
        let err = g.add_edge_normalized(tail, head, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidVertexId { order: 3, .. }));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn negative_capacity_is_rejected() {
        let mut g = FlowGraph::<i64>::new(2);
        assert_eq!(g.add_edge(1, 2, -1), Err(Error::NegativeCapacity));
        assert_eq!(g.add_edge_normalized(1, 2, -5), Err(Error::NegativeCapacity));
        assert!(!g.contains_edge(1, 2));
    }

    #[test]
    fn capacity_overflow_is_reported() {
        let mut g = FlowGraph::<i32>::new(2);
        g.add_edge(1, 2, i32::MAX).unwrap();
        assert_eq!(g.add_edge(1, 2, 1), Err(Error::ArithmeticOverflow));
        assert_eq!(g.capacity(1, 2), Some(i32::MAX));
    }

    #[test]
    fn degenerate_query_is_rejected() {
        let g = FlowGraph::<i64>::new(2);
        assert_eq!(g.check_query(2, 2), Err(Error::DegenerateQuery(2)));
        assert_eq!(
            g.check_query(1, 3),
            Err(Error::InvalidVertexId { id: 3, order: 2 })
        );
        assert_eq!(g.check_query(1, 2), Ok(()));
    }

    #[test]
    fn anti_parallel_edge_is_routed_through_new_vertex() {
        let mut g = FlowGraph::<i64>::new(2);
        g.add_edge_normalized(1, 2, 4).unwrap();
        g.add_edge_normalized(2, 1, 5).unwrap();

        assert_eq!(g.order(), 3);
        assert_eq!(g.detour(2, 1), Some(3));
        assert!(!g.contains_edge(2, 1));
        assert_eq!(g.capacity(1, 2), Some(4));
        assert_eq!(g.capacity(2, 3), Some(5));
        assert_eq!(g.capacity(3, 1), Some(5));
    }

    #[test]
    fn repeated_anti_parallel_edges_accumulate_on_detour() {
        let mut g = FlowGraph::<i64>::new(2);
        g.add_edge_normalized(1, 2, 4).unwrap();
        g.add_edge_normalized(2, 1, 1).unwrap();
        g.add_edge_normalized(2, 1, 2).unwrap();
        g.add_edge_normalized(1, 2, 6).unwrap();

        assert_eq!(g.order(), 3);
        assert_eq!(g.capacity(1, 2), Some(10));
        assert_eq!(g.capacity(2, 3), Some(3));
        assert_eq!(g.capacity(3, 1), Some(3));
    }

    #[test]
    fn every_conflict_gets_its_own_vertex() {
        let mut g = FlowGraph::<i64>::new(3);
        g.add_edge_normalized(1, 2, 1).unwrap();
        g.add_edge_normalized(2, 3, 1).unwrap();
        g.add_edge_normalized(2, 1, 1).unwrap();
        g.add_edge_normalized(3, 2, 1).unwrap();

        assert_eq!(g.order(), 5);
        assert_eq!(g.detour(2, 1), Some(4));
        assert_eq!(g.detour(3, 2), Some(5));
    }

    #[test]
    fn edges_follow_insertion_order() {
        let mut g = FlowGraph::<i64>::new(3);
        g.add_edge(2, 1, 1).unwrap();
        g.add_edge(1, 3, 2).unwrap();
        g.add_edge(1, 2, 3).unwrap();

        let edges: Vec<_> = g.edges().collect();
        assert_eq!(edges, vec![((1, 3), 2), ((1, 2), 3), ((2, 1), 1)]);
    }

    #[test]
    fn route_cancels_reverse_flow_before_exceeding_capacity() {
        let mut g = FlowGraph::<i64>::new(2);
        g.add_edge(1, 2, 2).unwrap();
        g.add_edge(2, 1, 3).unwrap();
        g.add_flow((2, 1), 3).unwrap();

        g.route(1, 2, 4).unwrap();
        assert_eq!(g.flow(1, 2), 2);
        assert_eq!(g.flow(2, 1), 1);
        assert!(g.is_feasible());
    }

    #[test]
    fn conservation_and_value() {
        let mut g = FlowGraph::<i64>::new(3);
        g.add_edge(1, 2, 5).unwrap();
        g.add_edge(2, 3, 5).unwrap();
        g.add_flow((1, 2), 2).unwrap();
        assert!(!g.is_conserved(1, 3));

        g.add_flow((2, 3), 2).unwrap();
        assert!(g.is_conserved(1, 3));
        assert_eq!(g.flow_value(1), 2);
        assert_eq!(g.net_flow(3), 2);
        assert_eq!(g.flows().count(), 2);
    }
}
