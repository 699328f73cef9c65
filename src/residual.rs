use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::amount::Amount;
use crate::error::Error;
use crate::graph::FlowGraph;
use crate::vertex::{Edge, VertexId};

/// The residual network of a [`FlowGraph`] under its current flow.
///
/// Only edges with strictly positive residual capacity are present. The network is derived once
/// per solve and afterwards only changed through [`ResidualNetwork::apply_delta`], which keeps the
/// adjacency lists and the capacity map in sync.
#[derive(Clone, Debug)]
pub struct ResidualNetwork<Int> {
    // indexed by vertex id, slot 0 is unused
    adjacency: Vec<Vec<VertexId>>,
    capacity: BTreeMap<Edge, Int>,
}

impl<Int: Amount> ResidualNetwork<Int> {
    /// Builds the residual network of `graph` from its capacities and flows.
    ///
    /// Each real edge `(u, v)` contributes `capacity - flow` to `(u, v)` and `flow` to `(v, u)`.
    /// Self-loops never carry flow and contribute nothing.
    pub fn derive(graph: &FlowGraph<Int>) -> Result<Self, Error> {
        let mut residual = Self {
            adjacency: vec![Vec::new(); graph.order() + 1],
            capacity: BTreeMap::new(),
        };

        for ((tail, head), capacity) in graph.edges().filter(|((u, v), _)| u != v) {
            let flow = graph.flow(tail, head);
            residual.apply_delta((tail, head), capacity - flow)?;
            residual.apply_delta((head, tail), flow)?;
        }

        log::trace!(
            "derived residual network with {} edges",
            residual.capacity.len()
        );
        Ok(residual)
    }

    /// Highest vertex id covered by this network.
    pub fn order(&self) -> usize {
        self.adjacency.len() - 1
    }

    pub fn edge_count(&self) -> usize {
        self.capacity.len()
    }

    pub fn residual_capacity(&self, tail: VertexId, head: VertexId) -> Int {
        self.capacity
            .get(&(tail, head))
            .copied()
            .unwrap_or_else(Int::zero)
    }

    pub fn contains(&self, tail: VertexId, head: VertexId) -> bool {
        self.capacity.contains_key(&(tail, head))
    }

    /// Heads of the residual edges leaving `id`, in the order they appeared.
    pub fn neighbors(&self, id: VertexId) -> &[VertexId] {
        self.adjacency.get(id).map_or(&[][..], Vec::as_slice)
    }

    /// Adjusts the residual capacity of `edge` by `amount`.
    ///
    /// An edge whose capacity becomes positive is appended to the adjacency of its tail; one
    /// whose capacity drops to zero is removed from it.
    ///
    /// Panics if the capacity would become negative.
    pub fn apply_delta(&mut self, (tail, head): Edge, amount: Int) -> Result<(), Error> {
        if amount.is_zero() {
            return Ok(());
        }

        let updated = self
            .residual_capacity(tail, head)
            .checked_add(&amount)
            .ok_or(Error::ArithmeticOverflow)?;

        match updated.cmp(&Int::zero()) {
            Ordering::Less => {
                panic!("bug: residual capacity of ({tail}, {head}) would drop to {updated}")
            }
            Ordering::Equal => {
                self.capacity.remove(&(tail, head));
                let adjacency = &mut self.adjacency[tail];
                if let Some(pos) = adjacency.iter().position(|&v| v == head) {
                    adjacency.remove(pos);
                }
            }
            Ordering::Greater => {
                if self.capacity.insert((tail, head), updated).is_none() {
                    self.adjacency[tail].push(head);
                }
            }
        }
        Ok(())
    }

    /// Moves `delta` units of flow along the residual edge `(tail, head)`.
    ///
    /// The flow table of `graph` is updated first (forward capacity is used before reverse flow
    /// is cancelled), then the residual capacities of `(tail, head)` and `(head, tail)`.
    pub fn push(
        &mut self,
        graph: &mut FlowGraph<Int>,
        tail: VertexId,
        head: VertexId,
        delta: Int,
    ) -> Result<(), Error> {
        debug_assert!(delta > Int::zero());
        debug_assert!(delta <= self.residual_capacity(tail, head));

        graph.route(tail, head, delta)?;
        self.apply_delta((tail, head), -delta)?;
        self.apply_delta((head, tail), delta)
    }

    /// Vertices reachable from `source` over residual edges.
    pub fn reachable_from(&self, source: VertexId) -> BTreeSet<VertexId> {
        let mut reached = BTreeSet::from([source]);
        let mut queue = VecDeque::from([source]);

        while let Some(u) = queue.pop_front() {
            for &v in self.neighbors(u) {
                if reached.insert(v) {
                    queue.push_back(v);
                }
            }
        }
        reached
    }
}
