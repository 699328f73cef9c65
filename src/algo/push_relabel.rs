use alloc::collections::btree_map::Entry;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::min;

use crate::algo::MaxFlow;
use crate::amount::Amount;
use crate::error::Error;
use crate::graph::FlowGraph;
use crate::residual::ResidualNetwork;
use crate::vertex::VertexId;

/// Active vertices bucketed by height, so that the highest one can be found without a scan.
#[derive(Debug, Default)]
struct ActiveSet {
    buckets: BTreeMap<usize, BTreeSet<VertexId>>,
}

impl ActiveSet {
    fn insert(&mut self, v: VertexId, label: usize) {
        self.buckets.entry(label).or_default().insert(v);
    }

    fn remove(&mut self, v: VertexId, label: usize) {
        if let Entry::Occupied(mut bucket) = self.buckets.entry(label) {
            bucket.get_mut().remove(&v);
            if bucket.get().is_empty() {
                bucket.remove();
            }
        }
    }

    /// The active vertex with the largest label, smallest id first among equals.
    fn highest(&self) -> Option<VertexId> {
        self.buckets
            .values()
            .next_back()
            .and_then(|bucket| bucket.first().copied())
    }
}

struct State<'g, Int> {
    graph: &'g mut FlowGraph<Int>,
    residual: ResidualNetwork<Int>,
    source: VertexId,
    sink: VertexId,
    // indexed by vertex id, slot 0 is unused
    label: Vec<usize>,
    excess: Vec<Int>,
    active: ActiveSet,
    pushes: usize,
    relabels: usize,
}

impl<'g, Int: Amount> State<'g, Int> {
    fn new(
        graph: &'g mut FlowGraph<Int>,
        source: VertexId,
        sink: VertexId,
    ) -> Result<Self, Error> {
        graph.reset_flow();
        let residual = ResidualNetwork::derive(graph)?;

        let order = graph.order();
        let mut label = vec![0; order + 1];
        label[source] = order;

        let mut state = State {
            graph,
            residual,
            source,
            sink,
            label,
            excess: vec![Int::zero(); order + 1],
            active: ActiveSet::default(),
            pushes: 0,
            relabels: 0,
        };

        // saturate every edge leaving the source
        let targets = state.residual.neighbors(source).to_vec();
        for v in targets {
            let capacity = state.residual.residual_capacity(source, v);
            state.residual.push(state.graph, source, v, capacity)?;
            state.add_excess(v, capacity)?;
        }

        Ok(state)
    }

    fn is_terminal(&self, v: VertexId) -> bool {
        v == self.source || v == self.sink
    }

    fn add_excess(&mut self, v: VertexId, amount: Int) -> Result<(), Error> {
        debug_assert!(amount > Int::zero());

        // The source never accumulates excess, it can always take back what it sent.
        if v == self.source {
            return Ok(());
        }

        let was_idle = self.excess[v].is_zero();
        self.excess[v] = self.excess[v]
            .checked_add(&amount)
            .ok_or(Error::ArithmeticOverflow)?;
        if was_idle && !self.is_terminal(v) {
            self.active.insert(v, self.label[v]);
        }
        Ok(())
    }

    fn admissible(&self, u: VertexId) -> Option<VertexId> {
        self.residual
            .neighbors(u)
            .iter()
            .copied()
            .find(|&v| self.label[u] == self.label[v] + 1)
    }

    fn push(&mut self, u: VertexId, v: VertexId) -> Result<(), Error> {
        debug_assert!(self.excess[u] > Int::zero());
        debug_assert!(self.label[u] == self.label[v] + 1);

        let delta = min(self.excess[u], self.residual.residual_capacity(u, v));
        log::trace!("push {delta} along ({u}, {v})");

        self.residual.push(self.graph, u, v, delta)?;
        self.excess[u] -= delta;
        if self.excess[u].is_zero() {
            self.active.remove(u, self.label[u]);
        }
        self.add_excess(v, delta)?;
        self.pushes += 1;
        Ok(())
    }

    fn relabel(&mut self, u: VertexId) {
        let lowest = self
            .residual
            .neighbors(u)
            .iter()
            .map(|&v| self.label[v])
            .min()
            .expect("bug: tried to relabel a vertex with no residual out-edges");

        debug_assert!(lowest >= self.label[u]);
        self.active.remove(u, self.label[u]);
        self.label[u] = lowest + 1;
        self.active.insert(u, self.label[u]);
        self.relabels += 1;

        debug_assert!(self.label[u] < 2 * self.graph.order());
        log::trace!("relabel {u} to {}", self.label[u]);
    }

    fn run(&mut self) -> Result<Int, Error> {
        while let Some(u) = self.active.highest() {
            match self.admissible(u) {
                Some(v) => self.push(u, v)?,
                None => self.relabel(u),
            }
        }
        Ok(self.excess[self.sink])
    }
}

/// The push-relabel algorithm, always discharging an active vertex of maximum height.
#[derive(Clone, Debug, Default)]
pub struct PushRelabel {
    pushes: usize,
    relabels: usize,
}

impl PushRelabel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of push operations performed by the last solve.
    pub fn pushes(&self) -> usize {
        self.pushes
    }

    /// Number of relabel operations performed by the last solve.
    pub fn relabels(&self) -> usize {
        self.relabels
    }

    fn solve<Int: Amount>(
        &mut self,
        graph: &mut FlowGraph<Int>,
        source: VertexId,
        sink: VertexId,
    ) -> Result<Int, Error> {
        graph.check_query(source, sink)?;

        let mut state = State::new(graph, source, sink)?;
        let value = state.run()?;
        self.pushes = state.pushes;
        self.relabels = state.relabels;

        log::debug!(
            "push-relabel: max flow {value} from {source} to {sink} after {} pushes and {} relabels",
            self.pushes,
            self.relabels
        );
        Ok(value)
    }
}

impl<Int: Amount> MaxFlow<Int> for PushRelabel {
    type Error = Error;

    fn max_flow(
        &mut self,
        graph: &mut FlowGraph<Int>,
        source: VertexId,
        sink: VertexId,
    ) -> Result<Int, Error> {
        self.solve(graph, source, sink)
    }
}

/// Computes the maximum flow from `source` to `sink` with the highest-label push-relabel
/// algorithm.
///
/// Any previous flow in `graph` is discarded; on success the graph holds a maximum flow.
pub fn solve_push_relabel<Int: Amount>(
    graph: &mut FlowGraph<Int>,
    source: VertexId,
    sink: VertexId,
) -> Result<Int, Error> {
    PushRelabel::new().solve(graph, source, sink)
}
