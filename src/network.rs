use alloc::collections::btree_map::Entry;
use alloc::collections::{BTreeMap, BTreeSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, EdgeFiltered, EdgeRef};

use crate::algo::edmonds_karp::EdmondsKarp;
use crate::algo::MaxFlow;
use crate::capacity::Capacity;
use crate::error::Error;
use crate::id::Id;
use crate::int::Int;

/// Net flow per `(from, to)` edge. Only edges with positive original capacity that carry
/// positive flow are present.
pub type FlowAssignment<N, T> = BTreeMap<(N, N), T>;

/// A directed capacitated graph.
///
/// Every edge `u -> v` is paired with a reverse edge `v -> u`, created with zero capacity when
/// the forward edge is first inserted. The stored capacities are never touched by a max flow
/// query, which works on its own residual copy.
#[derive(Clone, Debug)]
pub struct FlowNetwork<N, T> {
    graph: DiGraph<N, Capacity<T>>,
    node_map: BTreeMap<N, NodeIndex>,
}

impl<N, T> Default for FlowNetwork<N, T> {
    fn default() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: BTreeMap::new(),
        }
    }
}

impl<N: Id, T: Int> FlowNetwork<N, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a network by inserting `edges` in order, see [`FlowNetwork::add_edge`].
    pub fn from_edges<I, C>(edges: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (N, N, C)>,
        C: Into<Capacity<T>>,
    {
        edges
            .into_iter()
            .try_fold(Self::new(), |mut acc, (from, to, capacity)| {
                acc.add_edge(from, to, capacity)?;
                Ok(acc)
            })
    }

    /// Insert the edge `from -> to`, overwriting its capacity if it already exists.
    ///
    /// The reverse edge `to -> from` is added with zero capacity unless present, in which case
    /// its capacity is left as is.
    pub fn add_edge(
        &mut self,
        from: N,
        to: N,
        capacity: impl Into<Capacity<T>>,
    ) -> Result<(), Error> {
        let capacity = capacity.into();
        if capacity < Capacity::Finite(T::zero()) {
            return Err(Error::NegativeCapacity);
        }

        let u = self.insert_node(from);
        let v = self.insert_node(to);
        self.graph.update_edge(u, v, capacity);
        if self.graph.find_edge(v, u).is_none() {
            self.graph.add_edge(v, u, Capacity::Finite(T::zero()));
        }
        Ok(())
    }

    fn insert_node(&mut self, node: N) -> NodeIndex {
        match self.node_map.entry(node) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let idx = self.graph.add_node(e.key().clone());
                *e.insert(idx)
            }
        }
    }

    pub fn capacity(&self, from: &N, to: &N) -> Option<Capacity<T>> {
        let u = self.node_index(from)?;
        let v = self.node_index(to)?;
        self.graph.find_edge(u, v).map(|e| self.graph[e])
    }

    pub fn contains_node(&self, node: &N) -> bool {
        self.node_map.contains_key(node)
    }

    pub fn node_index(&self, node: &N) -> Option<NodeIndex> {
        self.node_map.get(node).copied()
    }

    /// Nodes in the order they were first seen.
    pub fn nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.graph.node_indices().map(move |n| &self.graph[n])
    }

    /// Edges in insertion order, zero-capacity reverse edges included.
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N, Capacity<T>)> + '_ {
        self.graph
            .edge_references()
            .map(move |e| (&self.graph[e.source()], &self.graph[e.target()], *e.weight()))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The underlying graph holding the original capacities.
    pub fn graph(&self) -> &DiGraph<N, Capacity<T>> {
        &self.graph
    }

    /// Maximum flow from `source` to `sink` using the Edmonds-Karp algorithm.
    ///
    /// Returns the flow value along with the flow assignment. A missing `source` or `sink`, or
    /// `source == sink`, yields zero flow.
    pub fn compute_max_flow(
        &self,
        source: &N,
        sink: &N,
    ) -> Result<(T, FlowAssignment<N, T>), Error> {
        self.compute_max_flow_with(&mut EdmondsKarp, source, sink)
    }

    pub fn compute_max_flow_with<A>(
        &self,
        algo: &mut A,
        source: &N,
        sink: &N,
    ) -> Result<(T, FlowAssignment<N, T>), Error>
    where
        A: MaxFlow<N, T>,
    {
        algo.max_flow(self, source, sink)
    }

    /// The cut induced by `assignment`: nodes reachable from `source` through edges with positive
    /// residual capacity, and the total original capacity of the edges leaving that set.
    ///
    /// For a maximum flow this is a minimum cut and its capacity equals the flow value.
    pub fn min_cut(
        &self,
        source: &N,
        assignment: &FlowAssignment<N, T>,
    ) -> Result<(BTreeSet<N>, Capacity<T>), Error> {
        let Some(s) = self.node_index(source) else {
            return Ok((BTreeSet::new(), Capacity::Finite(T::zero())));
        };

        let net: BTreeMap<_, _> = assignment
            .iter()
            .filter_map(|((u, v), flow)| Some(((self.node_index(u)?, self.node_index(v)?), *flow)))
            .collect();
        let flow_on =
            |u: NodeIndex, v: NodeIndex| net.get(&(u, v)).copied().unwrap_or_else(T::zero);

        let residual = EdgeFiltered::from_fn(&self.graph, |e| {
            let (u, v) = (e.source(), e.target());
            e.weight()
                .residual(flow_on(u, v).saturating_sub(&flow_on(v, u)))
                .is_positive()
        });
        let mut bfs = Bfs::new(&residual, s);
        let mut reachable = BTreeSet::new();
        while let Some(n) = bfs.next(&residual) {
            reachable.insert(n);
        }

        let capacity = self
            .graph
            .edge_references()
            .filter(|e| reachable.contains(&e.source()) && !reachable.contains(&e.target()))
            .try_fold(Capacity::Finite(T::zero()), |acc, e| {
                acc.checked_add(*e.weight())
                    .ok_or(Error::ArithmeticOverflow)
            })?;

        let side = reachable
            .into_iter()
            .map(|n| self.graph[n].clone())
            .collect();
        Ok((side, capacity))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn add_edge_creates_zero_reverse_edge() {
        let mut network = FlowNetwork::<&str, i32>::new();
        network.add_edge("A", "B", 10).unwrap();

        assert_eq!(network.capacity(&"A", &"B"), Some(Capacity::Finite(10)));
        assert_eq!(network.capacity(&"B", &"A"), Some(Capacity::Finite(0)));
        assert_eq!(network.node_count(), 2);
        assert_eq!(network.edge_count(), 2);
    }

    #[test]
    fn add_edge_never_overwrites_existing_reverse_capacity() {
        let mut network = FlowNetwork::<&str, i32>::new();
        network.add_edge("B", "A", 4).unwrap();
        network.add_edge("A", "B", 10).unwrap();

        assert_eq!(network.capacity(&"B", &"A"), Some(Capacity::Finite(4)));
        assert_eq!(network.capacity(&"A", &"B"), Some(Capacity::Finite(10)));
        assert_eq!(network.edge_count(), 2);
    }

    #[test]
    fn later_capacity_replaces_earlier_one() {
        let mut network = FlowNetwork::<&str, i32>::new();
        network.add_edge("A", "B", 10).unwrap();
        network.add_edge("A", "B", 3).unwrap();

        assert_eq!(network.capacity(&"A", &"B"), Some(Capacity::Finite(3)));
        assert_eq!(network.edge_count(), 2);
    }

    #[test]
    fn negative_capacity_is_rejected_without_side_effects() {
        let mut network = FlowNetwork::<&str, i32>::new();
        assert_eq!(network.add_edge("A", "B", -1), Err(Error::NegativeCapacity));
        assert!(!network.contains_node(&"A"));
        assert_eq!(network.edge_count(), 0);
    }

    #[test]
    fn nodes_and_edges_keep_insertion_order() {
        let network =
            FlowNetwork::<&str, i32>::from_edges([("s", "a", 1), ("s", "b", 2), ("a", "t", 3)])
                .unwrap();

        assert_eq!(network.nodes().copied().collect::<Vec<_>>(), ["s", "a", "b", "t"]);
        let forward: Vec<_> = network
            .edges()
            .filter(|(_, _, c)| c.is_positive())
            .map(|(u, v, _)| (*u, *v))
            .collect();
        assert_eq!(forward, [("s", "a"), ("s", "b"), ("a", "t")]);
    }

    #[test]
    fn min_cut_without_flow_is_the_source_component() {
        let network =
            FlowNetwork::<&str, i32>::from_edges([("s", "a", 1), ("a", "t", 3)]).unwrap();
        let (side, capacity) = network.min_cut(&"s", &FlowAssignment::new()).unwrap();

        assert_eq!(side.into_iter().collect::<Vec<_>>(), ["a", "s", "t"]);
        assert_eq!(capacity, Capacity::Finite(0));
    }
}
