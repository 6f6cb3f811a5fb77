use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec;
use alloc::vec::Vec;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::algo::MaxFlow;
use crate::capacity::Capacity;
use crate::error::Error;
use crate::id::Id;
use crate::int::Int;
use crate::network::{FlowAssignment, FlowNetwork};

/// Shortest augmenting paths found by breadth-first search, repeated until the sink is no longer
/// reachable in the residual graph.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdmondsKarp;

struct Edge<T> {
    capacity: Capacity<T>,
    flow: T,
}

impl<T: Int> Edge<T> {
    fn new(capacity: Capacity<T>) -> Edge<T> {
        Edge {
            capacity,
            flow: T::zero(),
        }
    }

    fn residual(&self) -> Capacity<T> {
        self.capacity.residual(self.flow)
    }
}

struct State<T> {
    // Outgoing neighbours in edge insertion order, which fixes the BFS tie-breaking.
    adjacency: Vec<Vec<NodeIndex>>,
    // Flow is skew-symmetric: `edges[(u, v)].flow == -edges[(v, u)].flow`.
    edges: BTreeMap<(NodeIndex, NodeIndex), Edge<T>>,
    source: NodeIndex,
    sink: NodeIndex,
}

impl<T: Int> State<T> {
    fn new<N>(graph: &DiGraph<N, Capacity<T>>, source: NodeIndex, sink: NodeIndex) -> State<T> {
        let mut adjacency = vec![Vec::new(); graph.node_count()];
        let mut edges = BTreeMap::new();

        for e in graph.edge_references() {
            let (u, v) = (e.source(), e.target());
            adjacency[u.index()].push(v);
            edges.insert((u, v), Edge::new(*e.weight()));
        }

        State {
            adjacency,
            edges,
            source,
            sink,
        }
    }

    fn residual(&self, u: NodeIndex, v: NodeIndex) -> Capacity<T> {
        self.edges
            .get(&(u, v))
            .map_or(Capacity::Finite(T::zero()), Edge::residual)
    }

    /// Breadth-first search from the source over edges with positive residual capacity. Returns
    /// the node sequence from source to sink once the sink is discovered.
    fn augmenting_path(&self) -> Option<Vec<NodeIndex>> {
        let mut parent: Vec<Option<NodeIndex>> = vec![None; self.adjacency.len()];
        let mut visited = vec![false; self.adjacency.len()];
        visited[self.source.index()] = true;
        let mut queue = VecDeque::from([self.source]);

        while let Some(u) = queue.pop_front() {
            for &v in &self.adjacency[u.index()] {
                if visited[v.index()] || !self.residual(u, v).is_positive() {
                    continue;
                }
                visited[v.index()] = true;
                parent[v.index()] = Some(u);
                if v == self.sink {
                    return Some(self.trace_back(&parent));
                }
                queue.push_back(v);
            }
        }
        None
    }

    fn trace_back(&self, parent: &[Option<NodeIndex>]) -> Vec<NodeIndex> {
        let mut path = vec![self.sink];
        let mut v = self.sink;
        while let Some(u) = parent[v.index()] {
            path.push(u);
            v = u;
        }
        path.reverse();
        path
    }

    fn bottleneck(&self, path: &[NodeIndex]) -> Capacity<T> {
        path.windows(2)
            .map(|w| self.residual(w[0], w[1]))
            .fold(Capacity::Unbounded, core::cmp::min)
    }

    fn push(&mut self, path: &[NodeIndex], amount: T) {
        for w in path.windows(2) {
            let (u, v) = (w[0], w[1]);
            if let Some(e) = self.edges.get_mut(&(u, v)) {
                e.flow += amount;
            }
            if let Some(e) = self.edges.get_mut(&(v, u)) {
                e.flow -= amount;
            }
        }
    }

    fn run(&mut self) -> Result<T, Error> {
        let mut max_flow = T::zero();
        let mut augmentations = 0usize;

        while let Some(path) = self.augmenting_path() {
            let bottleneck = match self.bottleneck(&path) {
                Capacity::Finite(b) => b,
                Capacity::Unbounded => return Err(Error::UnboundedFlow),
            };
            log::trace!("augmenting {} edges by {bottleneck}", path.len() - 1);

            // no edge carries more than the total, so once it fits every per-edge flow does
            max_flow = max_flow
                .checked_add(&bottleneck)
                .ok_or(Error::ArithmeticOverflow)?;
            self.push(&path, bottleneck);
            augmentations += 1;
        }

        log::debug!("max flow {max_flow} after {augmentations} augmenting paths");
        Ok(max_flow)
    }
}

impl<N: Id, T: Int> MaxFlow<N, T> for EdmondsKarp {
    fn max_flow(
        &mut self,
        network: &FlowNetwork<N, T>,
        source: &N,
        sink: &N,
    ) -> Result<(T, FlowAssignment<N, T>), Error> {
        let (Some(s), Some(t)) = (network.node_index(source), network.node_index(sink)) else {
            log::debug!("{source:?} or {sink:?} is not in the network, no flow");
            return Ok((T::zero(), FlowAssignment::new()));
        };
        if s == t {
            return Ok((T::zero(), FlowAssignment::new()));
        }

        let graph = network.graph();
        log::debug!(
            "running Edmonds-Karp over {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        let mut state = State::new(graph, s, t);
        let max_flow = state.run()?;

        let flow = state
            .edges
            .into_iter()
            .filter(|(_, e)| e.capacity.is_positive() && e.flow > T::zero())
            .map(|((u, v), e)| ((graph[u].clone(), graph[v].clone()), e.flow))
            .collect();

        Ok((max_flow, flow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(edges: &[(&'static str, &'static str, i32)]) -> FlowNetwork<&'static str, i32> {
        FlowNetwork::from_edges(edges.iter().copied()).unwrap()
    }

    #[test]
    fn single_edge() {
        let network = network(&[("A", "B", 10)]);
        let (flow, assignment) = network.compute_max_flow(&"A", &"B").unwrap();

        assert_eq!(flow, 10);
        assert_eq!(assignment.into_iter().collect::<Vec<_>>(), [(("A", "B"), 10)]);
    }

    #[test]
    fn bfs_prefers_the_shortest_path() {
        // one augmentation over the direct edge suffices
        let network = network(&[("s", "a", 5), ("a", "b", 5), ("b", "t", 5), ("s", "t", 5)]);
        let graph = network.graph();
        let s = network.node_index(&"s").unwrap();
        let t = network.node_index(&"t").unwrap();

        let state = State::new(graph, s, t);
        let path = state.augmenting_path().unwrap();
        assert_eq!(path, [s, t]);
    }

    #[test]
    fn flow_is_cancelled_through_reverse_edges() {
        // the shortest path s-a-b-t has to be undone over b -> a for the second unit to get through
        let network = network(&[
            ("s", "a", 1),
            ("a", "b", 1),
            ("b", "t", 1),
            ("s", "d", 1),
            ("d", "e", 1),
            ("e", "b", 1),
            ("a", "f", 1),
            ("f", "g", 1),
            ("g", "t", 1),
        ]);
        let (flow, assignment) = network.compute_max_flow(&"s", &"t").unwrap();

        assert_eq!(flow, 2);
        let expected: FlowAssignment<_, _> = [
            (("a", "f"), 1),
            (("b", "t"), 1),
            (("d", "e"), 1),
            (("e", "b"), 1),
            (("f", "g"), 1),
            (("g", "t"), 1),
            (("s", "a"), 1),
            (("s", "d"), 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(assignment, expected);
    }

    #[test]
    fn path_of_unbounded_edges_is_an_error() {
        let mut network = FlowNetwork::<&str, i32>::new();
        network.add_edge("s", "a", Capacity::Unbounded).unwrap();
        network.add_edge("a", "t", Capacity::Unbounded).unwrap();

        assert_eq!(
            network.compute_max_flow(&"s", &"t"),
            Err(Error::UnboundedFlow)
        );
    }

    #[test]
    fn cancelled_flow_on_a_saturated_pair_does_not_overflow() {
        // the second search reaches b through c and sees b -> a with MAX - (-MAX) residual
        let network = network(&[
            ("s", "a", i32::MAX),
            ("s", "c", 1),
            ("a", "b", i32::MAX),
            ("b", "a", i32::MAX),
            ("c", "b", 1),
            ("b", "t", i32::MAX),
        ]);
        let (flow, assignment) = network.compute_max_flow(&"s", &"t").unwrap();

        assert_eq!(flow, i32::MAX);
        let expected: FlowAssignment<_, _> = [
            (("a", "b"), i32::MAX),
            (("b", "t"), i32::MAX),
            (("s", "a"), i32::MAX),
        ]
        .into_iter()
        .collect();
        assert_eq!(assignment, expected);
    }

    #[test]
    fn overflowing_total_is_an_error() {
        let network = network(&[
            ("s", "a", i32::MAX),
            ("s", "b", 1),
            ("a", "t", i32::MAX),
            ("b", "t", 1),
        ]);

        assert_eq!(
            network.compute_max_flow(&"s", &"t"),
            Err(Error::ArithmeticOverflow)
        );
    }
}
