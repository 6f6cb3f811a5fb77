//! Read-only statistics over a max flow result: per-edge flows, per-source totals, proportional
//! source-to-sink attribution, low-capacity and saturated routes, and under-supplied sinks.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use itertools::Itertools;
use serde::Serialize;

use crate::capacity::Capacity;
use crate::error::Error;
use crate::id::Id;
use crate::int::Int;
use crate::logistics::{Solution, Tiers};
use crate::network::{FlowAssignment, FlowNetwork};
use crate::node::Node;

/// Flow carried by an edge next to its capacity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EdgeFlow<N, T> {
    pub from: N,
    pub to: N,
    pub flow: T,
    pub capacity: Capacity<T>,
}

/// A finite-capacity route and how much of it is used.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Route<N, T> {
    pub from: N,
    pub to: N,
    pub capacity: T,
    pub flow: T,
    /// Percentage of `capacity` carried by `flow`.
    pub utilization: f64,
}

impl<N, T: Int> Route<N, T> {
    fn new(from: N, to: N, capacity: T, flow: T) -> Self {
        let utilization = match (flow.to_f64(), capacity.to_f64()) {
            (Some(f), Some(c)) if c > 0.0 => f / c * 100.0,
            _ => 0.0,
        };
        Self {
            from,
            to,
            capacity,
            flow,
            utilization,
        }
    }

    pub fn is_saturated(&self) -> bool {
        self.flow == self.capacity
    }
}

/// How much a sink receives, and the incoming edges that could carry more.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkSupply<N, T> {
    pub sink: N,
    pub supplied: T,
    /// `(from, spare capacity)` for every incoming edge that is not saturated.
    pub headroom: Vec<(N, Capacity<T>)>,
}

fn flow_of<N: Id, T: Int>(assignment: &FlowAssignment<N, T>, from: &N, to: &N) -> T {
    assignment
        .get(&(from.clone(), to.clone()))
        .copied()
        .unwrap_or_else(T::zero)
}

/// Flow against capacity on every positive-capacity edge from a node of `from` to a node of `to`.
pub fn edge_flows<N: Id, T: Int>(
    network: &FlowNetwork<N, T>,
    assignment: &FlowAssignment<N, T>,
    from: &[N],
    to: &[N],
) -> Vec<EdgeFlow<N, T>> {
    from.iter()
        .cartesian_product(to.iter())
        .filter_map(|(u, v)| {
            let capacity = network.capacity(u, v).filter(Capacity::is_positive)?;
            Some(EdgeFlow {
                from: u.clone(),
                to: v.clone(),
                flow: flow_of(assignment, u, v),
                capacity,
            })
        })
        .collect()
}

/// Total flow leaving each node of `from` towards non-synthetic nodes, in the order of `from`.
pub fn node_totals<I: Id, T: Int>(
    assignment: &FlowAssignment<Node<I>, T>,
    from: &[Node<I>],
) -> Vec<(Node<I>, T)> {
    let totals = assignment
        .iter()
        .filter(|((_, to), _)| !to.is_synthetic())
        .fold(BTreeMap::new(), |mut acc, ((u, _), flow)| {
            *acc.entry(u).or_insert_with(T::zero) += *flow;
            acc
        });

    from.iter()
        .map(|n| (n.clone(), totals.get(n).copied().unwrap_or_else(T::zero)))
        .collect()
}

/// Attribute each relay -> sink flow to the sources feeding that relay, in proportion to what
/// each source sends the relay (rounded down). Relays fed by no source are skipped.
pub fn source_to_sink_flows<I: Id, T: Int>(
    assignment: &FlowAssignment<Node<I>, T>,
    tiers: &Tiers<I>,
) -> Result<BTreeMap<(Node<I>, Node<I>), T>, Error> {
    let mut attributed = BTreeMap::new();

    for (sink, relay) in tiers.sinks.iter().cartesian_product(tiers.relays.iter()) {
        let relayed = flow_of(assignment, relay, sink);
        if relayed <= T::zero() {
            continue;
        }

        let feeds: Vec<_> = tiers
            .sources
            .iter()
            .map(|source| (source, flow_of(assignment, source, relay)))
            .filter(|(_, flow)| *flow > T::zero())
            .collect();
        let fed: T = feeds.iter().map(|(_, flow)| *flow).sum();
        if fed == T::zero() {
            continue;
        }

        for (source, flow) in feeds {
            let share = relayed
                .checked_mul(&flow)
                .ok_or(Error::ArithmeticOverflow)?
                / fed;
            if share > T::zero() {
                *attributed
                    .entry((source.clone(), sink.clone()))
                    .or_insert_with(T::zero) += share;
            }
        }
    }

    Ok(attributed)
}

// Finite, positive-capacity routes between real nodes, by ascending capacity.
fn routes<I: Id, T: Int>(
    network: &FlowNetwork<Node<I>, T>,
    assignment: &FlowAssignment<Node<I>, T>,
) -> Vec<Route<Node<I>, T>> {
    network
        .edges()
        .filter(|(u, v, _)| !u.is_synthetic() && !v.is_synthetic())
        .filter_map(|(u, v, capacity)| {
            let capacity = capacity.finite().filter(|c| *c > T::zero())?;
            Some(Route::new(
                u.clone(),
                v.clone(),
                capacity,
                flow_of(assignment, u, v),
            ))
        })
        .sorted_by_key(|r| r.capacity)
        .collect()
}

pub fn lowest_capacity_routes<I: Id, T: Int>(
    network: &FlowNetwork<Node<I>, T>,
    assignment: &FlowAssignment<Node<I>, T>,
    limit: usize,
) -> Vec<Route<Node<I>, T>> {
    routes(network, assignment).into_iter().take(limit).collect()
}

/// Routes running at full capacity, i.e. the bottlenecks of the network.
pub fn saturated_routes<I: Id, T: Int>(
    network: &FlowNetwork<Node<I>, T>,
    assignment: &FlowAssignment<Node<I>, T>,
) -> Vec<Route<Node<I>, T>> {
    routes(network, assignment)
        .into_iter()
        .filter(Route::is_saturated)
        .collect()
}

/// The `limit` sinks receiving the least flow, fewest first.
pub fn least_supplied_sinks<I: Id, T: Int>(
    network: &FlowNetwork<Node<I>, T>,
    assignment: &FlowAssignment<Node<I>, T>,
    tiers: &Tiers<I>,
    limit: usize,
) -> Vec<SinkSupply<Node<I>, T>> {
    tiers
        .sinks
        .iter()
        .map(|sink| {
            let incoming: Vec<_> = network
                .edges()
                .filter(|(u, v, capacity)| {
                    *v == sink && !u.is_synthetic() && capacity.is_positive()
                })
                .map(|(u, _, capacity)| (u, capacity, flow_of(assignment, u, sink)))
                .collect();

            SinkSupply {
                sink: sink.clone(),
                supplied: incoming.iter().map(|(_, _, flow)| *flow).sum(),
                headroom: incoming
                    .into_iter()
                    .map(|(u, capacity, flow)| (u.clone(), capacity.residual(flow)))
                    .filter(|(_, spare)| spare.is_positive())
                    .collect(),
            }
        })
        .sorted_by_key(|s| s.supplied)
        .take(limit)
        .collect()
}

/// Everything reported about a solved logistics network.
#[derive(Clone, Debug)]
pub struct Analysis<I, T> {
    pub max_flow: T,
    /// Outgoing flow per source, largest first.
    pub source_totals: Vec<(Node<I>, T)>,
    pub source_to_sink: BTreeMap<(Node<I>, Node<I>), T>,
    pub lowest_capacity_routes: Vec<Route<Node<I>, T>>,
    pub saturated_routes: Vec<Route<Node<I>, T>>,
    pub least_supplied_sinks: Vec<SinkSupply<Node<I>, T>>,
}

impl<I: Id, T: Int> Analysis<I, T> {
    pub fn new(
        network: &FlowNetwork<Node<I>, T>,
        solution: &Solution<I, T>,
        limit: usize,
    ) -> Result<Self, Error> {
        let Solution {
            tiers,
            max_flow,
            assignment,
        } = solution;

        let source_totals = node_totals(assignment, &tiers.sources)
            .into_iter()
            .sorted_by(|(_, a), (_, b)| b.cmp(a))
            .collect();

        Ok(Self {
            max_flow: *max_flow,
            source_totals,
            source_to_sink: source_to_sink_flows(assignment, tiers)?,
            lowest_capacity_routes: lowest_capacity_routes(network, assignment, limit),
            saturated_routes: saturated_routes(network, assignment),
            least_supplied_sinks: least_supplied_sinks(network, assignment, tiers, limit),
        })
    }

    /// The source sending the most flow.
    pub fn top_source(&self) -> Option<&(Node<I>, T)> {
        self.source_totals.first()
    }

    pub fn has_bottlenecks(&self) -> bool {
        !self.saturated_routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::logistics::{logistics_network, solve};

    fn solved() -> (
        FlowNetwork<Node<&'static str>, i64>,
        Solution<&'static str, i64>,
    ) {
        let mut network = logistics_network().unwrap();
        let solution = solve(&mut network).unwrap();
        (network, solution)
    }

    #[test]
    fn utilization_is_a_percentage() {
        let route = Route::new("a", "b", 20i64, 5);
        assert_eq!(route.utilization, 25.0);
        assert!(!route.is_saturated());
        assert!(Route::new("a", "b", 5i64, 5).is_saturated());
    }

    #[test]
    fn terminal_routes_are_all_saturated() {
        let (network, solution) = solved();
        let from_terminals = edge_flows(
            &network,
            &solution.assignment,
            &solution.tiers.sources,
            &solution.tiers.relays,
        );

        assert_eq!(from_terminals.len(), 6);
        assert!(from_terminals
            .iter()
            .all(|e| Capacity::Finite(e.flow) == e.capacity));
    }

    #[test]
    fn proportional_attribution_for_a_shared_relay() {
        let w = Node::WithId("W");
        let tiers = Tiers {
            sources: vec![Node::WithId("T1"), Node::WithId("T2")],
            relays: vec![w],
            sinks: vec![Node::WithId("S")],
        };
        let assignment: FlowAssignment<_, i64> = [
            ((Node::WithId("T1"), w), 20),
            ((Node::WithId("T2"), w), 10),
            ((w, Node::WithId("S")), 10),
        ]
        .into_iter()
        .collect();

        let attributed = source_to_sink_flows(&assignment, &tiers).unwrap();
        assert_eq!(attributed[&(Node::WithId("T1"), Node::WithId("S"))], 6);
        assert_eq!(attributed[&(Node::WithId("T2"), Node::WithId("S"))], 3);
    }

    #[test]
    fn least_supplied_sinks_are_sorted_with_real_headroom() {
        let (network, solution) = solved();
        let sinks = least_supplied_sinks(&network, &solution.assignment, &solution.tiers, 14);

        assert_eq!(sinks.len(), 14);
        assert!(sinks.windows(2).all(|w| w[0].supplied <= w[1].supplied));
        assert_eq!(sinks.iter().map(|s| s.supplied).sum::<i64>(), 115);
        assert!(sinks
            .iter()
            .flat_map(|s| &s.headroom)
            .all(|(from, spare)| !from.is_synthetic() && spare.is_positive()));
    }
}
