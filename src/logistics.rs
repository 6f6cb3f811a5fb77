//! The terminal -> warehouse -> store network and the multi-source, multi-sink reduction that
//! turns it into a single max flow query.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::capacity::Capacity;
use crate::error::Error;
use crate::id::Id;
use crate::int::Int;
use crate::network::{FlowAssignment, FlowNetwork};
use crate::node::Node;

/// Routes of the logistics network as `(from, to, capacity)`.
pub const LOGISTICS_EDGES: [(&str, &str, i64); 20] = [
    // terminals to warehouses
    ("Terminal 1", "Warehouse 1", 25),
    ("Terminal 1", "Warehouse 2", 20),
    ("Terminal 1", "Warehouse 3", 15),
    ("Terminal 2", "Warehouse 3", 15),
    ("Terminal 2", "Warehouse 4", 30),
    ("Terminal 2", "Warehouse 2", 10),
    // warehouses to stores
    ("Warehouse 1", "Store 1", 15),
    ("Warehouse 1", "Store 2", 10),
    ("Warehouse 1", "Store 3", 20),
    ("Warehouse 2", "Store 4", 15),
    ("Warehouse 2", "Store 5", 10),
    ("Warehouse 2", "Store 6", 25),
    ("Warehouse 3", "Store 7", 20),
    ("Warehouse 3", "Store 8", 15),
    ("Warehouse 3", "Store 9", 10),
    ("Warehouse 4", "Store 10", 20),
    ("Warehouse 4", "Store 11", 10),
    ("Warehouse 4", "Store 12", 15),
    ("Warehouse 4", "Store 13", 5),
    ("Warehouse 4", "Store 14", 10),
];

pub type LogisticsNetwork = FlowNetwork<Node<&'static str>, i64>;

pub fn logistics_network() -> Result<LogisticsNetwork, Error> {
    FlowNetwork::from_edges(
        LOGISTICS_EDGES
            .iter()
            .map(|&(from, to, capacity)| (Node::WithId(from), Node::WithId(to), capacity)),
    )
}

/// Link the super-source to every node of `sources` and every node of `sinks` to the super-sink,
/// all with unbounded capacity.
pub fn add_super_source_and_sink<I: Id, T: Int>(
    network: &mut FlowNetwork<Node<I>, T>,
    sources: &[Node<I>],
    sinks: &[Node<I>],
) -> Result<(Node<I>, Node<I>), Error> {
    for source in sources {
        network.add_edge(Node::Source, source.clone(), Capacity::Unbounded)?;
    }
    for sink in sinks {
        network.add_edge(sink.clone(), Node::Sink, Capacity::Unbounded)?;
    }
    Ok((Node::Source, Node::Sink))
}

/// Nodes of a layered network split by their role. Synthetic nodes and the edges touching them
/// are ignored; each tier keeps insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tiers<I> {
    /// Only positive outgoing capacity, e.g. terminals.
    pub sources: Vec<Node<I>>,
    /// Everything in between, e.g. warehouses.
    pub relays: Vec<Node<I>>,
    /// Only positive incoming capacity, e.g. stores.
    pub sinks: Vec<Node<I>>,
}

impl<I: Id> Tiers<I> {
    pub fn classify<T: Int>(network: &FlowNetwork<Node<I>, T>) -> Self {
        let (has_in, has_out) = network
            .edges()
            .filter(|(from, to, capacity)| {
                !from.is_synthetic() && !to.is_synthetic() && capacity.is_positive()
            })
            .fold(
                (BTreeSet::new(), BTreeSet::new()),
                |(mut has_in, mut has_out), (from, to, _)| {
                    has_out.insert(from);
                    has_in.insert(to);
                    (has_in, has_out)
                },
            );

        let mut tiers = Tiers {
            sources: Vec::new(),
            relays: Vec::new(),
            sinks: Vec::new(),
        };
        for node in network.nodes().filter(|n| !n.is_synthetic()) {
            match (has_in.contains(node), has_out.contains(node)) {
                (false, true) => tiers.sources.push(node.clone()),
                (true, false) => tiers.sinks.push(node.clone()),
                _ => tiers.relays.push(node.clone()),
            }
        }
        tiers
    }
}

/// Result of a multi-source, multi-sink max flow run.
#[derive(Clone, Debug)]
pub struct Solution<I, T> {
    pub tiers: Tiers<I>,
    pub max_flow: T,
    pub assignment: FlowAssignment<Node<I>, T>,
}

/// Classify `network`, join its sources and sinks through a super-source and super-sink, and
/// compute the max flow between those two.
pub fn solve<I: Id, T: Int>(
    network: &mut FlowNetwork<Node<I>, T>,
) -> Result<Solution<I, T>, Error> {
    let tiers = Tiers::classify(network);
    let (source, sink) = add_super_source_and_sink(network, &tiers.sources, &tiers.sinks)?;
    let (max_flow, assignment) = network.compute_max_flow(&source, &sink)?;

    log::info!("----------------------------------");
    log::info!("        Sources = {}", tiers.sources.len());
    log::info!("         Relays = {}", tiers.relays.len());
    log::info!("          Sinks = {}", tiers.sinks.len());
    log::info!("       Max flow = {max_flow}");

    Ok(Solution {
        tiers,
        max_flow,
        assignment,
    })
}
