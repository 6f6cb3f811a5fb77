//! Maximum flow over directed capacitated networks using the Edmonds-Karp algorithm, together
//! with the logistics model (terminals feeding warehouses feeding stores) it is applied to.
//!
//! ```
//! use flownet::{Capacity, FlowNetwork};
//!
//! let mut network = FlowNetwork::<&str, i64>::new();
//! network.add_edge("A", "B", 10).unwrap();
//! network.add_edge("B", "C", Capacity::Finite(4)).unwrap();
//!
//! let (flow, assignment) = network.compute_max_flow(&"A", &"C").unwrap();
//! assert_eq!(flow, 4);
//! assert_eq!(assignment[&("A", "B")], 4);
//! ```
#![no_std]
#![deny(
    warnings,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod algo;
pub mod logistics;
pub mod report;

mod capacity;
mod error;
mod id;
mod int;
mod network;
mod node;

pub use crate::algo::edmonds_karp::EdmondsKarp;
pub use crate::algo::MaxFlow;
pub use crate::capacity::Capacity;
pub use crate::error::Error;
pub use crate::id::Id;
pub use crate::int::Int;
pub use crate::network::{FlowAssignment, FlowNetwork};
pub use crate::node::Node;
