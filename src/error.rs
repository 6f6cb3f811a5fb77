use alloc::string::String;

use displaydoc::Display;

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum Error {
    /// Invalid edge capacity, expected non-negative value
    NegativeCapacity,
    /// Invalid capacity `{0}`, expected an integer or `inf`
    InvalidCapacity(String),
    /// Unbounded flow, found an augmenting path without a finite bottleneck
    UnboundedFlow,
    /// Arithmetic overflow while accumulating flow
    ArithmeticOverflow,
}
