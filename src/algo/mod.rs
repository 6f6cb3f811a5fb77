pub mod edmonds_karp;

use crate::error::Error;
use crate::network::{FlowAssignment, FlowNetwork};

/// The maximum flow algorithm.
pub trait MaxFlow<N, T> {
    /// Run the algorithm over `network` and return the max flow value along with the flow carried
    /// on every edge of positive original capacity. The network itself is left untouched.
    fn max_flow(
        &mut self,
        network: &FlowNetwork<N, T>,
        source: &N,
        sink: &N,
    ) -> Result<(T, FlowAssignment<N, T>), Error>;
}
