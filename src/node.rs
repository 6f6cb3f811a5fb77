use core::fmt;

use serde::{Serialize, Serializer};

use crate::id::Id;

/// A node of a flow network, extended with a synthetic super-source and super-sink that join
/// several real sources or sinks into one.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub enum Node<I> {
    Source,
    Sink,
    WithId(I),
}

impl<I> Node<I> {
    pub fn id(&self) -> Option<&I> {
        match self {
            Self::WithId(id) => Some(id),
            Self::Source | Self::Sink => None,
        }
    }

    /// `true` for the super-source and the super-sink.
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, Self::WithId(_))
    }
}

impl<I> From<I> for Node<I>
where
    I: Id,
{
    fn from(id: I) -> Self {
        Self::WithId(id)
    }
}

impl<I: Id> Id for Node<I> {}

impl<I: fmt::Display> fmt::Display for Node<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.pad("Super-Source"),
            Self::Sink => f.pad("Super-Sink"),
            Self::WithId(id) => id.fmt(f),
        }
    }
}

impl<I: fmt::Display> Serialize for Node<I> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[test]
    fn synthetic_nodes_order_before_real_ones() {
        assert!(Node::Source < Node::WithId("Terminal 1"));
        assert!(Node::Sink < Node::WithId("Terminal 1"));
        assert!(Node::<&str>::Source.is_synthetic());
        assert!(!Node::WithId(7).is_synthetic());
        assert_eq!(Node::WithId(7).id(), Some(&7));
    }

    #[test]
    fn display_pads_like_the_wrapped_id() {
        assert_eq!(format!("{:<8}|", Node::WithId("ab")), "ab      |");
        assert_eq!(format!("{:<14}|", Node::<&str>::Source), "Super-Source  |");
        assert_eq!(format!("{}", Node::<&str>::Sink), "Super-Sink");
    }
}
