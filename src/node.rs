use std::fmt::{self, Display};

/// Identity of one recorded node.
///
/// Assigned once, in creation order, by the arena that owns the node
/// ([`ForwardGraph`](crate::graph::ForwardGraph) or [`Tape`](crate::tape::Tape)).
/// Two nodes with equal values are still distinct nodes; every structural
/// question (deduplication, "is this output the seed itself") is answered
/// with `NodeId` equality, never with value equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in its arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(u32::try_from(index).expect("node arena overflow: more than u32::MAX nodes"))
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
