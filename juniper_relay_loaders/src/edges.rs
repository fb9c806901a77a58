/// A node plus the cursor that points at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<T> {
    pub node: T,
    pub cursor: String,
}

impl<T> Edge<T> {
    pub fn new(node: T, cursor: String) -> Self {
        Edge { node, cursor }
    }
}

/// Common trait for the Relay edge objects generated by `#[derive(RelayConnection)]`.
pub trait RelayEdge {
    /// The node type this edge wraps.
    type NodeType;

    fn new(node: Self::NodeType, cursor: String) -> Self;
}
