//! Graph construction errors

use agent_core::NodeId;
use thiserror::Error;

/// Errors raised while building a workflow graph
///
/// These are construction-time failures; a built `Graph` never produces them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Two nodes share an id
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// A node uses an id reserved for the seed message
    #[error("Node id '{0}' is reserved for the seed message")]
    ReservedNode(NodeId),

    /// An edge, source or sink names a node that was never added
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// Source or sink was not declared
    #[error("Graph has no {0} node")]
    MissingEndpoint(&'static str),

    /// The dependency edges form a cycle
    #[error("Graph contains a cycle through: {}", join(.0))]
    Cyclic(Vec<NodeId>),

    /// A node is unreachable from the source or cannot reach the sink
    #[error("Node '{node}' {detail}")]
    Disconnected {
        /// Offending node
        node: NodeId,
        /// Which direction is broken
        detail: &'static str,
    },
}

fn join(ids: &[NodeId]) -> String {
    ids.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<GraphError> for agent_core::Error {
    fn from(err: GraphError) -> Self {
        agent_core::Error::InitializationFailed(err.to_string())
    }
}
