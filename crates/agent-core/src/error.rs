//! Error types for agent-core

use crate::NodeId;
use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for node execution and run-state merging
#[derive(Error, Debug)]
pub enum Error {
    /// Node initialization failed
    #[error("Node initialization failed: {0}")]
    InitializationFailed(String),

    /// Node processing failed (collaborator error, bad input, ...)
    #[error("Node processing failed: {0}")]
    ProcessingFailed(String),

    /// A node failed during a run; wraps the node's own error
    #[error("Node '{node}' failed: {source}")]
    NodeFailed {
        /// Failing node
        node: NodeId,
        /// Underlying error
        #[source]
        source: Box<Error>,
    },

    /// A node exceeded its time budget
    #[error("Node '{node}' timed out after {timeout_ms}ms")]
    Timeout {
        /// Node that timed out
        node: NodeId,
        /// Configured timeout
        timeout_ms: u128,
    },

    /// A node returned an update with the wrong number of messages
    #[error("Node '{node}' must produce exactly one message, got {count}")]
    MessageCount {
        /// Offending node
        node: NodeId,
        /// Number of messages in its update
        count: usize,
    },

    /// A node returned a message attributed to another producer
    #[error("Node '{node}' returned a message attributed to '{producer}'")]
    ForeignMessage {
        /// Node that returned the update
        node: NodeId,
        /// Producer named in the message
        producer: NodeId,
    },

    /// A producer already has a message in the run state
    #[error("Node '{0}' already has a message in the run state")]
    DuplicateMessage(NodeId),

    /// A patch tried to erase a field written by an upstream node
    #[error("Data field '{0}' cannot be erased once written")]
    FieldErasure(String),

    /// A node needed a predecessor's message that is not present
    #[error("No message from '{0}' in the run state")]
    MissingMessage(String),

    /// A node needed a data field that is not present
    #[error("Data field '{0}' is missing from the run state")]
    MissingField(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Attach the failing node's id to an error that does not carry one
    pub fn in_node(self, node: NodeId) -> Self {
        if self.node().is_some() {
            return self;
        }
        Error::NodeFailed {
            node,
            source: Box::new(self),
        }
    }

    /// Id of the node this error is attributed to, if any
    pub fn node(&self) -> Option<&NodeId> {
        match self {
            Error::NodeFailed { node, .. }
            | Error::Timeout { node, .. }
            | Error::MessageCount { node, .. }
            | Error::ForeignMessage { node, .. }
            | Error::DuplicateMessage(node) => Some(node),
            _ => None,
        }
    }
}
