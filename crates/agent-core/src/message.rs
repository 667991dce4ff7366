//! Node identifiers and the messages nodes append to the run state

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Producer id used for the message that seeds every run
pub const SEED_PRODUCER: &str = "user";

/// Unique identifier of a node in a workflow graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A message produced by a node
///
/// Messages are immutable once created; the run state only ever appends them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    producer: NodeId,
    content: String,
}

impl Message {
    /// Create a message attributed to `producer`
    pub fn new(producer: impl Into<NodeId>, content: impl Into<String>) -> Self {
        Self {
            producer: producer.into(),
            content: content.into(),
        }
    }

    /// Create the seed message that opens a run
    pub fn seed(content: impl Into<String>) -> Self {
        Self::new(SEED_PRODUCER, content)
    }

    /// Id of the node that produced this message
    pub fn producer(&self) -> &NodeId {
        &self.producer
    }

    /// Message body
    pub fn content(&self) -> &str {
        &self.content
    }
}
