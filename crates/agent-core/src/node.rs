//! Core Node trait definition

use crate::{NodeId, PartialUpdate, Result, RunState};
use async_trait::async_trait;

/// One analysis step in a workflow graph
///
/// A node reads the run state, optionally consults an external collaborator,
/// and returns the message and data fields it contributes. It never mutates
/// the state itself; the scheduler merges the returned update.
#[async_trait]
pub trait Node: Send + Sync {
    /// Unique id of the node within its graph
    fn id(&self) -> &NodeId;

    /// Human-readable name used when surfacing the node's reasoning
    fn label(&self) -> &str {
        self.id().as_str()
    }

    /// Run the node against a snapshot of the run state
    async fn invoke(&self, state: &RunState) -> Result<PartialUpdate>;
}
