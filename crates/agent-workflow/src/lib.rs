//! DAG workflow orchestration for agent-rs
//!
//! Build a [`Graph`] of [`agent_core::Node`]s once, then hand it to a
//! [`Scheduler`] for each run. Nodes whose dependencies are satisfied run
//! concurrently; their updates merge in declaration order.

pub mod error;
pub mod graph;
pub mod scheduler;

#[cfg(test)]
mod testing;

pub use error::GraphError;
pub use graph::{Graph, GraphBuilder};
pub use scheduler::{Scheduler, SchedulerBuilder, SchedulerConfig};
