//! Core abstractions for agent-rs workflows
//!
//! This crate defines the node contract and the shared run state that the
//! workflow scheduler threads through a run.

pub mod error;
pub mod message;
pub mod node;
pub mod observer;
pub mod state;
pub mod update;

pub use error::{Error, Result};
pub use message::{Message, NodeId, SEED_PRODUCER};
pub use node::Node;
pub use observer::{ConsoleSink, ObservationSink, RecordingSink};
pub use state::{Portfolio, RunData, RunMetadata, RunState, keys};
pub use update::{DataPatch, PartialUpdate};
