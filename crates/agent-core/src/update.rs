//! Partial updates returned by nodes

use crate::{Message, NodeId, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Data fields a node adds or overwrites in the run state
pub type DataPatch = HashMap<String, serde_json::Value>;

/// What a node contributes when it completes
///
/// A node never touches the run state directly; the scheduler merges this
/// update for it.
#[derive(Debug, Clone, Default)]
pub struct PartialUpdate {
    /// Messages to append, in order
    pub new_messages: Vec<Message>,
    /// Fields to merge into the run data (last writer wins)
    pub data_patch: DataPatch,
}

impl PartialUpdate {
    /// Create an empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an update carrying one message from `producer`
    pub fn message(producer: &NodeId, content: impl Into<String>) -> Self {
        Self::new().with_message(Message::new(producer.clone(), content))
    }

    /// Append a message
    pub fn with_message(mut self, message: Message) -> Self {
        self.new_messages.push(message);
        self
    }

    /// Set a data field
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data_patch.insert(key.into(), value);
        self
    }

    /// Set a data field from any serializable value
    pub fn with_typed_field<T: Serialize>(self, key: impl Into<String>, value: &T) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        Ok(self.with_field(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_update() {
        let id = NodeId::new("technical");
        let update = PartialUpdate::message(&id, "bullish")
            .with_field("note", serde_json::json!("x"));

        assert_eq!(update.new_messages.len(), 1);
        assert_eq!(update.new_messages[0].producer(), &id);
        assert_eq!(update.data_patch.get("note"), Some(&serde_json::json!("x")));
    }

    #[test]
    fn test_typed_field() {
        let update = PartialUpdate::new()
            .with_typed_field("counts", &vec![1, 2, 3])
            .unwrap();
        assert_eq!(update.data_patch["counts"], serde_json::json!([1, 2, 3]));
    }
}
