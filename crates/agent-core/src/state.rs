//! Shared run state
//!
//! `RunState` is the single context threaded through one workflow run. It
//! holds the append-only message log, a key-value store of run data, and run
//! metadata. Nodes only ever read it; every mutation goes through
//! [`RunState::apply`], which the scheduler calls one update at a time.

use crate::{Error, Message, NodeId, PartialUpdate, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known run data keys
pub mod keys {
    /// Ticker symbol under analysis
    pub const TICKER: &str = "ticker";
    /// First day of the analysis window (YYYY-MM-DD)
    pub const START_DATE: &str = "start_date";
    /// Last day of the analysis window (YYYY-MM-DD)
    pub const END_DATE: &str = "end_date";
    /// Current portfolio snapshot
    pub const PORTFOLIO: &str = "portfolio";
    /// Daily price bars
    pub const PRICES: &str = "prices";
    /// Financial metrics (TTM)
    pub const FINANCIAL_METRICS: &str = "financial_metrics";
    /// Insider trade records
    pub const INSIDER_TRADES: &str = "insider_trades";
    /// Market capitalisation
    pub const MARKET_CAP: &str = "market_cap";
    /// News records
    pub const NEWS_ITEMS: &str = "news_items";
}

/// Cash and position held before the decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Available cash
    pub cash: Decimal,
    /// Shares currently held
    pub stock: i64,
}

impl Portfolio {
    /// Create a portfolio snapshot
    pub fn new(cash: Decimal, stock: i64) -> Self {
        Self { cash, stock }
    }
}

/// Run metadata, fixed at seed time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Identifier of this run, used in log spans
    pub run_id: String,
    /// Surface every node's message to the observation sink
    pub show_reasoning: bool,
}

impl RunMetadata {
    /// Create metadata with a fresh run id
    pub fn new(show_reasoning: bool) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            show_reasoning,
        }
    }
}

impl Default for RunMetadata {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Named data fields of a run
///
/// Fields can be added or overwritten but never removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunData {
    fields: HashMap<String, serde_json::Value>,
}

impl RunData {
    /// Create an empty data store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed data for a ticker run
    ///
    /// Dates are optional; the market data node resolves missing ones.
    pub fn for_ticker(
        ticker: impl Into<String>,
        start_date: Option<String>,
        end_date: Option<String>,
        portfolio: Portfolio,
    ) -> Result<Self> {
        let mut data = Self::new();
        data.insert(keys::TICKER, serde_json::json!(ticker.into()));
        if let Some(start) = start_date {
            data.insert(keys::START_DATE, serde_json::json!(start));
        }
        if let Some(end) = end_date {
            data.insert(keys::END_DATE, serde_json::json!(end));
        }
        data.insert_typed(keys::PORTFOLIO, &portfolio)?;
        Ok(data)
    }

    // =========== Common Accessors ===========

    /// Ticker under analysis
    pub fn ticker(&self) -> Option<&str> {
        self.get(keys::TICKER).and_then(|v| v.as_str())
    }

    /// Start of the analysis window
    pub fn start_date(&self) -> Option<&str> {
        self.get(keys::START_DATE).and_then(|v| v.as_str())
    }

    /// End of the analysis window
    pub fn end_date(&self) -> Option<&str> {
        self.get(keys::END_DATE).and_then(|v| v.as_str())
    }

    /// Portfolio snapshot
    pub fn portfolio(&self) -> Result<Option<Portfolio>> {
        self.get_typed(keys::PORTFOLIO)
    }

    /// Ticker, or `MissingField`
    pub fn require_ticker(&self) -> Result<&str> {
        self.ticker()
            .ok_or_else(|| Error::MissingField(keys::TICKER.to_string()))
    }

    /// Portfolio, or `MissingField`
    pub fn require_portfolio(&self) -> Result<Portfolio> {
        self.portfolio()?
            .ok_or_else(|| Error::MissingField(keys::PORTFOLIO.to_string()))
    }

    // =========== Generic Key-Value Operations ===========

    /// Insert or overwrite a field
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.fields.insert(key.into(), value);
    }

    /// Insert a typed value, serialized to JSON
    pub fn insert_typed<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;
        self.fields.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a field
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }

    /// Get a field deserialized into `T`
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        match self.fields.get(key) {
            None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
        }
    }

    /// Check if a field exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no field is set
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The shared state of one workflow run
#[derive(Debug, Clone)]
pub struct RunState {
    messages: Vec<Message>,
    /// producer id -> index into `messages`
    producers: HashMap<NodeId, usize>,
    data: RunData,
    metadata: RunMetadata,
}

impl RunState {
    /// Create a run state seeded with one message
    pub fn new(seed: Message, data: RunData, metadata: RunMetadata) -> Self {
        let mut producers = HashMap::new();
        producers.insert(seed.producer().clone(), 0);
        Self {
            messages: vec![seed],
            producers,
            data,
            metadata,
        }
    }

    /// All messages in merge order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The message produced by `producer`, if it has completed
    pub fn message_from(&self, producer: &str) -> Option<&Message> {
        self.producers.get(producer).map(|&idx| &self.messages[idx])
    }

    /// The message produced by `producer`, or `MissingMessage`
    pub fn require_message(&self, producer: &str) -> Result<&Message> {
        self.message_from(producer)
            .ok_or_else(|| Error::MissingMessage(producer.to_string()))
    }

    /// Whether `producer` has a message in the log
    pub fn has_completed(&self, producer: &str) -> bool {
        self.producers.contains_key(producer)
    }

    /// The last appended message
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Run data
    pub fn data(&self) -> &RunData {
        &self.data
    }

    /// Run metadata
    pub fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }

    /// Merge a node's update
    ///
    /// The update must carry exactly one message, attributed to `node`, and
    /// `node` must not have completed before. Patch values overwrite existing
    /// fields, but a `null` cannot replace a field that already holds a
    /// value. Validation happens before anything is written, so a rejected
    /// update leaves the state untouched.
    pub fn apply(&mut self, node: &NodeId, update: PartialUpdate) -> Result<()> {
        if update.new_messages.len() != 1 {
            return Err(Error::MessageCount {
                node: node.clone(),
                count: update.new_messages.len(),
            });
        }
        if let Some(foreign) = update.new_messages.iter().find(|m| m.producer() != node) {
            return Err(Error::ForeignMessage {
                node: node.clone(),
                producer: foreign.producer().clone(),
            });
        }
        if self.has_completed(node.as_str()) {
            return Err(Error::DuplicateMessage(node.clone()));
        }
        for (key, value) in &update.data_patch {
            let occupied = self.data.get(key).is_some_and(|v| !v.is_null());
            if value.is_null() && occupied {
                return Err(Error::FieldErasure(key.clone()));
            }
        }

        for message in update.new_messages {
            self.producers
                .insert(message.producer().clone(), self.messages.len());
            self.messages.push(message);
        }
        for (key, value) in update.data_patch {
            self.data.insert(key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn seeded() -> RunState {
        let data = RunData::for_ticker(
            "AAPL",
            Some("2024-01-01".to_string()),
            None,
            Portfolio::new(dec!(10000000.00), 100),
        )
        .unwrap();
        RunState::new(Message::seed("decide"), data, RunMetadata::new(false))
    }

    #[test]
    fn test_seed_state() {
        let state = seeded();
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.data().ticker(), Some("AAPL"));
        assert_eq!(state.data().start_date(), Some("2024-01-01"));
        assert_eq!(state.data().end_date(), None);
        let portfolio = state.data().require_portfolio().unwrap();
        assert_eq!(portfolio.cash, dec!(10000000));
        assert_eq!(portfolio.stock, 100);
    }

    #[test]
    fn test_apply_appends_and_indexes() {
        let mut state = seeded();
        let id = NodeId::new("technical");
        state
            .apply(&id, PartialUpdate::message(&id, "bullish").with_field("x", json!(1)))
            .unwrap();

        assert_eq!(state.messages().len(), 2);
        assert_eq!(state.message_from("technical").unwrap().content(), "bullish");
        assert_eq!(state.last_message().unwrap().producer(), &id);
        assert_eq!(state.data().get("x"), Some(&json!(1)));
    }

    #[test]
    fn test_last_writer_wins() {
        let mut state = seeded();
        let a = NodeId::new("a");
        let b = NodeId::new("b");
        state
            .apply(&a, PartialUpdate::message(&a, "").with_field("k", json!("a")))
            .unwrap();
        state
            .apply(&b, PartialUpdate::message(&b, "").with_field("k", json!("b")))
            .unwrap();
        assert_eq!(state.data().get("k"), Some(&json!("b")));
    }

    #[test]
    fn test_erasing_field_is_rejected() {
        let mut state = seeded();
        let id = NodeId::new("rogue");
        let err = state
            .apply(
                &id,
                PartialUpdate::message(&id, "").with_field(keys::PORTFOLIO, json!(null)),
            )
            .unwrap_err();

        assert!(matches!(err, Error::FieldErasure(ref k) if k == keys::PORTFOLIO));
        // nothing was written
        assert!(!state.has_completed("rogue"));
        assert!(state.data().require_portfolio().is_ok());
    }

    #[test]
    fn test_exactly_one_message_per_node() {
        let mut state = seeded();
        let id = NodeId::new("n");

        let err = state.apply(&id, PartialUpdate::new()).unwrap_err();
        assert!(matches!(err, Error::MessageCount { count: 0, .. }));

        let twice = PartialUpdate::message(&id, "1").with_message(Message::new("n", "2"));
        let err = state.apply(&id, twice).unwrap_err();
        assert!(matches!(err, Error::MessageCount { count: 2, .. }));

        state.apply(&id, PartialUpdate::message(&id, "ok")).unwrap();
        let err = state.apply(&id, PartialUpdate::message(&id, "again")).unwrap_err();
        assert!(matches!(err, Error::DuplicateMessage(_)));
    }

    #[test]
    fn test_foreign_message_rejected() {
        let mut state = seeded();
        let id = NodeId::new("technical");
        let update = PartialUpdate::new().with_message(Message::new("sentiment", "x"));
        let err = state.apply(&id, update).unwrap_err();
        assert!(matches!(err, Error::ForeignMessage { .. }));
    }

    #[test]
    fn test_require_message_missing() {
        let state = seeded();
        let err = state.require_message("valuation").unwrap_err();
        assert_eq!(err.to_string(), "No message from 'valuation' in the run state");
    }
}
