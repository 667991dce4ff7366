//! Scripted nodes shared by the graph and scheduler tests

use crate::{Graph, GraphError};
use agent_core::{
    Error, Message, Node, NodeId, PartialUpdate, Portfolio, Result, RunData, RunMetadata,
    RunState,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A node that sleeps, records what it saw, and answers "<id> done"
pub(crate) struct Step {
    id: NodeId,
    delay: Duration,
    fail: bool,
    patch: Option<(String, serde_json::Value)>,
    invoked: Arc<AtomicBool>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl Step {
    pub(crate) fn new(id: &str) -> Arc<dyn Node> {
        Self::build(id).into_node()
    }

    pub(crate) fn build(id: &str) -> Self {
        Self {
            id: NodeId::new(id),
            delay: Duration::ZERO,
            fail: false,
            patch: None,
            invoked: Arc::new(AtomicBool::new(false)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn delay_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }

    pub(crate) fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub(crate) fn writes(mut self, key: &str, value: serde_json::Value) -> Self {
        self.patch = Some((key.to_string(), value));
        self
    }

    pub(crate) fn invoked(&self) -> Arc<AtomicBool> {
        self.invoked.clone()
    }

    /// Producers visible to the node when it was invoked
    pub(crate) fn seen(&self) -> Arc<Mutex<Vec<String>>> {
        self.seen.clone()
    }

    pub(crate) fn into_node(self) -> Arc<dyn Node> {
        Arc::new(self)
    }
}

#[async_trait]
impl Node for Step {
    fn id(&self) -> &NodeId {
        &self.id
    }

    async fn invoke(&self, state: &RunState) -> Result<PartialUpdate> {
        self.invoked.store(true, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.extend(state.messages().iter().map(|m| m.producer().to_string()));
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(Error::ProcessingFailed(format!("{} exploded", self.id)));
        }

        let mut update = PartialUpdate::message(&self.id, format!("{} done", self.id));
        if let Some((key, value)) = &self.patch {
            update = update.with_field(key.clone(), value.clone());
        }
        Ok(update)
    }
}

/// market_data -> four analysts -> risk_management -> portfolio_management
pub(crate) fn fan_out_graph(
    mut make: impl FnMut(&str) -> Arc<dyn Node>,
) -> std::result::Result<Graph, GraphError> {
    let analysts = ["technical", "fundamentals", "sentiment", "valuation"];
    let mut builder = Graph::builder().add_node(make("market_data"));
    for analyst in analysts {
        builder = builder.add_node(make(analyst));
    }
    builder = builder
        .add_node(make("risk_management"))
        .add_node(make("portfolio_management"));
    for analyst in analysts {
        builder = builder
            .add_edge("market_data", analyst)
            .add_edge(analyst, "risk_management");
    }
    builder
        .add_edge("risk_management", "portfolio_management")
        .source("market_data")
        .sink("portfolio_management")
        .build()
}

pub(crate) fn seeded_state(show_reasoning: bool) -> RunState {
    let data = RunData::for_ticker("AAPL", None, None, Portfolio::new(Decimal::new(1000, 0), 10))
        .unwrap();
    RunState::new(
        Message::seed("Make a trading decision based on the provided data."),
        data,
        RunMetadata::new(show_reasoning),
    )
}
