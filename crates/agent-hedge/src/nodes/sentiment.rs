//! Deterministic sentiment node

use crate::api::{InsiderTrade, MarketDataSource};
use crate::signal::{combine, insider_verdict, news_verdict};
use agent_core::{Node, NodeId, PartialUpdate, Result, RunState, keys};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Aggregates insider trades and news labels into a sentiment signal
///
/// Never calls the LLM. A failed news fetch degrades the news half of the
/// verdict instead of failing the node.
pub struct SentimentNode {
    id: NodeId,
    source: Arc<dyn MarketDataSource>,
    news_limit: usize,
}

impl SentimentNode {
    /// Create the node with its data source
    pub fn new(id: impl Into<NodeId>, source: Arc<dyn MarketDataSource>, news_limit: usize) -> Self {
        Self {
            id: id.into(),
            source,
            news_limit,
        }
    }
}

#[async_trait]
impl Node for SentimentNode {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn label(&self) -> &str {
        "Sentiment Analysis Agent"
    }

    async fn invoke(&self, state: &RunState) -> Result<PartialUpdate> {
        let ticker = state.data().require_ticker()?;
        let trades: Vec<InsiderTrade> = state
            .data()
            .get_typed(keys::INSIDER_TRADES)?
            .unwrap_or_default();

        let fetched = self.source.news(ticker, self.news_limit).await;
        if let Err(e) = &fetched {
            warn!(ticker, error = %e, "News fetch failed; news verdict degraded to neutral");
        }

        let report = combine(insider_verdict(&trades), news_verdict(&fetched));
        info!(
            ticker,
            signal = %report.signal,
            confidence = report.percent(),
            "Sentiment aggregated"
        );

        let mut update = PartialUpdate::message(&self.id, report.to_content()?);
        if let Ok(news) = &fetched {
            update = update.with_typed_field(keys::NEWS_ITEMS, news)?;
        }
        Ok(update)
    }
}
