//! Market data producer node

use crate::api::MarketDataSource;
use crate::config::HedgeConfig;
use crate::dates::{format_date, resolve_window, today};
use agent_core::{Node, NodeId, PartialUpdate, Result, RunState, keys};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// What the market data node fetched, as its message
#[derive(Debug, Serialize)]
struct FetchSummary<'a> {
    ticker: &'a str,
    start_date: &'a str,
    end_date: &'a str,
    prices: usize,
    financial_metrics: usize,
    insider_trades: usize,
    market_cap: Option<f64>,
}

/// Fetches every dataset the analysts need and patches it into the run
///
/// Also resolves the analysis window: a missing end date becomes today and a
/// missing start date falls back by the configured lookback.
pub struct MarketDataNode {
    id: NodeId,
    source: Arc<dyn MarketDataSource>,
    config: Arc<HedgeConfig>,
    today: Option<NaiveDate>,
}

impl MarketDataNode {
    /// Create the node with its data source
    pub fn new(
        id: impl Into<NodeId>,
        source: Arc<dyn MarketDataSource>,
        config: Arc<HedgeConfig>,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            config,
            today: None,
        }
    }

    /// Pin "today" for date defaulting
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

#[async_trait]
impl Node for MarketDataNode {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn label(&self) -> &str {
        "Market Data Agent"
    }

    async fn invoke(&self, state: &RunState) -> Result<PartialUpdate> {
        let data = state.data();
        let ticker = data.require_ticker()?;
        let (start, end) = resolve_window(
            data.start_date(),
            data.end_date(),
            self.today.unwrap_or_else(today),
            self.config.lookback_months,
        )?;
        let (start, end) = (format_date(start), format_date(end));

        let (prices, metrics, trades, market_cap) = tokio::try_join!(
            self.source.prices(ticker, &start, &end),
            self.source
                .financial_metrics(ticker, &end, self.config.metrics_limit),
            self.source
                .insider_trades(ticker, &end, self.config.insider_trade_limit),
            self.source.market_cap(ticker),
        )?;

        let summary = FetchSummary {
            ticker,
            start_date: &start,
            end_date: &end,
            prices: prices.len(),
            financial_metrics: metrics.len(),
            insider_trades: trades.len(),
            market_cap,
        };
        info!(
            ticker,
            start = %start,
            end = %end,
            prices = summary.prices,
            insider_trades = summary.insider_trades,
            "Market data fetched"
        );

        PartialUpdate::message(&self.id, serde_json::to_string(&summary)?)
            .with_field(keys::START_DATE, serde_json::json!(start))
            .with_field(keys::END_DATE, serde_json::json!(end))
            .with_typed_field(keys::PRICES, &prices)?
            .with_typed_field(keys::FINANCIAL_METRICS, &metrics)?
            .with_typed_field(keys::INSIDER_TRADES, &trades)?
            .with_typed_field(keys::MARKET_CAP, &market_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{InsiderTrade, MockMarketDataSource, Price};
    use crate::error::HedgeError;
    use crate::testing::{config, seeded_state, seeded_state_with_dates};
    use agent_core::Error;
    use serde_json::{Value, json};

    fn price(close: f64) -> Price {
        Price {
            open: close,
            close,
            high: close,
            low: close,
            volume: 1000.0,
            time: "2024-03-01T00:00:00Z".to_string(),
        }
    }

    fn happy_source() -> MockMarketDataSource {
        let mut source = MockMarketDataSource::new();
        source
            .expect_prices()
            .returning(|_, _, _| Ok(vec![price(101.0), price(102.5)]));
        source
            .expect_financial_metrics()
            .returning(|_, _, _| Ok(Vec::new()));
        source.expect_insider_trades().returning(|_, _, _| {
            Ok(vec![
                InsiderTrade::with_shares(Some(10.0)),
                InsiderTrade::with_shares(Some(-5.0)),
            ])
        });
        source.expect_market_cap().returning(|_| Ok(Some(2.5e12)));
        source
    }

    #[tokio::test]
    async fn test_defaults_window_and_patches_data() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_prices()
            .withf(|ticker, start, end| {
                ticker == "AAPL" && start == "2024-02-29" && end == "2024-03-31"
            })
            .returning(|_, _, _| Ok(vec![price(101.0), price(102.5)]));
        source
            .expect_financial_metrics()
            .withf(|_, period, limit| period == "2024-03-31" && *limit == 10)
            .returning(|_, _, _| Ok(Vec::new()));
        source
            .expect_insider_trades()
            .withf(|_, end, limit| end == "2024-03-31" && *limit == 1000)
            .returning(|_, _, _| Ok(vec![InsiderTrade::with_shares(Some(10.0))]));
        source.expect_market_cap().returning(|_| Ok(None));

        let node = MarketDataNode::new("market_data", Arc::new(source), config())
            .with_today(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        let update = node.invoke(&seeded_state()).await.unwrap();

        let patch = &update.data_patch;
        assert_eq!(patch[keys::START_DATE], json!("2024-02-29"));
        assert_eq!(patch[keys::END_DATE], json!("2024-03-31"));
        assert_eq!(patch[keys::PRICES].as_array().unwrap().len(), 2);
        assert_eq!(patch[keys::INSIDER_TRADES].as_array().unwrap().len(), 1);
        assert_eq!(patch[keys::MARKET_CAP], Value::Null);

        let summary: Value = serde_json::from_str(update.new_messages[0].content()).unwrap();
        assert_eq!(summary["prices"], 2);
        assert_eq!(summary["start_date"], "2024-02-29");
    }

    #[tokio::test]
    async fn test_explicit_dates_are_kept() {
        let node = MarketDataNode::new("market_data", Arc::new(happy_source()), config());
        let update = node
            .invoke(&seeded_state_with_dates("2024-01-02", "2024-01-31"))
            .await
            .unwrap();

        assert_eq!(update.data_patch[keys::START_DATE], json!("2024-01-02"));
        assert_eq!(update.data_patch[keys::END_DATE], json!("2024-01-31"));
        assert_eq!(update.data_patch[keys::MARKET_CAP], json!(2.5e12));
    }

    #[tokio::test]
    async fn test_fetch_failure_fails_node() {
        let mut source = MockMarketDataSource::new();
        source.expect_prices().returning(|_, _, _| Ok(Vec::new()));
        source
            .expect_financial_metrics()
            .returning(|_, _, _| Err(HedgeError::ApiError("quota exhausted".to_string())));
        source.expect_insider_trades().returning(|_, _, _| Ok(Vec::new()));
        source.expect_market_cap().returning(|_| Ok(None));

        let node = MarketDataNode::new("market_data", Arc::new(source), config());
        let err = node
            .invoke(&seeded_state_with_dates("2024-01-02", "2024-01-31"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ProcessingFailed(ref m) if m.contains("quota exhausted")));
    }
}
