//! Financial Datasets API client

use super::{FinancialMetrics, InsiderTrade, MarketDataSource, NewsItem, Price};
use crate::config::HedgeConfig;
use crate::error::{HedgeError, Result};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, instrument};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

#[derive(Debug, Deserialize)]
struct PricesResponse {
    #[serde(default)]
    prices: Vec<Price>,
}

#[derive(Debug, Deserialize)]
struct MetricsResponse {
    #[serde(default)]
    financial_metrics: Vec<FinancialMetrics>,
}

#[derive(Debug, Deserialize)]
struct InsiderTradesResponse {
    #[serde(default)]
    insider_trades: Vec<InsiderTrade>,
}

#[derive(Debug, Deserialize)]
struct SnapshotResponse {
    #[serde(default)]
    snapshot: Option<Snapshot>,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    market_cap: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    news: Vec<NewsItem>,
}

/// Client for api.financialdatasets.ai with rate limiting
pub struct FinancialDatasetsClient {
    client: Client,
    base_url: String,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl FinancialDatasetsClient {
    /// Create a client from a validated configuration
    pub fn new(config: &HedgeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let quota = Quota::per_minute(NonZeroU32::new(config.rate_limit).unwrap_or(NonZeroU32::MIN));

        Ok(Self {
            client,
            base_url: config.data_api_base.clone(),
            api_key: config.data_api_key.clone(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| HedgeError::ApiError(format!("Request to {path} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(HedgeError::ApiError(format!(
                "Error fetching {path}: {status} - {body}"
            )));
        }

        let body = response.text().await?;
        debug!(path, bytes = body.len(), "Data API response");
        parse_body(path, &body)
    }
}

fn parse_body<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| HedgeError::ApiError(format!("Failed to parse {path} response: {e}")))
}

#[async_trait]
impl MarketDataSource for FinancialDatasetsClient {
    #[instrument(skip(self))]
    async fn prices(&self, ticker: &str, start: &str, end: &str) -> Result<Vec<Price>> {
        let response: PricesResponse = self
            .get(
                "prices/",
                &[
                    ("ticker", ticker.to_string()),
                    ("interval", "day".to_string()),
                    ("interval_multiplier", "1".to_string()),
                    ("start_date", start.to_string()),
                    ("end_date", end.to_string()),
                ],
            )
            .await?;
        Ok(response.prices)
    }

    #[instrument(skip(self))]
    async fn financial_metrics(
        &self,
        ticker: &str,
        report_period: &str,
        limit: usize,
    ) -> Result<Vec<FinancialMetrics>> {
        let response: MetricsResponse = self
            .get(
                "financial-metrics/",
                &[
                    ("ticker", ticker.to_string()),
                    ("report_period_lte", report_period.to_string()),
                    ("limit", limit.to_string()),
                    ("period", "ttm".to_string()),
                ],
            )
            .await?;
        Ok(response.financial_metrics)
    }

    #[instrument(skip(self))]
    async fn insider_trades(
        &self,
        ticker: &str,
        end: &str,
        limit: usize,
    ) -> Result<Vec<InsiderTrade>> {
        let response: InsiderTradesResponse = self
            .get(
                "insider-trades/",
                &[
                    ("ticker", ticker.to_string()),
                    ("filing_date_lte", end.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(response.insider_trades)
    }

    #[instrument(skip(self))]
    async fn market_cap(&self, ticker: &str) -> Result<Option<f64>> {
        let response: SnapshotResponse = self
            .get("financial-metrics/snapshot/", &[("ticker", ticker.to_string())])
            .await?;
        Ok(response.snapshot.and_then(|s| s.market_cap))
    }

    #[instrument(skip(self))]
    async fn news(&self, ticker: &str, limit: usize) -> Result<Vec<NewsItem>> {
        let response: NewsResponse = self
            .get(
                "news/",
                &[("ticker", ticker.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(response.news)
    }
}
