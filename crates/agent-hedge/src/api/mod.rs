//! Market data types and the data-fetch seam

pub mod financial_datasets;

pub use financial_datasets::FinancialDatasetsClient;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One daily price bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Opening price
    pub open: f64,
    /// Closing price
    pub close: f64,
    /// Session high
    pub high: f64,
    /// Session low
    pub low: f64,
    /// Traded volume
    #[serde(default)]
    pub volume: f64,
    /// Bar timestamp as reported by the API
    pub time: String,
}

/// One period of financial metrics
///
/// Only the identifying fields are typed; the metric values themselves are
/// carried through untouched for the analysts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    /// Ticker symbol
    #[serde(default)]
    pub ticker: Option<String>,
    /// Report period end date
    #[serde(default)]
    pub report_period: Option<String>,
    /// Period type (e.g. "ttm")
    #[serde(default)]
    pub period: Option<String>,
    /// Metric name to value
    #[serde(flatten)]
    pub metrics: serde_json::Map<String, serde_json::Value>,
}

/// One insider transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsiderTrade {
    /// Ticker symbol
    #[serde(default)]
    pub ticker: Option<String>,
    /// Insider name
    #[serde(default)]
    pub name: Option<String>,
    /// Insider title
    #[serde(default)]
    pub title: Option<String>,
    /// Transaction date
    #[serde(default)]
    pub transaction_date: Option<String>,
    /// Signed share count: negative for sales
    #[serde(default)]
    pub transaction_shares: Option<f64>,
    /// Price per share
    #[serde(default)]
    pub transaction_price_per_share: Option<f64>,
    /// Total transaction value
    #[serde(default)]
    pub transaction_value: Option<f64>,
    /// Filing date
    #[serde(default)]
    pub filing_date: Option<String>,
}

impl InsiderTrade {
    /// A trade carrying only a share count
    pub fn with_shares(shares: Option<f64>) -> Self {
        Self {
            transaction_shares: shares,
            ..Self::default()
        }
    }
}

/// Sentiment label on a news record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsSentiment {
    /// Favourable coverage
    Positive,
    /// Neither, or no usable label
    Neutral,
    /// Unfavourable coverage
    Negative,
}

impl NewsSentiment {
    /// Parse a raw label; absent or unrecognized labels are neutral
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
            Some("positive") => Self::Positive,
            Some("negative") => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

/// One news record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Ticker symbol
    #[serde(default)]
    pub ticker: Option<String>,
    /// Headline
    #[serde(default)]
    pub title: Option<String>,
    /// Publisher
    #[serde(default)]
    pub source: Option<String>,
    /// Publication date
    #[serde(default)]
    pub date: Option<String>,
    /// Article URL
    #[serde(default)]
    pub url: Option<String>,
    /// Raw sentiment label
    #[serde(default)]
    pub sentiment: Option<String>,
}

impl NewsItem {
    /// A record carrying only a sentiment label
    pub fn with_sentiment(label: Option<&str>) -> Self {
        Self {
            sentiment: label.map(str::to_string),
            ..Self::default()
        }
    }

    /// Normalised sentiment
    pub fn sentiment(&self) -> NewsSentiment {
        NewsSentiment::from_label(self.sentiment.as_deref())
    }
}

/// Data-fetch collaborator
///
/// Every call is a single request; failures are returned, never retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily prices between `start` and `end` inclusive
    async fn prices(&self, ticker: &str, start: &str, end: &str) -> Result<Vec<Price>>;

    /// TTM financial metrics reported on or before `report_period`
    async fn financial_metrics(
        &self,
        ticker: &str,
        report_period: &str,
        limit: usize,
    ) -> Result<Vec<FinancialMetrics>>;

    /// Insider trades filed on or before `end`
    async fn insider_trades(&self, ticker: &str, end: &str, limit: usize)
    -> Result<Vec<InsiderTrade>>;

    /// Current market capitalisation, if reported
    async fn market_cap(&self, ticker: &str) -> Result<Option<f64>>;

    /// Most recent news records
    async fn news(&self, ticker: &str, limit: usize) -> Result<Vec<NewsItem>>;
}
