//! Multi-agent hedge-fund workflow for agent-rs
//!
//! This crate wires seven nodes into one decision graph:
//!
//! - **market_data**: fetches prices, metrics, insider trades and market cap
//! - **technical / fundamentals / valuation**: LLM-backed analysts
//! - **sentiment**: deterministic insider and news aggregation
//! - **risk_management**: joins the four analysts
//! - **portfolio_management**: produces the final decision
//!
//! # Example
//!
//! ```ignore
//! use agent_hedge::{FinancialDatasetsClient, HedgeConfig, HedgeFund, RunRequest};
//! use agent_llm::providers::OpenAIProvider;
//! use std::sync::Arc;
//!
//! let config = HedgeConfig::builder().with_env()?.build()?;
//! let source = Arc::new(FinancialDatasetsClient::new(&config)?);
//! let llm = Arc::new(OpenAIProvider::from_env()?);
//!
//! let fund = HedgeFund::new(config, source, llm)?;
//! let decision = fund.run(RunRequest::new("AAPL").show_reasoning(true)).await?;
//! ```

pub mod api;
pub mod config;
pub mod dates;
pub mod error;
pub mod nodes;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod signal;

#[cfg(test)]
mod testing;

pub use api::{FinancialDatasetsClient, MarketDataSource};
pub use config::{HedgeConfig, HedgeConfigBuilder};
pub use error::{HedgeError, Result};
pub use pipeline::{HedgeFund, RunRequest, build_graph, default_portfolio, ids};
pub use signal::{SentimentReport, Signal, SubVerdict};
