//! Workflow nodes of the hedge fund

pub mod analyst;
pub mod market_data;
pub mod sentiment;

pub use analyst::{AnalystNode, Brief, Input};
pub use market_data::MarketDataNode;
pub use sentiment::SentimentNode;
