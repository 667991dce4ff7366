//! LLM-backed decision-support nodes

use crate::config::HedgeConfig;
use crate::error::HedgeError;
use agent_core::{Error, Node, NodeId, PartialUpdate, Result, RunState};
use agent_llm::{CompletionRequest, LLMProvider};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One section of a node's context bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// A predecessor's message, looked up by producer id
    Message {
        /// Producer id
        producer: &'static str,
        /// Section heading
        heading: &'static str,
    },
    /// A run data field, rendered as pretty JSON
    Field {
        /// Data key
        key: &'static str,
        /// Section heading
        heading: &'static str,
    },
    /// The portfolio snapshot
    Portfolio,
}

/// What a decision-support node reads and how it asks
#[derive(Debug, Clone)]
pub struct Brief {
    /// Node id
    pub id: &'static str,
    /// Display label
    pub label: &'static str,
    /// System prompt
    pub system: &'static str,
    /// Context sections, in bundle order
    pub inputs: Vec<Input>,
    /// Closing instruction
    pub task: &'static str,
}

/// A node that assembles a context bundle and asks the LLM once
///
/// The completion text becomes the node's message verbatim; nothing parses it.
pub struct AnalystNode {
    id: NodeId,
    brief: Brief,
    llm: Arc<dyn LLMProvider>,
    config: Arc<HedgeConfig>,
}

impl AnalystNode {
    /// Create a node from its brief
    pub fn new(brief: Brief, llm: Arc<dyn LLMProvider>, config: Arc<HedgeConfig>) -> Self {
        Self {
            id: NodeId::new(brief.id),
            brief,
            llm,
            config,
        }
    }

    /// The node's brief
    pub fn brief(&self) -> &Brief {
        &self.brief
    }

    /// Render the user message: ticker line, then each input in brief order,
    /// then the task
    pub fn context_bundle(&self, state: &RunState) -> Result<String> {
        let data = state.data();
        let mut bundle = format!("Ticker: {}\n", data.require_ticker()?);
        if let (Some(start), Some(end)) = (data.start_date(), data.end_date()) {
            bundle.push_str(&format!("Analysis window: {start} to {end}\n"));
        }

        for input in &self.brief.inputs {
            bundle.push('\n');
            match *input {
                Input::Message { producer, heading } => {
                    let message = state.require_message(producer)?;
                    bundle.push_str(&format!("{heading}: {}\n", message.content()));
                }
                Input::Field { key, heading } => {
                    let value = data
                        .get(key)
                        .ok_or_else(|| Error::MissingField(key.to_string()))?;
                    bundle.push_str(&format!(
                        "{heading}:\n{}\n",
                        serde_json::to_string_pretty(value)?
                    ));
                }
                Input::Portfolio => {
                    let portfolio = data.require_portfolio()?;
                    bundle.push_str(&format!(
                        "Portfolio:\nCash: {:.2}\nCurrent Position: {} shares\n",
                        portfolio.cash, portfolio.stock
                    ));
                }
            }
        }

        bundle.push('\n');
        bundle.push_str(self.brief.task);
        Ok(bundle)
    }

    fn request(&self, bundle: String) -> CompletionRequest {
        CompletionRequest::single_turn(&self.config.model, self.brief.system, bundle)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature)
    }
}

#[async_trait]
impl Node for AnalystNode {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn label(&self) -> &str {
        self.brief.label
    }

    async fn invoke(&self, state: &RunState) -> Result<PartialUpdate> {
        let bundle = self.context_bundle(state)?;
        debug!(node = %self.id, bytes = bundle.len(), "Context bundle assembled");

        let text = self
            .llm
            .complete_text(self.request(bundle))
            .await
            .map_err(|e| {
                warn!(node = %self.id, rejected = e.is_rejection(), error = %e, "Completion failed");
                HedgeError::from(e)
            })?;
        info!(node = %self.id, provider = self.llm.name(), chars = text.len(), "Analysis received");

        Ok(PartialUpdate::message(&self.id, text))
    }
}
