//! Shared fixtures for unit tests

use crate::config::HedgeConfig;
use crate::pipeline::{RunRequest, default_portfolio};
use agent_core::RunState;
use agent_llm::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, StopReason, TokenUsage,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

pub(crate) fn config() -> Arc<HedgeConfig> {
    Arc::new(
        HedgeConfig::builder()
            .data_api_key("test-key")
            .build()
            .unwrap(),
    )
}

pub(crate) fn seeded_state() -> RunState {
    RunRequest::new("AAPL").into_state().unwrap()
}

pub(crate) fn seeded_state_with_dates(start: &str, end: &str) -> RunState {
    RunRequest::new("AAPL")
        .start_date(start)
        .end_date(end)
        .portfolio(default_portfolio())
        .into_state()
        .unwrap()
}

enum Reply {
    Fixed(String),
    /// Echo the system prompt's first line so callers can tell nodes apart
    Echo,
    Fail,
    /// Fail when the system prompt starts with the marker, echo otherwise
    FailOn(&'static str),
}

/// An LLM that answers from a script and records every request
pub(crate) struct ScriptedLlm {
    reply: Reply,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlm {
    fn with_reply(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn replying(text: &str) -> Arc<Self> {
        Self::with_reply(Reply::Fixed(text.to_string()))
    }

    pub(crate) fn echoing() -> Arc<Self> {
        Self::with_reply(Reply::Echo)
    }

    pub(crate) fn failing() -> Arc<Self> {
        Self::with_reply(Reply::Fail)
    }

    pub(crate) fn failing_on(system_prefix: &'static str) -> Arc<Self> {
        Self::with_reply(Reply::FailOn(system_prefix))
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for ScriptedLlm {
    async fn complete(&self, request: CompletionRequest) -> agent_llm::Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let system = request.system.as_deref().unwrap_or_default();
        let text = match &self.reply {
            Reply::Fixed(text) => text.clone(),
            Reply::FailOn(prefix) if system.starts_with(prefix) => {
                return Err(LLMError::RequestFailed(format!("scripted failure for {prefix}")));
            }
            Reply::Echo | Reply::FailOn(_) => {
                system.lines().next().unwrap_or_default().to_string()
            }
            Reply::Fail => {
                return Err(LLMError::RequestFailed("scripted failure".to_string()));
            }
        };

        Ok(CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
