//! Hedge-fund graph assembly and run entry point

use crate::api::MarketDataSource;
use crate::config::HedgeConfig;
use crate::error::Result;
use crate::nodes::{AnalystNode, Brief, Input, MarketDataNode, SentimentNode};
use crate::prompts;
use agent_core::{Message, Node, Portfolio, RunData, RunMetadata, RunState, keys};
use agent_llm::LLMProvider;
use agent_workflow::{Graph, Scheduler};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument};

/// Node ids, in declaration order
pub mod ids {
    /// Source node: fetches every dataset
    pub const MARKET_DATA: &str = "market_data";
    /// LLM technical analyst
    pub const TECHNICAL: &str = "technical";
    /// LLM fundamentals analyst
    pub const FUNDAMENTALS: &str = "fundamentals";
    /// Deterministic insider and news sentiment
    pub const SENTIMENT: &str = "sentiment";
    /// LLM valuation analyst
    pub const VALUATION: &str = "valuation";
    /// Joins the four analysts
    pub const RISK_MANAGEMENT: &str = "risk_management";
    /// Sink node: the final decision
    pub const PORTFOLIO_MANAGEMENT: &str = "portfolio_management";

    /// The fan-out branches between market data and risk management
    pub const ANALYSTS: [&str; 4] = [TECHNICAL, FUNDAMENTALS, SENTIMENT, VALUATION];
}

/// Content of the seed message
pub const SEED_PROMPT: &str = "Make a trading decision based on the provided data.";

/// Starting portfolio: 10,000,000.00 cash and 100 shares
pub fn default_portfolio() -> Portfolio {
    Portfolio::new(Decimal::new(1_000_000_000, 2), 100)
}

/// Inputs for one run
#[derive(Debug, Clone)]
pub struct RunRequest {
    ticker: String,
    start_date: Option<String>,
    end_date: Option<String>,
    portfolio: Portfolio,
    show_reasoning: bool,
}

impl RunRequest {
    /// A request for `ticker` with default dates and portfolio
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            start_date: None,
            end_date: None,
            portfolio: default_portfolio(),
            show_reasoning: false,
        }
    }

    /// Set the first day of the window
    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    /// Set the last day of the window
    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    /// Set the starting portfolio
    pub fn portfolio(mut self, portfolio: Portfolio) -> Self {
        self.portfolio = portfolio;
        self
    }

    /// Surface every node's message to the observation sink
    pub fn show_reasoning(mut self, show: bool) -> Self {
        self.show_reasoning = show;
        self
    }

    /// Ticker under analysis
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Seed the run state
    pub fn into_state(self) -> Result<RunState> {
        let data = RunData::for_ticker(self.ticker, self.start_date, self.end_date, self.portfolio)?;
        Ok(RunState::new(
            Message::seed(SEED_PROMPT),
            data,
            RunMetadata::new(self.show_reasoning),
        ))
    }
}

fn analyst_signals() -> Vec<Input> {
    vec![
        Input::Message {
            producer: ids::TECHNICAL,
            heading: "Technical Analysis Trading Signal",
        },
        Input::Message {
            producer: ids::FUNDAMENTALS,
            heading: "Fundamental Analysis Trading Signal",
        },
        Input::Message {
            producer: ids::SENTIMENT,
            heading: "Sentiment Analysis Trading Signal",
        },
        Input::Message {
            producer: ids::VALUATION,
            heading: "Valuation Analysis Trading Signal",
        },
    ]
}

fn with_portfolio() -> Vec<Input> {
    let mut inputs = analyst_signals();
    inputs.push(Input::Portfolio);
    inputs
}

/// Technical analyst: reads the price history
pub fn technical_brief() -> Brief {
    Brief {
        id: ids::TECHNICAL,
        label: "Technical Analyst",
        system: prompts::TECHNICAL_SYSTEM,
        inputs: vec![Input::Field {
            key: keys::PRICES,
            heading: "Price History",
        }],
        task: prompts::TECHNICAL_TASK,
    }
}

/// Fundamentals analyst: reads TTM financial metrics
pub fn fundamentals_brief() -> Brief {
    Brief {
        id: ids::FUNDAMENTALS,
        label: "Fundamental Analysis Agent",
        system: prompts::FUNDAMENTALS_SYSTEM,
        inputs: vec![Input::Field {
            key: keys::FINANCIAL_METRICS,
            heading: "Financial Metrics",
        }],
        task: prompts::FUNDAMENTALS_TASK,
    }
}

/// Valuation analyst: reads metrics and market cap
pub fn valuation_brief() -> Brief {
    Brief {
        id: ids::VALUATION,
        label: "Valuation Analysis Agent",
        system: prompts::VALUATION_SYSTEM,
        inputs: vec![
            Input::Field {
                key: keys::FINANCIAL_METRICS,
                heading: "Financial Metrics",
            },
            Input::Field {
                key: keys::MARKET_CAP,
                heading: "Market Cap",
            },
        ],
        task: prompts::VALUATION_TASK,
    }
}

/// Risk manager: reads the four analyst signals and the portfolio
pub fn risk_brief() -> Brief {
    Brief {
        id: ids::RISK_MANAGEMENT,
        label: "Risk Management Agent",
        system: prompts::RISK_SYSTEM,
        inputs: with_portfolio(),
        task: prompts::RISK_TASK,
    }
}

/// Portfolio manager: reads the four analyst signals and the portfolio
///
/// The risk assessment is not part of its bundle.
pub fn portfolio_brief() -> Brief {
    Brief {
        id: ids::PORTFOLIO_MANAGEMENT,
        label: "Portfolio Management Agent",
        system: prompts::PORTFOLIO_SYSTEM,
        inputs: with_portfolio(),
        task: prompts::PORTFOLIO_TASK,
    }
}

/// Build the seven-node hedge-fund graph
pub fn build_graph(
    config: Arc<HedgeConfig>,
    source: Arc<dyn MarketDataSource>,
    llm: Arc<dyn LLMProvider>,
) -> Result<Graph> {
    let analyst = |brief: Brief| -> Arc<dyn Node> {
        Arc::new(AnalystNode::new(brief, llm.clone(), config.clone()))
    };

    let graph = Graph::builder()
        .add_node(Arc::new(MarketDataNode::new(
            ids::MARKET_DATA,
            source.clone(),
            config.clone(),
        )))
        .add_node(analyst(technical_brief()))
        .add_node(analyst(fundamentals_brief()))
        .add_node(Arc::new(SentimentNode::new(
            ids::SENTIMENT,
            source,
            config.news_limit,
        )))
        .add_node(analyst(valuation_brief()))
        .add_node(analyst(risk_brief()))
        .add_node(analyst(portfolio_brief()));

    let graph = ids::ANALYSTS
        .iter()
        .fold(graph, |g, &branch| {
            g.add_edge(ids::MARKET_DATA, branch)
                .add_edge(branch, ids::RISK_MANAGEMENT)
        })
        .add_edge(ids::RISK_MANAGEMENT, ids::PORTFOLIO_MANAGEMENT)
        .source(ids::MARKET_DATA)
        .sink(ids::PORTFOLIO_MANAGEMENT)
        .build()?;

    Ok(graph)
}

/// The assembled hedge-fund workflow
pub struct HedgeFund {
    graph: Graph,
    scheduler: Scheduler,
}

impl HedgeFund {
    /// Build the graph with a default scheduler
    pub fn new(
        config: HedgeConfig,
        source: Arc<dyn MarketDataSource>,
        llm: Arc<dyn LLMProvider>,
    ) -> Result<Self> {
        let graph = build_graph(Arc::new(config), source, llm)?;
        Ok(Self {
            graph,
            scheduler: Scheduler::default(),
        })
    }

    /// Replace the scheduler
    pub fn with_scheduler(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// The validated graph
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Run to completion and return the final state
    #[instrument(skip_all, fields(ticker = %request.ticker()))]
    pub async fn run_state(&self, request: RunRequest) -> Result<RunState> {
        let state = request.into_state()?;
        info!(run_id = %state.metadata().run_id, "Starting hedge fund run");
        Ok(self.scheduler.run(&self.graph, state).await?)
    }

    /// Run to completion and return the portfolio manager's decision text
    pub async fn run(&self, request: RunRequest) -> Result<String> {
        let state = self.run_state(request).await?;
        let decision = state.require_message(self.graph.sink().as_str())?;
        Ok(decision.content().to_string())
    }
}
