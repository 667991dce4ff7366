//! Hedge fund command-line entry point
//!
//! # Usage
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..."
//! export FINANCIAL_DATASETS_API_KEY="..."
//!
//! cargo run --bin hedge-fund -- --ticker AAPL --show-reasoning
//! ```

use agent_hedge::config::DATA_API_KEY_VAR;
use agent_hedge::dates::{parse_date, resolve_window, today};
use agent_hedge::{FinancialDatasetsClient, HedgeConfig, HedgeFund, RunRequest, output};
use agent_llm::providers::OpenAIProvider;
use chrono::Local;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const LLM_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Parser, Debug)]
#[command(name = "hedge-fund")]
#[command(about = "Run the multi-agent hedge fund on one ticker", long_about = None)]
struct Args {
    /// Stock ticker symbol
    #[arg(long)]
    ticker: String,

    /// Start date (YYYY-MM-DD); defaults to one month before the end date
    #[arg(long)]
    start_date: Option<String>,

    /// End date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    end_date: Option<String>,

    /// Print each agent's output as it completes
    #[arg(long)]
    show_reasoning: bool,
}

impl Args {
    /// Reject malformed or inverted dates before anything touches the network
    fn validate(&self, lookback_months: u32) -> agent_hedge::Result<()> {
        if let Some(start) = &self.start_date {
            parse_date("Start", start)?;
        }
        resolve_window(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            today(),
            lookback_months,
        )?;
        Ok(())
    }

    fn into_request(self) -> RunRequest {
        let mut request = RunRequest::new(self.ticker).show_reasoning(self.show_reasoning);
        if let Some(start) = self.start_date {
            request = request.start_date(start);
        }
        if let Some(end) = self.end_date {
            request = request.end_date(end);
        }
        request
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = agent_utils::load_dotenv();
    agent_utils::init_tracing();
    if let Some(path) = env_file {
        debug!(path = %path.display(), "Loaded .env");
    }

    let args = Args::parse();
    agent_utils::check_required(&[LLM_KEY_VAR, DATA_API_KEY_VAR])?;
    let config = HedgeConfig::builder().with_env()?.build()?;
    args.validate(config.lookback_months)?;
    debug!(model = %config.model, "Configuration loaded");

    let source = Arc::new(FinancialDatasetsClient::new(&config)?);
    let llm = Arc::new(OpenAIProvider::from_env()?);
    let fund = HedgeFund::new(config, source, llm)?;

    let ticker = args.ticker.clone();
    let result = fund.run(args.into_request()).await?;

    println!("\nFinal Result:");
    println!("{result}");

    let path = output::write_result(Path::new("."), &ticker, Local::now(), &result).await?;
    info!(ticker = %ticker, "Run finished");
    println!("\nAnalysis complete. Results saved to {}", path.display());

    Ok(())
}
