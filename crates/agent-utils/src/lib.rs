//! Shared utilities for agent-rs
//!
//! This crate provides common functionality used across the agent-rs workspace:
//! logging setup and environment-driven configuration.

pub mod config;
pub mod logging;

pub use config::{ConfigError, check_required, load_dotenv, optional_env, parse_env};
pub use logging::{init_tracing, init_tracing_with};
