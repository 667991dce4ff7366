//! Environment-driven configuration helpers
//!
//! Secrets and endpoints come from the process environment, optionally
//! seeded from a `.env` file in the working directory.

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration from the environment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required variables are unset or empty
    #[error("Missing required environment variable(s): {}", .0.join(", "))]
    MissingVars(Vec<String>),

    /// A variable is set but cannot be parsed
    #[error("Invalid value for {name}: {reason}")]
    InvalidVar {
        /// Variable name
        name: String,
        /// Parse failure
        reason: String,
    },
}

/// Load `.env` into the process environment, if one exists
///
/// Variables already set in the environment take precedence.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}

/// Check that every variable in `names` is set, reporting all that are not
pub fn check_required(names: &[&str]) -> Result<(), ConfigError> {
    check_with(names, lookup_env)
}

/// Read an optional variable; empty counts as unset
pub fn optional_env(name: &str) -> Option<String> {
    lookup_env(name)
}

/// Read and parse an optional variable
pub fn parse_env<T>(name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_with(name, lookup_env)
}

fn lookup_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn check_with(names: &[&str], lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
    let missing: Vec<String> = names
        .iter()
        .copied()
        .filter(|&name| lookup(name).is_none())
        .map(ToString::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MissingVars(missing))
    }
}

fn parse_with<T>(
    name: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidVar {
                name: name.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}
