//! Resolver configuration
//!
//! Controls what happens when the store fails. Everything defaults to the
//! conservative behavior: lookup failures propagate, initialization failures
//! are logged.
//!
//! Loaded from a JSON file:
//!
//! ```json
//! { "lookupFailure": "degrade", "initializeFailure": "log" }
//! ```
//!
//! or from the `MULTILINGUAL_LOOKUP_FAILURE` / `MULTILINGUAL_INITIALIZE_FAILURE`
//! environment variables.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

pub const LOOKUP_FAILURE_ENV: &str = "MULTILINGUAL_LOOKUP_FAILURE";
pub const INITIALIZE_FAILURE_ENV: &str = "MULTILINGUAL_INITIALIZE_FAILURE";

/// What to do when the batched lookup fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupFailurePolicy {
    /// Return the error; the caller never sees the untranslated result
    #[default]
    Propagate,
    /// Log the error and hand back the result untranslated
    Degrade,
}

impl FromStr for LookupFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" => Ok(Self::Propagate),
            "degrade" => Ok(Self::Degrade),
            other => Err(other.to_string()),
        }
    }
}

/// What to do when the initialization request fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitializeFailurePolicy {
    /// Log and carry on; the rows will be requested again on the next run
    #[default]
    Log,
    /// Return the error
    Propagate,
}

impl FromStr for InitializeFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "propagate" => Ok(Self::Propagate),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    pub lookup_failure: LookupFailurePolicy,
    pub initialize_failure: InitializeFailurePolicy,
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lookup_failure(mut self, policy: LookupFailurePolicy) -> Self {
        self.lookup_failure = policy;
        self
    }

    pub fn with_initialize_failure(mut self, policy: InitializeFailurePolicy) -> Self {
        self.initialize_failure = policy;
        self
    }

    /// Load from a JSON file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!("Loading resolver configuration from: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Read overrides from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read overrides through an arbitrary variable lookup; unset variables keep their defaults
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(LOOKUP_FAILURE_ENV) {
            config.lookup_failure = parse_var(LOOKUP_FAILURE_ENV, &value)?;
        }
        if let Some(value) = lookup(INITIALIZE_FAILURE_ENV) {
            config.initialize_failure = parse_var(INITIALIZE_FAILURE_ENV, &value)?;
        }
        Ok(config)
    }
}

fn parse_var<T: FromStr>(variable: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        variable: variable.to_string(),
        value: value.to_string(),
    })
}
