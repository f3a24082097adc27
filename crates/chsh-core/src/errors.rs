//! Error families for CHSH runs: rejected configurations, statistics that
//! break their own invariants, and unreadable config files.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code, message and offending values behind a [`ChshError`].
///
/// Codes are stable kebab-case strings such as `n-trials-too-small` or
/// `marginal-out-of-range`; context carries values like `n_trials`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Offending values keyed by name (`n_trials`, `marginal`, `path`).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional remedy, e.g. which flag to raise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Failure of a CHSH run. Any variant aborts the run before a report is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum ChshError {
    /// Invalid run configuration, rejected before any trials are drawn.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Batches or marginals that violate the engine's invariants (too few trials,
    /// wrong setting order, |marginal| > 1).
    #[error("consistency error: {0}")]
    Consistency(ErrorInfo),
    /// YAML config files that cannot be read or parsed.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl ChshError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            ChshError::Config(info) | ChshError::Consistency(info) | ChshError::Serde(info) => {
                info
            }
        }
    }
}
