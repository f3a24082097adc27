//! Run configuration and orchestration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{ChshError, ErrorInfo};
use crate::report::RunSummary;
use crate::rng::RngHandle;
use crate::settings::CHSH_TERMS;
use crate::stats::analyze;
use crate::trials::{generate_batch, OutcomeBatch};

/// Trials per setting pair when none is configured.
pub const DEFAULT_N_TRIALS: usize = 200_000;

/// Smallest trial count the Bessel-corrected standard error is defined for.
pub const MIN_N_TRIALS: usize = 2;

fn default_n_trials() -> usize {
    DEFAULT_N_TRIALS
}

/// Configuration for a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Trials drawn per setting pair.
    #[serde(default = "default_n_trials")]
    pub n_trials: usize,
    /// Optional seed; an unseeded run draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n_trials: DEFAULT_N_TRIALS,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Rejects configurations the statistics engine cannot handle.
    pub fn validate(&self) -> Result<(), ChshError> {
        if self.n_trials < MIN_N_TRIALS {
            return Err(ChshError::Config(
                ErrorInfo::new(
                    "n-trials-too-small",
                    format!("n_trials must be at least {MIN_N_TRIALS}"),
                )
                .with_context("n_trials", self.n_trials)
                .with_hint("the Bessel correction divides by n_trials - 1"),
            ));
        }
        Ok(())
    }
}

/// Loads a YAML run configuration.
pub fn load_config(path: &Path) -> Result<RunConfig, ChshError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        ChshError::Serde(
            ErrorInfo::new("config-read", err.to_string())
                .with_context("path", path.display()),
        )
    })?;
    serde_yaml::from_str(&contents).map_err(|err| {
        ChshError::Serde(
            ErrorInfo::new("config-parse", err.to_string())
                .with_context("path", path.display()),
        )
    })
}

/// Draws the four batches in CHSH order from `rng`.
pub fn generate_batches(n_trials: usize, rng: &mut RngHandle) -> Vec<OutcomeBatch> {
    CHSH_TERMS
        .iter()
        .map(|term| generate_batch(term.setting, n_trials, rng))
        .collect()
}

/// Runs the experiment against a caller-owned RNG.
pub fn run_with_rng(n_trials: usize, rng: &mut RngHandle) -> Result<RunSummary, ChshError> {
    RunConfig {
        n_trials,
        seed: None,
    }
    .validate()?;
    let batches = generate_batches(n_trials, rng);
    analyze(&batches)
}

/// Validates `config`, draws all four batches, and summarises them.
pub fn run_experiment(config: &RunConfig) -> Result<RunSummary, ChshError> {
    config.validate()?;
    let mut rng = RngHandle::from_optional_seed(config.seed);
    let mut summary = run_with_rng(config.n_trials, &mut rng)?;
    summary.seed = config.seed;
    info!(
        n_trials = summary.n_trials,
        s_parameter = summary.s_parameter,
        no_signaling = summary.no_signaling.confirmed,
        "run complete"
    );
    Ok(summary)
}
