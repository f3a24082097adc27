//! Statistics engine: correlations, the S parameter and the no-signaling test.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{ChshError, ErrorInfo};
use crate::report::RunSummary;
use crate::settings::{self, SettingPair, BOB_ANGLE_PAIRS, CHSH_TERMS};
use crate::trials::OutcomeBatch;

/// Acceptance threshold of the no-signaling test, in standard errors.
pub const SIGMA_THRESHOLD: f64 = 5.0;

/// Slack allowed on |marginal| > 1 before it counts as a consistency failure.
const MARGINAL_TOLERANCE: f64 = 1e-12;

fn consistency_error(code: &str, message: impl Into<String>) -> ChshError {
    ChshError::Consistency(ErrorInfo::new(code, message.into()))
}

/// Per-setting expectations derived from one [`OutcomeBatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingStatistics {
    /// Setting pair the statistics describe.
    pub setting: SettingPair,
    /// Number of trials averaged over.
    pub trials: usize,
    /// Correlation `E = mean(A * B)`.
    pub correlation: f64,
    /// Alice's marginal `<A>`.
    pub marginal_a: f64,
    /// Bob's marginal `<B>`.
    pub marginal_b: f64,
}

impl SettingStatistics {
    /// Computes `E`, `<A>` and `<B>` as plain means over the batch.
    pub fn from_batch(batch: &OutcomeBatch) -> Result<Self, ChshError> {
        let n = batch.len();
        if n < 2 {
            return Err(ChshError::Consistency(
                ErrorInfo::new(
                    "batch-too-small",
                    "statistics need at least two trials per setting",
                )
                .with_context("trials", n),
            ));
        }

        let mut sum_a = 0i64;
        let mut sum_b = 0i64;
        let mut sum_ab = 0i64;
        for (&a, &b) in batch.outcomes_a().iter().zip(batch.outcomes_b()) {
            sum_a += i64::from(a);
            sum_b += i64::from(b);
            sum_ab += i64::from(a) * i64::from(b);
        }
        let len = n as f64;
        Ok(Self {
            setting: batch.setting(),
            trials: n,
            correlation: sum_ab as f64 / len,
            marginal_a: sum_a as f64 / len,
            marginal_b: sum_b as f64 / len,
        })
    }
}

/// Bessel-corrected standard error of the mean of a ±1 variable with sample mean `m`.
///
/// The variance `1 - m²` is clamped at zero, so `|m| == 1` yields exactly 0.
pub fn se_unbiased(m: f64, n: usize) -> Result<f64, ChshError> {
    if n < 2 {
        return Err(ChshError::Consistency(
            ErrorInfo::new("bessel-undefined", "Bessel correction needs n >= 2")
                .with_context("n", n),
        ));
    }
    if !m.is_finite() || m.abs() > 1.0 + MARGINAL_TOLERANCE {
        return Err(ChshError::Consistency(
            ErrorInfo::new("marginal-out-of-range", "marginal must lie in [-1, 1]")
                .with_context("marginal", m),
        ));
    }
    let n = n as f64;
    let var_est = (1.0 - m * m).max(0.0);
    Ok(((n / (n - 1.0)) * var_est / n).sqrt())
}

/// Outcome of comparing Bob's marginal across two Alice angles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoSignalingCheck {
    /// Bob's angle shared by both settings.
    pub bob_angle: f64,
    /// Index of the first setting in run order.
    pub first: usize,
    /// Index of the second setting in run order.
    pub second: usize,
    /// `|<B>_first - <B>_second|`.
    pub diff: f64,
    /// Standard error of the difference, combined in quadrature.
    pub se_diff: f64,
    /// `SIGMA_THRESHOLD * se_diff`.
    pub threshold: f64,
    /// True when `diff < threshold`.
    pub confirmed: bool,
}

/// Aggregate no-signaling verdict over every Bob-angle pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoSignalingVerdict {
    /// One check per Bob-angle pair.
    pub checks: Vec<NoSignalingCheck>,
    /// True only when every check is confirmed.
    pub confirmed: bool,
}

/// Runs the 5-sigma test on each Bob-angle pair.
///
/// Each pair is tested on its own; no multiple-comparison correction is applied.
pub fn check_no_signaling(stats: &[SettingStatistics]) -> Result<NoSignalingVerdict, ChshError> {
    let mut checks = Vec::with_capacity(BOB_ANGLE_PAIRS.len());
    for (first, second) in BOB_ANGLE_PAIRS {
        let (Some(lhs), Some(rhs)) = (stats.get(first), stats.get(second)) else {
            return Err(consistency_error(
                "missing-setting",
                format!("no statistics for setting pair ({first}, {second})"),
            ));
        };
        let diff = (lhs.marginal_b - rhs.marginal_b).abs();
        let se_first = se_unbiased(lhs.marginal_b, lhs.trials)?;
        let se_second = se_unbiased(rhs.marginal_b, rhs.trials)?;
        let se_diff = (se_first.powi(2) + se_second.powi(2)).sqrt();
        let threshold = SIGMA_THRESHOLD * se_diff;
        let confirmed = diff < threshold;
        if !confirmed {
            warn!(
                bob_angle = lhs.setting.angle_b,
                diff, threshold, "bob marginal moved with alice's setting"
            );
        }
        checks.push(NoSignalingCheck {
            bob_angle: lhs.setting.angle_b,
            first,
            second,
            diff,
            se_diff,
            threshold,
            confirmed,
        });
    }
    let confirmed = checks.iter().all(|check| check.confirmed);
    Ok(NoSignalingVerdict { checks, confirmed })
}

/// `S = |E0 - E1 + E2 + E3|` over statistics in run order.
pub fn chsh_s(stats: &[SettingStatistics]) -> Result<f64, ChshError> {
    let correlations: [f64; 4] = match stats {
        [e0, e1, e2, e3] => [e0.correlation, e1.correlation, e2.correlation, e3.correlation],
        _ => {
            return Err(ChshError::Consistency(
                ErrorInfo::new("setting-count", "CHSH needs exactly four settings")
                    .with_context("settings", stats.len()),
            ))
        }
    };
    Ok(settings::combine(&correlations))
}

/// Summarises four batches drawn in [`CHSH_TERMS`] order.
pub fn analyze(batches: &[OutcomeBatch]) -> Result<RunSummary, ChshError> {
    if batches.len() != CHSH_TERMS.len() {
        return Err(ChshError::Consistency(
            ErrorInfo::new("setting-count", "CHSH needs exactly four batches")
                .with_context("batches", batches.len()),
        ));
    }
    for (idx, (batch, term)) in batches.iter().zip(CHSH_TERMS.iter()).enumerate() {
        if batch.setting() != term.setting {
            return Err(ChshError::Consistency(
                ErrorInfo::new("setting-order", "batches are not in CHSH order")
                    .with_context("index", idx)
                    .with_hint("draw batches by iterating CHSH_TERMS"),
            ));
        }
    }
    let n_trials = batches[0].len();
    if batches.iter().any(|batch| batch.len() != n_trials) {
        return Err(consistency_error(
            "batch-length-mismatch",
            "all batches of a run must hold the same number of trials",
        ));
    }

    let stats = batches
        .iter()
        .map(SettingStatistics::from_batch)
        .collect::<Result<Vec<_>, _>>()?;
    let s_parameter = chsh_s(&stats)?;
    let no_signaling = check_no_signaling(&stats)?;
    debug!(s_parameter, confirmed = no_signaling.confirmed, "statistics computed");

    Ok(RunSummary {
        n_trials,
        seed: None,
        settings: stats,
        s_parameter,
        no_signaling,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn se_is_zero_at_saturated_marginal() {
        assert_eq!(se_unbiased(1.0, 10).unwrap(), 0.0);
        assert_eq!(se_unbiased(-1.0, 10).unwrap(), 0.0);
    }

    #[test]
    fn se_clamps_round_off_above_one() {
        let se = se_unbiased(1.0 + 1e-15, 100).unwrap();
        assert_eq!(se, 0.0);
    }

    #[test]
    fn se_matches_closed_form() {
        let se = se_unbiased(0.0, 4).unwrap();
        assert!((se - (1.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn se_rejects_invalid_inputs() {
        assert!(matches!(se_unbiased(0.0, 1), Err(ChshError::Consistency(_))));
        assert!(matches!(se_unbiased(1.5, 10), Err(ChshError::Consistency(_))));
        assert!(matches!(se_unbiased(f64::NAN, 10), Err(ChshError::Consistency(_))));
    }
}
