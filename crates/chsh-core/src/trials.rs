//! Trial generator: correlated ±1 outcome pairs for one setting.

use rand::Rng;
use tracing::debug;

use crate::rng::RngHandle;
use crate::settings::SettingPair;

/// Outcome pairs drawn for a single setting pair.
///
/// Every entry of both sequences is exactly `+1` or `-1` and the two
/// sequences always have the same length. The batch is immutable once drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeBatch {
    setting: SettingPair,
    outcomes_a: Vec<i8>,
    outcomes_b: Vec<i8>,
}

impl OutcomeBatch {
    /// Setting pair the batch was drawn under.
    pub fn setting(&self) -> SettingPair {
        self.setting
    }

    /// Alice's outcomes in trial order.
    pub fn outcomes_a(&self) -> &[i8] {
        &self.outcomes_a
    }

    /// Bob's outcomes in trial order.
    pub fn outcomes_b(&self) -> &[i8] {
        &self.outcomes_b
    }

    /// Number of trials in the batch.
    pub fn len(&self) -> usize {
        self.outcomes_a.len()
    }

    /// Returns true when the batch holds no trials.
    pub fn is_empty(&self) -> bool {
        self.outcomes_a.is_empty()
    }
}

/// Draws `n_trials` outcome pairs for `setting`.
///
/// Alice's outcome is a fair ±1 coin. Bob copies it with probability
/// `sin²(angle_a - angle_b)` and flips it otherwise, so Bob's marginal stays
/// unbiased whatever Alice's angle is.
pub fn generate_batch(
    setting: SettingPair,
    n_trials: usize,
    rng: &mut RngHandle,
) -> OutcomeBatch {
    let prob_agree = setting.prob_agree();
    debug!(
        angle_a = setting.angle_a,
        angle_b = setting.angle_b,
        prob_agree,
        n_trials,
        "generating outcome batch"
    );

    let outcomes_a: Vec<i8> = (0..n_trials)
        .map(|_| if rng.gen_bool(0.5) { 1 } else { -1 })
        .collect();
    let outcomes_b = outcomes_a
        .iter()
        .map(|&a| {
            let u: f64 = rng.gen();
            if u < prob_agree {
                a
            } else {
                -a
            }
        })
        .collect();

    OutcomeBatch {
        setting,
        outcomes_a,
        outcomes_b,
    }
}
