//! Measurement settings and the CHSH combination they feed.

use serde::{Deserialize, Serialize};

/// Largest |S| reachable by any local hidden-variable model.
pub const CLASSICAL_BOUND: f64 = 2.0;

/// Quantum-mechanical upper bound on |S| (Tsirelson's bound, 2√2).
pub const TSIRELSON_BOUND: f64 = 2.0 * std::f64::consts::SQRT_2;

/// Ordered pair of analyser angles, in degrees, one per station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettingPair {
    /// Alice's analyser angle in degrees.
    pub angle_a: f64,
    /// Bob's analyser angle in degrees.
    pub angle_b: f64,
}

impl SettingPair {
    /// Creates a new setting pair from two angles in degrees.
    pub const fn new(angle_a: f64, angle_b: f64) -> Self {
        Self { angle_a, angle_b }
    }

    /// Angle difference `angle_a - angle_b` in radians.
    pub fn delta_radians(&self) -> f64 {
        (self.angle_a - self.angle_b).to_radians()
    }

    /// Probability that Bob's outcome agrees with Alice's, `sin²(delta)`.
    pub fn prob_agree(&self) -> f64 {
        self.delta_radians().sin().powi(2)
    }

    /// Infinite-trial limit of the correlation, `2 sin²(delta) - 1 = -cos(2 delta)`.
    ///
    /// Equal angles give -1 (Bob always flips), a right angle gives +1.
    pub fn predicted_correlation(&self) -> f64 {
        2.0 * self.prob_agree() - 1.0
    }
}

/// One term of the CHSH sum: a setting pair and the sign it enters with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChshTerm {
    /// Setting pair measured for this term.
    pub setting: SettingPair,
    /// +1.0 or -1.0.
    pub sign: f64,
}

/// The four CHSH settings in run order, each with its sign in
/// `S = |E0 - E1 + E2 + E3|`. Reordering entries reorders the signs with them.
pub const CHSH_TERMS: [ChshTerm; 4] = [
    ChshTerm {
        setting: SettingPair::new(0.0, 22.5),
        sign: 1.0,
    },
    ChshTerm {
        setting: SettingPair::new(0.0, 67.5),
        sign: -1.0,
    },
    ChshTerm {
        setting: SettingPair::new(45.0, 22.5),
        sign: 1.0,
    },
    ChshTerm {
        setting: SettingPair::new(45.0, 67.5),
        sign: 1.0,
    },
];

/// Index pairs into [`CHSH_TERMS`] that share Bob's angle but differ in Alice's.
/// Bob's marginal must not move between the two members of a pair.
pub const BOB_ANGLE_PAIRS: [(usize, usize); 2] = [(0, 2), (1, 3)];

/// Combines four correlations with the [`CHSH_TERMS`] signs and takes |·|.
pub fn combine(correlations: &[f64; 4]) -> f64 {
    CHSH_TERMS
        .iter()
        .zip(correlations.iter())
        .map(|(term, e)| term.sign * e)
        .sum::<f64>()
        .abs()
}

/// S value the model converges to as the trial count grows.
pub fn theoretical_s() -> f64 {
    combine(&CHSH_TERMS.map(|term| term.setting.predicted_correlation()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bob_pairs_share_bob_angle() {
        for (first, second) in BOB_ANGLE_PAIRS {
            let a = CHSH_TERMS[first].setting;
            let b = CHSH_TERMS[second].setting;
            assert_eq!(a.angle_b, b.angle_b);
            assert_ne!(a.angle_a, b.angle_a);
        }
    }

    #[test]
    fn theoretical_s_hits_tsirelson_bound() {
        assert!((theoretical_s() - TSIRELSON_BOUND).abs() < 1e-12);
    }

    #[test]
    fn agreement_probability_extremes() {
        assert!(SettingPair::new(30.0, 30.0).prob_agree().abs() < 1e-15);
        assert!((SettingPair::new(90.0, 0.0).prob_agree() - 1.0).abs() < 1e-15);
        assert!((SettingPair::new(0.0, 90.0).predicted_correlation() - 1.0).abs() < 1e-15);
        assert!((SettingPair::new(30.0, 30.0).predicted_correlation() + 1.0).abs() < 1e-15);
    }

    #[test]
    fn chsh_predictions_are_negated_cosines() {
        let expected = [-0.5f64.sqrt(), 0.5f64.sqrt(), -0.5f64.sqrt(), -0.5f64.sqrt()];
        for (term, want) in CHSH_TERMS.iter().zip(expected) {
            let delta = term.setting.delta_radians();
            assert!((term.setting.predicted_correlation() + (2.0 * delta).cos()).abs() < 1e-12);
            assert!((term.setting.predicted_correlation() - want).abs() < 1e-12);
        }
    }
}
