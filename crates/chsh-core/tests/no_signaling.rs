use chsh_core::{
    check_no_signaling, se_unbiased, SettingStatistics, CHSH_TERMS, SIGMA_THRESHOLD,
};

fn stats_with_bob_marginals(marginals: [f64; 4], trials: usize) -> Vec<SettingStatistics> {
    CHSH_TERMS
        .iter()
        .zip(marginals)
        .map(|(term, marginal_b)| SettingStatistics {
            setting: term.setting,
            trials,
            correlation: term.setting.predicted_correlation(),
            marginal_a: 0.0,
            marginal_b,
        })
        .collect()
}

#[test]
fn pairs_follow_bob_angles() {
    let verdict = check_no_signaling(&stats_with_bob_marginals([0.0; 4], 1000)).expect("verdict");
    let angles: Vec<f64> = verdict.checks.iter().map(|check| check.bob_angle).collect();
    assert_eq!(angles, vec![22.5, 67.5]);
    assert_eq!((verdict.checks[0].first, verdict.checks[0].second), (0, 2));
    assert_eq!((verdict.checks[1].first, verdict.checks[1].second), (1, 3));
    assert!(verdict.confirmed);
}

#[test]
fn threshold_is_five_sigma_in_quadrature() {
    let n = 10_000;
    let verdict =
        check_no_signaling(&stats_with_bob_marginals([0.01, -0.02, 0.0, 0.03], n)).expect("verdict");
    let check = &verdict.checks[0];
    let se = (se_unbiased(0.01, n).unwrap().powi(2) + se_unbiased(0.0, n).unwrap().powi(2)).sqrt();
    assert!((check.se_diff - se).abs() < 1e-15);
    assert!((check.threshold - SIGMA_THRESHOLD * se).abs() < 1e-15);
    assert!((check.diff - 0.01).abs() < 1e-15);
    assert!(check.confirmed);
}

#[test]
fn large_shift_in_one_pair_flags_signaling() {
    let verdict =
        check_no_signaling(&stats_with_bob_marginals([0.0, 0.0, 0.0, 0.2], 10_000)).expect("verdict");
    assert!(verdict.checks[0].confirmed);
    assert!(!verdict.checks[1].confirmed);
    assert!(!verdict.confirmed);
}

#[test]
fn saturated_marginals_give_zero_threshold() {
    let verdict =
        check_no_signaling(&stats_with_bob_marginals([1.0, 1.0, 1.0, 1.0], 50)).expect("verdict");
    for check in &verdict.checks {
        assert_eq!(check.se_diff, 0.0);
        assert_eq!(check.threshold, 0.0);
        assert!(!check.confirmed);
    }
}

#[test]
fn out_of_range_marginal_is_inconsistent() {
    let err = check_no_signaling(&stats_with_bob_marginals([1.5, 0.0, 0.0, 0.0], 50))
        .expect_err("marginal above one");
    assert_eq!(err.info().code, "marginal-out-of-range");
}

#[test]
fn missing_settings_are_reported() {
    let stats = stats_with_bob_marginals([0.0; 4], 50);
    let err = check_no_signaling(&stats[..2]).expect_err("only two settings");
    assert_eq!(err.info().code, "missing-setting");
}
