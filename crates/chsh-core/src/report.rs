//! Run summary and its plain-text rendering.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::settings::{CLASSICAL_BOUND, TSIRELSON_BOUND};
use crate::stats::{NoSignalingVerdict, SettingStatistics};

const RULE_WIDTH: usize = 65;

/// Everything a run produces. Nothing here outlives the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Trials drawn per setting pair.
    pub n_trials: usize,
    /// Seed the run was drawn with, if any.
    pub seed: Option<u64>,
    /// Per-setting statistics in run order.
    pub settings: Vec<SettingStatistics>,
    /// CHSH S parameter.
    pub s_parameter: f64,
    /// No-signaling test outcome.
    pub no_signaling: NoSignalingVerdict,
}

impl RunSummary {
    /// True when S exceeds the local-realist bound of 2.
    pub fn violates_classical_bound(&self) -> bool {
        self.s_parameter > CLASSICAL_BOUND
    }
}

/// Formats an angle without a trailing `.0` for whole degrees.
pub fn format_angle(angle: f64) -> String {
    if angle.fract() == 0.0 {
        format!("{angle:.0}")
    } else {
        format!("{angle}")
    }
}

/// Writes the human readable report for `summary`.
pub fn write_report<W: Write>(summary: &RunSummary, mut out: W) -> io::Result<()> {
    let rule = "-".repeat(RULE_WIDTH);
    writeln!(
        out,
        ">>> CHSH SIMULATION: {} trials per setting",
        summary.n_trials
    )?;
    if let Some(seed) = summary.seed {
        writeln!(out, ">>> seed: {seed}")?;
    }
    writeln!(out, "{rule}")?;
    writeln!(
        out,
        "{:<6} | {:<6} | {:<10} | {:<8} | {:<8}",
        "Alice", "Bob", "Corr (E)", "<A>", "<B>"
    )?;
    writeln!(out, "{rule}")?;
    for stats in &summary.settings {
        writeln!(
            out,
            "{:<6} | {:<6} | {:<10.5} | {:<8.4} | {:<8.4}",
            format_angle(stats.setting.angle_a),
            format_angle(stats.setting.angle_b),
            stats.correlation,
            stats.marginal_a,
            stats.marginal_b,
        )?;
    }
    writeln!(out, "{rule}")?;
    writeln!(out, "FINAL S-PARAMETER: {:.5}", summary.s_parameter)?;
    writeln!(
        out,
        "    classical bound: {CLASSICAL_BOUND:.5} | quantum bound: {TSIRELSON_BOUND:.5}"
    )?;

    writeln!(out)?;
    writeln!(out, ">>> NO-SIGNALING CHECK (Unbiased Empirical Variance):")?;
    writeln!(out, "    Note: We apply a conservative 5-sigma threshold per test;")?;
    writeln!(out, "    with only two tests, this is already extremely stringent.")?;
    for check in &summary.no_signaling.checks {
        writeln!(
            out,
            "    b={} | Diff: {:.4} | 5-sigma: {:.4}",
            format_angle(check.bob_angle),
            check.diff,
            check.threshold,
        )?;
    }
    if summary.no_signaling.confirmed {
        writeln!(
            out,
            ">>> RESULT: NO-SIGNALING CONFIRMED (Within Statistical Noise)"
        )?;
    } else {
        writeln!(
            out,
            ">>> RESULT: SIGNALING DETECTED (Statistically Significant!)"
        )?;
    }
    Ok(())
}

/// Renders the report into a string.
pub fn render_report(summary: &RunSummary) -> io::Result<String> {
    let mut buffer = Vec::new();
    write_report(summary, &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}
