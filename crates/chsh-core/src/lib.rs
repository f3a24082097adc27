#![deny(missing_docs)]
#![doc = "CHSH Bell-test simulation under a parameter-dependent hidden-variable model, with S-parameter and no-signaling statistics."]

pub mod errors;
pub mod experiment;
pub mod report;
pub mod rng;
pub mod settings;
pub mod stats;
pub mod trials;

pub use errors::{ChshError, ErrorInfo};
pub use experiment::{
    generate_batches, load_config, run_experiment, run_with_rng, RunConfig, DEFAULT_N_TRIALS,
    MIN_N_TRIALS,
};
pub use report::{format_angle, render_report, write_report, RunSummary};
pub use rng::RngHandle;
pub use settings::{
    theoretical_s, ChshTerm, SettingPair, BOB_ANGLE_PAIRS, CHSH_TERMS, CLASSICAL_BOUND,
    TSIRELSON_BOUND,
};
pub use stats::{
    analyze, check_no_signaling, chsh_s, se_unbiased, NoSignalingCheck, NoSignalingVerdict,
    SettingStatistics, SIGMA_THRESHOLD,
};
pub use trials::{generate_batch, OutcomeBatch};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
