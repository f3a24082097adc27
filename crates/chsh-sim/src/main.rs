use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use chsh_core::{load_config, run_experiment, write_report, RunConfig};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "chsh-sim",
    version = chsh_core::VERSION,
    about = "CHSH Bell-test simulator with a no-signaling check"
)]
struct Cli {
    /// Trials drawn per setting pair (at least 2). Defaults to 200000.
    #[arg(long = "n-trials", short = 'n')]
    n_trials: Option<usize>,
    /// Seed for a reproducible run. Unseeded runs draw from OS entropy.
    #[arg(long)]
    seed: Option<u64>,
    /// YAML file providing `n_trials` and `seed`; flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Emit the run summary as JSON instead of the text report.
    #[arg(long)]
    json: bool,
    /// Log verbosity on stderr (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,
}

impl Cli {
    fn run_config(&self) -> Result<RunConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RunConfig::default(),
        };
        if let Some(n_trials) = self.n_trials {
            config.n_trials = n_trials;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = cli.run_config()?;
    let summary = run_experiment(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &summary)?;
        writeln!(out)?;
    } else {
        write_report(&summary, &mut out)?;
    }
    Ok(())
}
