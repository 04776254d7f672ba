use anyhow::{Context, Result};
use clap::Parser;
use multitest::{Cli, Config, Experiment, JsonReporter, OutputFormat, Reporter, TerminalReporter};
use rand::Rng;
use tracing_subscriber::EnvFilter;

/// Initialize the stderr log subscriber; `RUST_LOG` takes precedence over the default level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config and apply CLI overrides
    let mut config = Config::load_or_default(&cli.config)?;
    cli.apply_to_config(&mut config);
    tracing::debug!(?config, "configuration");

    let seed = match config.simulation.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::rng().random();
            tracing::info!(seed, "no seed configured, pass --seed {} to reproduce", seed);
            seed
        }
    };

    let experiment = Experiment::from_config(cli.scenario_name(), &config, seed)
        .context("Invalid experiment configuration")?;

    tracing::info!(
        trials = config.simulation.trials,
        workers = config.simulation.workers,
        "Running simulation..."
    );
    let summary = experiment.run().context("Failed to run simulation")?;

    let reporter: Box<dyn Reporter> = match cli.format {
        OutputFormat::Terminal if cli.no_color => Box::new(TerminalReporter::without_colors()),
        OutputFormat::Terminal => Box::new(TerminalReporter::new()),
        OutputFormat::Json => Box::new(JsonReporter::new()),
    };
    reporter.report(&[summary])?;

    Ok(())
}
