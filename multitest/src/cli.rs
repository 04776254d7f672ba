//! Command-line interface for multitest.

use crate::config::{Config, TestKind, DEFAULT_CONFIG_FILE};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Ready-made group parameters for the two textbook scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Both groups Normal(1, 1): every rejection is a false positive.
    Identical,
    /// Baseline Normal(1, 1), candidate Normal(2, 1): every null is false.
    Shifted,
}

impl Preset {
    pub fn name(self) -> &'static str {
        match self {
            Preset::Identical => "identical",
            Preset::Shifted => "shifted",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "multitest")]
#[command(about = "Simulate repeated two-sample tests and compare multiple-comparison corrections")]
#[command(version)]
pub struct Cli {
    /// Number of simulated tests (one p-value each)
    #[arg(short = 'n', long)]
    pub trials: Option<usize>,

    /// Observations per group in every trial
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Family-wise error rate for the uncorrected and Bonferroni thresholds
    #[arg(long)]
    pub alpha: Option<f64>,

    /// False discovery rate for Benjamini-Hochberg
    #[arg(long)]
    pub fdr: Option<f64>,

    /// Start from a predefined pair of groups
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Mean of the baseline group
    #[arg(long, allow_hyphen_values = true)]
    pub baseline_mean: Option<f64>,

    /// Mean of the candidate group
    #[arg(long, allow_hyphen_values = true)]
    pub candidate_mean: Option<f64>,

    /// Standard deviation shared by both groups
    #[arg(long)]
    pub std_dev: Option<f64>,

    /// Random seed for a reproducible run
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Worker threads used to run trials
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Use Welch's t-test instead of Student's
    #[arg(long)]
    pub welch: bool,

    /// Also print the family-wise error rate for 0..=N tests, with and without Bonferroni
    #[arg(long, value_name = "N")]
    pub sweep: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,

    /// Disable colored terminal output
    #[arg(long)]
    pub no_color: bool,

    /// Path to config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Name used for the scenario in reports.
    pub fn scenario_name(&self) -> &'static str {
        self.preset.map_or("custom", Preset::name)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI arguments take precedence over config file values. A preset is
    /// applied first, so explicit mean and standard deviation flags refine it.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(preset) = self.preset {
            let groups = &mut config.groups;
            groups.baseline_mean = 1.0;
            groups.baseline_std_dev = 1.0;
            groups.candidate_std_dev = 1.0;
            groups.candidate_mean = match preset {
                Preset::Identical => 1.0,
                Preset::Shifted => 2.0,
            };
        }

        if let Some(trials) = self.trials {
            config.simulation.trials = trials;
        }

        if let Some(sample_size) = self.sample_size {
            config.simulation.sample_size = sample_size;
        }

        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }

        if let Some(workers) = self.workers {
            config.simulation.workers = workers;
        }

        if let Some(alpha) = self.alpha {
            config.correction.alpha = alpha;
        }

        if let Some(fdr) = self.fdr {
            config.correction.fdr = fdr;
        }

        if let Some(mean) = self.baseline_mean {
            config.groups.baseline_mean = mean;
        }

        if let Some(mean) = self.candidate_mean {
            config.groups.candidate_mean = mean;
        }

        if let Some(std_dev) = self.std_dev {
            config.groups.baseline_std_dev = std_dev;
            config.groups.candidate_std_dev = std_dev;
        }

        if self.welch {
            config.test.kind = TestKind::Welch;
        }

        if let Some(max_n) = self.sweep {
            config.sweep.max_n = Some(max_n);
        }
    }
}
