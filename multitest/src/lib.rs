//! multitest: Monte Carlo comparison of multiple-comparison corrections
//!
//! This library wires the core statistics into a configurable experiment:
//! simulate many two-sample tests, then count what the uncorrected,
//! Bonferroni and Benjamini-Hochberg thresholds declare significant.

pub mod cli;
pub mod config;
pub mod experiment;

// Re-export core types for convenience
pub use multitest_core::report::{
    GroupParams, JsonReporter, ReportError, Reporter, ScenarioSummary, SweepPoint,
    TerminalReporter,
};
pub use multitest_core::stats::{
    BenjaminiHochberg, Bonferroni, Correction, CorrectionMethod, CorrectionResult,
    ErrorRateSweep, PValueSeries, StatisticalTest, StatsError, StudentTTest, WelchTTest,
};

// Re-export main types from this crate
pub use cli::{Cli, OutputFormat, Preset};
pub use config::{Config, TestKind};
pub use experiment::{Experiment, ExperimentError};
