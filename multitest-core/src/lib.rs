//! Core types for multitest.
//!
//! This crate holds the multiple-comparison corrections (Bonferroni and
//! Benjamini-Hochberg), the two-sample t-tests that feed them, and the Monte
//! Carlo runner used to check their error rates empirically.

pub mod report;
pub mod simulation;
pub mod stats;

// Re-export main types for convenience
pub use report::{
    GroupParams, JsonReporter, ReportError, Reporter, ScenarioSummary, SweepPoint,
    TerminalReporter,
};
pub use simulation::{SimulationConfig, SimulationRunner, Trial, DEFAULT_TRIALS};
pub use stats::{
    count_significant, BenjaminiHochberg, Bonferroni, Correction, CorrectionMethod,
    CorrectionResult, ErrorRateSweep, NormalSampler, PValueSeries, RankedPValue, Sample,
    SignificanceCount, StatisticalTest, StatsError, StudentTTest, TestResult, Uncorrected,
    WelchTTest,
};
