use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::CorrectionResult;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parameters of one normal group in a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupParams {
    pub mean: f64,
    pub std_dev: f64,
}

/// Family-wise error rate for `tests` independent tests, with and without
/// Bonferroni correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub tests: u32,
    pub uncorrected: f64,
    pub bonferroni: f64,
}

/// Everything a presentation layer needs about one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub test: String,
    pub seed: u64,
    pub trials: usize,
    pub sample_size: usize,
    pub baseline: GroupParams,
    pub candidate: GroupParams,
    pub corrections: Vec<CorrectionResult>,
    /// Family-wise error rate curve, if requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_rate_sweep: Vec<SweepPoint>,
}

pub trait Reporter: Send + Sync {
    fn report(&self, summaries: &[ScenarioSummary]) -> Result<(), ReportError>;
}

mod json;
mod terminal;
pub use json::JsonReporter;
pub use terminal::TerminalReporter;
