use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a statistical component is given parameters or data it cannot use.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// A distribution or procedure parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A sample is too small for the requested statistic.
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A correction was requested on a series with no p-values.
    #[error("Cannot correct an empty p-value series")]
    EmptySeries,
}

/// The result of a two-sample test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// The t statistic (baseline mean minus candidate mean over the standard error).
    pub t_statistic: f64,
    /// Two-tailed p-value, always within [0, 1].
    pub p_value: f64,
    /// Degrees of freedom of the reference t distribution.
    pub degrees_of_freedom: f64,
}

/// Trait for statistical tests that compare two independent samples.
pub trait StatisticalTest: Send + Sync {
    /// Short name used in reports.
    fn name(&self) -> &'static str;

    /// Analyze baseline and candidate samples and return the test statistic and p-value.
    fn analyze(&self, baseline: &[f64], candidate: &[f64]) -> Result<TestResult, StatsError>;
}

/// Checks that a rate (α or Q) lies in the open interval (0, 1).
pub(crate) fn validate_rate(name: &str, value: f64) -> Result<(), StatsError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidParameter(format!(
            "{name} must be between 0 and 1 (exclusive), got {value}"
        )))
    }
}

pub mod correction;
pub mod sample;
pub mod series;
pub mod sweep;
mod ttest;

pub use correction::{
    BenjaminiHochberg, Bonferroni, Correction, CorrectionMethod, CorrectionResult, RankedPValue,
    Uncorrected,
};
pub use sample::{NormalSampler, Sample};
pub use series::{count_significant, PValueSeries, SignificanceCount};
pub use sweep::ErrorRateSweep;
pub use ttest::{StudentTTest, WelchTTest};
