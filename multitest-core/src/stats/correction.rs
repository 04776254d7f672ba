//! Multiple-comparison corrections.
//!
//! Each procedure turns a [`PValueSeries`] into a self-contained
//! [`CorrectionResult`]: the rejection threshold it settled on and how many
//! p-values fall at or below it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::series::{count_significant, PValueSeries};
use super::{validate_rate, StatsError};

/// Identifies which procedure produced a [`CorrectionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMethod {
    Uncorrected,
    Bonferroni,
    BenjaminiHochberg,
}

impl fmt::Display for CorrectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CorrectionMethod::Uncorrected => "uncorrected",
            CorrectionMethod::Bonferroni => "bonferroni",
            CorrectionMethod::BenjaminiHochberg => "benjamini-hochberg",
        };
        f.write_str(name)
    }
}

/// Outcome of applying one correction procedure to one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub method: CorrectionMethod,
    /// The rejection criterion. `None` means no p-value qualified and nothing is rejected.
    pub threshold: Option<f64>,
    pub significant_count: usize,
    /// `significant_count` over the series length, within [0, 1].
    pub significant_proportion: f64,
}

impl CorrectionResult {
    fn no_rejections(method: CorrectionMethod) -> Self {
        Self {
            method,
            threshold: None,
            significant_count: 0,
            significant_proportion: 0.0,
        }
    }

    fn at_threshold(
        method: CorrectionMethod,
        series: &PValueSeries,
        threshold: f64,
    ) -> Result<Self, StatsError> {
        let counted = count_significant(series, threshold)?;
        Ok(Self {
            method,
            threshold: Some(threshold),
            significant_count: counted.count,
            significant_proportion: counted.proportion,
        })
    }
}

/// A procedure that decides which p-values of a series are significant.
pub trait Correction: Send + Sync {
    fn method(&self) -> CorrectionMethod;

    /// Apply the procedure to `series`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::EmptySeries`] when `series` has no values.
    fn correct(&self, series: &PValueSeries) -> Result<CorrectionResult, StatsError>;
}

/// Compare every p-value against the raw α, with no adjustment.
#[derive(Debug, Clone, Copy)]
pub struct Uncorrected {
    alpha: f64,
}

impl Uncorrected {
    pub fn new(alpha: f64) -> Result<Self, StatsError> {
        validate_rate("alpha", alpha)?;
        Ok(Self { alpha })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Correction for Uncorrected {
    fn method(&self) -> CorrectionMethod {
        CorrectionMethod::Uncorrected
    }

    fn correct(&self, series: &PValueSeries) -> Result<CorrectionResult, StatsError> {
        CorrectionResult::at_threshold(self.method(), series, self.alpha)
    }
}

/// Bonferroni correction: control the family-wise error rate by testing at α / T.
#[derive(Debug, Clone, Copy)]
pub struct Bonferroni {
    alpha: f64,
}

impl Default for Bonferroni {
    fn default() -> Self {
        Self { alpha: 0.05 }
    }
}

impl Bonferroni {
    /// Create a Bonferroni correction for the family-wise error rate `alpha`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidParameter`] unless `alpha` is in (0, 1).
    pub fn new(alpha: f64) -> Result<Self, StatsError> {
        validate_rate("alpha", alpha)?;
        Ok(Self { alpha })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The per-test threshold α / T for a family of `tests` hypotheses.
    pub fn adjusted_alpha(&self, tests: usize) -> Result<f64, StatsError> {
        if tests == 0 {
            return Err(StatsError::EmptySeries);
        }
        Ok(self.alpha / tests as f64)
    }

    /// Bonferroni-adjusted p-values, min(1, p·T), in the series' original order.
    pub fn adjusted_p_values(&self, series: &PValueSeries) -> Result<Vec<f64>, StatsError> {
        if series.is_empty() {
            return Err(StatsError::EmptySeries);
        }
        let total = series.len() as f64;
        Ok(series.iter().map(|p| (p * total).min(1.0)).collect())
    }
}

impl Correction for Bonferroni {
    fn method(&self) -> CorrectionMethod {
        CorrectionMethod::Bonferroni
    }

    fn correct(&self, series: &PValueSeries) -> Result<CorrectionResult, StatsError> {
        let threshold = self.adjusted_alpha(series.len())?;
        CorrectionResult::at_threshold(self.method(), series, threshold)
    }
}

/// One row of the Benjamini-Hochberg ranking table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedPValue {
    /// 1-based position in ascending p-value order.
    pub rank: usize,
    pub p_value: f64,
    /// (rank / T) × Q.
    pub critical_value: f64,
    /// Position of this p-value in the unsorted series.
    pub index: usize,
}

/// Benjamini-Hochberg step-up procedure controlling the false discovery rate Q.
///
/// Assumes the tests are independent. Ties keep their original series order
/// when ranked, so among equal p-values the one that came first gets the
/// lower rank.
#[derive(Debug, Clone, Copy)]
pub struct BenjaminiHochberg {
    fdr: f64,
}

impl Default for BenjaminiHochberg {
    fn default() -> Self {
        Self { fdr: 0.05 }
    }
}

impl BenjaminiHochberg {
    /// Create a Benjamini-Hochberg correction for the false discovery rate `fdr`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidParameter`] unless `fdr` is in (0, 1).
    pub fn new(fdr: f64) -> Result<Self, StatsError> {
        validate_rate("fdr", fdr)?;
        Ok(Self { fdr })
    }

    pub fn fdr(&self) -> f64 {
        self.fdr
    }

    /// Rank the series ascending and attach each rank's critical value.
    pub fn ranked(&self, series: &PValueSeries) -> Result<Vec<RankedPValue>, StatsError> {
        if series.is_empty() {
            return Err(StatsError::EmptySeries);
        }
        let values = series.as_slice();
        let total = values.len() as f64;

        let mut order: Vec<usize> = (0..values.len()).collect();
        // sort_by is stable, which gives the tie order documented above
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

        Ok(order
            .into_iter()
            .enumerate()
            .map(|(position, index)| {
                let rank = position + 1;
                RankedPValue {
                    rank,
                    p_value: values[index],
                    critical_value: (rank as f64 / total) * self.fdr,
                    index,
                }
            })
            .collect())
    }

    /// The largest-rank entry whose p-value is strictly below its critical value.
    ///
    /// Returns `None` when no rank qualifies.
    pub fn crossing(&self, series: &PValueSeries) -> Result<Option<RankedPValue>, StatsError> {
        let ranked = self.ranked(series)?;
        // Searching from the top yields the maximal rank, not merely the first crossing
        Ok(ranked
            .into_iter()
            .rev()
            .find(|entry| entry.p_value < entry.critical_value))
    }

    /// Benjamini-Hochberg adjusted p-values in the series' original order.
    ///
    /// Each adjusted value is min(1, p·T/rank), made monotone by taking the
    /// running minimum from the largest rank downward. A p-value is rejected
    /// by [`Correction::correct`] exactly when its adjusted value is `< Q`;
    /// an adjusted value equal to Q sits on the critical boundary and is not rejected.
    pub fn adjusted_p_values(&self, series: &PValueSeries) -> Result<Vec<f64>, StatsError> {
        let ranked = self.ranked(series)?;
        let total = ranked.len() as f64;

        let mut adjusted = vec![0.0; ranked.len()];
        let mut running_min = 1.0_f64;
        for entry in ranked.iter().rev() {
            let raw = (entry.p_value * total / entry.rank as f64).min(1.0);
            running_min = running_min.min(raw);
            adjusted[entry.index] = running_min;
        }
        Ok(adjusted)
    }
}

impl Correction for BenjaminiHochberg {
    fn method(&self) -> CorrectionMethod {
        CorrectionMethod::BenjaminiHochberg
    }

    fn correct(&self, series: &PValueSeries) -> Result<CorrectionResult, StatsError> {
        match self.crossing(series)? {
            Some(entry) => {
                tracing::debug!(
                    rank = entry.rank,
                    p_value = entry.p_value,
                    critical_value = entry.critical_value,
                    "benjamini-hochberg crossing rank"
                );
                CorrectionResult::at_threshold(self.method(), series, entry.p_value)
            }
            None => {
                tracing::debug!(tests = series.len(), "benjamini-hochberg rejects nothing");
                Ok(CorrectionResult::no_rejections(self.method()))
            }
        }
    }
}
