use serde::{Deserialize, Serialize};

use super::StatsError;

/// The p-values of one simulation run, in trial order.
///
/// Every value is guaranteed to lie in [0, 1]; construction rejects anything
/// else, including NaN, so downstream sorting can use a total order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct PValueSeries {
    values: Vec<f64>,
}

impl PValueSeries {
    /// Build a series from raw p-values.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidParameter`] naming the first value outside [0, 1].
    pub fn new(values: Vec<f64>) -> Result<Self, StatsError> {
        if let Some((index, value)) = values
            .iter()
            .enumerate()
            .find(|(_, p)| !(0.0..=1.0).contains(*p))
        {
            return Err(StatsError::InvalidParameter(format!(
                "p-value at index {index} is outside [0, 1]: {value}"
            )));
        }
        Ok(Self { values })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// A copy of the series in ascending order.
    pub fn sorted(&self) -> Self {
        let mut values = self.values.clone();
        values.sort_by(f64::total_cmp);
        Self { values }
    }
}

impl<'de> Deserialize<'de> for PValueSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = Vec::<f64>::deserialize(deserializer)?;
        PValueSeries::new(values).map_err(serde::de::Error::custom)
    }
}

/// How many values of a series met a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignificanceCount {
    pub count: usize,
    pub proportion: f64,
}

/// Count the values of `series` that are `<= threshold`.
///
/// # Errors
///
/// Returns [`StatsError::EmptySeries`] since a proportion of nothing is undefined.
pub fn count_significant(
    series: &PValueSeries,
    threshold: f64,
) -> Result<SignificanceCount, StatsError> {
    if series.is_empty() {
        return Err(StatsError::EmptySeries);
    }
    let count = series.iter().filter(|&p| p <= threshold).count();
    Ok(SignificanceCount {
        count,
        proportion: count as f64 / series.len() as f64,
    })
}
