use rand::Rng;
use rand_distr::Normal;

use super::StatsError;

/// An immutable set of draws from a normal distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    values: Vec<f64>,
}

impl Sample {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arithmetic mean, or 0 for an empty sample.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}

/// Draws independent samples from Normal(mean, std_dev²).
///
/// The sampler holds no randomness of its own; every draw consumes the
/// generator passed by the caller, so seeded generators give reproducible
/// samples.
#[derive(Debug, Clone, Copy)]
pub struct NormalSampler {
    mean: f64,
    std_dev: f64,
    normal: Normal<f64>,
}

impl NormalSampler {
    /// Create a sampler for Normal(mean, std_dev²).
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidParameter`] if `std_dev` is not strictly
    /// positive or either parameter is not finite.
    pub fn new(mean: f64, std_dev: f64) -> Result<Self, StatsError> {
        if !mean.is_finite() {
            return Err(StatsError::InvalidParameter(format!(
                "mean must be finite, got {mean}"
            )));
        }
        if !(std_dev.is_finite() && std_dev > 0.0) {
            return Err(StatsError::InvalidParameter(format!(
                "standard deviation must be positive, got {std_dev}"
            )));
        }
        let normal = Normal::new(mean, std_dev)
            .map_err(|e| StatsError::InvalidParameter(e.to_string()))?;
        Ok(Self {
            mean,
            std_dev,
            normal,
        })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Draw `size` independent observations.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidParameter`] if `size` is zero.
    pub fn draw<R>(&self, size: usize, rng: &mut R) -> Result<Sample, StatsError>
    where
        R: Rng + ?Sized,
    {
        if size < 1 {
            return Err(StatsError::InvalidParameter(
                "sample size must be at least 1".to_string(),
            ));
        }
        let values = (0..size).map(|_| rng.sample(self.normal)).collect();
        Ok(Sample { values })
    }
}
