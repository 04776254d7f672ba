use statrs::distribution::{ContinuousCDF, StudentsT};

use super::{StatisticalTest, StatsError, TestResult};

/// Student's two-sample t-test assuming equal variances.
///
/// This is the default test of the simulation: the pooled variance estimate
/// and `n1 + n2 - 2` degrees of freedom match the classical independent
/// t-test, so p-values are reproducible against standard tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudentTTest;

/// Welch's t-test for two independent samples with potentially unequal variances.
#[derive(Debug, Clone, Copy, Default)]
pub struct WelchTTest;

/// Calculate the sample mean.
fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Calculate the sample variance.
/// Uses Bessel's correction (n-1 denominator) for unbiased estimation.
fn variance(samples: &[f64], mean: f64) -> f64 {
    let sum_sq_diff: f64 = samples
        .iter()
        .map(|x| {
            let diff = x - mean;
            diff * diff
        })
        .sum();
    sum_sq_diff / (samples.len() - 1) as f64
}

fn require_two(samples: &[f64]) -> Result<(), StatsError> {
    if samples.len() < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: samples.len(),
        });
    }
    Ok(())
}

/// Calculate degrees of freedom using the Welch-Satterthwaite equation.
///
/// df = (var1/n1 + var2/n2)^2 / ((var1/n1)^2/(n1-1) + (var2/n2)^2/(n2-1))
fn welch_satterthwaite_df(var1: f64, n1: usize, var2: f64, n2: usize) -> f64 {
    let s1 = var1 / n1 as f64;
    let s2 = var2 / n2 as f64;
    let numerator = (s1 + s2).powi(2);
    let denominator = (s1.powi(2) / (n1 - 1) as f64) + (s2.powi(2) / (n2 - 1) as f64);

    if denominator == 0.0 {
        // Fallback to minimum df when variances are zero
        return (n1.min(n2) - 1) as f64;
    }

    numerator / denominator
}

/// Turn a mean difference, its standard error and df into a two-tailed result.
fn two_tailed(mean_diff: f64, se: f64, df: f64) -> Result<TestResult, StatsError> {
    // Both samples constant: the statistic degenerates to 0/0 or d/0
    if se == 0.0 {
        let (t_statistic, p_value) = if mean_diff == 0.0 {
            (0.0, 1.0)
        } else {
            (mean_diff.signum() * f64::INFINITY, 0.0)
        };
        return Ok(TestResult {
            t_statistic,
            p_value,
            degrees_of_freedom: df,
        });
    }

    let t_statistic = mean_diff / se;
    let t_dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| StatsError::InvalidParameter(format!("t distribution: {e}")))?;

    // p = 2 * P(T > |t|)
    let p_value = (2.0 * t_dist.sf(t_statistic.abs())).clamp(0.0, 1.0);

    Ok(TestResult {
        t_statistic,
        p_value,
        degrees_of_freedom: df,
    })
}

impl StatisticalTest for StudentTTest {
    fn name(&self) -> &'static str {
        "student"
    }

    fn analyze(&self, baseline: &[f64], candidate: &[f64]) -> Result<TestResult, StatsError> {
        require_two(baseline)?;
        require_two(candidate)?;
        let n1 = baseline.len();
        let n2 = candidate.len();

        let mean1 = mean(baseline);
        let mean2 = mean(candidate);
        let var1 = variance(baseline, mean1);
        let var2 = variance(candidate, mean2);

        let df = (n1 + n2 - 2) as f64;
        let pooled = ((n1 - 1) as f64 * var1 + (n2 - 1) as f64 * var2) / df;
        let se = (pooled * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();

        two_tailed(mean1 - mean2, se, df)
    }
}

impl StatisticalTest for WelchTTest {
    fn name(&self) -> &'static str {
        "welch"
    }

    fn analyze(&self, baseline: &[f64], candidate: &[f64]) -> Result<TestResult, StatsError> {
        require_two(baseline)?;
        require_two(candidate)?;
        let n1 = baseline.len();
        let n2 = candidate.len();

        let mean1 = mean(baseline);
        let mean2 = mean(candidate);
        let var1 = variance(baseline, mean1);
        let var2 = variance(candidate, mean2);

        let se = (var1 / n1 as f64 + var2 / n2 as f64).sqrt();
        let df = welch_satterthwaite_df(var1, n1, var2, n2);

        two_tailed(mean1 - mean2, se, df)
    }
}
