//! Monte Carlo runner that produces a p-value series from repeated two-sample tests.
//!
//! Every trial draws a fresh baseline and candidate sample, tests them, and
//! keeps only the p-value. The seeded entry points give trial `i` its own PCG
//! stream derived from `(seed, i)`, so a run is reproducible regardless of
//! how many worker threads execute it.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::stats::{NormalSampler, PValueSeries, Sample, StatisticalTest, StatsError, TestResult};

/// Default number of trials per run.
pub const DEFAULT_TRIALS: usize = 1000;

/// Parameters of a simulation run.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    trials: usize,
    sample_size: usize,
    baseline: NormalSampler,
    candidate: NormalSampler,
}

impl SimulationConfig {
    /// Create a run of `trials` trials, each drawing `sample_size` observations per group.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidParameter`] if `trials` or `sample_size` is zero.
    pub fn new(
        trials: usize,
        sample_size: usize,
        baseline: NormalSampler,
        candidate: NormalSampler,
    ) -> Result<Self, StatsError> {
        if trials < 1 {
            return Err(StatsError::InvalidParameter(
                "trial count must be at least 1".to_string(),
            ));
        }
        if sample_size < 1 {
            return Err(StatsError::InvalidParameter(
                "sample size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            trials,
            sample_size,
            baseline,
            candidate,
        })
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn baseline(&self) -> &NormalSampler {
        &self.baseline
    }

    pub fn candidate(&self) -> &NormalSampler {
        &self.candidate
    }
}

/// One simulated comparison: the two samples and the test outcome.
#[derive(Debug, Clone)]
pub struct Trial {
    pub baseline: Sample,
    pub candidate: Sample,
    pub result: TestResult,
}

impl Trial {
    pub fn p_value(&self) -> f64 {
        self.result.p_value
    }
}

/// Runs independent trials and collects their p-values in trial order.
pub struct SimulationRunner<'a> {
    config: SimulationConfig,
    test: &'a dyn StatisticalTest,
}

impl<'a> SimulationRunner<'a> {
    pub fn new(config: SimulationConfig, test: &'a dyn StatisticalTest) -> Self {
        Self { config, test }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Draw both samples from `rng` and test them.
    pub fn run_trial<R>(&self, rng: &mut R) -> Result<Trial, StatsError>
    where
        R: Rng + ?Sized,
    {
        let baseline = self.config.baseline.draw(self.config.sample_size, rng)?;
        let candidate = self.config.candidate.draw(self.config.sample_size, rng)?;
        let result = self
            .test
            .analyze(baseline.as_slice(), candidate.as_slice())?;
        Ok(Trial {
            baseline,
            candidate,
            result,
        })
    }

    /// Run every trial sequentially from a caller-owned generator.
    pub fn run<R>(&self, rng: &mut R) -> Result<PValueSeries, StatsError>
    where
        R: Rng + ?Sized,
    {
        tracing::debug!(
            trials = self.config.trials,
            sample_size = self.config.sample_size,
            test = self.test.name(),
            "running simulation"
        );
        let p_values = (0..self.config.trials)
            .map(|_| self.run_trial(rng).map(|trial| trial.p_value()))
            .collect::<Result<Vec<_>, _>>()?;
        PValueSeries::new(p_values)
    }

    /// Run every trial on the current thread with per-trial streams derived from `seed`.
    ///
    /// Produces exactly the same series as [`Self::run_parallel`] with the same seed.
    pub fn run_seeded(&self, seed: u64) -> Result<PValueSeries, StatsError> {
        self.run_parallel(seed, 1)
    }

    /// Run the trials on up to `workers` threads.
    ///
    /// Trials are split into contiguous index ranges; each worker writes its
    /// p-values into its own slice of the output, so the series is in trial
    /// order and independent of scheduling.
    pub fn run_parallel(&self, seed: u64, workers: usize) -> Result<PValueSeries, StatsError> {
        let trials = self.config.trials;
        let workers = workers.clamp(1, trials);
        let chunk_len = trials.div_ceil(workers);
        tracing::debug!(
            trials,
            workers,
            sample_size = self.config.sample_size,
            test = self.test.name(),
            seed,
            "running seeded simulation"
        );

        let mut p_values = vec![0.0; trials];
        if workers == 1 {
            self.fill_chunk(seed, 0, &mut p_values)?;
        } else {
            std::thread::scope(|scope| {
                let handles: Vec<_> = p_values
                    .chunks_mut(chunk_len)
                    .enumerate()
                    .map(|(chunk, out)| {
                        let first = chunk * chunk_len;
                        scope.spawn(move || self.fill_chunk(seed, first, out))
                    })
                    .collect();
                handles.into_iter().try_for_each(|handle| {
                    handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
            })?;
        }

        let series = PValueSeries::new(p_values)?;
        tracing::info!(trials = series.len(), "simulation complete");
        Ok(series)
    }

    fn fill_chunk(&self, seed: u64, first: usize, out: &mut [f64]) -> Result<(), StatsError> {
        tracing::trace!(first, len = out.len(), "worker chunk");
        for (offset, slot) in out.iter_mut().enumerate() {
            let mut rng = trial_rng(seed, first + offset);
            *slot = self.run_trial(&mut rng)?.p_value();
        }
        Ok(())
    }
}

/// Odd 64-bit constant (2^64 / golden ratio) used to spread trial indices.
const INDEX_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// The independent generator for trial `index` of a run seeded with `seed`.
///
/// The index is folded into the seed rather than the PCG stream selector:
/// streams that differ only in their increment produce correlated output.
pub fn trial_rng(seed: u64, index: usize) -> Pcg64 {
    Pcg64::seed_from_u64(seed ^ (index as u64).wrapping_mul(INDEX_MIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{StudentTTest, WelchTTest};

    fn config(trials: usize, sample_size: usize, candidate_mean: f64) -> SimulationConfig {
        SimulationConfig::new(
            trials,
            sample_size,
            NormalSampler::new(1.0, 1.0).unwrap(),
            NormalSampler::new(candidate_mean, 1.0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_config_validation() {
        let sampler = NormalSampler::new(0.0, 1.0).unwrap();
        assert!(matches!(
            SimulationConfig::new(0, 10, sampler, sampler),
            Err(StatsError::InvalidParameter(_))
        ));
        assert!(matches!(
            SimulationConfig::new(10, 0, sampler, sampler),
            Err(StatsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_series_length_matches_trials() {
        let runner = SimulationRunner::new(config(250, 10, 1.0), &StudentTTest);
        let series = runner.run(&mut Pcg64::seed_from_u64(3)).unwrap();
        assert_eq!(series.len(), 250);
        assert!(series.iter().all(|p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_sample_size_one_is_insufficient() {
        let runner = SimulationRunner::new(config(5, 1, 1.0), &StudentTTest);
        assert!(matches!(
            runner.run_seeded(1),
            Err(StatsError::InsufficientData { .. })
        ));
        assert!(matches!(
            runner.run_parallel(1, 4),
            Err(StatsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_caller_rng_is_reproducible() {
        let runner = SimulationRunner::new(config(50, 10, 1.5), &WelchTTest);
        let a = runner.run(&mut Pcg64::seed_from_u64(9)).unwrap();
        let b = runner.run(&mut Pcg64::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let runner = SimulationRunner::new(config(103, 10, 1.0), &StudentTTest);
        let sequential = runner.run_seeded(42).unwrap();
        for workers in [2, 3, 8, 500] {
            assert_eq!(runner.run_parallel(42, workers).unwrap(), sequential);
        }
        assert_ne!(runner.run_seeded(43).unwrap(), sequential);
    }

    #[test]
    fn test_trials_are_independent_streams() {
        let sampler = NormalSampler::new(0.0, 1.0).unwrap();
        let first = sampler.draw(5, &mut trial_rng(1, 0)).unwrap();
        let second = sampler.draw(5, &mut trial_rng(1, 1)).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_neighbouring_trial_streams_uncorrelated() {
        let first_draws: Vec<u64> = (0..256).map(|i| trial_rng(7, i).random()).collect();
        let mut distinct = first_draws.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(distinct.len(), first_draws.len());

        // Pearson correlation of trial i's and trial i+1's first uniform draws
        let draws: Vec<f64> = (0..2001).map(|i| trial_rng(7, i).random()).collect();
        let (x, y) = (&draws[..2000], &draws[1..]);
        let mean_x = x.iter().sum::<f64>() / 2000.0;
        let mean_y = y.iter().sum::<f64>() / 2000.0;
        let cov: f64 = x.iter().zip(y).map(|(a, b)| (a - mean_x) * (b - mean_y)).sum();
        let var_x: f64 = x.iter().map(|a| (a - mean_x).powi(2)).sum();
        let var_y: f64 = y.iter().map(|b| (b - mean_y).powi(2)).sum();
        let r = cov / (var_x * var_y).sqrt();
        assert!(r.abs() < 0.1, "correlation {r}");

        // Neighbouring seeds do not reproduce each other's trials shifted by one
        let shifted: Vec<f64> = (0..64).map(|i| trial_rng(8, i).random()).collect();
        assert!(shifted.iter().zip(&draws[1..65]).all(|(a, b)| a != b));
    }

    #[test]
    fn test_trial_keeps_samples() {
        let runner = SimulationRunner::new(config(1, 12, 2.0), &StudentTTest);
        let trial = runner.run_trial(&mut Pcg64::seed_from_u64(5)).unwrap();
        assert_eq!(trial.baseline.len(), 12);
        assert_eq!(trial.candidate.len(), 12);
        assert_eq!(trial.p_value(), trial.result.p_value);
    }
}
