//! Experiment driver: turns a [`Config`] into one simulated scenario.
//!
//! The experiment validates the configuration, runs the Monte Carlo
//! simulation, and applies every correction to the same p-value series so
//! the results are directly comparable.

use thiserror::Error;

use multitest_core::{
    BenjaminiHochberg, Bonferroni, Correction, CorrectionResult, ErrorRateSweep, GroupParams,
    NormalSampler, PValueSeries, ScenarioSummary, SimulationConfig, SimulationRunner,
    StatisticalTest, StatsError, StudentTTest, SweepPoint, Uncorrected, WelchTTest,
};

use crate::config::{Config, TestKind};

/// Errors that can occur while running an experiment.
#[derive(Debug, Error)]
pub enum ExperimentError {
    /// A statistical component rejected its parameters or data.
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// The configuration asks for something the runner cannot do.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A fully validated scenario, ready to run.
pub struct Experiment {
    name: String,
    simulation: SimulationConfig,
    test: Box<dyn StatisticalTest>,
    corrections: Vec<Box<dyn Correction>>,
    seed: u64,
    workers: usize,
    /// Uncorrected and Bonferroni error rate curves over the same range.
    sweep: Option<(ErrorRateSweep, ErrorRateSweep)>,
}

impl Experiment {
    /// Build an experiment from configuration.
    ///
    /// # Arguments
    ///
    /// * `name` - Scenario name used in reports
    /// * `config` - The merged file and command-line configuration
    /// * `seed` - Seed for the per-trial random streams
    ///
    /// # Errors
    ///
    /// Returns an error if any distribution, rate or size parameter is invalid.
    pub fn from_config(
        name: impl Into<String>,
        config: &Config,
        seed: u64,
    ) -> Result<Self, ExperimentError> {
        if config.simulation.workers == 0 {
            return Err(ExperimentError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }

        let groups = &config.groups;
        let baseline = NormalSampler::new(groups.baseline_mean, groups.baseline_std_dev)?;
        let candidate = NormalSampler::new(groups.candidate_mean, groups.candidate_std_dev)?;
        let simulation = SimulationConfig::new(
            config.simulation.trials,
            config.simulation.sample_size,
            baseline,
            candidate,
        )?;

        let test: Box<dyn StatisticalTest> = match config.test.kind {
            TestKind::Student => Box::new(StudentTTest),
            TestKind::Welch => Box::new(WelchTTest),
        };

        let corrections: Vec<Box<dyn Correction>> = vec![
            Box::new(Uncorrected::new(config.correction.alpha)?),
            Box::new(Bonferroni::new(config.correction.alpha)?),
            Box::new(BenjaminiHochberg::new(config.correction.fdr)?),
        ];

        let alpha = config.correction.alpha;
        let sweep = config
            .sweep
            .max_n
            .map(|max_n| -> Result<_, StatsError> {
                Ok((
                    ErrorRateSweep::new(alpha, max_n)?,
                    ErrorRateSweep::bonferroni(alpha, max_n)?,
                ))
            })
            .transpose()?;

        Ok(Self {
            name: name.into(),
            simulation,
            test,
            corrections,
            seed,
            workers: config.simulation.workers,
            sweep,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run the simulation and return its raw p-values.
    pub fn simulate(&self) -> Result<PValueSeries, ExperimentError> {
        let runner = SimulationRunner::new(self.simulation, self.test.as_ref());
        Ok(runner.run_parallel(self.seed, self.workers)?)
    }

    /// Apply every configured correction to `series`.
    pub fn correct(
        &self,
        series: &PValueSeries,
    ) -> Result<Vec<CorrectionResult>, ExperimentError> {
        self.corrections
            .iter()
            .map(|correction| -> Result<CorrectionResult, ExperimentError> {
                let result = correction.correct(series)?;
                tracing::debug!(
                    method = %result.method,
                    threshold = ?result.threshold,
                    significant = result.significant_count,
                    "correction applied"
                );
                Ok(result)
            })
            .collect()
    }

    /// Simulate, correct, and summarize the scenario.
    pub fn run(&self) -> Result<ScenarioSummary, ExperimentError> {
        let series = self.simulate()?;
        let corrections = self.correct(&series)?;

        let baseline = self.simulation.baseline();
        let candidate = self.simulation.candidate();
        Ok(ScenarioSummary {
            name: self.name.clone(),
            test: self.test.name().to_string(),
            seed: self.seed,
            trials: self.simulation.trials(),
            sample_size: self.simulation.sample_size(),
            baseline: GroupParams {
                mean: baseline.mean(),
                std_dev: baseline.std_dev(),
            },
            candidate: GroupParams {
                mean: candidate.mean(),
                std_dev: candidate.std_dev(),
            },
            corrections,
            error_rate_sweep: self.error_rate_sweep(),
        })
    }

    fn error_rate_sweep(&self) -> Vec<SweepPoint> {
        let Some((uncorrected, bonferroni)) = self.sweep.clone() else {
            return Vec::new();
        };
        uncorrected
            .zip(bonferroni)
            .map(|((tests, uncorrected), (_, bonferroni))| SweepPoint {
                tests,
                uncorrected,
                bonferroni,
            })
            .collect()
    }
}
