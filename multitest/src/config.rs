//! Configuration loading for multitest.
//!
//! Supports loading configuration from TOML files, with sensible defaults
//! for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for multitest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for the Monte Carlo run.
    pub simulation: SimulationSettings,
    /// Distribution parameters of the two groups.
    pub groups: GroupsConfig,
    /// Target error rates of the corrections.
    pub correction: CorrectionConfig,
    /// Which two-sample test produces the p-values.
    pub test: TestConfig,
    /// Family-wise error rate curve.
    pub sweep: SweepConfig,
}

/// Configuration for the Monte Carlo run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Number of independent trials (one p-value each).
    pub trials: usize,
    /// Observations drawn per group in each trial.
    pub sample_size: usize,
    /// Seed for reproducible runs. A random seed is chosen (and logged) when absent.
    pub seed: Option<u64>,
    /// Worker threads used to run trials.
    pub workers: usize,
}

/// Normal distribution parameters for the baseline and candidate groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupsConfig {
    pub baseline_mean: f64,
    pub baseline_std_dev: f64,
    pub candidate_mean: f64,
    pub candidate_std_dev: f64,
}

/// Target error rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    /// Family-wise error rate for the uncorrected and Bonferroni thresholds.
    pub alpha: f64,
    /// False discovery rate Q for Benjamini-Hochberg.
    pub fdr: f64,
}

/// The two-sample t-test variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    /// Student's t-test with pooled variance.
    #[default]
    Student,
    /// Welch's t-test with unequal variances.
    Welch,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    pub kind: TestKind,
}

/// Configuration for the family-wise error rate curve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Largest family size to include. No curve is produced when absent.
    pub max_n: Option<u32>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            trials: multitest_core::DEFAULT_TRIALS,
            sample_size: 10,
            seed: None,
            workers: 1,
        }
    }
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            baseline_mean: 1.0,
            baseline_std_dev: 1.0,
            candidate_mean: 1.0,
            candidate_std_dev: 1.0,
        }
    }
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            fdr: 0.05,
        }
    }
}

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".multitest.toml";

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from `path` if it exists, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_or_default(path: &Path) -> Result<Config> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.simulation.trials, 1000);
        assert_eq!(config.simulation.sample_size, 10);
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.simulation.workers, 1);
        assert_eq!(config.groups.baseline_mean, 1.0);
        assert_eq!(config.groups.candidate_mean, 1.0);
        assert_eq!(config.groups.baseline_std_dev, 1.0);
        assert_eq!(config.correction.alpha, 0.05);
        assert_eq!(config.correction.fdr, 0.05);
        assert_eq!(config.test.kind, TestKind::Student);
        assert_eq!(config.sweep.max_n, None);
    }

    #[test]
    fn test_load_partial_config() {
        let toml_content = r#"
[simulation]
trials = 5000
seed = 17

[groups]
candidate_mean = 2.0
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();

        // Overridden values
        assert_eq!(config.simulation.trials, 5000);
        assert_eq!(config.simulation.seed, Some(17));
        assert_eq!(config.groups.candidate_mean, 2.0);

        // Default values
        assert_eq!(config.simulation.sample_size, 10);
        assert_eq!(config.groups.baseline_mean, 1.0);
        assert_eq!(config.correction.alpha, 0.05);
    }

    #[test]
    fn test_load_full_config() {
        let toml_content = r#"
[simulation]
trials = 2000
sample_size = 30
seed = 99
workers = 4

[groups]
baseline_mean = 0.0
baseline_std_dev = 2.0
candidate_mean = 0.5
candidate_std_dev = 3.0

[correction]
alpha = 0.01
fdr = 0.1

[test]
kind = "welch"

[sweep]
max_n = 100
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.simulation.trials, 2000);
        assert_eq!(config.simulation.sample_size, 30);
        assert_eq!(config.simulation.seed, Some(99));
        assert_eq!(config.simulation.workers, 4);
        assert_eq!(config.groups.baseline_mean, 0.0);
        assert_eq!(config.groups.baseline_std_dev, 2.0);
        assert_eq!(config.groups.candidate_mean, 0.5);
        assert_eq!(config.groups.candidate_std_dev, 3.0);
        assert_eq!(config.correction.alpha, 0.01);
        assert_eq!(config.correction.fdr, 0.1);
        assert_eq!(config.test.kind, TestKind::Welch);
        assert_eq!(config.sweep.max_n, Some(100));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"this is not valid toml {{{{").unwrap();

        let result = Config::load(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_unknown_test_kind() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[test]\nkind = \"mann-whitney\"\n").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_no_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/.multitest.toml")).unwrap();
        assert_eq!(config.simulation.trials, 1000);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.simulation.seed = Some(5);
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.simulation.trials, parsed.simulation.trials);
        assert_eq!(parsed.simulation.seed, Some(5));
        assert_eq!(config.correction.fdr, parsed.correction.fdr);
        assert_eq!(parsed.test.kind, TestKind::Student);
        assert_eq!(parsed.sweep.max_n, None);
    }
}
