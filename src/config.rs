//! Configuration for randomized test runs.

use crate::error::CheckError;

/// Default number of trials per run.
pub const DEFAULT_NB_RUN: u32 = 100;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid number of trials (must be > 0)
    InvalidNbRun(u32),
    /// Invalid acceptable skip rate (must be in [0, 1])
    InvalidSkipRate(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidNbRun(n) => {
                write!(f, "Invalid trial count: {} (must be > 0)", n)
            }
            ConfigError::InvalidSkipRate(rate) => {
                write!(f, "Invalid skip rate: {} (must be in [0, 1])", rate)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for one randomized run. Immutable once built; consumed by
/// the runner.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    /// Number of trials to attempt.
    pub nb_run: u32,
    /// Fraction of skipped trials tolerated before the run fails.
    ///
    /// `0.0` fails on any skip; `1.0` tolerates a fully skipped run.
    pub accept_skip_rate: f64,
    /// Fixed seed for the run's random source; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            nb_run: DEFAULT_NB_RUN,
            accept_skip_rate: 0.0,
            seed: None,
        }
    }
}

impl RunnerConfig {
    /// Create a runner configuration with validation.
    pub fn new(nb_run: u32, accept_skip_rate: f64, seed: Option<u64>) -> Result<Self, ConfigError> {
        let config = Self {
            nb_run,
            accept_skip_rate,
            seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nb_run == 0 {
            return Err(ConfigError::InvalidNbRun(self.nb_run));
        }
        if !(0.0..=1.0).contains(&self.accept_skip_rate) || self.accept_skip_rate.is_nan() {
            return Err(ConfigError::InvalidSkipRate(self.accept_skip_rate));
        }
        Ok(())
    }

    /// Number of skipped trials tolerated for `total` completed trials.
    ///
    /// A rate of `1.0` is an unlimited budget: a fully skipped run passes.
    pub fn allowed_skipped(&self, total: u32) -> u32 {
        (self.accept_skip_rate * f64::from(total)).ceil() as u32
    }

    /// Apply the skip policy to a completed run's tally.
    ///
    /// With a zero rate any skip fails; with a rate in `(0, 1)` the run
    /// fails when the skipped count reaches the allowed budget; a rate of
    /// `1.0` never fails.
    pub fn check_skip_budget(&self, skipped: u32, total: u32) -> Result<(), CheckError> {
        if self.accept_skip_rate >= 1.0 {
            return Ok(());
        }
        let allowed = self.allowed_skipped(total);
        let exceeded = if self.accept_skip_rate == 0.0 {
            skipped > 0
        } else {
            skipped >= allowed
        };
        if exceeded {
            return Err(CheckError::skip_budget_exceeded(skipped, allowed, total));
        }
        Ok(())
    }

    /// Fill unset fields from group-level defaults: per-check settings win
    /// over the group's, which win over library defaults.
    pub fn merge_with_group(self, group: &GroupConfig) -> Self {
        Self {
            nb_run: self.nb_run,
            accept_skip_rate: self.accept_skip_rate,
            seed: self.seed.or(group.seed),
        }
    }

    /// Build a per-check configuration from group defaults plus explicit
    /// overrides.
    pub fn from_group_with_overrides(
        group: &GroupConfig,
        nb_run: Option<u32>,
        accept_skip_rate: Option<f64>,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        Self::new(
            nb_run.unwrap_or(group.nb_run),
            accept_skip_rate.unwrap_or(group.accept_skip_rate),
            seed.or(group.seed),
        )
    }
}

/// Group-level defaults shared by several checks.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupConfig {
    pub nb_run: u32,
    pub accept_skip_rate: f64,
    pub seed: Option<u64>,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            nb_run: DEFAULT_NB_RUN,
            accept_skip_rate: 0.0,
            seed: None,
        }
    }
}

impl GroupConfig {
    /// Create group defaults with validation.
    pub fn new(nb_run: u32, accept_skip_rate: f64, seed: Option<u64>) -> Result<Self, ConfigError> {
        // Reuse the per-run validation; the constraints are identical.
        RunnerConfig::new(nb_run, accept_skip_rate, seed)?;
        Ok(Self {
            nb_run,
            accept_skip_rate,
            seed,
        })
    }
}
