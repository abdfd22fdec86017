use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Inclusive bounds on the number of nodes a district may hold for it to take part in a swap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictWindow {
    pub min: usize,
    pub max: usize,
}

impl Default for DistrictWindow {
    fn default() -> Self { Self { min: 5, max: 7 } }
}

impl DistrictWindow {
    #[inline]
    pub fn contains(&self, size: usize) -> bool {
        self.min <= size && size <= self.max
    }
}

/// What a rejected Metropolis step contributes to the chain history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StallPolicy {
    /// Record nothing; history length is 1 + accepted moves.
    #[default]
    Skip,
    /// Record a repeat of the unchanged plan; history length is 1 + iterations.
    Repeat,
}

/// Settings for a single chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub window: DistrictWindow,
    /// Bound on source/candidate draws per proposal before giving up.
    pub max_attempts: usize,
    /// Lower end of the uniform threshold `beta ~ U[floor, 1)`.
    pub threshold_floor: f64,
    pub stall_policy: StallPolicy,
    /// Seed for a reproducible chain; drawn from the OS when absent.
    pub seed: Option<u64>,
    /// Emit a progress line every this many iterations.
    pub log_every: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            window: DistrictWindow::default(),
            max_attempts: 10_000,
            threshold_floor: 0.5,
            stall_policy: StallPolicy::Skip,
            seed: None,
            log_every: 1000,
        }
    }
}

/// The per-district population a plan is measured against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationTarget {
    /// Total population divided by the number of districts.
    #[default]
    Mean,
    /// An externally supplied ideal district population.
    Fixed(f64),
}

/// How far a district's population may stray from the target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tolerance {
    /// Fraction of the target (0.05 = ±5%).
    Relative(f64),
    /// Persons.
    Absolute(f64),
}

impl Default for Tolerance {
    fn default() -> Self { Self::Relative(0.05) }
}

impl Tolerance {
    /// Largest permitted absolute deviation for a given target.
    #[inline]
    pub fn allowed(&self, target: f64) -> f64 {
        match *self {
            Self::Relative(fraction) => fraction * target,
            Self::Absolute(persons) => persons,
        }
    }
}

/// Settings for the validity filter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub target: PopulationTarget,
    pub tolerance: Tolerance,
}

/// Full run configuration, as read from a JSON file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sampler: SamplerConfig,
    pub filter: FilterConfig,
}

impl Config {
    /// Read a configuration from a JSON file at `path`. Missing fields take their defaults.
    pub fn read_from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> Result<()> {
        self.sampler.validate()?;
        self.filter.validate()
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> Result<()> {
        let DistrictWindow { min, max } = self.window;
        ensure!(min >= 1, "[SamplerConfig] window.min must be at least 1");
        ensure!(min <= max, "[SamplerConfig] window [{min}, {max}] is empty");
        ensure!(self.max_attempts >= 1, "[SamplerConfig] max_attempts must be at least 1");
        ensure!(
            (0.0..1.0).contains(&self.threshold_floor),
            "[SamplerConfig] threshold_floor must be in [0, 1), got {}", self.threshold_floor
        );
        ensure!(self.log_every >= 1, "[SamplerConfig] log_every must be at least 1");
        Ok(())
    }
}

impl FilterConfig {
    pub fn validate(&self) -> Result<()> {
        if let PopulationTarget::Fixed(target) = self.target {
            ensure!(target.is_finite() && target > 0.0, "[FilterConfig] fixed target must be positive, got {target}");
        }
        let tolerance = match self.tolerance { Tolerance::Relative(t) | Tolerance::Absolute(t) => t };
        ensure!(tolerance.is_finite() && tolerance >= 0.0, "[FilterConfig] tolerance must be non-negative, got {tolerance}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_walk() {
        let config = Config::default();

        assert_eq!(config.sampler.window, DistrictWindow { min: 5, max: 7 });
        assert_eq!(config.sampler.threshold_floor, 0.5);
        assert_eq!(config.sampler.stall_policy, StallPolicy::Skip);
        assert_eq!(config.filter.target, PopulationTarget::Mean);
        assert_eq!(config.filter.tolerance, Tolerance::Relative(0.05));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{
            "sampler": { "seed": 42, "stall_policy": "repeat" },
            "filter": { "tolerance": { "absolute": 10.0 }, "target": { "fixed": 150.0 } }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.sampler.seed, Some(42));
        assert_eq!(config.sampler.stall_policy, StallPolicy::Repeat);
        assert_eq!(config.sampler.max_attempts, 10_000);
        assert_eq!(config.filter.tolerance, Tolerance::Absolute(10.0));
        assert_eq!(config.filter.target, PopulationTarget::Fixed(150.0));
    }

    #[test]
    fn window_contains_is_inclusive() {
        let window = DistrictWindow::default();
        assert!(!window.contains(4));
        assert!(window.contains(5));
        assert!(window.contains(7));
        assert!(!window.contains(8));
    }

    #[test]
    fn tolerance_allowed_deviation() {
        assert_eq!(Tolerance::Relative(0.1).allowed(150.0), 15.0);
        assert_eq!(Tolerance::Absolute(7.0).allowed(150.0), 7.0);
    }

    #[test]
    fn validate_rejects_bad_settings() {
        let mut config = Config::default();
        config.sampler.window = DistrictWindow { min: 7, max: 5 };
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.sampler.threshold_floor = 1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.filter.tolerance = Tolerance::Relative(-0.1);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.filter.target = PopulationTarget::Fixed(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "sampler": { "max_attempts": 50 } }"#).unwrap();

        let config = Config::read_from_json_file(&path).unwrap();
        assert_eq!(config.sampler.max_attempts, 50);
        assert_eq!(config.filter, FilterConfig::default());
    }
}
