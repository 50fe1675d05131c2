//! Dataset generation configuration

use eeg_core::{BandRegistry, BandSpec, EegError, EegResult, SynthesisSettings, DEFAULT_EXTENSION};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Parameters for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Record duration in seconds
    pub duration: f64,
    /// Rows written per band file
    pub instances_per_band: usize,
    /// Directory receiving one file per band
    pub output_dir: PathBuf,
    /// Dataset file extension
    pub extension: String,
    /// Band labels to generate, in order
    pub bands: Vec<String>,
    /// Master seed; OS entropy when absent
    pub seed: Option<u64>,
    /// Generate bands on parallel blocking tasks
    pub parallel: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 250.0,
            duration: 2.048,
            instances_per_band: 200,
            output_dir: PathBuf::from("generated_eeg_signals"),
            extension: DEFAULT_EXTENSION.to_string(),
            bands: ["delta", "theta", "alpha", "beta", "gamma"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            seed: None,
            parallel: true,
        }
    }
}

impl GenerationConfig {
    pub fn from_json_str(json: &str) -> EegResult<Self> {
        serde_json::from_str(json).map_err(|e| EegError::config(format!("invalid JSON: {}", e)))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> EegResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> EegResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EegError::config(e.to_string()))
    }

    /// Synthesis settings derived from rate and duration
    pub fn settings(&self) -> EegResult<SynthesisSettings> {
        SynthesisSettings::from_duration(self.sampling_rate, self.duration)
    }

    /// Resolve every configured label through the registry
    pub fn band_specs(&self, registry: &BandRegistry) -> EegResult<Vec<BandSpec>> {
        self.bands
            .iter()
            .map(|label| registry.lookup(label).copied())
            .collect()
    }

    /// Check the whole configuration before any work starts
    pub fn validate(&self) -> EegResult<()> {
        self.settings()?;

        if self.instances_per_band == 0 {
            return Err(EegError::config("instances_per_band must be positive"));
        }
        if self.bands.is_empty() {
            return Err(EegError::config("at least one band is required"));
        }
        if self.extension.is_empty() || self.extension.contains(&['.', '/', '\\'][..]) {
            return Err(EegError::config(format!(
                "invalid file extension '{}'",
                self.extension
            )));
        }

        let specs = self.band_specs(&BandRegistry::standard())?;
        let mut seen = HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.label) {
                return Err(EegError::config(format!("band '{}' listed twice", spec.label)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eeg_core::BandLabel;

    #[test]
    fn test_default_config() {
        let config = GenerationConfig::default();
        assert!(config.validate().is_ok());

        let settings = config.settings().unwrap();
        assert_eq!(settings.sample_count, 512);
        assert_eq!(config.instances_per_band, 200);

        let labels: Vec<_> = config
            .band_specs(&BandRegistry::standard())
            .unwrap()
            .iter()
            .map(|s| s.label)
            .collect();
        assert_eq!(labels, BandLabel::ALL.to_vec());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GenerationConfig::from_json_str(
            r#"{ "instances_per_band": 10, "bands": ["alpha", "beta"], "seed": 5 }"#,
        )
        .unwrap();

        assert_eq!(config.instances_per_band, 10);
        assert_eq!(config.bands, vec!["alpha", "beta"]);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.sampling_rate, 250.0);
        assert_eq!(config.extension, "csv");
    }

    #[test]
    fn test_json_round_trip() {
        let config = GenerationConfig {
            seed: Some(17),
            parallel: false,
            ..GenerationConfig::default()
        };
        let parsed = GenerationConfig::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_configs() {
        let unknown = GenerationConfig {
            bands: vec!["alpha".into(), "kappa".into()],
            ..GenerationConfig::default()
        };
        assert!(matches!(unknown.validate(), Err(EegError::UnknownBand { .. })));

        let duplicate = GenerationConfig {
            bands: vec!["alpha".into(), "Alpha".into()],
            ..GenerationConfig::default()
        };
        assert!(matches!(duplicate.validate(), Err(EegError::Config { .. })));

        let no_rows = GenerationConfig {
            instances_per_band: 0,
            ..GenerationConfig::default()
        };
        assert!(matches!(no_rows.validate(), Err(EegError::Config { .. })));

        let bad_rate = GenerationConfig {
            sampling_rate: 0.0,
            ..GenerationConfig::default()
        };
        assert!(matches!(bad_rate.validate(), Err(EegError::InvalidSettings { .. })));

        let bad_extension = GenerationConfig {
            extension: "../csv".into(),
            ..GenerationConfig::default()
        };
        assert!(bad_extension.validate().is_err());

        assert!(GenerationConfig::from_json_str("{ not json").is_err());
    }
}
