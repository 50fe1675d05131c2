//! Global synthesis settings shared by every band

use crate::error::{EegError, EegResult};
use serde::{Deserialize, Serialize};

/// Sampling rate and sample count used for every synthesized record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthesisSettings {
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Samples per record
    pub sample_count: usize,
}

impl SynthesisSettings {
    /// Create validated settings
    pub fn new(sampling_rate: f64, sample_count: usize) -> EegResult<Self> {
        let settings = Self {
            sampling_rate,
            sample_count,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Derive the sample count as `round(sampling_rate * duration)`
    pub fn from_duration(sampling_rate: f64, duration: f64) -> EegResult<Self> {
        Self::validate_sampling_rate(sampling_rate)?;

        let count = (sampling_rate * duration).round();
        if !count.is_finite() || count <= 0.0 {
            return Err(EegError::invalid_settings(format!(
                "duration {}s at {}Hz yields {} samples, must be positive",
                duration, sampling_rate, count
            )));
        }

        Self::new(sampling_rate, count as usize)
    }

    /// Validate sampling rate
    pub fn validate_sampling_rate(rate: f64) -> EegResult<()> {
        if !rate.is_finite() || rate <= 0.0 {
            Err(EegError::invalid_settings(format!(
                "sampling rate must be positive and finite, got {}",
                rate
            )))
        } else {
            Ok(())
        }
    }

    pub fn validate(&self) -> EegResult<()> {
        Self::validate_sampling_rate(self.sampling_rate)?;
        if self.sample_count == 0 {
            return Err(EegError::invalid_settings("sample count must be positive"));
        }
        Ok(())
    }

    pub fn nyquist(&self) -> f64 {
        self.sampling_rate / 2.0
    }

    /// Record duration in seconds
    pub fn duration(&self) -> f64 {
        self.sample_count as f64 / self.sampling_rate
    }
}
