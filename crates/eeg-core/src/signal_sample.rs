//! SignalSample: one synthesized single-channel record

use serde::{Deserialize, Serialize};

/// Evenly spaced amplitude values (µV) at `1 / sampling_rate` second steps
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSample {
    values: Vec<f64>,
    sampling_rate: f64,
}

impl SignalSample {
    pub fn new(values: Vec<f64>, sampling_rate: f64) -> Self {
        Self {
            values,
            sampling_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.values.len() as f64 / self.sampling_rate
    }

    /// Largest absolute value, 0.0 for an empty sample
    pub fn peak_abs(&self) -> f64 {
        peak_abs(&self.values)
    }

    /// Get time vector for plotting
    pub fn time_vector(&self) -> Vec<f64> {
        let dt = 1.0 / self.sampling_rate;
        (0..self.values.len()).map(|i| i as f64 * dt).collect()
    }

    pub fn stats(&self) -> SampleStats {
        SampleStats::calculate(&self.values)
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

/// Largest absolute value of a slice
pub fn peak_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

/// Basic statistics for a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleStats {
    pub mean: f64,
    pub rms: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub peak_to_peak: f64,
}

impl SampleStats {
    pub fn calculate(data: &[f64]) -> Self {
        if data.is_empty() {
            return Self {
                mean: 0.0,
                rms: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                peak_to_peak: 0.0,
            };
        }

        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let rms = (data.iter().map(|x| x * x).sum::<f64>() / n).sqrt();
        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        let min = data.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

        Self {
            mean,
            rms,
            std_dev: variance.sqrt(),
            min,
            max,
            peak_to_peak: max - min,
        }
    }
}
