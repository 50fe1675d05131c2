//! Magnitude spectrum of a single-channel sample

use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};

/// Positive-frequency half of a magnitude spectrum
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spectrum {
    /// Bin center frequencies in Hz
    pub frequencies: Vec<f64>,
    /// Single-sided amplitude, `2/N * |X[k]|`
    pub magnitudes: Vec<f64>,
    /// Hz per bin
    pub resolution: f64,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Frequency of the largest bin, DC excluded
    pub fn peak_frequency(&self) -> Option<f64> {
        self.magnitudes
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| self.frequencies[i])
    }

    /// Share of spectral power falling inside `[low, high]` Hz
    pub fn band_energy_fraction(&self, low: f64, high: f64) -> f64 {
        let total: f64 = self.magnitudes.iter().map(|m| m * m).sum();
        if total == 0.0 {
            return 0.0;
        }

        let in_band: f64 = self
            .frequencies
            .iter()
            .zip(&self.magnitudes)
            .filter(|(f, _)| **f >= low && **f <= high)
            .map(|(_, m)| m * m)
            .sum();

        in_band / total
    }
}

/// Full-length FFT of `values`, keeping the first `N/2` bins
pub fn magnitude_spectrum(values: &[f64], sampling_rate: f64) -> Spectrum {
    let n = values.len();
    if n < 2 {
        return Spectrum::default();
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex<f64>> = values.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft.process(&mut buffer);

    let resolution = sampling_rate / n as f64;
    let scale = 2.0 / n as f64;
    let half = n / 2;

    Spectrum {
        frequencies: (0..half).map(|k| k as f64 * resolution).collect(),
        magnitudes: buffer[..half].iter().map(|c| c.norm() * scale).collect(),
        resolution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterConfig;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};
    use std::f64::consts::PI;

    #[test]
    fn test_sine_peak() {
        let fs = 250.0;
        // 10 Hz falls exactly on a bin for N = 500
        let signal: Vec<f64> = (0..500)
            .map(|i| 3.0 * (2.0 * PI * 10.0 * i as f64 / fs).sin())
            .collect();

        let spectrum = magnitude_spectrum(&signal, fs);
        assert_eq!(spectrum.len(), 250);
        assert!((spectrum.resolution - 0.5).abs() < 1e-12);
        assert!((spectrum.peak_frequency().unwrap() - 10.0).abs() < 1e-9);
        assert!((spectrum.magnitudes[20] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(magnitude_spectrum(&[], 250.0).is_empty());
        assert!(magnitude_spectrum(&[1.0], 250.0).is_empty());
        assert_eq!(magnitude_spectrum(&[0.0; 64], 250.0).band_energy_fraction(0.0, 125.0), 0.0);
    }

    #[test]
    fn test_filtered_noise_stays_in_band() {
        let fs = 250.0;
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let noise: Vec<f64> = (0..4096).map(|_| StandardNormal.sample(&mut rng)).collect();

        let filter = FilterConfig::bandpass(8.0, 13.0, 4).design(fs).unwrap();
        let filtered = filter.filtfilt(&noise);

        let raw = magnitude_spectrum(&noise, fs);
        let shaped = magnitude_spectrum(&filtered, fs);

        assert!(raw.band_energy_fraction(7.0, 14.0) < 0.15);
        assert!(shaped.band_energy_fraction(7.0, 14.0) > 0.85);

        let peak = shaped.peak_frequency().unwrap();
        assert!((7.0..=14.0).contains(&peak), "peak at {}Hz", peak);
    }
}
