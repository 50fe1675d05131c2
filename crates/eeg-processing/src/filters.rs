//! Butterworth bandpass filters as cascaded second-order sections
//!
//! Designs go through the analog Butterworth prototype, the lowpass to
//! bandpass transform and the bilinear transform. Sections are kept
//! separate instead of being expanded into one high-order polynomial, which
//! keeps narrow bands near DC and wide bands near Nyquist stable.

use eeg_core::{EegError, EegResult};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Orders tried by [`design_with_fallback`] when none are given
pub const DEFAULT_ORDERS: [usize; 3] = [4, 2, 1];

const IMAG_EPS: f64 = 1e-12;

/// Bandpass filter parameters in Hz
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Prototype order (the bandpass has twice as many poles)
    pub order: usize,
    /// Low cutoff (Hz)
    pub low_cutoff: f64,
    /// High cutoff (Hz)
    pub high_cutoff: f64,
}

impl FilterConfig {
    pub fn bandpass(low_cutoff: f64, high_cutoff: f64, order: usize) -> Self {
        Self {
            order,
            low_cutoff,
            high_cutoff,
        }
    }

    /// Cutoffs as fractions of the Nyquist frequency
    pub fn normalized(&self, sampling_rate: f64) -> (f64, f64) {
        let nyquist = 0.5 * sampling_rate;
        (self.low_cutoff / nyquist, self.high_cutoff / nyquist)
    }

    pub fn design(&self, sampling_rate: f64) -> EegResult<SosFilter> {
        let (low, high) = self.normalized(sampling_rate);
        ButterworthFilter::bandpass(low, high, self.order)
    }
}

/// Second-order section coefficients
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    fn is_finite(&self) -> bool {
        [self.b0, self.b1, self.b2, self.a1, self.a2]
            .iter()
            .all(|c| c.is_finite())
    }

    /// Both poles strictly inside the unit circle
    fn is_stable(&self) -> bool {
        self.a2.abs() < 1.0 && self.a1.abs() < 1.0 + self.a2
    }

    /// Gain at DC
    fn dc_gain(&self) -> f64 {
        (self.b0 + self.b1 + self.b2) / (1.0 + self.a1 + self.a2)
    }

    fn response(&self, omega: f64) -> Complex64 {
        let z1 = Complex64::from_polar(1.0, -omega);
        let z2 = z1 * z1;
        let num = self.b0 + z1 * self.b1 + z2 * self.b2;
        let den = 1.0 + z1 * self.a1 + z2 * self.a2;
        num / den
    }
}

/// State of one section (Direct Form II Transposed)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiquadState {
    pub z1: f64,
    pub z2: f64,
}

impl BiquadState {
    fn scaled(&self, factor: f64) -> Self {
        Self {
            z1: self.z1 * factor,
            z2: self.z2 * factor,
        }
    }
}

#[inline]
fn process_sample(coeffs: &BiquadCoeffs, state: &mut BiquadState, input: f64) -> f64 {
    let output = coeffs.b0 * input + state.z1;
    state.z1 = coeffs.b1 * input - coeffs.a1 * output + state.z2;
    state.z2 = coeffs.b2 * input - coeffs.a2 * output;
    output
}

/// Cascaded second-order sections
#[derive(Debug, Clone, PartialEq)]
pub struct SosFilter {
    sections: Vec<BiquadCoeffs>,
}

impl SosFilter {
    pub fn new(sections: Vec<BiquadCoeffs>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[BiquadCoeffs] {
        &self.sections
    }

    /// Number of poles
    pub fn order(&self) -> usize {
        2 * self.sections.len()
    }

    /// Check every coefficient is finite and every section is stable
    pub fn validate(&self) -> EegResult<()> {
        if self.sections.is_empty() {
            return Err(EegError::filter_design("filter has no sections"));
        }
        for (i, section) in self.sections.iter().enumerate() {
            if !section.is_finite() {
                return Err(EegError::filter_design(format!(
                    "section {} has non-finite coefficients",
                    i
                )));
            }
            if !section.is_stable() {
                return Err(EegError::filter_design(format!(
                    "section {} has poles on or outside the unit circle (a1={}, a2={})",
                    i, section.a1, section.a2
                )));
            }
        }
        Ok(())
    }

    /// Magnitude response at a normalized frequency (1.0 = Nyquist)
    pub fn magnitude_at(&self, freq_norm: f64) -> f64 {
        let omega = PI * freq_norm;
        self.sections
            .iter()
            .fold(Complex64::new(1.0, 0.0), |acc, s| acc * s.response(omega))
            .norm()
    }

    /// Initial section states for a unit step input in steady state
    pub fn steady_state(&self) -> Vec<BiquadState> {
        let mut scale = 1.0;
        self.sections
            .iter()
            .map(|s| {
                let dc = s.dc_gain();
                let state = BiquadState {
                    z1: scale * (dc - s.b0),
                    z2: scale * (s.b2 - s.a2 * dc),
                };
                scale *= dc;
                state
            })
            .collect()
    }

    fn run(&self, signal: &[f64], initial: &[BiquadState]) -> Vec<f64> {
        let mut states = initial.to_vec();
        signal
            .iter()
            .map(|&x| {
                self.sections
                    .iter()
                    .zip(states.iter_mut())
                    .fold(x, |sample, (coeffs, state)| process_sample(coeffs, state, sample))
            })
            .collect()
    }

    /// Single forward pass starting from rest
    pub fn filter(&self, signal: &[f64]) -> Vec<f64> {
        self.run(signal, &vec![BiquadState::default(); self.sections.len()])
    }

    /// Single forward pass starting in steady state for the first sample
    pub fn filter_with_steady_state(&self, signal: &[f64]) -> Vec<f64> {
        let Some(&first) = signal.first() else {
            return Vec::new();
        };
        let initial: Vec<_> = self
            .steady_state()
            .iter()
            .map(|s| s.scaled(first))
            .collect();
        self.run(signal, &initial)
    }

    /// Samples of odd extension added on each side by [`SosFilter::filtfilt`]
    pub fn default_padlen(&self) -> usize {
        let trailing_zero_b = self.sections.iter().filter(|s| s.b2 == 0.0).count();
        let trailing_zero_a = self.sections.iter().filter(|s| s.a2 == 0.0).count();
        let taps = 2 * self.sections.len() + 1 - trailing_zero_b.min(trailing_zero_a);
        3 * taps
    }

    /// Zero-phase forward-backward filtering.
    ///
    /// The signal is extended at both ends by odd reflection and each pass is
    /// started in steady state, which suppresses edge transients. Output has
    /// the same length as the input.
    pub fn filtfilt(&self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        if n == 0 {
            return Vec::new();
        }

        let padlen = self.default_padlen().min(n - 1);
        let extended = odd_extend(signal, padlen);

        let mut forward = self.filter_with_steady_state(&extended);
        forward.reverse();
        let mut backward = self.filter_with_steady_state(&forward);
        backward.reverse();

        backward.drain(..padlen);
        backward.truncate(n);
        backward
    }
}

fn odd_extend(signal: &[f64], padlen: usize) -> Vec<f64> {
    let n = signal.len();
    let first = signal[0];
    let last = signal[n - 1];

    let mut extended = Vec::with_capacity(n + 2 * padlen);
    extended.extend((1..=padlen).rev().map(|i| 2.0 * first - signal[i]));
    extended.extend_from_slice(signal);
    extended.extend((1..=padlen).map(|i| 2.0 * last - signal[n - 1 - i]));
    extended
}

/// Butterworth filter designer
pub struct ButterworthFilter;

impl ButterworthFilter {
    /// Design a digital Butterworth bandpass.
    ///
    /// `low_norm` and `high_norm` are fractions of Nyquist and must satisfy
    /// `0 < low_norm < high_norm < 1`.
    pub fn bandpass(low_norm: f64, high_norm: f64, order: usize) -> EegResult<SosFilter> {
        if order == 0 {
            return Err(EegError::filter_design("filter order must be at least 1"));
        }
        if !(low_norm > 0.0 && low_norm < high_norm && high_norm < 1.0) {
            return Err(EegError::filter_design(format!(
                "normalized cutoffs must satisfy 0 < low < high < 1, got ({}, {})",
                low_norm, high_norm
            )));
        }

        // Pre-warp for the bilinear transform s = (1 - z^-1) / (1 + z^-1)
        let w_low = Self::prewarp(low_norm);
        let w_high = Self::prewarp(high_norm);
        let w0 = (w_low * w_high).sqrt();
        let bw = w_high - w_low;

        let mut pole_pairs = Vec::with_capacity(order);
        for k in 0..order {
            let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            let prototype = Complex64::from_polar(1.0, theta);

            if prototype.im < -IMAG_EPS {
                // Covered by the conjugate of its upper-half partner
                continue;
            }

            let (r1, r2) = Self::bandpass_poles(prototype, bw, w0);
            if prototype.im.abs() <= IMAG_EPS {
                pole_pairs.push((r1, r2));
            } else {
                pole_pairs.push((r1, r1.conj()));
                pole_pairs.push((r2, r2.conj()));
            }
        }

        // Analog gain bw^N, then 1 / prod(1 - p) from the bilinear transform
        let mut denominator = Complex64::new(1.0, 0.0);
        let mut sections = Vec::with_capacity(pole_pairs.len());
        for (p1, p2) in pole_pairs {
            denominator *= (1.0 - p1) * (1.0 - p2);

            let z1 = Self::bilinear(p1);
            let z2 = Self::bilinear(p2);
            sections.push(BiquadCoeffs {
                b0: 1.0,
                b1: 0.0,
                b2: -1.0,
                a1: -(z1 + z2).re,
                a2: (z1 * z2).re,
            });
        }

        let gain = bw.powi(order as i32) / denominator.re;
        if let Some(first) = sections.first_mut() {
            first.b0 *= gain;
            first.b1 *= gain;
            first.b2 *= gain;
        }

        let filter = SosFilter::new(sections);
        filter.validate()?;
        Ok(filter)
    }

    fn prewarp(freq_norm: f64) -> f64 {
        (PI * freq_norm / 2.0).tan()
    }

    /// Roots of s^2 - p*bw*s + w0^2 = 0
    fn bandpass_poles(prototype: Complex64, bw: f64, w0: f64) -> (Complex64, Complex64) {
        let half = prototype * bw / 2.0;
        let disc = (half * half - w0 * w0).sqrt();
        (half + disc, half - disc)
    }

    fn bilinear(s: Complex64) -> Complex64 {
        (1.0 + s) / (1.0 - s)
    }
}

/// Design a bandpass, dropping to lower orders when a design is rejected
pub fn design_with_fallback(
    low_norm: f64,
    high_norm: f64,
    orders: &[usize],
) -> EegResult<SosFilter> {
    let mut last_error = EegError::filter_design("no filter orders to try");
    for &order in orders {
        match ButterworthFilter::bandpass(low_norm, high_norm, order) {
            Ok(filter) => return Ok(filter),
            Err(e) => {
                tracing::debug!(order, error = %e, "bandpass design rejected, trying lower order");
                last_error = e;
            }
        }
    }
    Err(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};

    fn white_noise(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        (0..n).map(|_| StandardNormal.sample(&mut rng)).collect()
    }

    #[test]
    fn test_bandpass_structure() {
        let filter = ButterworthFilter::bandpass(8.0 / 125.0, 13.0 / 125.0, 4).unwrap();
        assert_eq!(filter.sections().len(), 4);
        assert_eq!(filter.order(), 8);
        assert_eq!(filter.default_padlen(), 27);

        let odd = ButterworthFilter::bandpass(0.2, 0.4, 3).unwrap();
        assert_eq!(odd.sections().len(), 3);
    }

    #[test]
    fn test_bandpass_response() {
        let (low, high) = FilterConfig::bandpass(8.0, 13.0, 4).normalized(250.0);
        for order in [1, 2, 4] {
            let filter = ButterworthFilter::bandpass(low, high, order).unwrap();

            // Unit gain at the geometric center of the pre-warped band
            let w0 = (ButterworthFilter::prewarp(low) * ButterworthFilter::prewarp(high)).sqrt();
            let center = 2.0 * w0.atan() / PI;
            assert!((filter.magnitude_at(center) - 1.0).abs() < 1e-9);

            // -3 dB at both cutoffs
            let half_power = std::f64::consts::FRAC_1_SQRT_2;
            assert!((filter.magnitude_at(low) - half_power).abs() < 1e-9);
            assert!((filter.magnitude_at(high) - half_power).abs() < 1e-9);

            // Zeros at DC and Nyquist
            assert!(filter.magnitude_at(0.0) < 1e-12);
            assert!(filter.magnitude_at(1.0) < 1e-12);
        }
    }

    #[test]
    fn test_bandpass_rejects_invalid_cutoffs() {
        for (low, high) in [(0.3, 1.0), (0.5, 0.4), (0.4, 0.4), (0.0, 0.5), (-0.1, 0.5), (0.9, 1.2)] {
            assert!(matches!(
                ButterworthFilter::bandpass(low, high, 4),
                Err(EegError::FilterDesign { .. })
            ));
        }
        assert!(ButterworthFilter::bandpass(0.1, 0.2, 0).is_err());
        assert!(ButterworthFilter::bandpass(f64::NAN, 0.2, 4).is_err());
    }

    #[test]
    fn test_stable_near_band_edges() {
        let noise = white_noise(2048, 7);
        for (low, high) in [(0.004, 0.032), (0.24, 0.999), (0.5, 0.9999), (0.0001, 0.9999)] {
            let filter = ButterworthFilter::bandpass(low, high, 4).unwrap();
            assert!(filter.validate().is_ok());

            let filtered = filter.filtfilt(&noise);
            assert_eq!(filtered.len(), noise.len());
            assert!(filtered.iter().all(|v| v.is_finite()), "({}, {})", low, high);
        }
    }

    #[test]
    fn test_fallback_tries_orders_in_sequence() {
        let filter = design_with_fallback(0.1, 0.3, &DEFAULT_ORDERS).unwrap();
        assert_eq!(filter.order(), 8);

        let filter = design_with_fallback(0.1, 0.3, &[0, 2]).unwrap();
        assert_eq!(filter.order(), 4);

        assert!(design_with_fallback(0.3, 1.0, &DEFAULT_ORDERS).is_err());
        assert!(design_with_fallback(0.1, 0.3, &[]).is_err());
    }

    #[test]
    fn test_steady_state_start_has_no_transient() {
        let filter = ButterworthFilter::bandpass(0.1, 0.3, 4).unwrap();
        let step = vec![3.0; 200];

        let seeded = filter.filter_with_steady_state(&step);
        assert!(seeded.iter().all(|v| v.abs() < 1e-9));

        // From rest the step rings through the bandpass
        let from_rest = filter.filter(&step);
        assert!(from_rest.iter().any(|v| v.abs() > 1e-3));
    }

    #[test]
    fn test_filtfilt_preserves_length() {
        let filter = ButterworthFilter::bandpass(0.064, 0.104, 4).unwrap();
        for n in [1, 2, 5, 27, 28, 512] {
            let signal = white_noise(n, n as u64);
            let filtered = filter.filtfilt(&signal);
            assert_eq!(filtered.len(), n);
            assert!(filtered.iter().all(|v| v.is_finite()));
        }
        assert!(filter.filtfilt(&[]).is_empty());
    }

    #[test]
    fn test_filtfilt_zero_phase() {
        let fs = 250.0;
        let filter = FilterConfig::bandpass(8.0, 13.0, 4).design(fs).unwrap();
        let signal: Vec<f64> = (0..1024)
            .map(|i| (2.0 * PI * 11.5 * i as f64 / fs).sin())
            .collect();

        // Residual after the best in-phase scalar fit over the settled middle
        let residual = |output: &[f64]| -> f64 {
            let middle = 300..724;
            let dot: f64 = middle.clone().map(|i| signal[i] * output[i]).sum();
            let energy: f64 = middle.clone().map(|i| signal[i] * signal[i]).sum();
            let gain = dot / energy;
            middle
                .map(|i| (output[i] - gain * signal[i]).abs())
                .fold(0.0, f64::max)
        };

        assert!(residual(&filter.filtfilt(&signal)) < 0.01);
        // A single causal pass shifts the phase
        assert!(residual(&filter.filter(&signal)) > 0.1);
    }

    #[test]
    fn test_odd_extend() {
        let extended = odd_extend(&[1.0, 2.0, 4.0, 7.0], 2);
        assert_eq!(extended, vec![-2.0, 0.0, 1.0, 2.0, 4.0, 7.0, 10.0, 12.0]);
    }
}
