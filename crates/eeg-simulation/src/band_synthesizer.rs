//! Band-limited EEG-like signal synthesizer
//!
//! White noise with one random gain, a Butterworth bandpass applied forward
//! and backward, then a rescale so the peak lands on a second, independent
//! amplitude draw.

use eeg_core::{peak_abs, BandSpec, EegError, EegResult, SignalSample, SynthesisSettings};
use eeg_processing::{design_with_fallback, DEFAULT_ORDERS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use std::fmt;

/// Why a sample was returned without filtering
#[derive(Debug, Clone, PartialEq)]
pub enum DegradedReason {
    /// Normalized cutoffs fail `low < 1`, `high < 1`, `low < high`
    CutoffsOutOfRange {
        low_norm: f64,
        high_norm: f64,
        nyquist: f64,
    },
    /// Every filter order was rejected by the design checks
    DesignRejected { reason: String },
    /// Filtering produced NaN or infinite values
    NonFiniteOutput,
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedReason::CutoffsOutOfRange {
                low_norm,
                high_norm,
                nyquist,
            } => write!(
                f,
                "normalized cutoffs ({:.4}, {:.4}) invalid for Nyquist {}Hz",
                low_norm, high_norm, nyquist
            ),
            DegradedReason::DesignRejected { reason } => {
                write!(f, "bandpass design rejected: {}", reason)
            }
            DegradedReason::NonFiniteOutput => write!(f, "filtered output was not finite"),
        }
    }
}

/// How a sample was produced
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisOutcome {
    /// Bandpass-filtered with the given prototype order
    Filtered { order: usize },
    /// Raw scaled noise, unfiltered
    Degraded(DegradedReason),
}

impl SynthesisOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, SynthesisOutcome::Degraded(_))
    }
}

/// Result of one synthesizer call
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub sample: SignalSample,
    pub outcome: SynthesisOutcome,
    /// Amplitude draw times noise scale applied to the raw noise
    pub raw_gain: f64,
    /// Peak amplitude the filtered sample was rescaled to
    pub target_amplitude: Option<f64>,
}

/// Uniform draw from `[min, max)`; a zero-width range yields `min`
pub fn draw_amplitude<R: Rng + ?Sized>(range: (f64, f64), rng: &mut R) -> f64 {
    let (min, max) = range;
    if min == max {
        min
    } else {
        rng.gen_range(min..max)
    }
}

/// Standard normal noise sharing one gain drawn from the amplitude range
pub fn draw_raw_noise<R: Rng + ?Sized>(
    spec: &BandSpec,
    sample_count: usize,
    rng: &mut R,
) -> (Vec<f64>, f64) {
    let gain = draw_amplitude(spec.amplitude_range, rng) * spec.noise_scale;
    let noise = (0..sample_count)
        .map(|_| {
            let z: f64 = StandardNormal.sample(&mut *rng);
            z * gain
        })
        .collect();
    (noise, gain)
}

fn validate_band(spec: &BandSpec) -> EegResult<()> {
    let (min, max) = spec.amplitude_range;
    if !(min.is_finite() && max.is_finite() && min <= max) {
        return Err(EegError::config(format!(
            "{}: amplitude range ({}, {}) is not an ordered finite interval",
            spec.label, min, max
        )));
    }
    if !spec.noise_scale.is_finite() {
        return Err(EegError::config(format!(
            "{}: noise scale {} is not finite",
            spec.label, spec.noise_scale
        )));
    }
    Ok(())
}

fn degraded(
    spec: &BandSpec,
    settings: &SynthesisSettings,
    raw: Vec<f64>,
    raw_gain: f64,
    reason: DegradedReason,
) -> Synthesis {
    tracing::warn!(
        band = %spec.label,
        low_hz = spec.frequency_range.0,
        high_hz = spec.frequency_range.1,
        nyquist_hz = settings.nyquist(),
        %reason,
        "returning unfiltered noise"
    );

    Synthesis {
        sample: SignalSample::new(raw, settings.sampling_rate),
        outcome: SynthesisOutcome::Degraded(reason),
        raw_gain,
        target_amplitude: None,
    }
}

/// Synthesize one band-limited sample.
///
/// Settings are validated before anything is drawn from `rng`. When the band
/// cannot be filtered at this sampling rate the raw noise is returned as is
/// and the outcome is [`SynthesisOutcome::Degraded`].
pub fn synthesize<R: Rng + ?Sized>(
    spec: &BandSpec,
    settings: &SynthesisSettings,
    rng: &mut R,
) -> EegResult<Synthesis> {
    settings.validate()?;
    validate_band(spec)?;

    let (raw, raw_gain) = draw_raw_noise(spec, settings.sample_count, rng);

    let nyquist = settings.nyquist();
    let low_norm = spec.frequency_range.0 / nyquist;
    let high_norm = spec.frequency_range.1 / nyquist;

    if !(low_norm < 1.0 && high_norm < 1.0 && low_norm < high_norm) {
        let reason = DegradedReason::CutoffsOutOfRange {
            low_norm,
            high_norm,
            nyquist,
        };
        return Ok(degraded(spec, settings, raw, raw_gain, reason));
    }

    let filter = match design_with_fallback(low_norm, high_norm, &DEFAULT_ORDERS) {
        Ok(filter) => filter,
        Err(e) => {
            let reason = DegradedReason::DesignRejected {
                reason: e.to_string(),
            };
            return Ok(degraded(spec, settings, raw, raw_gain, reason));
        }
    };

    let filtered = filter.filtfilt(&raw);
    let peak = peak_abs(&filtered);

    // All-zero output is returned unscaled
    let (values, target_amplitude): (Vec<f64>, Option<f64>) = if peak > 0.0 {
        let target = draw_amplitude(spec.amplitude_range, rng);
        let scale = target / peak;
        (filtered.iter().map(|v| v * scale).collect(), Some(target))
    } else {
        (filtered, None)
    };

    if values.iter().any(|v| !v.is_finite()) {
        return Ok(degraded(
            spec,
            settings,
            raw,
            raw_gain,
            DegradedReason::NonFiniteOutput,
        ));
    }

    Ok(Synthesis {
        sample: SignalSample::new(values, settings.sampling_rate),
        outcome: SynthesisOutcome::Filtered {
            order: filter.order() / 2,
        },
        raw_gain,
        target_amplitude,
    })
}

/// Synthesizer owning its settings and random stream
pub struct BandSynthesizer {
    settings: SynthesisSettings,
    rng: StdRng,
}

impl BandSynthesizer {
    /// Seeded from `seed`, or from OS entropy when `None`
    pub fn new(settings: SynthesisSettings, seed: Option<u64>) -> EegResult<Self> {
        settings.validate()?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(BandSynthesizer { settings, rng })
    }

    pub fn synthesize(&mut self, spec: &BandSpec) -> EegResult<Synthesis> {
        synthesize(spec, &self.settings, &mut self.rng)
    }

    /// Restart the random stream
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn settings(&self) -> &SynthesisSettings {
        &self.settings
    }
}
