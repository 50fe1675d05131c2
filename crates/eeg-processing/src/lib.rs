//! EEG-Processing: bandpass filtering and spectral analysis
//!
//! Butterworth bandpass design, zero-phase filtering and magnitude spectra
//! for synthesized EEG-like signals.

pub mod filters;
pub mod spectrum;

pub use filters::{
    design_with_fallback, BiquadCoeffs, BiquadState, ButterworthFilter, FilterConfig, SosFilter,
    DEFAULT_ORDERS,
};
pub use spectrum::{magnitude_spectrum, Spectrum};
