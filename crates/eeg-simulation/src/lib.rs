//! EEG-Simulation: band-limited EEG signal synthesis
//!
//! Filtered-noise synthesis per frequency band, run configuration and
//! dataset generation with one output file per band.

pub mod band_synthesizer;
pub mod config;
pub mod dataset;

pub use band_synthesizer::*;
pub use config::GenerationConfig;
pub use dataset::*;
