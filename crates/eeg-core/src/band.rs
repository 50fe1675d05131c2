//! EEG frequency bands and their synthesis parameters

use crate::error::{EegError, EegResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Canonical EEG spectral bands, one output class each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandLabel {
    Delta,
    Theta,
    Alpha,
    Beta,
    Gamma,
}

impl BandLabel {
    /// All labels in canonical order (lowest band first)
    pub const ALL: [BandLabel; 5] = [
        BandLabel::Delta,
        BandLabel::Theta,
        BandLabel::Alpha,
        BandLabel::Beta,
        BandLabel::Gamma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BandLabel::Delta => "delta",
            BandLabel::Theta => "theta",
            BandLabel::Alpha => "alpha",
            BandLabel::Beta => "beta",
            BandLabel::Gamma => "gamma",
        }
    }
}

impl FromStr for BandLabel {
    type Err = EegError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        BandLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == normalized)
            .ok_or_else(|| EegError::UnknownBand {
                label: s.to_string(),
            })
    }
}

impl std::fmt::Display for BandLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synthesis parameters for one band.
///
/// Ranges are not validated here: whether a frequency range can be filtered
/// depends on the sampling rate, so the synthesizer decides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSpec {
    pub label: BandLabel,
    /// (low, high) in Hz
    pub frequency_range: (f64, f64),
    /// (min, max) in µV
    pub amplitude_range: (f64, f64),
    /// Multiplier on raw noise amplitude before filtering
    pub noise_scale: f64,
}

impl BandSpec {
    pub const fn new(
        label: BandLabel,
        frequency_range: (f64, f64),
        amplitude_range: (f64, f64),
        noise_scale: f64,
    ) -> Self {
        Self {
            label,
            frequency_range,
            amplitude_range,
            noise_scale,
        }
    }
}

const STANDARD_BANDS: [BandSpec; 5] = [
    BandSpec::new(BandLabel::Delta, (0.5, 4.0), (10.0, 50.0), 0.5),
    BandSpec::new(BandLabel::Theta, (4.0, 8.0), (8.0, 30.0), 0.7),
    BandSpec::new(BandLabel::Alpha, (8.0, 13.0), (5.0, 20.0), 1.0),
    BandSpec::new(BandLabel::Beta, (13.0, 30.0), (2.0, 15.0), 1.5),
    BandSpec::new(BandLabel::Gamma, (30.0, 100.0), (0.5, 8.0), 2.0),
];

/// Immutable band configuration table
#[derive(Debug, Clone)]
pub struct BandRegistry {
    bands: Vec<BandSpec>,
}

impl BandRegistry {
    /// The canonical delta..gamma table
    pub fn standard() -> Self {
        Self {
            bands: STANDARD_BANDS.to_vec(),
        }
    }

    /// Look up a band by its textual label
    pub fn lookup(&self, label: &str) -> EegResult<&BandSpec> {
        let parsed: BandLabel = label.parse()?;
        Ok(self.get(parsed))
    }

    /// Look up a band by label; every label has an entry
    pub fn get(&self, label: BandLabel) -> &BandSpec {
        // The table holds one entry per label in canonical order.
        &self.bands[label as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &BandSpec> {
        self.bands.iter()
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

impl Default for BandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
