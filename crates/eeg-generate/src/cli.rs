//! Command-line argument parsing.

use clap::Parser;
use eeg_simulation::GenerationConfig;
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "eeg-generate")]
#[command(about = "Generate band-limited EEG-like signal datasets", long_about = None)]
pub struct Args {
    /// JSON configuration file; flags below override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory receiving one file per band
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Samples written per band
    #[arg(long, value_name = "COUNT")]
    pub instances: Option<usize>,

    /// Master seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Band to generate (repeatable); all standard bands when omitted
    #[arg(long = "band", value_name = "LABEL")]
    pub bands: Vec<String>,

    /// Sampling rate in Hz
    #[arg(long, value_name = "HZ")]
    pub sampling_rate: Option<f64>,

    /// Record duration in seconds
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f64>,

    /// Generate bands one after another
    #[arg(long)]
    pub sequential: bool,
}

impl Args {
    /// Apply command-line overrides on top of a base configuration
    pub fn apply(&self, mut config: GenerationConfig) -> GenerationConfig {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(instances) = self.instances {
            config.instances_per_band = instances;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if !self.bands.is_empty() {
            config.bands = self.bands.clone();
        }
        if let Some(rate) = self.sampling_rate {
            config.sampling_rate = rate;
        }
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if self.sequential {
            config.parallel = false;
        }
        config
    }
}
