//! EEG-Core: Foundation types for band-limited EEG signal synthesis
//!
//! Band registry, synthesis settings, signal samples and the flat numeric
//! dataset format shared by the rest of the workspace.

pub mod band;
pub mod error;
pub mod format;
pub mod settings;
pub mod signal_sample;

pub use band::*;
pub use error::{EegError, EegResult};
pub use format::{
    dataset_path, ensure_output_dir, format_row, parse_row, read_row, read_rows, DatasetReader,
    DatasetWriter, DEFAULT_EXTENSION,
};
pub use settings::SynthesisSettings;
pub use signal_sample::*;
