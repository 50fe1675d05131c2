//! Error handling for the EEG synthesis workspace

use thiserror::Error;

/// Result type alias for EEG workspace operations
pub type EegResult<T> = Result<T, EegError>;

/// Error type for all fatal synthesis, filtering and persistence failures.
///
/// Degraded (unfiltered) synthesis output is not an error; it is reported
/// through the synthesizer's outcome instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EegError {
    /// Non-positive sampling rate or sample count
    #[error("Invalid synthesis settings: {reason}")]
    InvalidSettings { reason: String },

    /// Label outside the fixed band registry
    #[error("Unknown band '{label}'")]
    UnknownBand { label: String },

    /// Filter coefficients could not be designed or are unstable
    #[error("Filter design failed: {reason}")]
    FilterDesign { reason: String },

    /// Malformed or inconsistent dataset row
    #[error("Format error: {reason}")]
    Format { reason: String },

    /// Invalid generation configuration
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl EegError {
    pub fn invalid_settings(reason: impl Into<String>) -> Self {
        EegError::InvalidSettings { reason: reason.into() }
    }

    pub fn filter_design(reason: impl Into<String>) -> Self {
        EegError::FilterDesign { reason: reason.into() }
    }

    pub fn format(reason: impl Into<String>) -> Self {
        EegError::Format { reason: reason.into() }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        EegError::Config { reason: reason.into() }
    }
}
