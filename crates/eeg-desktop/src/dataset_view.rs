//! Loaded dataset state and per-row analysis for the viewer

use eeg_core::{read_rows, BandRegistry, BandSpec, EegError, EegResult, SampleStats, SignalSample};
use eeg_processing::{magnitude_spectrum, Spectrum};
use std::path::{Path, PathBuf};

/// Default time window shown in the trace plot
pub const DEFAULT_TIME_WINDOW: f64 = 0.5;
/// Default upper frequency shown in the spectrum plot
pub const DEFAULT_MAX_FREQUENCY: f64 = 120.0;

/// A dataset file held in memory
#[derive(Debug, Clone)]
pub struct DatasetView {
    path: PathBuf,
    rows: Vec<Vec<f64>>,
    band: Option<BandSpec>,
}

impl DatasetView {
    /// Read every row of a dataset file
    pub fn load(path: impl AsRef<Path>) -> EegResult<Self> {
        let path = path.as_ref().to_path_buf();
        let rows = read_rows(&path)?;
        if rows.is_empty() {
            return Err(EegError::format(format!("{} contains no rows", path.display())));
        }

        let band = band_from_path(&path);
        tracing::info!(
            path = %path.display(),
            rows = rows.len(),
            band = band.map(|b| b.label.as_str()).unwrap_or("unknown"),
            "dataset loaded"
        );

        Ok(Self { path, rows, band })
    }

    #[cfg(test)]
    pub fn from_rows(path: PathBuf, rows: Vec<Vec<f64>>) -> Self {
        let band = band_from_path(&path);
        Self { path, rows, band }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_len(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Band inferred from the file name, if it names one
    pub fn band(&self) -> Option<&BandSpec> {
        self.band.as_ref()
    }

    /// Analyse one row at the given sampling rate
    pub fn analyse_row(&self, index: usize, sampling_rate: f64) -> EegResult<RowAnalysis> {
        if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
            return Err(EegError::invalid_settings(format!(
                "sampling rate must be positive, got {}",
                sampling_rate
            )));
        }
        let values = self.rows.get(index).ok_or_else(|| {
            EegError::format(format!("row {} out of range (0..{})", index, self.rows.len()))
        })?;

        Ok(RowAnalysis::new(SignalSample::new(values.clone(), sampling_rate)))
    }
}

fn band_from_path(path: &Path) -> Option<BandSpec> {
    let stem = path.file_stem()?.to_str()?;
    BandRegistry::standard().lookup(stem).ok().copied()
}

/// Time trace, statistics and spectrum of one row
#[derive(Debug, Clone)]
pub struct RowAnalysis {
    pub sample: SignalSample,
    pub stats: SampleStats,
    pub spectrum: Spectrum,
}

impl RowAnalysis {
    pub fn new(sample: SignalSample) -> Self {
        let stats = sample.stats();
        let spectrum = magnitude_spectrum(sample.values(), sample.sampling_rate());
        Self {
            sample,
            stats,
            spectrum,
        }
    }

    /// `[time, value]` points within the first `window` seconds
    pub fn trace_points(&self, window: f64) -> Vec<[f64; 2]> {
        self.sample
            .time_vector()
            .into_iter()
            .zip(self.sample.values())
            .take_while(|(t, _)| *t <= window)
            .map(|(t, &v)| [t, v])
            .collect()
    }

    /// `[frequency, magnitude]` points up to `max_frequency`
    pub fn spectrum_points(&self, max_frequency: f64) -> Vec<[f64; 2]> {
        self.spectrum
            .frequencies
            .iter()
            .zip(&self.spectrum.magnitudes)
            .take_while(|(f, _)| **f <= max_frequency)
            .map(|(&f, &m)| [f, m])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eeg_core::BandLabel;
    use std::f64::consts::PI;

    fn sine_row(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 4.0 * (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    #[test]
    fn test_band_inferred_from_file_name() {
        let view = DatasetView::from_rows(PathBuf::from("out/theta.csv"), vec![vec![0.0; 4]]);
        assert_eq!(view.band().map(|b| b.label), Some(BandLabel::Theta));

        let view = DatasetView::from_rows(PathBuf::from("out/recording.csv"), vec![vec![0.0; 4]]);
        assert!(view.band().is_none());
    }

    #[test]
    fn test_analyse_row() {
        let view = DatasetView::from_rows(
            PathBuf::from("alpha.csv"),
            vec![vec![0.0; 500], sine_row(10.0, 250.0, 500)],
        );
        assert_eq!(view.row_count(), 2);
        assert_eq!(view.row_len(), 500);

        let analysis = view.analyse_row(1, 250.0).unwrap();
        assert!((analysis.stats.max - 4.0).abs() < 0.05);
        let peak = analysis.spectrum.peak_frequency().unwrap();
        assert!((peak - 10.0).abs() < 0.5);

        assert!(view.analyse_row(2, 250.0).is_err());
        assert!(view.analyse_row(0, 0.0).is_err());
    }

    #[test]
    fn test_plot_windows() {
        let view = DatasetView::from_rows(PathBuf::from("beta.csv"), vec![sine_row(20.0, 250.0, 512)]);
        let analysis = view.analyse_row(0, 250.0).unwrap();

        let trace = analysis.trace_points(DEFAULT_TIME_WINDOW);
        assert!((125..=126).contains(&trace.len()));
        assert!(trace.iter().all(|p| p[0] <= DEFAULT_TIME_WINDOW));

        let spectrum = analysis.spectrum_points(DEFAULT_MAX_FREQUENCY);
        assert!(!spectrum.is_empty());
        assert!(spectrum.iter().all(|p| p[0] <= DEFAULT_MAX_FREQUENCY));
        assert!(spectrum.len() <= analysis.spectrum.len());
    }

    #[test]
    fn test_load_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("delta.csv");
        std::fs::write(&path, "").unwrap();
        assert!(DatasetView::load(&path).is_err());

        std::fs::write(&path, "1.000 2.000\n3.000 4.000\n").unwrap();
        let view = DatasetView::load(&path).unwrap();
        assert_eq!(view.row_count(), 2);
        assert_eq!(view.band().map(|b| b.label), Some(BandLabel::Delta));
    }
}
