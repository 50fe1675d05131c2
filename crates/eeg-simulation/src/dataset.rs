//! Per-band dataset generation and persistence

use crate::band_synthesizer::synthesize;
use crate::config::GenerationConfig;
use eeg_core::{
    dataset_path, ensure_output_dir, BandLabel, BandRegistry, BandSpec, DatasetWriter, EegError,
    EegResult, SignalSample, SynthesisSettings,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Samples generated for one band
#[derive(Debug, Clone)]
pub struct Dataset {
    pub label: BandLabel,
    pub samples: Vec<SignalSample>,
    /// Rows returned unfiltered
    pub degraded_count: usize,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Values per row, `None` when empty
    pub fn row_len(&self) -> Option<usize> {
        self.samples.first().map(SignalSample::len)
    }
}

/// Summary of one band file written by [`generate_all`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandReport {
    pub label: BandLabel,
    pub path: PathBuf,
    pub rows: usize,
    pub degraded_rows: usize,
    /// Seed of the band's random stream
    pub seed: u64,
}

/// Summary of a whole generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub sampling_rate: f64,
    pub sample_count: usize,
    pub bands: Vec<BandReport>,
}

impl GenerationReport {
    pub fn total_rows(&self) -> usize {
        self.bands.iter().map(|b| b.rows).sum()
    }

    pub fn total_degraded(&self) -> usize {
        self.bands.iter().map(|b| b.degraded_rows).sum()
    }
}

/// Synthesize `count` independent samples for one band
pub fn generate_dataset<R: Rng + ?Sized>(
    spec: &BandSpec,
    settings: &SynthesisSettings,
    count: usize,
    rng: &mut R,
) -> EegResult<Dataset> {
    let mut samples = Vec::with_capacity(count);
    let mut degraded_count = 0;

    for _ in 0..count {
        let synthesis = synthesize(spec, settings, rng)?;
        if synthesis.outcome.is_degraded() {
            degraded_count += 1;
        }

        if synthesis.sample.len() != settings.sample_count {
            return Err(EegError::format(format!(
                "{} sample has {} values, expected {}",
                spec.label,
                synthesis.sample.len(),
                settings.sample_count
            )));
        }
        samples.push(synthesis.sample);
    }

    if degraded_count > 0 {
        tracing::warn!(
            band = %spec.label,
            degraded = degraded_count,
            total = count,
            "dataset contains unfiltered rows"
        );
    }

    Ok(Dataset {
        label: spec.label,
        samples,
        degraded_count,
    })
}

/// Write every sample as one row; returns the row count
pub fn write_dataset(dataset: &Dataset, path: impl AsRef<Path>) -> EegResult<usize> {
    let mut writer = DatasetWriter::create(path.as_ref())?;
    for sample in &dataset.samples {
        writer.write_sample(sample)?;
    }
    writer.flush()?;
    Ok(writer.rows_written())
}

struct BandJob {
    spec: BandSpec,
    seed: u64,
    path: PathBuf,
}

fn run_band_job(job: BandJob, settings: SynthesisSettings, count: usize) -> EegResult<BandReport> {
    let start = Instant::now();
    tracing::info!(
        band = %job.spec.label,
        rows = count,
        path = %job.path.display(),
        "generating band dataset"
    );

    let mut rng = StdRng::seed_from_u64(job.seed);
    let dataset = generate_dataset(&job.spec, &settings, count, &mut rng)?;
    let rows = write_dataset(&dataset, &job.path)?;

    tracing::info!(
        band = %job.spec.label,
        rows,
        degraded = dataset.degraded_count,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "band dataset written"
    );

    Ok(BandReport {
        label: job.spec.label,
        path: job.path,
        rows,
        degraded_rows: dataset.degraded_count,
        seed: job.seed,
    })
}

/// Generate and write one dataset file per configured band.
///
/// Labels and settings are checked before the output directory is touched.
/// Each band gets its own random stream seeded from the master stream in
/// configured order, so output for a fixed seed does not depend on task
/// scheduling.
pub async fn generate_all(config: &GenerationConfig) -> EegResult<GenerationReport> {
    config.validate()?;
    let settings = config.settings()?;
    let specs = config.band_specs(&BandRegistry::standard())?;

    ensure_output_dir(&config.output_dir)?;

    let mut master = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let jobs: Vec<BandJob> = specs
        .into_iter()
        .map(|spec| BandJob {
            seed: master.gen(),
            path: dataset_path(&config.output_dir, spec.label, &config.extension),
            spec,
        })
        .collect();

    tracing::info!(
        bands = jobs.len(),
        rows_per_band = config.instances_per_band,
        samples_per_row = settings.sample_count,
        parallel = config.parallel,
        "generating EEG band datasets"
    );

    let count = config.instances_per_band;
    let mut bands = Vec::with_capacity(jobs.len());

    if config.parallel {
        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| tokio::task::spawn_blocking(move || run_band_job(job, settings, count)))
            .collect();

        for handle in handles {
            let report = handle
                .await
                .map_err(|e| EegError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))??;
            bands.push(report);
        }
    } else {
        for job in jobs {
            bands.push(run_band_job(job, settings, count)?);
        }
    }

    Ok(GenerationReport {
        sampling_rate: settings.sampling_rate,
        sample_count: settings.sample_count,
        bands,
    })
}
