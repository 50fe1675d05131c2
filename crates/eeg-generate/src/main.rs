//! EEG dataset generator

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Args;
use eeg_simulation::{generate_all, GenerationConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eeg_generate=info,eeg_simulation=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let base = match &args.config {
        Some(path) => {
            let config = GenerationConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            tracing::info!(path = %path.display(), "configuration loaded");
            config
        }
        None => GenerationConfig::default(),
    };
    let config = args.apply(base);

    println!("Generating EEG band datasets...");
    println!(
        "Bands: {} | {} samples per band | {} Hz for {} s",
        config.bands.join(", "),
        config.instances_per_band,
        config.sampling_rate,
        config.duration
    );

    let report = generate_all(&config)
        .await
        .context("dataset generation failed")?;

    for band in &report.bands {
        let note = if band.degraded_rows > 0 {
            format!(" ({} unfiltered)", band.degraded_rows)
        } else {
            String::new()
        };
        println!("  {:<6} {:>5} rows -> {}{}", band.label.as_str(), band.rows, band.path.display(), note);
    }

    println!(
        "Done: {} rows of {} values written to {}",
        report.total_rows(),
        report.sample_count,
        config.output_dir.display()
    );
    if report.total_degraded() > 0 {
        println!(
            "Warning: {} rows could not be band-limited at {} Hz and were saved as raw noise",
            report.total_degraded(),
            report.sampling_rate
        );
    }

    Ok(())
}
