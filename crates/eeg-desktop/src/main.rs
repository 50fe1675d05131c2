//! EEG dataset viewer

mod app;
mod dataset_view;
mod ui;

use app::EegViewerApp;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "eeg-desktop")]
#[command(about = "Inspect generated EEG band datasets", long_about = None)]
struct Args {
    /// Dataset file to open on start
    path: Option<PathBuf>,

    /// Row to display first
    #[arg(long, default_value = "0")]
    row: usize,

    /// Sampling rate used to interpret the rows (Hz)
    #[arg(long, value_name = "HZ", default_value = "250")]
    sampling_rate: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("eeg_desktop=info")),
        )
        .init();

    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1300.0, 850.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "EEG Dataset Viewer",
        options,
        Box::new(move |_cc| {
            let app = EegViewerApp::new(args.path, args.row, args.sampling_rate);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run native app: {}", e))?;

    Ok(())
}
