//! UI components and state management

use crate::app::EegViewerApp;
use crate::dataset_view::{RowAnalysis, DEFAULT_MAX_FREQUENCY, DEFAULT_TIME_WINDOW};
use eeg_core::BandSpec;
use egui_plot::{Corner, Legend, Line, Plot, PlotPoints, VLine};

/// UI state management
#[derive(Debug)]
pub struct UIState {
    // Panel visibility
    pub show_controls: bool,
    pub show_stats: bool,
    pub show_band_edges: bool,

    // Row selection
    pub row_index: usize,
    pub sampling_rate: f64,

    // Plot settings
    pub time_window: f64,
    pub max_frequency: f64,
}

impl UIState {
    pub fn new(row_index: usize, sampling_rate: f64) -> Self {
        Self {
            show_controls: true,
            show_stats: true,
            show_band_edges: true,

            row_index,
            sampling_rate,

            time_window: DEFAULT_TIME_WINDOW,
            max_frequency: DEFAULT_MAX_FREQUENCY,
        }
    }
}

/// Time-domain trace of the selected row
pub struct TracePlot;

impl TracePlot {
    pub fn show(ui: &mut egui::Ui, analysis: &RowAnalysis, ui_state: &UIState, height: f32) {
        let points: PlotPoints = analysis.trace_points(ui_state.time_window).into();

        Plot::new("trace_plot")
            .legend(Legend::default().position(Corner::RightTop))
            .height(height)
            .x_axis_label("Time (s)")
            .y_axis_label("Amplitude")
            .include_x(0.0)
            .include_x(ui_state.time_window)
            .allow_zoom(true)
            .allow_drag(true)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(points)
                        .color(egui::Color32::from_rgb(100, 160, 255))
                        .name(format!("Row {}", ui_state.row_index)),
                );
            });
    }
}

/// Magnitude spectrum of the selected row
pub struct SpectrumPlot;

impl SpectrumPlot {
    pub fn show(
        ui: &mut egui::Ui,
        analysis: &RowAnalysis,
        band: Option<&BandSpec>,
        ui_state: &UIState,
        height: f32,
    ) {
        let points: PlotPoints = analysis.spectrum_points(ui_state.max_frequency).into();

        Plot::new("spectrum_plot")
            .legend(Legend::default().position(Corner::RightTop))
            .height(height)
            .x_axis_label("Frequency (Hz)")
            .y_axis_label("Magnitude")
            .include_x(0.0)
            .include_x(ui_state.max_frequency)
            .include_y(0.0)
            .allow_zoom(true)
            .allow_drag(true)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(points)
                        .color(egui::Color32::from_rgb(255, 160, 80))
                        .name("|X(f)|"),
                );

                if ui_state.show_band_edges {
                    if let Some(band) = band {
                        let (low, high) = band.frequency_range;
                        let edge = egui::Color32::from_rgb(150, 150, 150);
                        plot_ui.vline(VLine::new(low).color(edge).name(format!("{} edges", band.label)));
                        plot_ui.vline(VLine::new(high).color(edge));
                    }
                }
            });
    }
}

/// Row and plot controls
pub struct ControlPanel;

impl ControlPanel {
    pub fn show(ui: &mut egui::Ui, app: &mut EegViewerApp) {
        ui.heading("Dataset");
        ui.separator();

        if ui.button("Open Dataset...").clicked() {
            app.open_dialog();
        }

        let Some((row_count, row_len)) = app.dataset().map(|d| (d.row_count(), d.row_len())) else {
            return;
        };
        ui.label(format!("{} rows of {} values", row_count, row_len));

        ui.separator();

        ui.group(|ui| {
            ui.label("Row Selection");

            let mut row = app.ui_state.row_index;
            ui.horizontal(|ui| {
                ui.label("Row:");
                let changed = ui
                    .add(egui::DragValue::new(&mut row).clamp_range(0..=row_count - 1))
                    .changed();
                ui.label(format!("of {}", row_count));
                if changed {
                    app.select_row(row);
                }
            });

            ui.horizontal(|ui| {
                if ui.small_button("◀ Prev").clicked() && row > 0 {
                    app.select_row(row - 1);
                }
                if ui.small_button("Next ▶").clicked() && row + 1 < row_count {
                    app.select_row(row + 1);
                }
            });
        });

        ui.separator();

        ui.group(|ui| {
            ui.label("Signal Parameters");

            let mut rate = app.ui_state.sampling_rate;
            ui.horizontal(|ui| {
                ui.label("Sampling Rate:");
                if ui
                    .add(egui::DragValue::new(&mut rate).speed(1.0).clamp_range(1.0..=10_000.0).suffix("Hz"))
                    .changed()
                {
                    app.set_sampling_rate(rate);
                }
            });
        });

        ui.separator();

        ui.group(|ui| {
            ui.label("Plot Settings");

            let duration = app.analysis().map_or(DEFAULT_TIME_WINDOW, |a| a.sample.duration());
            ui.horizontal(|ui| {
                ui.label("Time window:");
                ui.add(
                    egui::Slider::new(&mut app.ui_state.time_window, 0.05..=duration.max(0.05))
                        .suffix("s"),
                );
            });

            let nyquist = app.ui_state.sampling_rate / 2.0;
            ui.horizontal(|ui| {
                ui.label("Max frequency:");
                ui.add(
                    egui::Slider::new(&mut app.ui_state.max_frequency, 1.0..=nyquist.max(1.0))
                        .suffix("Hz"),
                );
            });

            if ui.small_button("Reset view").clicked() {
                app.ui_state.time_window = DEFAULT_TIME_WINDOW;
                app.ui_state.max_frequency = DEFAULT_MAX_FREQUENCY;
            }
        });
    }
}

/// Statistics of the selected row
pub struct StatsPanel;

impl StatsPanel {
    pub fn show(ui: &mut egui::Ui, app: &EegViewerApp) {
        ui.heading("Signal Statistics");
        ui.separator();

        let Some(analysis) = app.analysis() else {
            ui.label("No row selected");
            return;
        };

        let stats = &analysis.stats;
        ui.label(format!("Samples: {}", analysis.sample.len()));
        ui.label(format!("Duration: {:.3}s", analysis.sample.duration()));
        ui.label(format!("Mean: {:.3}", stats.mean));
        ui.label(format!("RMS: {:.3}", stats.rms));
        ui.label(format!("Std dev: {:.3}", stats.std_dev));
        ui.label(format!("Min: {:.3}", stats.min));
        ui.label(format!("Max: {:.3}", stats.max));
        ui.label(format!("Peak-to-peak: {:.3}", stats.peak_to_peak));
        ui.label(format!("Peak |x|: {:.3}", analysis.sample.peak_abs()));

        ui.separator();
        ui.label("Spectrum:");
        ui.label(format!("  Resolution: {:.3}Hz", analysis.spectrum.resolution));
        if let Some(peak) = analysis.spectrum.peak_frequency() {
            ui.label(format!("  Peak frequency: {:.2}Hz", peak));
        }

        if let Some(band) = app.dataset().and_then(|d| d.band()) {
            let (low, high) = band.frequency_range;
            let fraction = analysis.spectrum.band_energy_fraction(low, high);
            ui.label(format!("  Power in {} band: {:.1}%", band.label, fraction * 100.0));
        }
    }
}
