//! Viewer state and top-level layout

use crate::dataset_view::{DatasetView, RowAnalysis};
use crate::ui::{ControlPanel, SpectrumPlot, StatsPanel, TracePlot, UIState};
use std::path::{Path, PathBuf};

/// Main application state
pub struct EegViewerApp {
    pub ui_state: UIState,
    dataset: Option<DatasetView>,
    analysis: Option<RowAnalysis>,
    last_error: Option<String>,
}

impl EegViewerApp {
    pub fn new(path: Option<PathBuf>, row: usize, sampling_rate: f64) -> Self {
        let mut app = Self {
            ui_state: UIState::new(row, sampling_rate),
            dataset: None,
            analysis: None,
            last_error: None,
        };
        if let Some(path) = path {
            app.load(&path);
        }
        app
    }

    pub fn dataset(&self) -> Option<&DatasetView> {
        self.dataset.as_ref()
    }

    pub fn analysis(&self) -> Option<&RowAnalysis> {
        self.analysis.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Ask the user for a dataset file
    pub fn open_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("EEG dataset", &["csv", "txt"])
            .pick_file()
        {
            self.load(&path);
        }
    }

    pub fn load(&mut self, path: &Path) {
        match DatasetView::load(path) {
            Ok(view) => {
                if self.ui_state.row_index >= view.row_count() {
                    self.ui_state.row_index = 0;
                }
                self.dataset = Some(view);
                self.refresh();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load dataset");
                self.last_error = Some(format!("Failed to load {}: {}", path.display(), e));
            }
        }
    }

    pub fn select_row(&mut self, index: usize) {
        self.ui_state.row_index = index;
        self.refresh();
    }

    pub fn set_sampling_rate(&mut self, rate: f64) {
        self.ui_state.sampling_rate = rate;
        self.refresh();
    }

    /// Recompute the analysis of the selected row
    pub fn refresh(&mut self) {
        let Some(dataset) = &self.dataset else {
            self.analysis = None;
            return;
        };

        match dataset.analyse_row(self.ui_state.row_index, self.ui_state.sampling_rate) {
            Ok(analysis) => {
                self.analysis = Some(analysis);
                self.last_error = None;
            }
            Err(e) => {
                self.analysis = None;
                self.last_error = Some(e.to_string());
            }
        }
    }
}

impl eframe::App for EegViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Dataset...").clicked() {
                        ui.close_menu();
                        self.open_dialog();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.ui_state.show_controls, "Show Controls");
                    ui.checkbox(&mut self.ui_state.show_stats, "Show Statistics");
                    ui.checkbox(&mut self.ui_state.show_band_edges, "Show Band Edges");
                });

                ui.separator();

                match &self.dataset {
                    Some(dataset) => {
                        ui.label(format!("{}", dataset.path().display()));
                        if let Some(band) = dataset.band() {
                            ui.separator();
                            ui.label(format!(
                                "{} band ({:.1}-{:.1} Hz)",
                                band.label, band.frequency_range.0, band.frequency_range.1
                            ));
                        }
                    }
                    None => {
                        ui.label("No dataset loaded");
                    }
                }
            });
        });

        if let Some(message) = self.last_error().map(str::to_owned) {
            egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
                ui.colored_label(egui::Color32::from_rgb(255, 120, 120), message);
            });
        }

        if self.ui_state.show_controls {
            egui::SidePanel::left("control_panel")
                .resizable(true)
                .default_width(260.0)
                .show(ctx, |ui| {
                    ControlPanel::show(ui, self);
                });
        }

        if self.ui_state.show_stats {
            egui::SidePanel::right("stats_panel")
                .resizable(true)
                .default_width(240.0)
                .show(ctx, |ui| {
                    StatsPanel::show(ui, self);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(analysis) = &self.analysis else {
                ui.vertical_centered(|ui| {
                    ui.add_space(200.0);
                    ui.heading("Open a dataset file to inspect its rows");
                    ui.add_space(20.0);
                    if ui.button("Open Dataset...").clicked() {
                        self.open_dialog();
                    }
                });
                return;
            };

            let band = self.dataset.as_ref().and_then(|d| d.band()).copied();
            let half = (ui.available_height() - 40.0).max(200.0) / 2.0;

            ui.label("Time Domain");
            TracePlot::show(ui, analysis, &self.ui_state, half);
            ui.separator();
            ui.label("Magnitude Spectrum");
            SpectrumPlot::show(ui, analysis, band.as_ref(), &self.ui_state, half);
        });
    }
}
