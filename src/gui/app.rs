//! Stock Market Analysis Main Application
//! Main window with control panel and dashboard viewer.

use crate::analysis::StockMarketAnalysis;
use crate::config::ChartConfig;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Complete(Box<StockMarketAnalysis>),
    Error(String),
}

enum LoadPoll {
    Pending,
    Finished(LoadResult),
}

/// A loader thread that hangs up without sending has died; that ends the load too.
fn poll_load(rx: &Receiver<LoadResult>) -> LoadPoll {
    match rx.try_recv() {
        Ok(result) => LoadPoll::Finished(result),
        Err(TryRecvError::Empty) => LoadPoll::Pending,
        Err(TryRecvError::Disconnected) => {
            tracing::error!("CSV loader thread exited without a result");
            LoadPoll::Finished(LoadResult::Error(
                "loader stopped before finishing".to_string(),
            ))
        }
    }
}

/// Main application window.
pub struct StockAnalysisApp {
    config: ChartConfig,
    analysis: Option<StockMarketAnalysis>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl StockAnalysisApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: ChartConfig,
        initial_csv: Option<PathBuf>,
    ) -> Self {
        let mut app = Self {
            config,
            analysis: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };
        if let Some(path) = initial_csv {
            app.start_loading(path);
        }
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_loading(path);
        }
    }

    /// Load and parse the file on a background thread.
    fn start_loading(&mut self, path: PathBuf) {
        self.analysis = None;
        self.chart_viewer.clear();
        self.control_panel.set_summary(None);
        self.control_panel.settings.csv_path = Some(path.clone());
        self.control_panel.set_status("Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let name = self.control_panel.settings.name.clone();
        let config = self.config.clone();

        thread::spawn(move || {
            let result = match StockMarketAnalysis::new(name, &path) {
                Ok(analysis) => LoadResult::Complete(Box::new(analysis.with_config(config))),
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "failed to load stock data");
                    LoadResult::Error(e.to_string())
                }
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = &self.load_rx else {
            return;
        };
        let result = match poll_load(rx) {
            LoadPoll::Pending => return,
            LoadPoll::Finished(result) => result,
        };
        self.load_rx = None;
        self.is_loading = false;

        match result {
            LoadResult::Complete(analysis) => {
                let summary = analysis.summary();
                self.control_panel.set_status(format!(
                    "Loaded {} bars ({} to {})",
                    summary.bars, summary.first_date, summary.last_date
                ));
                self.control_panel.set_summary(Some(summary));
                self.chart_viewer
                    .set_series(analysis.name(), analysis.data().clone());
                self.analysis = Some(*analysis);
            }
            LoadResult::Error(error) => {
                self.control_panel.set_status(format!("Error: {}", error));
            }
        }
    }

    fn handle_rename(&mut self) {
        let name = self.control_panel.settings.name.clone();
        if let Some(analysis) = &mut self.analysis {
            analysis.set_name(name.clone());
            self.control_panel.set_summary(Some(analysis.summary()));
            self.chart_viewer.set_name(name);
        }
    }

    /// Render the dashboard for the selected mode and open it.
    fn handle_export_dashboard(&mut self) {
        let Some(analysis) = &self.analysis else {
            self.control_panel.set_status("No data to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("stock_dashboard.png")
            .save_file()
        else {
            return;
        };

        let mode = self.control_panel.settings.mode;
        match analysis.plot_combined_graph(mode, &path) {
            Ok(()) => {
                self.control_panel
                    .set_status(format!("Exported {}", display_name(&path)));
                if let Err(e) = open::that(&path) {
                    tracing::warn!(path = %path.display(), error = %e, "could not open exported dashboard");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "dashboard export failed");
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    fn handle_export_summary(&mut self) {
        let Some(analysis) = &self.analysis else {
            self.control_panel.set_status("No data to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("stock_summary.json")
            .save_file()
        else {
            return;
        };

        let written = analysis
            .summary()
            .to_json_pretty()
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => self
                .control_panel
                .set_status(format!("Exported {}", display_name(&path))),
            Err(e) => self.control_panel.set_status(format!("Error: {}", e)),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

impl eframe::App for StockAnalysisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Rename => self.handle_rename(),
                        ControlPanelAction::ExportDashboard => self.handle_export_dashboard(),
                        ControlPanelAction::ExportSummary => self.handle_export_summary(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        let mode = self.control_panel.settings.mode;
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, mode);
        });
    }
}
