//! Control Panel Widget
//! Left side panel with the data source, statistics and dashboard controls.

use crate::analysis::AnalysisSummary;
use crate::charts::{format_y_label, PlotMode};
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// User settings for the dashboard
#[derive(Clone)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub name: String,
    pub mode: PlotMode,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            csv_path: None,
            name: "Stock Data".to_string(),
            mode: PlotMode::Both,
        }
    }
}

/// Left side control panel with file selection and export controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub summary: Option<AnalysisSummary>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            summary: None,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_summary(&mut self, summary: Option<AnalysisSummary>) {
        self.summary = summary;
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📈 Stock Market Analysis")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Daily OHLCV").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label("Name:");
            if ui.text_edit_singleline(&mut self.settings.name).lost_focus() {
                action = ControlPanelAction::Rename;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Statistics Section =====
        ui.label(RichText::new("🔢 Statistics").size(14.0).strong());
        ui.add_space(5.0);

        match &self.summary {
            Some(summary) => {
                egui::Grid::new("summary_grid")
                    .num_columns(2)
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Bars");
                        ui.label(summary.bars.to_string());
                        ui.end_row();
                        ui.label("From");
                        ui.label(summary.first_date.to_string());
                        ui.end_row();
                        ui.label("To");
                        ui.label(summary.last_date.to_string());
                        ui.end_row();
                        ui.label("Median spread");
                        ui.label(format_y_label(summary.median_spread));
                        ui.end_row();
                        ui.label("Open std");
                        ui.label(format_y_label(summary.open_std));
                        ui.end_row();
                    });
            }
            None => {
                ui.label(RichText::new("No data loaded").color(Color32::GRAY));
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Dashboard Section =====
        ui.label(RichText::new("⚙️ Dashboard").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.label("Charts:");
            ComboBox::from_id_salt("plot_mode")
                .width(180.0)
                .selected_text(self.settings.mode.name())
                .show_ui(ui, |ui| {
                    for mode in PlotMode::ALL {
                        ui.selectable_value(&mut self.settings.mode, mode, mode.name());
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        let export_enabled = self.summary.is_some();
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Dashboard PNG").size(14.0))
                    .min_size(egui::vec2(200.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportDashboard;
                }

                ui.add_space(8.0);

                let button = egui::Button::new(RichText::new("📄 Export Summary JSON").size(14.0))
                    .min_size(egui::vec2(200.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportSummary;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Loaded") || self.status.starts_with("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Rename,
    ExportDashboard,
    ExportSummary,
}
