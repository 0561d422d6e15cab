//! Chart Viewer Widget
//! Right side panel showing the 2x2 stock dashboard using egui_plot.
//! Cells the selected mode leaves out stay blank so the grid never shifts.

use crate::charts::{ChartPlotter, Panel, PlotMode};
use crate::data::StockSeries;
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const MIN_CHART_HEIGHT: f32 = 220.0;
/// Room taken by a card's title and frame margins.
const CARD_CHROME: f32 = 60.0;

/// Dashboard display area.
#[derive(Default)]
pub struct ChartViewer {
    name: String,
    series: Option<StockSeries>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.series = None;
        self.name.clear();
    }

    pub fn set_series(&mut self, name: impl Into<String>, series: StockSeries) {
        self.name = name.into();
        self.series = Some(series);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Draw the dashboard for `mode`.
    pub fn show(&self, ui: &mut egui::Ui, mode: PlotMode) {
        let Some(series) = &self.series else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&self.name).size(22.0).strong());
        });
        ui.add_space(CHART_SPACING);

        let row_height = ((ui.available_height() - CHART_SPACING) / 2.0).max(MIN_CHART_HEIGHT);
        let chart_height = row_height - CARD_CHROME;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for row in 0..2 {
                    ui.columns(2, |columns| {
                        for panel in Panel::ALL.into_iter().filter(|p| p.cell().0 == row) {
                            let ui = &mut columns[panel.cell().1];
                            if mode.includes(panel) {
                                Self::draw_card(ui, series, panel, chart_height);
                            } else {
                                ui.allocate_space(egui::vec2(ui.available_width(), row_height));
                            }
                        }
                    });
                    ui.add_space(CHART_SPACING);
                }
            });
    }

    fn draw_card(ui: &mut egui::Ui, series: &StockSeries, panel: Panel, height: f32) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(90)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ChartPlotter::draw_panel(ui, series, panel, height);
            });
    }
}
