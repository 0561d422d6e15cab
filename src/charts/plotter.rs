//! Chart Plotter Module
//! Interactive versions of the four stock charts using egui_plot.

use crate::charts::candles::{self, Span};
use crate::charts::format::{date_to_x, format_date_tick, format_y_label};
use crate::charts::layout::Panel;
use crate::charts::style::{self, CandleStyle, Rgb};
use crate::data::{weekday_name, StockSeries, TRADING_WEEKDAYS};
use egui::{Color32, RichText, Stroke};
use egui_plot::{Bar, BarChart, GridMark, HPlacement, Line, LineStyle, Plot, PlotPoints, Polygon};

/// Share of the volume-vs-price card given to the volume strip.
const VOLUME_STRIP: f32 = 0.3;
/// Link group tying the volume strip's x axis to the candles above it.
const VOLUME_LINK: &str = "candlestick_vs_volume_x";

pub fn color32(c: Rgb, alpha: f64) -> Color32 {
    Color32::from_rgba_unmultiplied(c.0, c.1, c.2, (alpha * 255.0).round() as u8)
}

/// Creates interactive stock charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw one chart with its title.
    pub fn draw_panel(ui: &mut egui::Ui, series: &StockSeries, panel: Panel, height: f32) {
        ui.label(RichText::new(panel.title()).size(14.0).strong());
        let labels_right = panel.labels_on_right();
        match panel {
            Panel::Candlestick => Self::draw_candlestick_chart(ui, series, height),
            Panel::ClosePrice => Self::draw_close_price_chart(ui, series, height, labels_right),
            Panel::CandlestickVsVolume => Self::draw_candlestick_vs_volume(ui, series, height),
            Panel::VolumeDistribution => {
                Self::draw_volume_distribution_chart(ui, series, height, labels_right)
            }
        }
    }

    fn date_plot(id: &str, height: f32) -> Plot {
        Plot::new(id)
            .height(height)
            .allow_scroll(false)
            .x_axis_formatter(|mark, _range| format_date_tick(mark.value))
            .y_axis_formatter(|mark, _range| format_y_label(mark.value))
    }

    fn span_bar(span: &Span, fill: Color32, stroke: Stroke) -> Bar {
        Bar::new(span.x, span.height())
            .base_offset(span.bottom)
            .width(span.width)
            .fill(fill)
            .stroke(stroke)
    }

    /// Body and shadow bars for every candle.
    pub fn candle_bars(series: &StockSeries, style: &CandleStyle) -> Vec<Bar> {
        candles::candle_glyphs(series)
            .iter()
            .flat_map(|glyph| {
                let fill = color32(style.fill(glyph.direction), style.alpha);
                let stroke = style
                    .outline_for(glyph.direction)
                    .map(|c| Stroke::new(1.0, color32(c, 1.0)))
                    .unwrap_or(Stroke::NONE);
                glyph
                    .rects()
                    .into_iter()
                    .map(move |span| Self::span_bar(&span, fill, stroke))
            })
            .collect()
    }

    pub fn draw_candlestick_chart(ui: &mut egui::Ui, series: &StockSeries, height: f32) {
        let bars = Self::candle_bars(series, &CandleStyle::colored());
        Self::date_plot("candlestick", height).show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Candles"));
        });
    }

    /// Monochrome candles above a volume strip sharing the date axis.
    pub fn draw_candlestick_vs_volume(ui: &mut egui::Ui, series: &StockSeries, height: f32) {
        let volume_height = height * VOLUME_STRIP;
        let candles = Self::candle_bars(series, &CandleStyle::monochrome());
        Self::date_plot("candlestick_vs_volume", height - volume_height)
            .link_axis(VOLUME_LINK, [true, false])
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(candles).name("Candles"));
            });

        let volume: Vec<Bar> = candles::volume_spans(series)
            .iter()
            .map(|(span, direction)| {
                let fill = color32(style::volume_color(*direction), style::VOLUME_ALPHA);
                Self::span_bar(span, fill, Stroke::NONE)
            })
            .collect();
        Self::date_plot("candlestick_volume", volume_height)
            .link_axis(VOLUME_LINK, [true, false])
            .y_axis_position(HPlacement::Right)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(volume).name("Volume"));
            });
    }

    pub fn draw_close_price_chart(
        ui: &mut egui::Ui,
        series: &StockSeries,
        height: f32,
        labels_right: bool,
    ) {
        let points = |value: fn(&crate::data::Bar) -> f64| -> Vec<[f64; 2]> {
            series.iter().map(|b| [date_to_x(b.date), value(b)]).collect()
        };
        let highs = points(|b| b.high);
        let lows = points(|b| b.low);
        let closes = points(|b| b.close);

        let band_color = color32(style::SPREAD_PINK, style::BAND_ALPHA);
        let spread_color = color32(style::SPREAD_PINK, 1.0);

        let mut plot = Self::date_plot("close_price", height);
        if labels_right {
            plot = plot.y_axis_position(HPlacement::Right);
        }

        plot.show(ui, |plot_ui| {
            // egui fills convex shapes only, so the band is one quad per day pair.
            for (h, l) in highs.windows(2).zip(lows.windows(2)) {
                let quad: PlotPoints = vec![h[0], h[1], l[1], l[0]].into();
                plot_ui.polygon(Polygon::new(quad).fill_color(band_color).stroke(Stroke::NONE));
            }
            for (name, points) in [("High", &highs), ("Low", &lows)] {
                plot_ui.line(
                    Line::new(points.iter().copied().collect::<PlotPoints>())
                        .color(spread_color)
                        .style(LineStyle::dotted_dense())
                        .name(name),
                );
            }
            plot_ui.line(
                Line::new(closes.iter().copied().collect::<PlotPoints>())
                    .color(color32(style::CLOSE_PURPLE, style::CLOSE_ALPHA))
                    .width(2.0)
                    .name("Close"),
            );
        });
    }

    pub fn draw_volume_distribution_chart(
        ui: &mut egui::Ui,
        series: &StockSeries,
        height: f32,
        labels_right: bool,
    ) {
        let fill = color32(style::WEEKDAY_BLUE, style::WEEKDAY_ALPHA);
        let bars: Vec<Bar> = series
            .volume_by_weekday()
            .iter()
            .enumerate()
            .map(|(i, (day, volume))| {
                Bar::new(i as f64, *volume)
                    .width(0.5)
                    .fill(fill)
                    .name(weekday_name(*day))
            })
            .collect();

        let mut plot = Plot::new("volume_distribution")
            .height(height)
            .allow_scroll(false)
            .allow_drag(false)
            .include_x(-0.5)
            .include_x(TRADING_WEEKDAYS.len() as f64 - 0.5)
            .include_y(0.0)
            .x_grid_spacer(|_input| {
                (0..TRADING_WEEKDAYS.len())
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .x_axis_formatter(|mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                    TRADING_WEEKDAYS
                        .get(idx as usize)
                        .map(|d| weekday_name(*d).to_string())
                        .unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .y_axis_formatter(|mark, _range| format_y_label(mark.value));
        if labels_right {
            plot = plot.y_axis_position(HPlacement::Right);
        }

        plot.show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Volume"));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Bar as DailyBar;
    use chrono::NaiveDate;

    fn series() -> StockSeries {
        let day = |d| NaiveDate::from_ymd_opt(2023, 8, d).unwrap();
        StockSeries::from_bars(vec![
            DailyBar::new(day(1), 10.0, 12.0, 9.0, 11.0, 100.0),
            DailyBar::new(day(2), 11.0, 12.0, 9.0, 10.0, 200.0),
        ])
        .unwrap()
    }

    #[test]
    fn three_bars_per_candle() {
        let bars = ChartPlotter::candle_bars(&series(), &CandleStyle::colored());
        assert_eq!(bars.len(), 6);
    }

    #[test]
    fn every_panel_draws_headless() {
        let ctx = egui::Context::default();
        let series = series();
        // Second pass reads the linked bounds stored by the first.
        for _ in 0..2 {
            let output = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    for panel in Panel::ALL {
                        ChartPlotter::draw_panel(ui, &series, panel, 200.0);
                    }
                });
            });
            assert!(!output.shapes.is_empty());
        }
    }

    #[test]
    fn color32_applies_alpha() {
        let c = color32(style::UP_GREEN, 1.0);
        assert_eq!(c, Color32::from_rgb(0x4d, 0xaf, 0x4a));
        assert_eq!(color32(style::INK, 0.5).a(), 128);
    }
}
