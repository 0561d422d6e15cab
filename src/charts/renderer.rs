//! Static Chart Renderer
//! Draws the four stock charts and the 2x2 dashboard with plotters.
//!
//! Layout of the dashboard:
//! 1. Title: the analysis name, centered
//! 2. Top row: Candlestick Chart | Close Price Evolution (y labels right)
//! 3. Bottom row: Candlestick vs Volume | Volume per Weekday (y labels right)

use crate::charts::candles::{self, CandleGlyph, Span};
use crate::charts::format::{date_to_x, format_date_tick, format_y_label};
use crate::charts::layout::{Panel, PlotMode};
use crate::charts::style::{self, CandleStyle, Rgb};
use crate::config::ChartConfig;
use crate::data::{weekday_name, StockSeries};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

const FONT: &str = "sans-serif";
const MARGIN: u32 = 10;
const DATE_TICKS: usize = 12;
/// Pixels between the x axis and the first character of a date label.
const DATE_LABEL_GAP: i32 = 6;
const Y_LABEL_AREA: u32 = 70;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Pixel buffer does not match {0}x{1}")]
    Buffer(u32, u32),
}

type DrawResult = Result<(), ChartError>;
type PriceChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw_err<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> ChartError {
    ChartError::Drawing(err.to_string())
}

fn color(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn rgba(c: Rgb, alpha: f64) -> RGBAColor {
    color(c).mix(alpha)
}

/// Font sizes and axis placement for one chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelOptions {
    pub title_size: f64,
    pub label_size: f64,
    pub labels_on_right: bool,
}

impl PanelOptions {
    pub fn standalone(config: &ChartConfig) -> Self {
        Self {
            title_size: config.title_font_size as f64,
            label_size: config.label_font_size as f64,
            labels_on_right: false,
        }
    }

    pub fn in_dashboard(config: &ChartConfig, panel: Panel) -> Self {
        Self {
            labels_on_right: panel.labels_on_right(),
            ..Self::standalone(config)
        }
    }

    /// Height of the x label area: room for a vertical "YYYY-MM-DD".
    pub fn x_label_area(&self) -> u32 {
        (self.label_size * 6.0).ceil() as u32 + 2 * DATE_LABEL_GAP as u32
    }
}

/// Renders charts to PNG files or in-memory PNG bytes.
#[derive(Debug, Clone, Default)]
pub struct StaticChartRenderer {
    config: ChartConfig,
}

impl StaticChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Render one chart to a PNG file.
    pub fn render_panel_to_file(
        &self,
        series: &StockSeries,
        panel: Panel,
        path: &Path,
    ) -> DrawResult {
        tracing::debug!(panel = panel.title(), path = %path.display(), "rendering chart");
        let root = BitMapBackend::new(path, self.config.chart_size()).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        Self::draw_panel(&root, series, panel, &PanelOptions::standalone(&self.config))?;
        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Render the 2x2 dashboard to a PNG file.
    pub fn render_dashboard_to_file(
        &self,
        name: &str,
        series: &StockSeries,
        mode: PlotMode,
        path: &Path,
    ) -> DrawResult {
        tracing::debug!(%mode, path = %path.display(), "rendering dashboard");
        let root = BitMapBackend::new(path, self.config.dashboard_size()).into_drawing_area();
        self.draw_dashboard(&root, name, series, mode)?;
        root.present().map_err(draw_err)?;
        Ok(())
    }

    pub fn render_panel_to_png_bytes(
        &self,
        series: &StockSeries,
        panel: Panel,
    ) -> Result<Vec<u8>, ChartError> {
        let options = PanelOptions::standalone(&self.config);
        Self::render_to_png_bytes(self.config.chart_size(), |root| {
            root.fill(&WHITE).map_err(draw_err)?;
            Self::draw_panel(root, series, panel, &options)
        })
    }

    pub fn render_dashboard_to_png_bytes(
        &self,
        name: &str,
        series: &StockSeries,
        mode: PlotMode,
    ) -> Result<Vec<u8>, ChartError> {
        Self::render_to_png_bytes(self.config.dashboard_size(), |root| {
            self.draw_dashboard(root, name, series, mode)
        })
    }

    /// Draw into an RGB buffer and encode it as PNG.
    fn render_to_png_bytes<F>(size: (u32, u32), draw: F) -> Result<Vec<u8>, ChartError>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> DrawResult,
    {
        let (width, height) = size;
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
            draw(&root)?;
            root.present().map_err(draw_err)?;
        }

        let rgb = image::RgbImage::from_raw(width, height, buffer)
            .ok_or(ChartError::Buffer(width, height))?;
        let mut bytes = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Title plus a 2x2 grid; cells the mode leaves out stay blank.
    pub fn draw_dashboard<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        name: &str,
        series: &StockSeries,
        mode: PlotMode,
    ) -> DrawResult {
        root.fill(&WHITE).map_err(draw_err)?;
        let title_size = self.config.dashboard_title_font_size as f64;
        let body = root
            .titled(name, (FONT, title_size).into_font())
            .map_err(draw_err)?;
        let cells = body.split_evenly((2, 2));

        for panel in mode.panels() {
            let (row, col) = panel.cell();
            let options = PanelOptions::in_dashboard(&self.config, panel);
            Self::draw_panel(&cells[row * 2 + col], series, panel, &options)?;
        }
        Ok(())
    }

    pub fn draw_panel<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        series: &StockSeries,
        panel: Panel,
        options: &PanelOptions,
    ) -> DrawResult {
        match panel {
            Panel::Candlestick => Self::draw_candlestick(area, series, options),
            Panel::ClosePrice => Self::draw_close_price(area, series, options),
            Panel::CandlestickVsVolume => Self::draw_candlestick_vs_volume(area, series, options),
            Panel::VolumeDistribution => Self::draw_volume_distribution(area, series, options),
        }
    }

    fn builder<'a, 'b, DB: DrawingBackend>(
        area: &'a DrawingArea<DB, Shift>,
        panel: Panel,
        options: &PanelOptions,
    ) -> ChartBuilder<'a, 'b, DB> {
        let mut builder = ChartBuilder::on(area);
        builder
            .caption(panel.title(), (FONT, options.title_size).into_font())
            .margin(MARGIN)
            .x_label_area_size(options.x_label_area());
        if options.labels_on_right {
            builder.right_y_label_area_size(Y_LABEL_AREA);
        } else {
            builder.y_label_area_size(Y_LABEL_AREA);
        }
        builder
    }

    /// Grid, vertical date labels under the axis and K/M/B price labels.
    fn draw_date_mesh<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        chart: &mut PriceChart<'_, DB>,
        options: &PanelOptions,
    ) -> DrawResult {
        let tick_style = (FONT, options.label_size).into_font();
        chart
            .configure_mesh()
            .x_labels(DATE_TICKS)
            .y_labels(8)
            .x_label_formatter(&|_: &f64| String::new())
            .y_label_formatter(&|y| format_y_label(*y))
            .y_label_style(tick_style.clone())
            .draw()
            .map_err(draw_err)?;

        // The mesh centers rotated labels on the axis line, so dates are
        // drawn here, hanging down from the axis.
        let date_style = TextStyle::from(tick_style.transform(FontTransform::Rotate90))
            .pos(Pos::new(HPos::Left, VPos::Center));
        let axis_y = chart.y_range().start;
        let (base_x, base_y) = area.get_base_pixel();
        for x in chart.as_coord_spec().x_spec().key_points(DATE_TICKS) {
            let label = format_date_tick(x);
            if label.is_empty() {
                continue;
            }
            let (px, py) = chart.backend_coord(&(x, axis_y));
            let anchor = (px - base_x, py - base_y + DATE_LABEL_GAP);
            area.draw(&Text::new(label, anchor, date_style.clone()))
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn candle_rects(glyph: &CandleGlyph, style: &CandleStyle) -> Vec<Rectangle<(f64, f64)>> {
        let fill = rgba(style.fill(glyph.direction), style.alpha).filled();
        let outline = style.outline_for(glyph.direction);

        let mut rects = Vec::with_capacity(6);
        for span in glyph.rects() {
            rects.push(Self::rect(&span, fill));
            if let Some(edge) = outline {
                rects.push(Self::rect(&span, color(edge).stroke_width(1)));
            }
        }
        rects
    }

    fn rect(span: &Span, style: ShapeStyle) -> Rectangle<(f64, f64)> {
        Rectangle::new([(span.left(), span.bottom), (span.right(), span.top)], style)
    }

    fn draw_candles<DB: DrawingBackend>(
        chart: &mut PriceChart<'_, DB>,
        series: &StockSeries,
        style: &CandleStyle,
    ) -> DrawResult {
        let rects: Vec<_> = candles::candle_glyphs(series)
            .iter()
            .flat_map(|glyph| Self::candle_rects(glyph, style))
            .collect();
        chart.draw_series(rects).map_err(draw_err)?;
        Ok(())
    }

    fn price_ranges(series: &StockSeries) -> ((f64, f64), (f64, f64)) {
        let (low, high) = series.price_range();
        (candles::x_range(series), candles::padded_range(low, high))
    }

    pub fn draw_candlestick<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        series: &StockSeries,
        options: &PanelOptions,
    ) -> DrawResult {
        let ((x0, x1), (y0, y1)) = Self::price_ranges(series);
        let mut chart = Self::builder(area, Panel::Candlestick, options)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(draw_err)?;

        Self::draw_date_mesh(area, &mut chart, options)?;
        Self::draw_candles(&mut chart, series, &CandleStyle::colored())
    }

    pub fn draw_candlestick_vs_volume<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        series: &StockSeries,
        options: &PanelOptions,
    ) -> DrawResult {
        let ((x0, x1), (y0, y1)) = Self::price_ranges(series);
        let volume_top = series.max_volume().max(1.0) * 1.1;

        // The secondary volume axis always sits on the right.
        let mut builder = Self::builder(area, Panel::CandlestickVsVolume, options);
        builder.right_y_label_area_size(Y_LABEL_AREA);
        let mut chart = builder
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(draw_err)?
            .set_secondary_coord(x0..x1, 0.0..volume_top);

        Self::draw_date_mesh(area, &mut *chart, options)?;
        chart
            .configure_secondary_axes()
            .y_labels(6)
            .y_label_formatter(&|v| format_y_label(*v))
            .label_style((FONT, options.label_size).into_font())
            .draw()
            .map_err(draw_err)?;

        let volume_bars = candles::volume_spans(series)
            .into_iter()
            .map(|(span, direction)| {
                let fill = rgba(style::volume_color(direction), style::VOLUME_ALPHA).filled();
                Self::rect(&span, fill)
            });
        chart.draw_secondary_series(volume_bars).map_err(draw_err)?;

        Self::draw_candles(&mut *chart, series, &CandleStyle::monochrome())
    }

    pub fn draw_close_price<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        series: &StockSeries,
        options: &PanelOptions,
    ) -> DrawResult {
        let (low, high) = series.price_range();
        let (y0, y1) = candles::padded_range(low, high);
        let (x0, x1) = (date_to_x(series.first_date()), date_to_x(series.last_date()));
        let (x0, x1) = if x1 > x0 { (x0, x1) } else { (x0 - 1.0, x1 + 1.0) };

        let mut chart = Self::builder(area, Panel::ClosePrice, options)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(draw_err)?;
        Self::draw_date_mesh(area, &mut chart, options)?;

        let highs: Vec<(f64, f64)> = series.iter().map(|b| (date_to_x(b.date), b.high)).collect();
        let lows: Vec<(f64, f64)> = series.iter().map(|b| (date_to_x(b.date), b.low)).collect();
        let closes: Vec<(f64, f64)> = series.iter().map(|b| (date_to_x(b.date), b.close)).collect();

        // band: highs left to right, then lows back
        let band: Vec<(f64, f64)> = highs.iter().chain(lows.iter().rev()).copied().collect();
        chart
            .draw_series(std::iter::once(Polygon::new(
                band,
                rgba(style::SPREAD_PINK, style::BAND_ALPHA).filled(),
            )))
            .map_err(draw_err)?;

        let spread_line = color(style::SPREAD_PINK).stroke_width(1);
        for points in [highs, lows] {
            chart
                .draw_series(DashedLineSeries::new(points, 2, 3, spread_line))
                .map_err(draw_err)?;
        }

        chart
            .draw_series(LineSeries::new(
                closes,
                rgba(style::CLOSE_PURPLE, style::CLOSE_ALPHA).stroke_width(2),
            ))
            .map_err(draw_err)?;
        Ok(())
    }

    pub fn draw_volume_distribution<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        series: &StockSeries,
        options: &PanelOptions,
    ) -> DrawResult {
        let totals = series.volume_by_weekday();
        let top = totals.iter().map(|(_, v)| *v).fold(0.0, f64::max).max(1.0) * 1.05;

        let mut chart = Self::builder(area, Panel::VolumeDistribution, options)
            .build_cartesian_2d((0u32..4u32).into_segmented(), 0.0..top)
            .map_err(draw_err)?;

        // Bars take half of each weekday slot.
        let (plot_width, _) = chart.plotting_area().dim_in_pixel();
        let margin = plot_width / (totals.len() as u32 * 4);

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(rgba(style::WEEKDAY_BLUE, style::WEEKDAY_ALPHA).filled())
                    .margin(margin)
                    .data(totals.iter().enumerate().map(|(i, (_, v))| (i as u32, *v))),
            )
            .map_err(draw_err)?;

        // Mesh after the bars so the white gridlines slice through them.
        let tick_style = (FONT, options.label_size).into_font();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(WHITE.stroke_width(2))
            .light_line_style(TRANSPARENT)
            .x_labels(totals.len())
            .y_labels(8)
            .x_label_formatter(&|slot| match slot {
                SegmentValue::CenterOf(i) => totals
                    .get(*i as usize)
                    .map(|(day, _)| weekday_name(*day).to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .y_label_formatter(&|v| format_y_label(*v))
            .x_label_style(tick_style.clone())
            .y_label_style(tick_style)
            .draw()
            .map_err(draw_err)?;
        Ok(())
    }
}
