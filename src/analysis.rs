//! Stock Market Analysis
//! A named, loaded series together with its statistics and chart output.

use crate::charts::{ChartError, Panel, PlotMode, StaticChartRenderer};
use crate::config::ChartConfig;
use crate::data::{DataLoader, LoaderError, StockSeries};
use crate::stats::StatsCalculator;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

/// Headline numbers for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub name: String,
    pub bars: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub median_spread: f64,
    pub open_std: f64,
}

impl AnalysisSummary {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Loads a stock data file once and answers statistics and chart requests on it.
#[derive(Debug, Clone)]
pub struct StockMarketAnalysis {
    name: String,
    series: StockSeries,
    renderer: StaticChartRenderer,
}

impl StockMarketAnalysis {
    /// Load a stooq daily export.
    pub fn new(name: impl Into<String>, data_file: impl AsRef<Path>) -> Result<Self, LoaderError> {
        Self::with_loader(name, data_file, &DataLoader::new())
    }

    pub fn with_loader(
        name: impl Into<String>,
        data_file: impl AsRef<Path>,
        loader: &DataLoader,
    ) -> Result<Self, LoaderError> {
        let series = loader.load_csv(data_file)?;
        Ok(Self::from_series(name, series))
    }

    pub fn from_series(name: impl Into<String>, series: StockSeries) -> Self {
        Self {
            name: name.into(),
            series,
            renderer: StaticChartRenderer::default(),
        }
    }

    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.renderer = StaticChartRenderer::new(config);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn data(&self) -> &StockSeries {
        &self.series
    }

    pub fn renderer(&self) -> &StaticChartRenderer {
        &self.renderer
    }

    pub fn calculate_median_spread(&self) -> f64 {
        StatsCalculator::median_spread(&self.series)
    }

    pub fn calculate_open_std(&self) -> f64 {
        StatsCalculator::open_std(&self.series)
    }

    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            name: self.name.clone(),
            bars: self.series.len(),
            first_date: self.series.first_date(),
            last_date: self.series.last_date(),
            median_spread: self.calculate_median_spread(),
            open_std: self.calculate_open_std(),
        }
    }

    pub fn plot_candlestick_chart(&self, path: impl AsRef<Path>) -> Result<(), ChartError> {
        self.plot_panel(Panel::Candlestick, path.as_ref())
    }

    pub fn plot_candlestick_chart_vs_volume(&self, path: impl AsRef<Path>) -> Result<(), ChartError> {
        self.plot_panel(Panel::CandlestickVsVolume, path.as_ref())
    }

    pub fn plot_close_price_evolution(&self, path: impl AsRef<Path>) -> Result<(), ChartError> {
        self.plot_panel(Panel::ClosePrice, path.as_ref())
    }

    pub fn plot_volume_distribution(&self, path: impl AsRef<Path>) -> Result<(), ChartError> {
        self.plot_panel(Panel::VolumeDistribution, path.as_ref())
    }

    /// 2x2 dashboard with the charts `mode` selects, titled with the analysis name.
    pub fn plot_combined_graph(
        &self,
        mode: PlotMode,
        path: impl AsRef<Path>,
    ) -> Result<(), ChartError> {
        self.renderer
            .render_dashboard_to_file(&self.name, &self.series, mode, path.as_ref())
    }

    pub fn combined_graph_png(&self, mode: PlotMode) -> Result<Vec<u8>, ChartError> {
        self.renderer
            .render_dashboard_to_png_bytes(&self.name, &self.series, mode)
    }

    fn plot_panel(&self, panel: Panel, path: &Path) -> Result<(), ChartError> {
        self.renderer.render_panel_to_file(&self.series, panel, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Bar;

    fn analysis() -> StockMarketAnalysis {
        let day = |d| NaiveDate::from_ymd_opt(2023, 8, d).unwrap();
        let series = StockSeries::from_bars(vec![
            Bar::new(day(1), 95.0, 100.0, 90.0, 97.0, 1_500.0),
            Bar::new(day(2), 93.0, 98.0, 88.0, 92.0, 2_500.0),
            Bar::new(day(3), 97.0, 102.0, 91.0, 99.0, 1_000.0),
        ])
        .unwrap();
        StockMarketAnalysis::from_series("WIG20 - August 2023", series)
    }

    #[test]
    fn summary_collects_statistics() {
        let summary = analysis().summary();
        assert_eq!(summary.name, "WIG20 - August 2023");
        assert_eq!(summary.bars, 3);
        assert_eq!(summary.median_spread, 10.0);
        assert_eq!(summary.first_date, NaiveDate::from_ymd_opt(2023, 8, 1).unwrap());
        assert_eq!(summary.last_date, NaiveDate::from_ymd_opt(2023, 8, 3).unwrap());
    }

    #[test]
    fn summary_serializes_dates_as_iso() {
        let json = analysis().summary().to_json_pretty().unwrap();
        assert!(json.contains("\"first_date\": \"2023-08-01\""));
        assert!(json.contains("\"median_spread\": 10.0"));
    }

    #[test]
    fn config_reaches_renderer() {
        let config = ChartConfig {
            chart_width: 800,
            ..ChartConfig::default()
        };
        let analysis = analysis().with_config(config.clone());
        assert_eq!(analysis.renderer().config(), &config);
    }
}
