//! Stock Market Analysis - Daily OHLCV Statistics & Interactive Chart Viewer
//!
//! Opens the CSV given as the first argument, if any, in the dashboard viewer.

use eframe::egui;
use std::path::PathBuf;
use stock_market_analysis::gui::StockAnalysisApp;
use stock_market_analysis::ChartConfig;
use tracing_subscriber::EnvFilter;

const CONFIG_FILE: &str = "stock_analysis.json";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ChartConfig::load_or_default(CONFIG_FILE)?;
    let initial_csv = std::env::args_os().nth(1).map(PathBuf::from);

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Stock Market Analysis"),
        ..Default::default()
    };

    eframe::run_native(
        "Stock Market Analysis",
        options,
        Box::new(move |cc| Ok(Box::new(StockAnalysisApp::new(cc, config, initial_csv)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
