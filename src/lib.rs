//! Stock Market Analysis - daily OHLCV statistics & candlestick charts
//!
//! Loads a stooq daily export, computes the median high/low spread and the
//! open-price standard deviation, and draws candlestick, close-price and
//! weekday-volume charts as PNG files or in an interactive viewer.

pub mod analysis;
pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod stats;

pub use analysis::{AnalysisSummary, StockMarketAnalysis};
pub use charts::PlotMode;
pub use config::ChartConfig;
