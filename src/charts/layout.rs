//! Dashboard layout: which chart goes in which cell, and which cells a mode shows.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
#[error("Unknown plot mode '{0}' (expected candlestick, close_price, candlestick_vs_volume, volume_distribution or both)")]
pub struct PlotModeError(pub String);

/// One of the four dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Candlestick,
    ClosePrice,
    CandlestickVsVolume,
    VolumeDistribution,
}

impl Panel {
    /// Row-major dashboard order.
    pub const ALL: [Panel; 4] = [
        Panel::Candlestick,
        Panel::ClosePrice,
        Panel::CandlestickVsVolume,
        Panel::VolumeDistribution,
    ];

    /// (row, column) in the 2x2 grid.
    pub fn cell(self) -> (usize, usize) {
        match self {
            Panel::Candlestick => (0, 0),
            Panel::ClosePrice => (0, 1),
            Panel::CandlestickVsVolume => (1, 0),
            Panel::VolumeDistribution => (1, 1),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Panel::Candlestick => "Candlestick Chart",
            Panel::ClosePrice => "Close Price Evolution",
            Panel::CandlestickVsVolume => "Traditional Candlestick Chart vs Volume",
            Panel::VolumeDistribution => "Volume Distribution per Weekday",
        }
    }

    /// Right-column charts put their y labels on the right in the dashboard.
    pub fn labels_on_right(self) -> bool {
        self.cell().1 == 1
    }
}

/// Dashboard selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotMode {
    Candlestick,
    ClosePrice,
    CandlestickVsVolume,
    VolumeDistribution,
    /// All four charts.
    #[default]
    Both,
}

impl PlotMode {
    pub const ALL: [PlotMode; 5] = [
        PlotMode::Both,
        PlotMode::Candlestick,
        PlotMode::ClosePrice,
        PlotMode::CandlestickVsVolume,
        PlotMode::VolumeDistribution,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlotMode::Candlestick => "candlestick",
            PlotMode::ClosePrice => "close_price",
            PlotMode::CandlestickVsVolume => "candlestick_vs_volume",
            PlotMode::VolumeDistribution => "volume_distribution",
            PlotMode::Both => "both",
        }
    }

    pub fn includes(self, panel: Panel) -> bool {
        match self {
            PlotMode::Both => true,
            PlotMode::Candlestick => panel == Panel::Candlestick,
            PlotMode::ClosePrice => panel == Panel::ClosePrice,
            PlotMode::CandlestickVsVolume => panel == Panel::CandlestickVsVolume,
            PlotMode::VolumeDistribution => panel == Panel::VolumeDistribution,
        }
    }

    pub fn panels(self) -> Vec<Panel> {
        Panel::ALL.into_iter().filter(|&p| self.includes(p)).collect()
    }
}

impl fmt::Display for PlotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlotMode {
    type Err = PlotModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlotMode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| PlotModeError(s.to_string()))
    }
}
