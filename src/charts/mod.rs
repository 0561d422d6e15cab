//! Charts module - Chart geometry and rendering

pub mod candles;
pub mod format;
mod layout;
mod plotter;
mod renderer;
pub mod style;

pub use format::format_y_label;
pub use layout::{Panel, PlotMode, PlotModeError};
pub use plotter::ChartPlotter;
pub use renderer::{ChartError, PanelOptions, StaticChartRenderer};
