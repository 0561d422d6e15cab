//! Data module - CSV loading and the daily bar series

mod loader;
mod series;

pub use loader::{parse_date, ColumnMapping, DataLoader, LoaderError, CANONICAL_COLUMNS};
pub use series::{weekday_name, Bar, Direction, SeriesError, StockSeries, TRADING_WEEKDAYS};
