//! CSV Data Loader Module
//! Reads daily OHLCV exports with Polars and normalizes them into a `StockSeries`.

use crate::data::series::{Bar, SeriesError, StockSeries};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Date layouts accepted in the date column, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Canonical field names, in source-column order.
pub const CANONICAL_COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{column}' (found: {found})")]
    MissingColumn { column: String, found: String },
    #[error("Data row {row}: missing or non-numeric value in column '{column}'")]
    InvalidValue { row: usize, column: String },
    #[error("Data row {row}: cannot parse date '{value}'")]
    InvalidDate { row: usize, value: String },
    #[error("Invalid series: {0}")]
    Series(#[from] SeriesError),
}

/// Source column names for each canonical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::stooq()
    }
}

impl ColumnMapping {
    /// Headers of a stooq.com daily export (Polish).
    pub fn stooq() -> Self {
        Self {
            date: "Data".to_string(),
            open: "Otwarcie".to_string(),
            high: "Najwyzszy".to_string(),
            low: "Najnizszy".to_string(),
            close: "Zamkniecie".to_string(),
            volume: "Wolumen".to_string(),
        }
    }

    /// Files that already use the canonical English headers.
    pub fn english() -> Self {
        Self {
            date: "Date".to_string(),
            open: "Open".to_string(),
            high: "High".to_string(),
            low: "Low".to_string(),
            close: "Close".to_string(),
            volume: "Volume".to_string(),
        }
    }

    /// (source, canonical) pairs.
    pub fn pairs(&self) -> [(&str, &'static str); 6] {
        [
            (self.date.as_str(), CANONICAL_COLUMNS[0]),
            (self.open.as_str(), CANONICAL_COLUMNS[1]),
            (self.high.as_str(), CANONICAL_COLUMNS[2]),
            (self.low.as_str(), CANONICAL_COLUMNS[3]),
            (self.close.as_str(), CANONICAL_COLUMNS[4]),
            (self.volume.as_str(), CANONICAL_COLUMNS[5]),
        ]
    }
}

/// Handles CSV file loading with Polars.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    mapping: ColumnMapping,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mapping: ColumnMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Load a CSV file, keep the mapped columns and build the series.
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<StockSeries, LoaderError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }

        let raw = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        let df = self.select_canonical(raw)?;
        let bars = Self::extract_bars(&df)?;
        let series = StockSeries::from_bars(bars)?;

        tracing::info!(
            path = %path.display(),
            bars = series.len(),
            first = %series.first_date(),
            last = %series.last_date(),
            "loaded stock data"
        );
        let weekend = series.weekend_bars();
        if weekend > 0 {
            tracing::warn!(weekend, "weekend bars are left out of weekday volume totals");
        }

        Ok(series)
    }

    /// Check the required columns and rename them to canonical names.
    fn select_canonical(&self, df: DataFrame) -> Result<DataFrame, LoaderError> {
        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for (source, _) in self.mapping.pairs() {
            if !present.iter().any(|c| c == source) {
                return Err(LoaderError::MissingColumn {
                    column: source.to_string(),
                    found: present.join(", "),
                });
            }
        }

        let exprs = self
            .mapping
            .pairs()
            .map(|(source, canonical)| col(source).alias(canonical));

        Ok(df.lazy().select(exprs).collect()?)
    }

    fn extract_bars(df: &DataFrame) -> Result<Vec<Bar>, LoaderError> {
        let dates = df.column("Date")?.cast(&DataType::String)?;
        let dates = dates.str()?;

        let open = Self::numeric_column(df, "Open")?;
        let high = Self::numeric_column(df, "High")?;
        let low = Self::numeric_column(df, "Low")?;
        let close = Self::numeric_column(df, "Close")?;
        let volume = Self::numeric_column(df, "Volume")?;

        let mut bars = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let row = i + 1;
            let raw_date = dates.get(i).unwrap_or_default();
            let date = parse_date(raw_date).ok_or_else(|| LoaderError::InvalidDate {
                row,
                value: raw_date.to_string(),
            })?;

            let value = |values: &[Option<f64>], column: &str| {
                values[i].ok_or_else(|| LoaderError::InvalidValue {
                    row,
                    column: column.to_string(),
                })
            };

            bars.push(Bar::new(
                date,
                value(&open, "Open")?,
                value(&high, "High")?,
                value(&low, "Low")?,
                value(&close, "Close")?,
                value(&volume, "Volume")?,
            ));
        }

        Ok(bars)
    }

    /// Column values as f64; nulls and unparseable cells become `None`.
    fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoaderError> {
        let values = df.column(name)?.cast(&DataType::Float64)?;
        Ok(values.f64()?.into_iter().collect())
    }
}

/// Parse a calendar date in any of the accepted layouts.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}
