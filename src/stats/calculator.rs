//! Statistics Calculator Module
//! Descriptive reductions over a daily bar series.

use crate::data::StockSeries;
use statrs::statistics::{Data, Median, Statistics};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum StatsError {
    #[error("Cannot reduce an empty series")]
    EmptySeries,
    #[error("High and low columns differ in length ({high} vs {low})")]
    LengthMismatch { high: usize, low: usize },
}

/// Stateless statistics over price columns.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Median with the even-length mean of the two middle values.
    pub fn median(values: &[f64]) -> Result<f64, StatsError> {
        if values.is_empty() {
            return Err(StatsError::EmptySeries);
        }
        Ok(Data::new(values.to_vec()).median())
    }

    /// Population standard deviation (divides by n).
    pub fn population_std(values: &[f64]) -> Result<f64, StatsError> {
        if values.is_empty() {
            return Err(StatsError::EmptySeries);
        }
        Ok(values.iter().population_std_dev())
    }

    /// median(high) - median(low), rounded to 2 decimals.
    pub fn median_spread_of(highs: &[f64], lows: &[f64]) -> Result<f64, StatsError> {
        if highs.len() != lows.len() {
            return Err(StatsError::LengthMismatch {
                high: highs.len(),
                low: lows.len(),
            });
        }
        let spread = Self::median(highs)? - Self::median(lows)?;
        Ok(round2(spread))
    }

    /// Rounded population std of open prices.
    pub fn open_std_of(opens: &[f64]) -> Result<f64, StatsError> {
        Self::population_std(opens).map(round2)
    }

    /// Median spread of a whole series. A series is never empty.
    pub fn median_spread(series: &StockSeries) -> f64 {
        let high = Data::new(series.highs()).median();
        let low = Data::new(series.lows()).median();
        let spread = round2(high - low);
        tracing::debug!(high, low, spread, "median spread");
        spread
    }

    pub fn open_std(series: &StockSeries) -> f64 {
        let std = round2(series.opens().iter().population_std_dev());
        tracing::debug!(std, "open price std");
        std
    }
}

/// Round to 2 decimals, ties to even (0.125 -> 0.12).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Bar;
    use chrono::NaiveDate;

    fn fixture() -> StockSeries {
        let rows = [
            (1, 95.0, 100.0, 90.0, 97.0),
            (2, 93.0, 98.0, 88.0, 92.0),
            (3, 97.0, 102.0, 91.0, 99.0),
            (4, 94.0, 100.0, 90.0, 96.0),
            (7, 100.0, 105.0, 95.0, 101.0),
        ];
        let bars = rows
            .iter()
            .map(|&(day, o, h, l, c)| {
                let date = NaiveDate::from_ymd_opt(2023, 8, day).unwrap();
                Bar::new(date, o, h, l, c, 1_000.0)
            })
            .collect();
        StockSeries::from_bars(bars).unwrap()
    }

    #[test]
    fn median_spread_uses_column_medians() {
        // high median 100, low median 90
        assert_eq!(StatsCalculator::median_spread(&fixture()), 10.0);
    }

    #[test]
    fn open_std_is_population_std() {
        // mean 95.8, sum of squared deviations 30.8, / 5 => sqrt(6.16)
        assert_eq!(StatsCalculator::open_std(&fixture()), 2.48);
        assert_eq!(
            StatsCalculator::open_std_of(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]),
            Ok(2.0)
        );
    }

    #[test]
    fn median_of_even_length_averages_middle() {
        assert_eq!(StatsCalculator::median(&[4.0, 1.0, 3.0, 2.0]), Ok(2.5));
        assert_eq!(StatsCalculator::median(&[5.0]), Ok(5.0));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(StatsCalculator::median(&[]), Err(StatsError::EmptySeries));
        assert_eq!(StatsCalculator::open_std_of(&[]), Err(StatsError::EmptySeries));
        assert_eq!(
            StatsCalculator::median_spread_of(&[], &[]),
            Err(StatsError::EmptySeries)
        );
    }

    #[test]
    fn spread_rejects_mismatched_columns() {
        assert_eq!(
            StatsCalculator::median_spread_of(&[1.0, 2.0], &[1.0]),
            Err(StatsError::LengthMismatch { high: 2, low: 1 })
        );
    }

    #[test]
    fn spread_is_rounded() {
        let spread = StatsCalculator::median_spread_of(&[10.456, 10.456], &[9.0, 9.0]);
        assert_eq!(spread, Ok(1.46));
    }

    #[test]
    fn round2_behaviour() {
        assert_eq!(round2(2.4819347), 2.48);
        assert_eq!(round2(-1.005_1), -1.01);
        assert_eq!(round2(3.0), 3.0);
    }

    #[test]
    fn round2_ties_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(1.125), 1.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(
            StatsCalculator::median_spread_of(&[100.0, 100.25], &[100.0, 100.0]),
            Ok(0.12)
        );
    }
}
