//! Stock Series Module
//! Daily OHLCV bars kept as an ordered, immutable time series.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use thiserror::Error;

/// Trading weekdays in chart order. Weekend bars never get a bucket.
pub const TRADING_WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

#[derive(Error, Debug, PartialEq)]
pub enum SeriesError {
    #[error("Series must contain at least one bar")]
    Empty,
    #[error("Duplicate bar for date {0}")]
    DuplicateDate(NaiveDate),
}

/// Price direction of a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    /// close >= open
    Up,
    /// close < open
    Down,
}

/// One trading day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Full English weekday name, e.g. "Monday".
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday())
    }

    /// Anything that is not a strict gain-or-flat bar counts as down, NaN included.
    pub fn direction(&self) -> Direction {
        if self.close >= self.open {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn is_up(&self) -> bool {
        self.direction() == Direction::Up
    }

    pub fn body_top(&self) -> f64 {
        self.open.max(self.close)
    }

    pub fn body_bottom(&self) -> f64 {
        self.open.min(self.close)
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Chronologically ordered bars with unique dates.
///
/// Built once and then only read; there is no way to get a mutable
/// reference to the bars after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct StockSeries {
    bars: Vec<Bar>,
}

impl StockSeries {
    /// Build a series from bars in any order.
    pub fn from_bars(mut bars: Vec<Bar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }

        bars.sort_by_key(|b| b.date);
        if let Some(pair) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(SeriesError::DuplicateDate(pair[0].date));
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }

    /// Look up the bar for a date.
    pub fn get(&self, date: NaiveDate) -> Option<&Bar> {
        self.bars
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|idx| &self.bars[idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Split into (up, down) bars, preserving order.
    pub fn partition_by_direction(&self) -> (Vec<&Bar>, Vec<&Bar>) {
        self.bars.iter().partition(|b| b.is_up())
    }

    /// Total volume per trading weekday, Monday through Friday.
    ///
    /// Weekdays without bars sum to zero; weekend bars are dropped.
    pub fn volume_by_weekday(&self) -> [(Weekday, f64); 5] {
        let mut totals = TRADING_WEEKDAYS.map(|day| (day, 0.0));
        for bar in &self.bars {
            if let Some(idx) = TRADING_WEEKDAYS.iter().position(|&d| d == bar.weekday()) {
                totals[idx].1 += bar.volume;
            }
        }
        totals
    }

    /// Bars dated on a Saturday or Sunday.
    pub fn weekend_bars(&self) -> usize {
        self.bars
            .iter()
            .filter(|b| !TRADING_WEEKDAYS.contains(&b.weekday()))
            .count()
    }

    /// Lowest low and highest high across the series.
    pub fn price_range(&self) -> (f64, f64) {
        self.bars.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| {
            (lo.min(b.low), hi.max(b.high))
        })
    }

    pub fn max_volume(&self) -> f64 {
        self.bars.iter().map(|b| b.volume).fold(0.0, f64::max)
    }
}

impl<'a> IntoIterator for &'a StockSeries {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bar(d: NaiveDate, open: f64, close: f64, volume: f64) -> Bar {
        Bar::new(d, open, open.max(close) + 1.0, open.min(close) - 1.0, close, volume)
    }

    #[test]
    fn from_bars_sorts_by_date() {
        let series = StockSeries::from_bars(vec![
            bar(date(2023, 8, 3), 10.0, 11.0, 1.0),
            bar(date(2023, 8, 1), 10.0, 11.0, 1.0),
            bar(date(2023, 8, 2), 10.0, 11.0, 1.0),
        ])
        .unwrap();

        let dates: Vec<_> = series.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![date(2023, 8, 1), date(2023, 8, 2), date(2023, 8, 3)]);
        assert_eq!(series.first_date(), date(2023, 8, 1));
        assert_eq!(series.last_date(), date(2023, 8, 3));
    }

    #[test]
    fn from_bars_rejects_duplicates_and_empty() {
        let dup = StockSeries::from_bars(vec![
            bar(date(2023, 8, 1), 10.0, 11.0, 1.0),
            bar(date(2023, 8, 1), 12.0, 11.0, 1.0),
        ]);
        assert_eq!(dup, Err(SeriesError::DuplicateDate(date(2023, 8, 1))));
        assert_eq!(StockSeries::from_bars(Vec::new()), Err(SeriesError::Empty));
    }

    #[test]
    fn get_finds_bar_by_date() {
        let series = StockSeries::from_bars(vec![
            bar(date(2023, 8, 1), 10.0, 11.0, 1.0),
            bar(date(2023, 8, 2), 12.0, 11.0, 2.0),
        ])
        .unwrap();

        assert_eq!(series.get(date(2023, 8, 2)).map(|b| b.volume), Some(2.0));
        assert!(series.get(date(2023, 8, 5)).is_none());
    }

    #[test]
    fn flat_bar_is_up() {
        let b = bar(date(2023, 8, 1), 10.0, 10.0, 1.0);
        assert_eq!(b.direction(), Direction::Up);
        assert_eq!(bar(date(2023, 8, 1), 10.0, 9.99, 1.0).direction(), Direction::Down);
    }

    #[test]
    fn weekday_names_follow_calendar() {
        assert_eq!(bar(date(2023, 8, 1), 1.0, 1.0, 1.0).weekday_name(), "Tuesday");
        assert_eq!(bar(date(2023, 8, 5), 1.0, 1.0, 1.0).weekday_name(), "Saturday");
        assert_eq!(bar(date(2023, 8, 7), 1.0, 1.0, 1.0).weekday_name(), "Monday");
    }

    #[test]
    fn volume_by_weekday_skips_weekend() {
        let series = StockSeries::from_bars(vec![
            bar(date(2023, 8, 1), 1.0, 2.0, 100.0), // Tue
            bar(date(2023, 8, 5), 1.0, 2.0, 999.0), // Sat
            bar(date(2023, 8, 6), 1.0, 2.0, 999.0), // Sun
            bar(date(2023, 8, 7), 1.0, 2.0, 40.0),  // Mon
            bar(date(2023, 8, 8), 1.0, 2.0, 60.0),  // Tue
        ])
        .unwrap();

        assert_eq!(series.weekend_bars(), 2);
        let totals = series.volume_by_weekday();
        assert_eq!(
            totals,
            [
                (Weekday::Mon, 40.0),
                (Weekday::Tue, 160.0),
                (Weekday::Wed, 0.0),
                (Weekday::Thu, 0.0),
                (Weekday::Fri, 0.0),
            ]
        );
    }

    #[test]
    fn price_range_spans_lows_and_highs() {
        let series = StockSeries::from_bars(vec![
            Bar::new(date(2023, 8, 1), 10.0, 15.0, 8.0, 12.0, 1.0),
            Bar::new(date(2023, 8, 2), 12.0, 13.0, 9.0, 11.0, 5.0),
        ])
        .unwrap();

        assert_eq!(series.price_range(), (8.0, 15.0));
        assert_eq!(series.max_volume(), 5.0);
    }
}
