//! Candle Geometry Module
//! Turns bars into the rectangles every candlestick renderer draws:
//! a body spanning open/close and two thin shadows reaching high and low.

use crate::charts::format::date_to_x;
use crate::data::{Bar, Direction, StockSeries};
use chrono::NaiveDate;

/// Body width in days.
pub const BODY_WIDTH: f64 = 0.4;
/// Shadow width in days.
pub const SHADOW_WIDTH: f64 = 0.04;
/// Volume bar width in days.
pub const VOLUME_BAR_WIDTH: f64 = 0.1;

/// Axis-aligned rectangle centered on `x`, spanning `bottom..top`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub x: f64,
    pub width: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Span {
    pub fn new(x: f64, width: f64, a: f64, b: f64) -> Self {
        Self {
            x,
            width,
            bottom: a.min(b),
            top: a.max(b),
        }
    }

    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleGlyph {
    pub date: NaiveDate,
    pub direction: Direction,
    pub body: Span,
    /// body top up to high
    pub upper_shadow: Span,
    /// low up to body bottom
    pub lower_shadow: Span,
}

impl CandleGlyph {
    pub fn from_bar(bar: &Bar) -> Self {
        let x = date_to_x(bar.date);
        Self {
            date: bar.date,
            direction: bar.direction(),
            body: Span::new(x, BODY_WIDTH, bar.open, bar.close),
            upper_shadow: Span::new(x, SHADOW_WIDTH, bar.body_top(), bar.high),
            lower_shadow: Span::new(x, SHADOW_WIDTH, bar.low, bar.body_bottom()),
        }
    }

    /// Body first, then the shadows.
    pub fn rects(&self) -> [Span; 3] {
        [self.body, self.upper_shadow, self.lower_shadow]
    }
}

/// Candles for every bar, up candles first, then down candles.
pub fn candle_glyphs(series: &StockSeries) -> Vec<CandleGlyph> {
    let (up, down) = series.partition_by_direction();
    up.into_iter()
        .chain(down)
        .map(CandleGlyph::from_bar)
        .collect()
}

/// One volume bar per trading day, tagged with the day's direction.
pub fn volume_spans(series: &StockSeries) -> Vec<(Span, Direction)> {
    series
        .iter()
        .map(|bar| {
            let span = Span::new(date_to_x(bar.date), VOLUME_BAR_WIDTH, 0.0, bar.volume);
            (span, bar.direction())
        })
        .collect()
}

/// X range covering every candle with half a day of padding.
pub fn x_range(series: &StockSeries) -> (f64, f64) {
    (
        date_to_x(series.first_date()) - 0.5 - BODY_WIDTH,
        date_to_x(series.last_date()) + 0.5 + BODY_WIDTH,
    )
}

/// Y range padded by 5% of the span on each side.
pub fn padded_range(low: f64, high: f64) -> (f64, f64) {
    let pad = if high > low { (high - low) * 0.05 } else { 1.0 };
    (low - pad, high + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 8, d).unwrap()
    }

    #[test]
    fn up_candle_shadows_touch_body() {
        let glyph = CandleGlyph::from_bar(&Bar::new(day(1), 10.0, 14.0, 8.0, 12.0, 1.0));
        assert_eq!(glyph.direction, Direction::Up);
        assert_eq!((glyph.body.bottom, glyph.body.top), (10.0, 12.0));
        assert_eq!((glyph.upper_shadow.bottom, glyph.upper_shadow.top), (12.0, 14.0));
        assert_eq!((glyph.lower_shadow.bottom, glyph.lower_shadow.top), (8.0, 10.0));
    }

    #[test]
    fn down_candle_shadows_touch_body() {
        let glyph = CandleGlyph::from_bar(&Bar::new(day(2), 12.0, 14.0, 8.0, 10.0, 1.0));
        assert_eq!(glyph.direction, Direction::Down);
        assert_eq!((glyph.body.bottom, glyph.body.top), (10.0, 12.0));
        assert_eq!((glyph.upper_shadow.bottom, glyph.upper_shadow.top), (12.0, 14.0));
        assert_eq!((glyph.lower_shadow.bottom, glyph.lower_shadow.top), (8.0, 10.0));
    }

    #[test]
    fn widths_are_centered_on_date() {
        let glyph = CandleGlyph::from_bar(&Bar::new(day(3), 1.0, 2.0, 0.5, 1.5, 1.0));
        let x = date_to_x(day(3));
        assert!((glyph.body.left() - (x - 0.2)).abs() < 1e-9);
        assert!((glyph.body.right() - (x + 0.2)).abs() < 1e-9);
        assert!((glyph.upper_shadow.width - SHADOW_WIDTH).abs() < 1e-12);
    }

    #[test]
    fn glyphs_cover_every_bar_once() {
        let series = StockSeries::from_bars(vec![
            Bar::new(day(1), 10.0, 12.0, 9.0, 11.0, 1.0),
            Bar::new(day(2), 11.0, 12.0, 9.0, 10.0, 2.0),
            Bar::new(day(3), 10.0, 12.0, 9.0, 10.0, 3.0),
        ])
        .unwrap();

        let glyphs = candle_glyphs(&series);
        assert_eq!(glyphs.len(), 3);
        let directions: Vec<_> = glyphs.iter().map(|g| g.direction).collect();
        assert_eq!(directions, vec![Direction::Up, Direction::Up, Direction::Down]);

        let volumes = volume_spans(&series);
        assert_eq!(volumes[1].0.top, 2.0);
        assert_eq!(volumes[1].1, Direction::Down);
    }

    #[test]
    fn padded_range_handles_flat_series() {
        assert_eq!(padded_range(5.0, 5.0), (4.0, 6.0));
        let (lo, hi) = padded_range(0.0, 100.0);
        assert!((lo + 5.0).abs() < 1e-9 && (hi - 105.0).abs() < 1e-9);
    }
}
