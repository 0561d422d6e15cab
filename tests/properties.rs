use chrono::{Datelike, Days, NaiveDate, Weekday};
use proptest::prelude::*;
use stock_market_analysis::charts::candles::candle_glyphs;
use stock_market_analysis::data::{Bar, Direction, StockSeries};

/// (day step, open, close, volume) rows turned into a series with increasing dates.
fn series_strategy() -> impl Strategy<Value = StockSeries> {
    prop::collection::vec(
        (1u64..4, 1.0f64..500.0, 1.0f64..500.0, 0.0f64..1e6),
        1..60,
    )
    .prop_map(|rows| {
        let mut date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let bars = rows
            .into_iter()
            .map(|(step, open, close, volume)| {
                date = date + Days::new(step);
                let high = open.max(close) + 2.0;
                let low = open.min(close) - 0.5;
                Bar::new(date, open, high, low, close, volume)
            })
            .collect();
        StockSeries::from_bars(bars).unwrap()
    })
}

proptest! {
    #[test]
    fn direction_partition_is_exhaustive_and_disjoint(series in series_strategy()) {
        let (up, down) = series.partition_by_direction();
        prop_assert_eq!(up.len() + down.len(), series.len());
        prop_assert!(up.iter().all(|b| b.close >= b.open));
        prop_assert!(down.iter().all(|b| b.close < b.open));
        prop_assert!(up.iter().all(|b| b.direction() == Direction::Up));
        prop_assert!(down.iter().all(|b| b.direction() == Direction::Down));
    }

    #[test]
    fn weekday_totals_skip_weekends(series in series_strategy()) {
        let totals = series.volume_by_weekday();
        let summed: f64 = totals.iter().map(|(_, v)| v).sum();
        let expected: f64 = series
            .iter()
            .filter(|b| !matches!(b.date.weekday(), Weekday::Sat | Weekday::Sun))
            .map(|b| b.volume)
            .sum();

        prop_assert!((summed - expected).abs() <= 1e-6 * expected.max(1.0));
        prop_assert!(totals.iter().all(|(day, _)| !matches!(day, Weekday::Sat | Weekday::Sun)));
    }

    #[test]
    fn shadows_meet_candle_bodies(series in series_strategy()) {
        let glyphs = candle_glyphs(&series);
        prop_assert_eq!(glyphs.len(), series.len());
        for glyph in glyphs {
            prop_assert_eq!(glyph.upper_shadow.bottom, glyph.body.top);
            prop_assert_eq!(glyph.lower_shadow.top, glyph.body.bottom);
            prop_assert!(glyph.upper_shadow.top >= glyph.body.top);
            prop_assert!(glyph.lower_shadow.bottom <= glyph.body.bottom);
        }
    }
}
