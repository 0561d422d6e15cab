//! Rendering needs system fonts, so these run with `cargo test -- --ignored`.

use chrono::NaiveDate;
use stock_market_analysis::charts::Panel;
use stock_market_analysis::data::{Bar, StockSeries};
use stock_market_analysis::{PlotMode, StockMarketAnalysis};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn analysis() -> StockMarketAnalysis {
    let day = |d| NaiveDate::from_ymd_opt(2023, 8, d).unwrap();
    let series = StockSeries::from_bars(vec![
        Bar::new(day(1), 95.0, 100.0, 90.0, 97.0, 1_500_000.0),
        Bar::new(day(2), 93.0, 98.0, 88.0, 92.0, 2_500_000.0),
        Bar::new(day(3), 97.0, 102.0, 91.0, 99.0, 1_000_000.0),
        Bar::new(day(4), 94.0, 99.0, 89.0, 96.0, 3_000_000.0),
        Bar::new(day(7), 100.0, 105.0, 92.0, 101.0, 2_000_000.0),
    ])
    .unwrap();
    StockMarketAnalysis::from_series("WIG20 - August 2023", series)
}

#[test]
#[ignore = "needs system fonts"]
fn every_chart_writes_a_png() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = analysis();

    let candlestick = dir.path().join("candlestick.png");
    let vs_volume = dir.path().join("candlestick_vs_volume.png");
    let close = dir.path().join("close_price.png");
    let weekdays = dir.path().join("volume_distribution.png");

    analysis.plot_candlestick_chart(&candlestick).unwrap();
    analysis.plot_candlestick_chart_vs_volume(&vs_volume).unwrap();
    analysis.plot_close_price_evolution(&close).unwrap();
    analysis.plot_volume_distribution(&weekdays).unwrap();

    for path in [candlestick, vs_volume, close, weekdays] {
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(&PNG_MAGIC), "{} is not a PNG", path.display());
    }
}

#[test]
#[ignore = "needs system fonts"]
fn dashboard_for_every_mode() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = analysis();

    for mode in PlotMode::ALL {
        let path = dir.path().join(format!("dashboard_{mode}.png"));
        analysis.plot_combined_graph(mode, &path).unwrap();
        assert!(path.is_file());
    }
}

#[test]
#[ignore = "needs system fonts"]
fn dashboard_png_bytes_have_configured_size() {
    let bytes = analysis().combined_graph_png(PlotMode::Both).unwrap();
    assert!(bytes.starts_with(&PNG_MAGIC));

    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1400, 1000));
}

#[test]
#[ignore = "needs system fonts"]
fn single_bar_series_renders() {
    let day = NaiveDate::from_ymd_opt(2023, 8, 1).unwrap();
    let series = StockSeries::from_bars(vec![Bar::new(day, 10.0, 10.0, 10.0, 10.0, 0.0)]).unwrap();
    let analysis = StockMarketAnalysis::from_series("flat", series);
    let bytes = analysis.combined_graph_png(PlotMode::Both).unwrap();
    assert!(bytes.starts_with(&PNG_MAGIC));
}

#[test]
#[ignore = "needs system fonts"]
fn panel_png_bytes_have_chart_size() {
    let analysis = analysis();
    for panel in Panel::ALL {
        let bytes = analysis
            .renderer()
            .render_panel_to_png_bytes(analysis.data(), panel)
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1000, 500), "{panel:?}");
    }
}
