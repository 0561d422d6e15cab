//! Axis label formatting shared by the static and interactive charts.

use chrono::{Datelike, NaiveDate};

/// Large-number axis label: 1.50K, 2.50M, 3.00B; smaller values as-is.
pub fn format_y_label(value: f64) -> String {
    if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        value.to_string()
    }
}

/// X coordinate of a trading day: days since 0001-01-01.
///
/// Keeps calendar gaps (weekends, holidays) visible on the axis.
pub fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Tick label for a date axis; empty between days.
pub fn format_date_tick(x: f64) -> String {
    if (x - x.round()).abs() > 1e-6 {
        return String::new();
    }
    x_to_date(x)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
