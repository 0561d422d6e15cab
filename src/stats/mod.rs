//! Stats module - Descriptive statistics

mod calculator;

pub use calculator::{round2, StatsCalculator, StatsError};
