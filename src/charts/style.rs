//! Chart colors and candle styles.

use crate::data::Direction;

/// Backend-neutral RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const UP_GREEN: Rgb = Rgb(0x4d, 0xaf, 0x4a);
pub const DOWN_RED: Rgb = Rgb(0xe4, 0x1a, 0x1c);
pub const CLOSE_PURPLE: Rgb = Rgb(0x98, 0x4e, 0xa3);
pub const SPREAD_PINK: Rgb = Rgb(0xf7, 0x81, 0xbf);
pub const VOLUME_UP: Rgb = Rgb(0, 128, 0);
pub const VOLUME_DOWN: Rgb = Rgb(255, 0, 0);
pub const WEEKDAY_BLUE: Rgb = Rgb(0, 0, 255);
pub const INK: Rgb = Rgb(0, 0, 0);
pub const PAPER: Rgb = Rgb(255, 255, 255);

pub const CANDLE_ALPHA: f64 = 0.9;
pub const VOLUME_ALPHA: f64 = 0.3;
pub const CLOSE_ALPHA: f64 = 0.5;
pub const BAND_ALPHA: f64 = 0.1;
pub const WEEKDAY_ALPHA: f64 = 0.5;

/// How up and down candles are painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleStyle {
    pub up_fill: Rgb,
    pub down_fill: Rgb,
    /// Drawn around every rectangle when set.
    pub outline: Option<Rgb>,
    pub alpha: f64,
}

impl CandleStyle {
    /// Green/red, semi-transparent.
    pub fn colored() -> Self {
        Self {
            up_fill: UP_GREEN,
            down_fill: DOWN_RED,
            outline: None,
            alpha: CANDLE_ALPHA,
        }
    }

    /// Black up candles, white outlined down candles.
    pub fn monochrome() -> Self {
        Self {
            up_fill: INK,
            down_fill: PAPER,
            outline: Some(INK),
            alpha: 1.0,
        }
    }

    pub fn fill(&self, direction: Direction) -> Rgb {
        match direction {
            Direction::Up => self.up_fill,
            Direction::Down => self.down_fill,
        }
    }

    /// Up candles in the monochrome style carry no outline, like a solid black bar.
    pub fn outline_for(&self, direction: Direction) -> Option<Rgb> {
        match direction {
            Direction::Up if self.up_fill == INK => None,
            _ => self.outline,
        }
    }
}

pub fn volume_color(direction: Direction) -> Rgb {
    match direction {
        Direction::Up => VOLUME_UP,
        Direction::Down => VOLUME_DOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colored_style_by_direction() {
        let style = CandleStyle::colored();
        assert_eq!(style.fill(Direction::Up), UP_GREEN);
        assert_eq!(style.fill(Direction::Down), DOWN_RED);
        assert_eq!(style.outline_for(Direction::Down), None);
    }

    #[test]
    fn monochrome_outlines_down_candles_only() {
        let style = CandleStyle::monochrome();
        assert_eq!(style.fill(Direction::Up), INK);
        assert_eq!(style.fill(Direction::Down), PAPER);
        assert_eq!(style.outline_for(Direction::Up), None);
        assert_eq!(style.outline_for(Direction::Down), Some(INK));
    }
}
