//! Host side: picking the data line by number and reading a temperature off it.

use crate::IoWire;
#[cfg(feature = "ds18b20")]
use crate::{ds18b20::Ds18b20, Driver, Error};
#[cfg(feature = "ds18b20")]
use embedded_hal::delay::DelayNs;

/// Edge-connector pins usable as the 1-Wire data line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    P0,
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    P7,
    P8,
    P9,
    P10,
    P11,
    P12,
    P13,
    P14,
    P15,
    P16,
}

impl Line {
    /// Line used for unknown selectors
    pub const DEFAULT: Line = Line::P8;

    pub const ALL: [Line; 17] = [
        Line::P0,
        Line::P1,
        Line::P2,
        Line::P3,
        Line::P4,
        Line::P5,
        Line::P6,
        Line::P7,
        Line::P8,
        Line::P9,
        Line::P10,
        Line::P11,
        Line::P12,
        Line::P13,
        Line::P14,
        Line::P15,
        Line::P16,
    ];

    /// Maps a pin number to its line. Out-of-range numbers fall back to
    /// [`Line::DEFAULT`] instead of failing.
    pub fn from_selector(selector: i32) -> Line {
        usize::try_from(selector)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(Self::DEFAULT)
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i32> for Line {
    fn from(selector: i32) -> Self {
        Line::from_selector(selector)
    }
}

/// Hands out the wire behind each line. Pins must already be configured as
/// open-drain outputs that can be read back.
pub trait Board {
    type Wire: IoWire;

    fn wire(&mut self, line: Line) -> &mut Self::Wire;
}

/// Reads the DS18B20 on the line numbered `selector`, in degrees Celsius.
///
/// Blocks for the full transaction including the 750 ms conversion.
#[cfg(feature = "ds18b20")]
pub fn get_temperature<B: Board>(
    board: &mut B,
    delay: &mut impl DelayNs,
    selector: i32,
) -> Result<f32, Error<<B::Wire as IoWire>::Error>> {
    let line = Line::from_selector(selector);
    log::debug!("reading temperature on {line:?}");
    let mut driver = Driver::new(board.wire(line));
    Ds18b20::default()
        .read_temperature(&mut driver, delay)
        .map(|t| t.celsius())
}
