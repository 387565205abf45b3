//! DS18B20 on a single-drop bus.
//!
//! The sensor is addressed with Skip ROM, so exactly one device may sit on the
//! line. Only the two temperature bytes of the scratchpad are read and no CRC is
//! checked; the next reset aborts the rest of the scratchpad stream.

use byteorder::{ByteOrder, LittleEndian};
use embedded_hal::delay::DelayNs;
use log::debug;

use crate::{Driver, Error, IoWire, OpCode, Sensor};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    Convert = 0x44,
    ReadScratchpad = 0xBE,
}

impl OpCode for Command {
    fn op_code(&self) -> u8 {
        *self as _
    }
}

/// Resolution the sensor is configured for. Only selects how long to wait for
/// a conversion; the configuration register is never written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasureResolution {
    TC8,
    TC4,
    TC2,
    #[default]
    TC,
}

impl MeasureResolution {
    pub fn time_ms(&self) -> u16 {
        match self {
            MeasureResolution::TC8 => 94,
            MeasureResolution::TC4 => 188,
            MeasureResolution::TC2 => 375,
            MeasureResolution::TC => 750,
        }
    }
}

/// Raw temperature register, two's complement in 1/16 degC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Temperature(u16);

impl Temperature {
    pub const DEGREES_PER_LSB: f32 = 0.0625;

    const SIGN_MASK: u16 = 0xF800;

    pub fn from_raw(raw: u16) -> Self {
        Temperature(raw)
    }

    /// Assembles the register from the first two scratchpad bytes, LSB first
    pub fn from_bytes(tl: u8, th: u8) -> Self {
        Temperature(LittleEndian::read_u16(&[tl, th]))
    }

    pub fn raw(&self) -> u16 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 & Self::SIGN_MASK == Self::SIGN_MASK
    }

    pub fn celsius(&self) -> f32 {
        if self.is_negative() {
            let magnitude = (!self.0).wrapping_add(1);
            f32::from(magnitude) * -Self::DEGREES_PER_LSB
        } else {
            f32::from(self.0) * Self::DEGREES_PER_LSB
        }
    }

    /// Split into integer degrees and a fraction in 1/10000 degC, both carrying
    /// the sign. The value is `integer + fraction / 10000`.
    ///
    /// Uses the same sign rule as [`Temperature::celsius`]: a non-negative
    /// register is at most `0xF7FF`, so the integer part fits in `i16`.
    pub fn split(&self) -> (i16, i16) {
        if self.is_negative() {
            let abs = (!self.0).wrapping_add(1) as i16;
            (-(abs >> 4), -625 * (abs & 0xF))
        } else {
            let t = self.0;
            ((t >> 4) as i16, ((t & 0xF) * 625) as i16)
        }
    }
}

impl From<Temperature> for f32 {
    fn from(t: Temperature) -> Self {
        t.celsius()
    }
}

/// Decodes the two temperature bytes of the scratchpad to degrees Celsius
pub fn decode(tl: u8, th: u8) -> f32 {
    Temperature::from_bytes(tl, th).celsius()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ds18b20 {
    resolution: MeasureResolution,
}

impl Ds18b20 {
    pub fn new(resolution: MeasureResolution) -> Self {
        Self { resolution }
    }

    pub fn resolution(&self) -> MeasureResolution {
        self.resolution
    }

    /// Resets the bus and issues Skip ROM + Convert T.
    pub fn start_conversion<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<MeasureResolution, Error<W::Error>> {
        driver.reset_skip_write_only(delay, &[Command::Convert.op_code()])?;
        debug!("conversion started, {} ms", self.resolution.time_ms());
        Ok(self.resolution)
    }

    /// Resets the bus, issues Skip ROM + Read Scratchpad and returns
    /// `[TL, TH]`.
    pub fn read_temperature_raw<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<[u8; 2], Error<W::Error>> {
        let mut tl = [0u8; 1];
        driver.reset_skip_write_read(delay, &[Command::ReadScratchpad.op_code()], &mut tl)?;
        delay.delay_us(driver.timing().byte_gap_us);
        let th = driver.read_byte(delay)?;
        debug!("scratchpad temperature {:#04x} {:#04x}", tl[0], th);
        Ok([tl[0], th])
    }

    /// Runs a full conversion and read-back. Blocks for the conversion time of
    /// the configured resolution.
    pub fn read_temperature<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<Temperature, Error<W::Error>> {
        let resolution = self.start_conversion(driver, delay)?;
        delay.delay_ms(u32::from(resolution.time_ms()));
        let [tl, th] = self.read_temperature_raw(driver, delay)?;
        Ok(Temperature::from_bytes(tl, th))
    }
}

impl Sensor for Ds18b20 {
    fn start_measurement<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<u16, Error<W::Error>> {
        Ok(self.start_conversion(driver, delay)?.time_ms())
    }

    fn read_measurement<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<f32, Error<W::Error>> {
        self.read_measurement_raw(driver, delay)
            .map(|raw| Temperature::from_raw(raw).celsius())
    }

    fn read_measurement_raw<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<u16, Error<W::Error>> {
        let [tl, th] = self.read_temperature_raw(driver, delay)?;
        Ok(Temperature::from_bytes(tl, th).raw())
    }
}
