use crate::{Driver, Error, IoWire};
use embedded_hal::delay::DelayNs;

/// A device that measures in two steps: start a conversion, wait, read it back.
pub trait Sensor {
    /// returns the milliseconds required to wait until the measurement finished
    fn start_measurement<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<u16, Error<W::Error>>;

    /// returns the measured value
    fn read_measurement<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<f32, Error<W::Error>>;

    fn read_measurement_raw<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<u16, Error<W::Error>>;

    /// Starts a measurement, waits it out and reads the value
    fn measure<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<f32, Error<W::Error>> {
        let wait_ms = self.start_measurement(driver, delay)?;
        delay.delay_ms(u32::from(wait_ms));
        self.read_measurement(driver, delay)
    }
}
