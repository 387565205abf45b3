use crate::{Command, Error, IoWire, OpCode, Timing};
use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use log::{debug, trace, warn};

/// Bit-banged 1-Wire master on a single line.
///
/// Every bus operation takes `&mut self`, so one driver owns its line for the
/// whole transaction. Timing comes from the `delay` passed to each call, which
/// must not return early.
pub struct Driver<W: IoWire> {
    io_wire: W,
    timing: Timing,
}

impl<E: Debug, W: IoWire<Error = E>> Driver<W> {
    pub fn new(io_wire: W) -> Self {
        Self::with_timing(io_wire, Timing::default())
    }

    pub fn with_timing(io_wire: W, timing: Timing) -> Self {
        Driver { io_wire, timing }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn into_inner(self) -> W {
        self.io_wire
    }

    pub fn reset_skip_write_only(
        &mut self,
        delay: &mut impl DelayNs,
        write: &[u8],
    ) -> Result<(), Error<E>> {
        self.reset(delay)?;
        delay.delay_us(self.timing.settle_us);
        self.skip(delay)?;
        self.write_bytes(delay, write)?;
        Ok(())
    }

    pub fn reset_skip_write_read(
        &mut self,
        delay: &mut impl DelayNs,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Error<E>> {
        self.reset(delay)?;
        delay.delay_us(self.timing.settle_us);
        self.skip(delay)?;
        self.write_bytes(delay, write)?;
        self.read_bytes(delay, read)?;
        Ok(())
    }

    pub fn skip(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<E>> {
        self.write_command(delay, Command::SkipRom)?;
        Ok(())
    }

    /// Performs a reset and listens for a presence pulse
    /// Returns Err(NoPresence) if no device answered within the presence bounds
    pub fn reset(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<E>> {
        self.reset_pulse(delay)?;
        if self.check_presence(delay)? {
            Ok(())
        } else {
            warn!("no presence pulse after reset");
            Err(Error::NoPresence)
        }
    }

    /// Like [`Driver::reset`], but reports a missing device as `Ok(false)`
    pub fn reset_presence(&mut self, delay: &mut impl DelayNs) -> Result<bool, Error<E>> {
        self.reset(delay).map(|_| true).or_else(|error| {
            if matches!(error, Error::NoPresence) {
                Ok(false)
            } else {
                Err(error)
            }
        })
    }

    /// Holds the line low long enough to reset every device, then releases it
    pub fn reset_pulse(&mut self, delay: &mut impl DelayNs) -> Result<(), E> {
        self.set_low()?;
        delay.delay_us(self.timing.reset_low_us);
        self.set_high()?;
        delay.delay_us(self.timing.presence_wait_us);
        Ok(())
    }

    /// Waits for a device to pull the line low and release it again.
    ///
    /// Both phases are bounded in 1us ticks, so a missing device or a line
    /// stuck low fails in bounded time.
    pub fn check_presence(&mut self, delay: &mut impl DelayNs) -> Result<bool, E> {
        let mut ticks = 0;
        while self.is_high()? {
            ticks += 1;
            if ticks >= self.timing.presence_high_limit {
                debug!("line stayed high for {ticks} ticks");
                return Ok(false);
            }
            delay.delay_us(1);
        }

        ticks = 0;
        while self.is_low()? {
            ticks += 1;
            if ticks >= self.timing.presence_low_limit {
                debug!("line held low for {ticks} ticks");
                return Ok(false);
            }
            delay.delay_us(1);
        }
        Ok(true)
    }

    pub fn read_bytes(&mut self, delay: &mut impl DelayNs, dst: &mut [u8]) -> Result<(), E> {
        for d in dst {
            *d = self.read_byte(delay)?;
        }
        Ok(())
    }

    pub fn read_byte(&mut self, delay: &mut impl DelayNs) -> Result<u8, E> {
        let mut byte = 0_u8;
        for i in 0..8 {
            if self.read_bit(delay)? {
                byte |= 1 << i;
            }
            delay.delay_us(self.timing.read_recovery_us);
        }
        delay.delay_us(self.timing.read_recovery_us);
        trace!("read {byte:#04x}");
        Ok(byte)
    }

    pub fn read_bit(&mut self, delay: &mut impl DelayNs) -> Result<bool, E> {
        self.set_low()?;
        delay.delay_us(self.timing.read_low_us);
        self.set_high()?;
        delay.delay_us(self.timing.read_sample_us);
        let val = self.is_high();
        delay.delay_us(self.timing.read_slot_us);
        val
    }

    pub fn write_command(&mut self, delay: &mut impl DelayNs, cmd: impl OpCode) -> Result<(), E> {
        self.write_byte(delay, cmd.op_code())
    }

    pub fn write_bytes(&mut self, delay: &mut impl DelayNs, bytes: &[u8]) -> Result<(), E> {
        for b in bytes {
            self.write_byte(delay, *b)?;
        }
        Ok(())
    }

    /// Writes `byte` LSB first. The released tail of every slot is the
    /// recovery time before the next one.
    pub fn write_byte(&mut self, delay: &mut impl DelayNs, byte: u8) -> Result<(), E> {
        trace!("write {byte:#04x}");
        let mut byte = byte;
        for _ in 0..8 {
            self.write_bit(delay, (byte & 0x01) == 0x01)?;
            byte >>= 1;
        }
        Ok(())
    }

    pub fn write_bit(&mut self, delay: &mut impl DelayNs, high: bool) -> Result<(), E> {
        let (low_us, high_us) = if high {
            (self.timing.write_1_low_us, self.timing.write_1_high_us)
        } else {
            (self.timing.write_0_low_us, self.timing.write_0_high_us)
        };
        self.set_low()?;
        delay.delay_us(low_us);
        self.set_high()?;
        delay.delay_us(high_us);
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn set_high(&mut self) -> Result<(), E> {
        self.io_wire.set_high()
    }

    #[inline(always)]
    pub(crate) fn set_low(&mut self) -> Result<(), E> {
        self.io_wire.set_low()
    }

    #[inline(always)]
    pub(crate) fn is_high(&mut self) -> Result<bool, E> {
        self.io_wire.is_high()
    }

    #[inline(always)]
    pub(crate) fn is_low(&mut self) -> Result<bool, E> {
        self.io_wire.is_low()
    }
}
