//! Busy-wait timing built on a monotonic microsecond clock.
//!
//! 1-Wire slots are a few microseconds long, far below what a scheduler sleep
//! can hit reliably, so every delay here actively polls the clock and keeps the
//! calling thread occupied until the requested time has elapsed.

use embedded_hal::delay::DelayNs;

/// Monotonic microsecond timestamp source.
pub trait Clock {
    /// Current time in microseconds. Only differences between readings matter.
    fn now_micros(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }
}

/// Blocks for at least `us` microseconds by polling `clock`.
pub fn delay_us<C: Clock + ?Sized>(clock: &C, us: u32) {
    let start = clock.now_micros();
    let us = u64::from(us);
    while clock.now_micros().wrapping_sub(start) < us {
        core::hint::spin_loop();
    }
}

/// [`DelayNs`] implementation that spins on a [`Clock`].
///
/// Nanosecond requests are rounded up to whole microseconds, the clock
/// resolution, so a delay never undershoots.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusyWait<C> {
    clock: C,
}

impl<C: Clock> BusyWait<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: Clock> DelayNs for BusyWait<C> {
    fn delay_ns(&mut self, ns: u32) {
        delay_us(&self.clock, ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        delay_us(&self.clock, us);
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            delay_us(&self.clock, 1_000);
        }
    }
}

/// Wall clock backed by [`std::time::Instant`], counting from construction.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_micros(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}
