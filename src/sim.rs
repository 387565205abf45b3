//! Simulated bus for timing tests.
//!
//! Time only moves when the clock is read: every [`SimClock`] reading returns
//! the current microsecond and advances it by one, so a busy-wait of `n` us
//! costs `n + 1` simulated microseconds. Devices see the master's edges with
//! their timestamps and answer by holding the line low over a time window.

use crate::{Clock, IoWire};
use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;

const RESET_MIN_US: u64 = 480;
const WRITE_ONE_MAX_US: u64 = 15;
const READ_ZERO_HOLD_US: u64 = 30;
const POWER_ON_REGISTER: u16 = 0x0550;

#[derive(Debug, Default)]
pub struct SimBus {
    now: Rc<Cell<u64>>,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time without advancing it
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    pub fn clock(&self) -> SimClock {
        SimClock(self.now.clone())
    }

    pub fn wire(&self, device: Option<SimDevice>) -> SimWire {
        SimWire {
            now: self.now.clone(),
            device,
            driven_low: false,
            fell_at: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimClock(Rc<Cell<u64>>);

impl Clock for SimClock {
    fn now_micros(&self) -> u64 {
        let now = self.0.get();
        self.0.set(now + 1);
        now
    }
}

/// The data line with at most one device attached
#[derive(Debug)]
pub struct SimWire {
    now: Rc<Cell<u64>>,
    device: Option<SimDevice>,
    driven_low: bool,
    fell_at: u64,
}

impl SimWire {
    pub fn device(&self) -> Option<&SimDevice> {
        self.device.as_ref()
    }

    pub fn device_mut(&mut self) -> Option<&mut SimDevice> {
        self.device.as_mut()
    }

    fn level_high(&self) -> bool {
        let now = self.now.get();
        let device_low = self.device.as_ref().is_some_and(|d| d.pulls_low(now));
        !(self.driven_low || device_low)
    }
}

impl IoWire for SimWire {
    type Error = Infallible;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level_high())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        if !self.driven_low {
            let now = self.now.get();
            self.driven_low = true;
            self.fell_at = now;
            if let Some(device) = self.device.as_mut() {
                device.on_fall(now);
            }
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.driven_low {
            let now = self.now.get();
            self.driven_low = false;
            if let Some(device) = self.device.as_mut() {
                device.on_rise(now, now - self.fell_at);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    /// Echoes the byte written after each reset
    Loopback,
    /// DS18B20 answering Skip ROM, Convert T and Read Scratchpad
    Thermometer { sensed: u16, register: u16 },
    StuckLow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Rom,
    Function,
    Echo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Receive { stage: Stage, byte: u8, bits: u8 },
    Transmit { data: [u8; 9], len: u8, bit: u16 },
}

#[derive(Debug, Clone)]
pub struct SimDevice {
    kind: Kind,
    phase: Phase,
    presence_delay: u64,
    presence_width: u64,
    pull: Option<(u64, u64)>,
    conversions: u32,
}

impl SimDevice {
    fn with_kind(kind: Kind) -> Self {
        Self {
            kind,
            phase: Phase::Idle,
            presence_delay: 20,
            presence_width: 100,
            pull: None,
            conversions: 0,
        }
    }

    pub fn loopback() -> Self {
        Self::with_kind(Kind::Loopback)
    }

    /// Sensor that converts to `raw` (1/16 degC, two's complement)
    pub fn thermometer(raw: u16) -> Self {
        Self::with_kind(Kind::Thermometer {
            sensed: raw,
            register: POWER_ON_REGISTER,
        })
    }

    pub fn stuck_low() -> Self {
        Self::with_kind(Kind::StuckLow)
    }

    pub fn presence_width(mut self, us: u64) -> Self {
        self.presence_width = us;
        self
    }

    pub fn conversions(&self) -> u32 {
        self.conversions
    }

    pub fn set_sensed(&mut self, raw: u16) {
        if let Kind::Thermometer { sensed, .. } = &mut self.kind {
            *sensed = raw;
        }
    }

    fn pulls_low(&self, now: u64) -> bool {
        match self.kind {
            Kind::StuckLow => true,
            _ => self.pull.is_some_and(|(from, until)| from <= now && now < until),
        }
    }

    fn on_fall(&mut self, now: u64) {
        if let Phase::Transmit { data, len, bit } = &mut self.phase {
            let value = (data[usize::from(*bit / 8)] >> (*bit % 8)) & 0x01;
            if value == 0 {
                self.pull = Some((now, now + READ_ZERO_HOLD_US));
            }
            *bit += 1;
            if *bit == u16::from(*len) * 8 {
                self.phase = Phase::Idle;
            }
        }
    }

    fn on_rise(&mut self, now: u64, low_for: u64) {
        if low_for >= RESET_MIN_US {
            let start = now + self.presence_delay;
            self.pull = Some((start, start + self.presence_width));
            let stage = match self.kind {
                Kind::Loopback => Stage::Echo,
                _ => Stage::Rom,
            };
            self.phase = Phase::Receive {
                stage,
                byte: 0,
                bits: 0,
            };
            return;
        }

        if let Phase::Receive { stage, byte, bits } = &mut self.phase {
            if low_for < WRITE_ONE_MAX_US {
                *byte |= 1 << *bits;
            }
            *bits += 1;
            if *bits == 8 {
                let (stage, byte) = (*stage, *byte);
                self.on_byte(stage, byte);
            }
        }
    }

    fn on_byte(&mut self, stage: Stage, byte: u8) {
        self.phase = match (stage, byte, &mut self.kind) {
            (Stage::Echo, _, _) => {
                let mut data = [0; 9];
                data[0] = byte;
                Phase::Transmit { data, len: 1, bit: 0 }
            }
            (Stage::Rom, 0xCC, _) => Phase::Receive {
                stage: Stage::Function,
                byte: 0,
                bits: 0,
            },
            (Stage::Function, 0x44, Kind::Thermometer { sensed, register }) => {
                *register = *sensed;
                self.conversions += 1;
                Phase::Idle
            }
            (Stage::Function, 0xBE, Kind::Thermometer { register, .. }) => {
                let [lsb, msb] = register.to_le_bytes();
                Phase::Transmit {
                    data: [lsb, msb, 0x4B, 0x46, 0x7F, 0xFF, 0x0C, 0x10, 0x00],
                    len: 9,
                    bit: 0,
                }
            }
            _ => Phase::Idle,
        };
    }
}
