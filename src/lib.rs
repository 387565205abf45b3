#![no_std]
#![doc = include_str!("../README.md")]

#[cfg(any(test, feature = "std"))]
extern crate std;

mod clock;
mod command;
mod driver;
#[cfg(feature = "ds18b20")]
pub mod ds18b20;
mod iowire;
pub mod line;
mod result;
mod sensor;
#[cfg(test)]
mod sim;
mod timing;

#[cfg(feature = "std")]
pub use clock::StdClock;
pub use clock::{delay_us, BusyWait, Clock};
pub use command::{Command, OpCode};
pub use driver::Driver;
pub use iowire::IoWire;
#[cfg(feature = "ds18b20")]
pub use line::get_temperature;
pub use line::{Board, Line};
pub use result::Error;
pub use sensor::Sensor;
pub use timing::Timing;
