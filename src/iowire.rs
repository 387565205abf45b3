use embedded_hal::digital::{Error, ErrorType, InputPin, OutputPin};

/// The single data line of a 1-Wire bus.
///
/// The line is open-drain: driving it high releases it to the pull-up and lets
/// the device hold it low.
pub trait IoWire {
    type Error: Error;

    /// Is the line high?
    fn is_high(&mut self) -> Result<bool, Self::Error>;

    /// Is the line low?
    fn is_low(&mut self) -> Result<bool, Self::Error>;

    /// Drives the line low
    fn set_low(&mut self) -> Result<(), Self::Error>;

    /// Releases the line
    ///
    /// *NOTE* the line only reads high if no device is holding it low
    fn set_high(&mut self) -> Result<(), Self::Error>;
}

/// Borrowed line, the owner keeps the pin between transactions
impl<W: IoWire + ?Sized> IoWire for &mut W {
    type Error = W::Error;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        (**self).is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        (**self).is_low()
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        (**self).set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        (**self).set_high()
    }
}

/// Single bidirectional pin
impl<IO> IoWire for (IO,)
where
    IO: ErrorType + OutputPin + InputPin,
{
    type Error = IO::Error;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }
}

/// Separate sense and drive pins tied to the same line
impl<E, I, O> IoWire for (I, O)
where
    E: Error,
    I: ErrorType<Error = E> + InputPin,
    O: ErrorType<Error = E> + OutputPin,
{
    type Error = E;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.1.set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.1.set_high()
    }
}
