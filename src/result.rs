use core::fmt::{Debug, Display, Formatter, Result as FmtResult};

/// Error type
#[derive(Debug, PartialEq, Eq)]
pub enum Error<E: Sized + Debug> {
    /// No presence pulse after reset: no device, a wiring fault or a stuck line
    NoPresence,
    PortError(E),
}

impl<E: Sized + Debug> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::PortError(e)
    }
}

impl<E: Sized + Debug> Display for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Error::NoPresence => f.write_str("no presence pulse on the 1-Wire bus"),
            Error::PortError(e) => write!(f, "1-Wire line error: {e:?}"),
        }
    }
}

impl<E: Sized + Debug> core::error::Error for Error<E> {}
