//! Errors

use core::fmt;

/// ADC driver and conversion error
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The controller is not initialized or not powered.
    NotReady,
    /// Invalid channel, sequence or conversion parameters.
    InvalidArgument,
    /// The destination buffer is too small for the sequence.
    NoMemory,
    /// A conversion is already in progress.
    Busy,
    /// The conversion did not complete in time.
    Timeout,
    /// Hardware fault during the conversion.
    Io,
    /// The requested setting is not supported by the controller.
    NotSupported,
    /// Arithmetic result does not fit the output type.
    Range,
}

impl Error {
    /// Negative errno-style status code, as printed on the console.
    pub const fn code(self) -> i32 {
        match self {
            Self::NotReady => -19,
            Self::InvalidArgument => -22,
            Self::NoMemory => -12,
            Self::Busy => -16,
            Self::Timeout => -116,
            Self::Io => -5,
            Self::NotSupported => -134,
            Self::Range => -34,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Setup failure. The sampling loop is never entered after one of these.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fatal {
    /// The ADC controller reported it is not ready.
    NotReady,
    /// Configuring the channel at `index` of the channel table failed.
    ChannelSetup {
        /// Position in the channel table.
        index: usize,
        /// Driver error.
        error: Error,
    },
}

impl From<Fatal> for Error {
    fn from(fatal: Fatal) -> Self {
        match fatal {
            Fatal::NotReady => Error::NotReady,
            Fatal::ChannelSetup { error, .. } => error,
        }
    }
}
