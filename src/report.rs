//! Console reports emitted by the sampling loop.

use core::fmt;

use crate::error::Error;

/// One console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report<'a> {
    /// The controller failed its readiness check.
    NotReady {
        /// Controller name
        device: &'a str,
    },
    /// A channel could not be configured.
    ChannelSetupFailed {
        /// Position in the channel table
        index: usize,
        /// Driver error
        error: Error,
    },
    /// Start of an iteration.
    Iteration {
        /// Iteration counter
        count: u32,
    },
    /// The acquisition of this iteration failed.
    ReadFailed {
        /// Driver error
        error: Error,
    },
    /// Start of the readings of one channel.
    Channel {
        /// Controller name
        device: &'a str,
        /// Channel identifier
        channel_id: u8,
        /// Samplings per channel
        samples: usize,
    },
    /// One reading.
    Sample {
        /// Raw value as acquired
        raw: u16,
        /// Converted value, `None` when not available
        millivolts: Option<i32>,
    },
}

impl Report<'_> {
    /// `true` for the failure lines.
    pub const fn is_error(&self) -> bool {
        matches!(
            self,
            Self::NotReady { .. } | Self::ChannelSetupFailed { .. } | Self::ReadFailed { .. }
        )
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NotReady { device } => write!(f, "ADC controller device {} not ready", device),
            Self::ChannelSetupFailed { index, error } => {
                write!(f, "Could not setup channel #{} ({})", index, error.code())
            }
            Self::Iteration { count } => write!(f, "ADC sequence reading [{}]:", count),
            Self::ReadFailed { error } => write!(f, "Could not read ({})", error.code()),
            Self::Channel {
                device,
                channel_id,
                samples,
            } => write!(f, "- {}, channel {}, {} sequence samples:", device, channel_id, samples),
            Self::Sample {
                raw,
                millivolts: Some(mv),
            } => write!(f, "- - {} = {}mV", raw, mv),
            Self::Sample { raw, millivolts: None } => {
                write!(f, "- - {} (value in mV not available)", raw)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Report<'_> {
    fn format(&self, f: defmt::Formatter) {
        match *self {
            Self::NotReady { device } => defmt::write!(f, "ADC controller device {=str} not ready", device),
            Self::ChannelSetupFailed { index, error } => {
                defmt::write!(f, "Could not setup channel #{} ({})", index, error.code())
            }
            Self::Iteration { count } => defmt::write!(f, "ADC sequence reading [{}]:", count),
            Self::ReadFailed { error } => defmt::write!(f, "Could not read ({})", error.code()),
            Self::Channel {
                device,
                channel_id,
                samples,
            } => defmt::write!(
                f,
                "- {=str}, channel {}, {} sequence samples:",
                device,
                channel_id,
                samples
            ),
            Self::Sample {
                raw,
                millivolts: Some(mv),
            } => defmt::write!(f, "- - {} = {}mV", raw, mv),
            Self::Sample { raw, millivolts: None } => {
                defmt::write!(f, "- - {} (value in mV not available)", raw)
            }
        }
    }
}

/// Line-oriented sink for reports.
pub trait Console {
    /// Emit one line.
    fn report(&mut self, report: Report<'_>);
}

impl<T: Console + ?Sized> Console for &mut T {
    fn report(&mut self, report: Report<'_>) {
        (**self).report(report)
    }
}

/// Console writing through the crate log backend (`defmt` or `log`).
///
/// Failure lines go out at error level, everything else at info level.
/// Without a log backend the reports are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogConsole;

impl Console for LogConsole {
    fn report(&mut self, report: Report<'_>) {
        if report.is_error() {
            error!("{}", report);
        } else {
            info!("{}", report);
        }
    }
}
