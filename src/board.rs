//! Static board descriptions.
//!
//! Each board lists its ADC controller and the channels wired for the
//! sequence sample. Everything here is `const` so the channel table, the
//! resolution and the sample count are fixed at build time.

use crate::adc::{ChannelConfig, Error, Reference, Sequence};

/// Samplings per channel in each sequence.
pub const SEQUENCE_SAMPLES: usize = 5;

/// Index of channel A in the channel table.
pub const CHANNEL_A: usize = 0;
/// Index of channel B in the channel table.
pub const CHANNEL_B: usize = 1;
/// Channels in the sequence.
pub const CHANNEL_COUNT: usize = 2;

/// ADC controller and its sequence channels.
#[derive(Debug, Clone, Copy)]
pub struct Board<const N: usize> {
    /// Controller name
    pub name: &'static str,
    /// Channel table, in setup order.
    pub channels: [ChannelConfig; N],
    /// Resolution in bits, taken from the first channel node.
    pub resolution: u8,
}

impl<const N: usize> Board<N> {
    /// Sequence sampling every channel `SAMPLES` times back to back.
    pub fn sequence<const SAMPLES: usize>(&self) -> Result<Sequence, Error> {
        let samples = u16::try_from(SAMPLES).map_err(|_| Error::InvalidArgument)?;
        Sequence::new(&self.channels, self.resolution)?.with_samples(samples, 0)
    }
}

/// i.MX RT685S EVK: ADC0 channels 0 and 1 against the 1.8 V analog supply.
pub const RT685S_EVK: Board<CHANNEL_COUNT> = Board {
    name: "adc0",
    channels: [
        // channel A
        ChannelConfig::new(0, Reference::Internal, 1800),
        // channel B
        ChannelConfig::new(1, Reference::Internal, 1800),
    ],
    resolution: 12,
};
