//! ADC channel and sequence configuration, the driver seam and
//! raw-to-millivolt conversion.

use core::mem::size_of;

pub use crate::error::Error;

/// Highest channel identifier that fits the sequence channel mask.
pub const MAX_CHANNEL_ID: u8 = 31;

/// Reference voltage value meaning "no reference configured".
pub const VREF_UNSET: u16 = 0;

/// Voltage reference selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(non_camel_case_types)]
pub enum Reference {
    /// VDD
    Vdd1,
    /// VDD/2
    Vdd1_2,
    /// VDD/3
    Vdd1_3,
    /// VDD/4
    Vdd1_4,
    /// Internal reference of the controller
    Internal,
    /// External reference, first input
    External0,
    /// External reference, second input
    External1,
}

/// Input amplification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(non_camel_case_types)]
#[allow(missing_docs)]
pub enum Gain {
    G1_6,
    G1_5,
    G1_4,
    G2_7,
    G1_3,
    G2_5,
    G1_2,
    G2_3,
    G4_5,
    G1,
    G2,
    G3,
    G4,
    G6,
    G8,
    G12,
    G16,
    G24,
    G32,
    G64,
    G128,
}

impl Gain {
    /// Gain as a `(numerator, denominator)` ratio.
    pub const fn ratio(self) -> (i32, i32) {
        match self {
            Self::G1_6 => (1, 6),
            Self::G1_5 => (1, 5),
            Self::G1_4 => (1, 4),
            Self::G2_7 => (2, 7),
            Self::G1_3 => (1, 3),
            Self::G2_5 => (2, 5),
            Self::G1_2 => (1, 2),
            Self::G2_3 => (2, 3),
            Self::G4_5 => (4, 5),
            Self::G1 => (1, 1),
            Self::G2 => (2, 1),
            Self::G3 => (3, 1),
            Self::G4 => (4, 1),
            Self::G6 => (6, 1),
            Self::G8 => (8, 1),
            Self::G12 => (12, 1),
            Self::G16 => (16, 1),
            Self::G24 => (24, 1),
            Self::G32 => (32, 1),
            Self::G64 => (64, 1),
            Self::G128 => (128, 1),
        }
    }

    /// Multiply `value` by the inverse of this gain.
    ///
    /// The multiplication happens before the division so fractional gains
    /// keep their precision.
    pub fn invert(self, value: i32) -> Result<i32, Error> {
        let (num, den) = self.ratio();
        value.checked_mul(den).map(|v| v / num).ok_or(Error::Range)
    }
}

/// Time the sample-and-hold circuit is connected to the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionTime {
    /// Controller default
    #[default]
    Default,
    /// Controller clock ticks
    Ticks(u16),
    /// Microseconds
    Micros(u16),
    /// Nanoseconds
    Nanos(u16),
}

/// Analog input routing for a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Input {
    /// Use the controller's fixed routing for the channel id.
    Fixed,
    /// Sample one input against ground.
    SingleEnded {
        /// Positive input
        positive: u8,
    },
    /// Sample the difference between two inputs.
    Differential {
        /// Positive input
        positive: u8,
        /// Negative input
        negative: u8,
    },
}

/// ADC channel config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Channel identifier, also its bit in the sequence channel mask.
    pub channel_id: u8,
    /// Voltage reference selector
    pub reference: Reference,
    /// Input amplification
    pub gain: Gain,
    /// Sample-and-hold acquisition time
    pub acquisition_time: AcquisitionTime,
    /// Reference voltage in millivolts, [`VREF_UNSET`] if unknown.
    pub vref_mv: u16,
    /// Input routing
    pub input: Input,
}

impl ChannelConfig {
    /// Channel with unity gain, default acquisition time and fixed input routing.
    pub const fn new(channel_id: u8, reference: Reference, vref_mv: u16) -> Self {
        Self {
            channel_id,
            reference,
            gain: Gain::G1,
            acquisition_time: AcquisitionTime::Default,
            vref_mv,
            input: Input::Fixed,
        }
    }

    /// Set the input amplification.
    pub const fn with_gain(mut self, gain: Gain) -> Self {
        self.gain = gain;
        self
    }

    /// Set the acquisition time.
    pub const fn with_acquisition_time(mut self, acquisition_time: AcquisitionTime) -> Self {
        self.acquisition_time = acquisition_time;
        self
    }

    /// Set the input routing.
    pub const fn with_input(mut self, input: Input) -> Self {
        self.input = input;
        self
    }

    /// Reference voltage in millivolts, `None` when not configured.
    pub const fn reference_mv(&self) -> Option<u16> {
        match self.vref_mv {
            VREF_UNSET => None,
            mv => Some(mv),
        }
    }

    /// Convert a raw reading of this channel to millivolts.
    ///
    /// Returns `None` when the conversion fails or the channel has no
    /// reference voltage, whatever the conversion returned.
    pub fn millivolts(&self, raw: u16, resolution: u8) -> Option<i32> {
        let converted = raw_to_millivolts(i32::from(self.vref_mv), self.gain, resolution, i32::from(raw));
        match (self.reference_mv(), converted) {
            (Some(_), Ok(mv)) => Some(mv),
            _ => None,
        }
    }
}

/// Convert a raw reading to millivolts.
///
/// `raw * vref_mv`, scaled by the inverse `gain`, then shifted right by
/// `resolution` bits.
pub fn raw_to_millivolts(vref_mv: i32, gain: Gain, resolution: u8, raw: i32) -> Result<i32, Error> {
    if resolution == 0 || resolution > 31 {
        return Err(Error::InvalidArgument);
    }

    let adc_mv = raw.checked_mul(vref_mv).ok_or(Error::Range)?;
    let adc_mv = gain.invert(adc_mv)?;

    Ok(adc_mv >> resolution)
}

/// Repeated sampling of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceOptions {
    /// Samples taken after the first one, per channel.
    pub extra_samplings: u16,
    /// Delay between the start of consecutive samplings, in microseconds.
    /// `0` samples back to back.
    pub interval_us: u32,
}

/// One acquisition request over a set of channels.
///
/// Readings land in the destination buffer in sampling order: all
/// channels of the first sampling in ascending channel id order, then
/// all channels of the second sampling, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sequence {
    /// Bit `n` set means channel id `n` is sampled.
    pub channels: u32,
    /// Resolution in bits
    pub resolution: u8,
    /// Hardware averaging of `2^oversampling` conversions per sample.
    pub oversampling: u8,
    /// Calibrate the controller before the sequence.
    pub calibrate: bool,
    /// Repeated sampling, `None` for a single sampling.
    pub options: Option<SequenceOptions>,
}

impl Sequence {
    /// Single sampling of every channel in `channels`.
    pub fn new(channels: &[ChannelConfig], resolution: u8) -> Result<Self, Error> {
        Ok(Self {
            channels: channel_mask(channels)?,
            resolution,
            oversampling: 0,
            calibrate: false,
            options: None,
        })
    }

    /// Take `samples` samplings of every channel, `interval_us` apart.
    pub fn with_samples(mut self, samples: u16, interval_us: u32) -> Result<Self, Error> {
        let extra_samplings = samples.checked_sub(1).ok_or(Error::InvalidArgument)?;
        self.options = Some(SequenceOptions {
            extra_samplings,
            interval_us,
        });
        Ok(self)
    }

    /// Number of channels in the mask.
    pub const fn channel_count(&self) -> usize {
        self.channels.count_ones() as usize
    }

    /// Samplings per channel.
    pub fn samplings(&self) -> usize {
        self.options.map_or(1, |o| usize::from(o.extra_samplings) + 1)
    }

    /// Readings needed to hold the whole sequence.
    pub fn required_len(&self) -> usize {
        self.channel_count() * self.samplings()
    }

    /// Bytes needed to hold the whole sequence.
    pub fn required_bytes(&self) -> usize {
        self.required_len() * size_of::<u16>()
    }

    /// Check that a destination of `len` readings can hold the sequence.
    pub fn check_buffer(&self, len: usize) -> Result<(), Error> {
        if len < self.required_len() {
            return Err(Error::NoMemory);
        }
        Ok(())
    }
}

/// Channel mask with one bit set per channel id.
///
/// Ids must be strictly increasing, matching the order in which readings
/// land in the buffer.
pub fn channel_mask(channels: &[ChannelConfig]) -> Result<u32, Error> {
    channels.iter().try_fold(0u32, |mask, ch| {
        if ch.channel_id > MAX_CHANNEL_ID {
            return Err(Error::InvalidArgument);
        }
        // highest id so far
        if mask != 0 && u32::from(ch.channel_id) <= 31 - mask.leading_zeros() {
            return Err(Error::InvalidArgument);
        }
        Ok(mask | (1 << ch.channel_id))
    })
}

/// ADC controller able to sample a configured sequence of channels.
pub trait AdcSequencer {
    /// Controller name, used in console reports.
    fn name(&self) -> &str;

    /// `true` once the controller is initialized and powered.
    fn is_ready(&self) -> bool;

    /// Apply one channel configuration. Called once per channel before any
    /// sampling.
    fn channel_setup(&mut self, channel: &ChannelConfig) -> Result<(), Error>;

    /// Sample the whole sequence into `buffer`.
    ///
    /// Completes once every reading of the sequence is in `buffer` or the
    /// acquisition failed.
    async fn read(&mut self, sequence: &Sequence, buffer: &mut [u16]) -> Result<(), Error>;
}

impl<T: AdcSequencer + ?Sized> AdcSequencer for &mut T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn channel_setup(&mut self, channel: &ChannelConfig) -> Result<(), Error> {
        (**self).channel_setup(channel)
    }

    async fn read(&mut self, sequence: &Sequence, buffer: &mut [u16]) -> Result<(), Error> {
        (**self).read(sequence, buffer).await
    }
}
