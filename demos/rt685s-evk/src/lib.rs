#![no_std]
#![allow(async_fn_in_trait)]

use defmt_rtt as _;
use embassy_adc_sequence::adc::{
    AcquisitionTime, AdcSequencer, ChannelConfig, Error, Gain, Input, Reference, Sequence,
};
use embassy_adc_sequence::board::{CHANNEL_COUNT, RT685S_EVK};
use embassy_imxrt::adc::Adc;
use embassy_time::Timer;
use mimxrt600_fcb::FlexSPIFlashConfigurationBlock;
use panic_probe as _;

#[link_section = ".otfad"]
#[used]
static OTFAD: [u8; 256] = [0; 256];

#[rustfmt::skip]
#[link_section = ".fcb"]
#[used]
static FCB: FlexSPIFlashConfigurationBlock = FlexSPIFlashConfigurationBlock::build();

#[link_section = ".keystore"]
#[used]
static KEYSTORE: [u8; 2048] = [0; 2048];

/// Resolution of a standard LPADC conversion.
pub const RESOLUTION: u8 = 12;

/// ADC0 of the EVK behind the sequence sampler.
///
/// The HAL driver routes its inputs when it is created, so channel setup
/// only checks that the requested channel is one of the routed inputs and
/// that its settings match what the LPADC can do.
pub struct EvkAdc<'d> {
    adc: Adc<'d, CHANNEL_COUNT>,
    routed: [u8; CHANNEL_COUNT],
    configured: u32,
}

impl<'d> EvkAdc<'d> {
    /// Wrap a HAL driver whose command chain samples `routed` channel ids,
    /// in this order.
    pub fn new(adc: Adc<'d, CHANNEL_COUNT>, routed: [u8; CHANNEL_COUNT]) -> Self {
        Self {
            adc,
            routed,
            configured: 0,
        }
    }

    fn routed_mask(&self) -> u32 {
        self.routed.iter().fold(0, |mask, id| mask | (1 << id))
    }
}

impl AdcSequencer for EvkAdc<'_> {
    fn name(&self) -> &str {
        RT685S_EVK.name
    }

    fn is_ready(&self) -> bool {
        // Adc::new powers, clocks and resets the block before returning.
        true
    }

    fn channel_setup(&mut self, channel: &ChannelConfig) -> Result<(), Error> {
        if !self.routed.contains(&channel.channel_id) {
            return Err(Error::InvalidArgument);
        }
        // No programmable gain, and the HAL config selects the 1.8 V supply.
        if channel.gain != Gain::G1 || channel.reference != Reference::Internal {
            return Err(Error::NotSupported);
        }
        // Pin routing and sample time are fixed when the HAL driver is created.
        if channel.input != Input::Fixed || channel.acquisition_time != AcquisitionTime::Default {
            return Err(Error::NotSupported);
        }

        self.configured |= 1 << channel.channel_id;
        Ok(())
    }

    async fn read(&mut self, sequence: &Sequence, buffer: &mut [u16]) -> Result<(), Error> {
        sequence.check_buffer(buffer.len())?;
        if sequence.channels & !self.configured != 0 {
            return Err(Error::InvalidArgument);
        }
        // The command chain always converts every routed input.
        if sequence.channels != self.routed_mask() {
            return Err(Error::NotSupported);
        }
        if sequence.resolution != RESOLUTION || sequence.oversampling != 0 || sequence.calibrate {
            return Err(Error::NotSupported);
        }

        let interval_us = sequence.options.map_or(0, |o| o.interval_us);
        let mut fifo = [0i16; CHANNEL_COUNT];

        for (n, sampling) in buffer
            .chunks_exact_mut(sequence.channel_count())
            .take(sequence.samplings())
            .enumerate()
        {
            if n > 0 && interval_us > 0 {
                Timer::after_micros(u64::from(interval_us)).await;
            }

            self.adc.sample(&mut fifo).await;

            // 12-bit conversions sit in bits 14:3 of the FIFO word
            for (dst, raw) in sampling.iter_mut().zip(fifo) {
                *dst = (raw.max(0) as u16) >> 3;
            }
        }

        Ok(())
    }
}
