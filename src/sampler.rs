//! Sequence sampling loop.
//!
//! [`Sampler`] checks the controller and configures the channels once.
//! [`Sampler::start`] hands back a [`Running`] loop that acquires the whole
//! sequence, prints every reading and sleeps, forever.

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

use crate::adc::{AdcSequencer, Error, Sequence};
use crate::board::Board;
use crate::error::Fatal;
use crate::report::{Console, Report};

/// Sampling loop config
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Sleep between two acquisitions, microsecond granularity.
    pub interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
        }
    }
}

/// Outcome of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cycle {
    /// Readings were acquired and reported.
    Reported,
    /// The acquisition failed, nothing was reported.
    ReadFailed(Error),
}

/// Sampling loop before channel setup.
pub struct Sampler<'b, A, C, D, const CHANNELS: usize, const SAMPLES: usize> {
    adc: A,
    console: C,
    delay: D,
    board: &'b Board<CHANNELS>,
    sequence: Sequence,
    config: Config,
}

impl<'b, A, C, D, const CHANNELS: usize, const SAMPLES: usize> Sampler<'b, A, C, D, CHANNELS, SAMPLES>
where
    A: AdcSequencer,
    C: Console,
    D: DelayNs,
{
    /// Build the sequence for `board`, sampling each channel `SAMPLES` times.
    ///
    /// Fails with [`Error::InvalidArgument`] if the channel ids of the table
    /// are out of range or not strictly increasing, or `SAMPLES` is zero.
    pub fn new(adc: A, console: C, delay: D, board: &'b Board<CHANNELS>, config: Config) -> Result<Self, Error> {
        let sequence = board.sequence::<SAMPLES>()?;
        sequence.check_buffer(CHANNELS * SAMPLES)?;

        Ok(Self {
            adc,
            console,
            delay,
            board,
            sequence,
            config,
        })
    }

    /// The sequence requested on every iteration.
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Check the controller and configure every channel in table order.
    ///
    /// Stops at the first failure; later channels are left untouched.
    pub fn start(mut self) -> Result<Running<'b, A, C, D, CHANNELS, SAMPLES>, Fatal> {
        if !self.adc.is_ready() {
            self.console.report(Report::NotReady { device: self.adc.name() });
            return Err(Fatal::NotReady);
        }

        for (index, channel) in self.board.channels.iter().enumerate() {
            if let Err(error) = self.adc.channel_setup(channel) {
                self.console.report(Report::ChannelSetupFailed { index, error });
                return Err(Fatal::ChannelSetup { index, error });
            }
            debug!("channel #{} configured (id {})", index, channel.channel_id);
        }

        Ok(Running {
            adc: self.adc,
            console: self.console,
            delay: self.delay,
            board: self.board,
            sequence: self.sequence,
            config: self.config,
            buffer: [[0; CHANNELS]; SAMPLES],
            count: 0,
        })
    }

    /// Start, then sample forever. Returns only on a setup failure.
    pub async fn run(self) -> Fatal {
        match self.start() {
            Ok(running) => running.run().await,
            Err(fatal) => fatal,
        }
    }
}

/// Sampling loop with every channel configured.
pub struct Running<'b, A, C, D, const CHANNELS: usize, const SAMPLES: usize> {
    adc: A,
    console: C,
    delay: D,
    board: &'b Board<CHANNELS>,
    sequence: Sequence,
    config: Config,
    buffer: [[u16; CHANNELS]; SAMPLES],
    count: u32,
}

impl<'b, A, C, D, const CHANNELS: usize, const SAMPLES: usize> Running<'b, A, C, D, CHANNELS, SAMPLES>
where
    A: AdcSequencer,
    C: Console,
    D: DelayNs,
{
    /// Counter printed by the next iteration.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Readings of the last acquisition, indexed `[sample][channel]`.
    pub fn readings(&self) -> &[[u16; CHANNELS]; SAMPLES] {
        &self.buffer
    }

    /// Run one iteration: acquire, report and sleep.
    ///
    /// The sleep happens whether or not the acquisition succeeded.
    pub async fn poll(&mut self) -> Cycle {
        let count = self.count;
        self.count = count.wrapping_add(1);
        self.console.report(Report::Iteration { count });

        trace!("acquiring sequence {}", count);
        let cycle = match self.adc.read(&self.sequence, self.buffer.as_flattened_mut()).await {
            Ok(()) => {
                self.report_readings();
                Cycle::Reported
            }
            Err(error) => {
                self.console.report(Report::ReadFailed { error });
                Cycle::ReadFailed(error)
            }
        };

        let us = u32::try_from(self.config.interval.as_micros()).unwrap_or(u32::MAX);
        self.delay.delay_us(us).await;

        cycle
    }

    /// Sample forever.
    pub async fn run(mut self) -> ! {
        loop {
            self.poll().await;
        }
    }

    fn report_readings(&mut self) {
        let device = self.adc.name();

        for (i, channel) in self.board.channels.iter().enumerate() {
            self.console.report(Report::Channel {
                device,
                channel_id: channel.channel_id,
                samples: SAMPLES,
            });

            for sample in &self.buffer {
                let raw = sample[i];
                self.console.report(Report::Sample {
                    raw,
                    millivolts: channel.millivolts(raw, self.sequence.resolution),
                });
            }
        }
    }
}
