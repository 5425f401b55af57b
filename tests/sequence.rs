//! Two-channel, five-sample sequence against a scripted controller.

use std::cell::RefCell;
use std::rc::Rc;

use embassy_adc_sequence::adc::{AdcSequencer, ChannelConfig, Reference, Sequence, VREF_UNSET};
use embassy_adc_sequence::board::{Board, CHANNEL_COUNT, RT685S_EVK, SEQUENCE_SAMPLES};
use embassy_adc_sequence::report::{Console, Report};
use embassy_adc_sequence::sampler::{Config, Cycle, Sampler};
use embassy_adc_sequence::{Error, Fatal};
use embassy_futures::block_on;
use embedded_hal_async::delay::DelayNs;

#[derive(Default)]
struct Log {
    lines: Vec<String>,
    setups: Vec<u8>,
    // microseconds
    sleeps: Vec<u32>,
}

type Shared = Rc<RefCell<Log>>;

struct ScriptedAdc {
    log: Shared,
    fail_setup: Option<u8>,
    fail_read: bool,
}

impl AdcSequencer for ScriptedAdc {
    fn name(&self) -> &str {
        "adc0"
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn channel_setup(&mut self, channel: &ChannelConfig) -> Result<(), Error> {
        if self.fail_setup == Some(channel.channel_id) {
            return Err(Error::NotSupported);
        }
        self.log.borrow_mut().setups.push(channel.channel_id);
        Ok(())
    }

    async fn read(&mut self, sequence: &Sequence, buffer: &mut [u16]) -> Result<(), Error> {
        if self.fail_read {
            return Err(Error::Timeout);
        }
        sequence.check_buffer(buffer.len())?;
        buffer.fill(0);
        Ok(())
    }
}

struct SharedConsole(Shared);

impl Console for SharedConsole {
    fn report(&mut self, report: Report<'_>) {
        self.0.borrow_mut().lines.push(report.to_string());
    }
}

struct SharedDelay(Shared);

impl DelayNs for SharedDelay {
    async fn delay_ns(&mut self, _ns: u32) {}

    async fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().sleeps.push(us);
    }
}

fn parts(fail_setup: Option<u8>, fail_read: bool) -> (Shared, ScriptedAdc, SharedConsole, SharedDelay) {
    let log = Shared::default();
    let adc = ScriptedAdc {
        log: log.clone(),
        fail_setup,
        fail_read,
    };
    (log.clone(), adc, SharedConsole(log.clone()), SharedDelay(log))
}

#[test]
fn all_zero_readings() {
    let (log, adc, console, delay) = parts(None, false);
    let sampler: Sampler<'_, _, _, _, CHANNEL_COUNT, SEQUENCE_SAMPLES> =
        Sampler::new(adc, console, delay, &RT685S_EVK, Config::default()).unwrap();
    let mut running = sampler.start().unwrap();

    assert_eq!(block_on(running.poll()), Cycle::Reported);

    let log = log.borrow();
    assert_eq!(log.setups, vec![0, 1]);
    assert_eq!(log.sleeps, vec![1_000_000]);

    let mut expected = vec!["ADC sequence reading [0]:".to_string()];
    for id in 0..CHANNEL_COUNT {
        expected.push(format!("- adc0, channel {}, 5 sequence samples:", id));
        for _ in 0..SEQUENCE_SAMPLES {
            expected.push("- - 0 = 0mV".to_string());
        }
    }
    assert_eq!(log.lines, expected);
}

#[test]
fn all_zero_readings_without_reference() {
    let board = Board {
        name: "adc0",
        channels: [
            ChannelConfig::new(0, Reference::Vdd1, VREF_UNSET),
            ChannelConfig::new(1, Reference::Internal, 1800),
        ],
        resolution: 12,
    };
    let (log, adc, console, delay) = parts(None, false);
    let sampler: Sampler<'_, _, _, _, 2, 5> = Sampler::new(adc, console, delay, &board, Config::default()).unwrap();
    let mut running = sampler.start().unwrap();

    block_on(running.poll());

    let log = log.borrow();
    assert_eq!(&log.lines[2..7], vec!["- - 0 (value in mV not available)"; 5].as_slice());
    assert_eq!(&log.lines[8..13], vec!["- - 0 = 0mV"; 5].as_slice());
}

#[test]
fn setup_failure_on_second_channel() {
    let (log, adc, console, delay) = parts(Some(1), false);
    let sampler: Sampler<'_, _, _, _, CHANNEL_COUNT, SEQUENCE_SAMPLES> =
        Sampler::new(adc, console, delay, &RT685S_EVK, Config::default()).unwrap();

    let fatal = block_on(sampler.run());

    assert_eq!(
        fatal,
        Fatal::ChannelSetup {
            index: 1,
            error: Error::NotSupported
        }
    );
    let log = log.borrow();
    assert_eq!(log.setups, vec![0]);
    assert_eq!(log.lines, vec!["Could not setup channel #1 (-134)"]);
    assert!(log.sleeps.is_empty());
}

#[test]
fn failing_reads_keep_counting() {
    let (log, adc, console, delay) = parts(None, true);
    let sampler: Sampler<'_, _, _, _, CHANNEL_COUNT, SEQUENCE_SAMPLES> =
        Sampler::new(adc, console, delay, &RT685S_EVK, Config::default()).unwrap();
    let mut running = sampler.start().unwrap();

    for _ in 0..3 {
        assert_eq!(block_on(running.poll()), Cycle::ReadFailed(Error::Timeout));
    }

    let log = log.borrow();
    assert_eq!(
        log.lines,
        vec![
            "ADC sequence reading [0]:",
            "Could not read (-116)",
            "ADC sequence reading [1]:",
            "Could not read (-116)",
            "ADC sequence reading [2]:",
            "Could not read (-116)",
        ]
    );
    assert_eq!(log.sleeps, vec![1_000_000; 3]);
}

/// Writes `1000 + id` for every channel of every sampling, in ascending id order.
struct TaggingAdc;

impl AdcSequencer for TaggingAdc {
    fn name(&self) -> &str {
        "adc0"
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn channel_setup(&mut self, _channel: &ChannelConfig) -> Result<(), Error> {
        Ok(())
    }

    async fn read(&mut self, sequence: &Sequence, buffer: &mut [u16]) -> Result<(), Error> {
        sequence.check_buffer(buffer.len())?;
        let ids: Vec<u16> = (0..32).filter(|id| sequence.channels & (1 << id) != 0).collect();
        for (dst, id) in buffer.iter_mut().zip(ids.iter().cycle()) {
            *dst = 1000 + id;
        }
        Ok(())
    }
}

#[test]
fn readings_labelled_with_their_channel() {
    let ascending = Board {
        name: "adc0",
        channels: [
            ChannelConfig::new(2, Reference::Internal, 1800),
            ChannelConfig::new(5, Reference::Internal, 1800),
        ],
        resolution: 12,
    };
    let log = Shared::default();
    let sampler: Sampler<'_, _, _, _, 2, 1> = Sampler::new(
        TaggingAdc,
        SharedConsole(log.clone()),
        SharedDelay(log.clone()),
        &ascending,
        Config::default(),
    )
    .unwrap();
    let mut running = sampler.start().unwrap();
    block_on(running.poll());

    let log = log.borrow();
    assert_eq!(log.lines[1], "- adc0, channel 2, 1 sequence samples:");
    assert!(log.lines[2].starts_with("- - 1002 = "));
    assert_eq!(log.lines[3], "- adc0, channel 5, 1 sequence samples:");
    assert!(log.lines[4].starts_with("- - 1005 = "));
}

#[test]
fn out_of_order_table_rejected() {
    let descending = Board {
        name: "adc0",
        channels: [
            ChannelConfig::new(5, Reference::Internal, 1800),
            ChannelConfig::new(2, Reference::Internal, 1800),
        ],
        resolution: 12,
    };
    let log = Shared::default();
    let sampler: Result<Sampler<'_, _, _, _, 2, 1>, _> = Sampler::new(
        TaggingAdc,
        SharedConsole(log.clone()),
        SharedDelay(log),
        &descending,
        Config::default(),
    );
    assert_eq!(sampler.err(), Some(Error::InvalidArgument));
}
