#![no_std]
#![no_main]

use defmt::{error, info};
use embassy_adc_sequence::board::{CHANNEL_COUNT, RT685S_EVK, SEQUENCE_SAMPLES};
use embassy_adc_sequence::{Config, LogConsole, Sampler};
use embassy_adc_sequence_rt685s_evk::EvkAdc;
use embassy_executor::Spawner;
use embassy_imxrt::adc::{self, Adc};
use embassy_imxrt::bind_interrupts;
use embassy_time::Delay;

bind_interrupts!(struct Irqs {
    ADC0 => adc::InterruptHandler;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_imxrt::init(Default::default());

    info!("Initializing ADC0");
    // channel A on ADC0_0A, channel B on ADC0_1A
    let adc = Adc::new(
        p.ADC0,
        Irqs,
        adc::Config::default(),
        [
            adc::ChannelConfig::single_ended(p.PIO0_5),
            adc::ChannelConfig::single_ended(p.PIO0_12),
        ],
    );
    let adc = EvkAdc::new(adc, [0, 1]);

    let sampler = match Sampler::<_, _, _, CHANNEL_COUNT, SEQUENCE_SAMPLES>::new(
        adc,
        LogConsole,
        Delay,
        &RT685S_EVK,
        Config::default(),
    ) {
        Ok(sampler) => sampler,
        Err(e) => {
            error!("invalid sequence for {=str}: {}", RT685S_EVK.name, e);
            return;
        }
    };

    let fatal = sampler.run().await;
    error!("ADC sequence sample stopped: {}", fatal);
}
