//! Elysion - Modular Control Panel Peer Firmware
//!
//! Every board of the panel runs this firmware. At boot it obtains a bus
//! address from the panel master, then polls its inputs and reports each
//! change to the master as a 5-byte record.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_time::{Delay, Duration, Ticker};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use elysion_core::bootstrap::AddressBootstrap;
use elysion_core::config::{PanelConfig, SamplingMode};
use elysion_core::dispatch::BusDispatcher;
use elysion_core::engine::SyncEngine;
use elysion_core::{BoardMap, LogicalBoard};
use elysion_drivers::{LedChain, QuadratureEncoder};
use elysion_hal::bus::BusConfig;
use elysion_hal_rp2040::adc::AdcBank;
use elysion_hal_rp2040::flash::Rp2040FlashStorage;
use elysion_hal_rp2040::i2c::I2cTransport;
use elysion_hal_rp2040::identity::FlashIdentityStore;
use elysion_hal_rp2040::pins::{PanelIo, PinBank, SioPins};
use elysion_hal_rp2040::ws2812::{Ws2812, Ws2812Program};

use crate::boards::{ANALOG_PINS, REVISION};
use crate::leds::{ChainPort, Indicators};
use crate::platform::{ActivityLed, Platform};
use crate::sink::PanelSink;
use crate::tasks::{Capture, Encoder};

mod boards;
mod config;
mod leds;
mod platform;
mod sink;
mod tasks;

/// Polling cycle period
pub const POLL_INTERVAL_MS: u64 = 2;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

static PANEL_CONFIG: StaticCell<PanelConfig> = StaticCell::new();
static ENCODERS: StaticCell<BoardMap<Option<Encoder>>> = StaticCell::new();
static CAPTURE: StaticCell<Capture> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Elysion firmware starting...");

    let p = embassy_rp::init(Default::default());

    let mut storage = Rp2040FlashStorage::new(p.FLASH, p.DMA_CH0);
    let config: &'static PanelConfig = PANEL_CONFIG.init(config::load(&mut storage, REVISION).await);

    // Address bootstrap
    let mut bus = I2cTransport::new(p.I2C0, p.PIN_1, p.PIN_0, BusConfig::STANDARD);
    let mut store = FlashIdentityStore::new(storage);
    let mut platform = Platform;
    let mut delay = Delay;
    let address = match AddressBootstrap::new(&mut bus, &mut store, &mut platform, &mut delay).run() {
        Ok(address) => address,
        Err(e) => {
            error!("Address bootstrap failed: {:?}", e);
            cortex_m::peripheral::SCB::sys_reset();
        }
    };
    info!("Bus address {}", address.get());

    // Analog lines
    let mut adc = AdcBank::new(Adc::new_blocking(p.ADC, AdcConfig::default()));
    let channels = [
        Channel::new_pin(p.PIN_26, Pull::None),
        Channel::new_pin(p.PIN_27, Pull::None),
        Channel::new_pin(p.PIN_28, Pull::None),
    ];
    for (pin, channel) in ANALOG_PINS.into_iter().zip(channels) {
        if let Err(e) = adc.add(pin, channel) {
            warn!("ADC channel rejected: {:?}", e);
        }
    }

    // Indicator chains
    let Pio {
        mut common,
        sm0,
        sm1,
        sm2,
        ..
    } = Pio::new(p.PIO0, Irqs);
    let program = Ws2812Program::new(&mut common);
    let ports = [
        ChainPort::Left(Ws2812::new(&mut common, sm0, p.PIN_2, &program)),
        ChainPort::Middle(Ws2812::new(&mut common, sm1, p.PIN_3, &program)),
        ChainPort::Right(Ws2812::new(&mut common, sm2, p.PIN_6, &program)),
    ];
    let mut indicators = Indicators::new(config);
    for port in ports {
        if let Err(e) = indicators.attach(LedChain::new(port)) {
            warn!("LED chain rejected: {:?}", e);
        }
    }
    indicators.show_all();

    // Panel GPIOs
    let mut bank = PinBank::new([
        None, // GPIO0
        None, // GPIO1
        None, // GPIO2
        None, // GPIO3
        Some(p.PIN_4.into()),
        Some(p.PIN_5.into()),
        None, // GPIO6
        Some(p.PIN_7.into()),
        Some(p.PIN_8.into()),
        Some(p.PIN_9.into()),
        Some(p.PIN_10.into()),
        Some(p.PIN_11.into()),
        Some(p.PIN_12.into()),
        Some(p.PIN_13.into()),
        Some(p.PIN_14.into()),
        Some(p.PIN_15.into()),
        Some(p.PIN_16.into()),
        Some(p.PIN_17.into()),
        Some(p.PIN_18.into()),
        Some(p.PIN_19.into()),
        Some(p.PIN_20.into()),
        Some(p.PIN_21.into()),
        Some(p.PIN_22.into()),
        Some(p.PIN_23.into()),
        Some(p.PIN_24.into()),
        None, // GPIO25
        None, // GPIO26
        None, // GPIO27
        None, // GPIO28
        Some(p.PIN_29.into()),
    ]);

    // Encoder lines go to the capture tasks before the decoders read them
    let mut lines: BoardMap<Option<(Input<'static>, Input<'static>)>> = BoardMap::from_fn(|_| None);
    for (board, board_config) in config.boards.iter() {
        let Some(encoder) = board_config.encoder() else {
            continue;
        };
        match (bank.take(encoder.pin_a), bank.take(encoder.pin_b)) {
            (Ok(a), Ok(b)) => lines[board] = Some((Input::new(a, Pull::Up), Input::new(b, Pull::Up))),
            _ => warn!("Encoder lines of {:?} unavailable", board),
        }
    }

    let encoders: &'static BoardMap<Option<Encoder>> = ENCODERS.init(lines.map(|board, pins| {
        let encoder = config.board(board).encoder()?;
        pins.as_ref()?;
        Some(QuadratureEncoder::new(SioPins::new(encoder.pin_a, encoder.pin_b)))
    }));
    let capture: &'static Capture =
        CAPTURE.init(Capture::new(BoardMap::from_fn(|board| encoders[board].as_ref())));

    // Capture tasks
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    for board in LogicalBoard::ALL {
        if let Some((a, b)) = lines[board].take() {
            unwrap!(high.spawn(tasks::encoder_task(board, a, b, capture)));
        }
    }
    if config.sampling == SamplingMode::Interrupt {
        unwrap!(high.spawn(tasks::port_sample_task(capture)));
    }

    // Engine and sink
    let mut engine = SyncEngine::new(config, capture, PanelIo::new(bank), adc, Delay);
    engine.start();

    let activity = ActivityLed(Output::new(p.PIN_25, Level::Low));
    let dispatcher = BusDispatcher::new(bus, address).with_activity_led(activity);
    let mut sink = PanelSink::new(dispatcher, indicators);

    info!("Polling every {} ms", POLL_INTERVAL_MS);

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    loop {
        engine.poll(&mut sink);
        ticker.next().await;
    }
}
