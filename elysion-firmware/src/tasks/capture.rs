//! Capture tasks
//!
//! One task per encoder waits for an edge on either channel and ticks that
//! board's decoder. In interrupt sampling mode a second task snapshots the
//! GPIO port into the sample cache.

use defmt::*;
use embassy_futures::select::select;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};
use elysion_core::board::BOARD_COUNT;
use elysion_core::capture::CaptureLayer;
use elysion_core::LogicalBoard;
use elysion_drivers::QuadratureEncoder;
use elysion_hal_rp2040::pins::{port_levels, SioPins};

pub type Encoder = QuadratureEncoder<SioPins>;
pub type Capture = CaptureLayer<'static, Encoder>;

/// Port sampling period in interrupt sampling mode
pub const SAMPLE_INTERVAL_US: u64 = 500;

#[embassy_executor::task(pool_size = BOARD_COUNT)]
pub async fn encoder_task(
    board: LogicalBoard,
    mut a: Input<'static>,
    mut b: Input<'static>,
    capture: &'static Capture,
) {
    debug!("Encoder capture started on {:?}", board);

    loop {
        select(a.wait_for_any_edge(), b.wait_for_any_edge()).await;
        capture.on_encoder_change(board);
    }
}

#[embassy_executor::task]
pub async fn port_sample_task(capture: &'static Capture) {
    info!("Port sampling started");

    let mut ticker = Ticker::every(Duration::from_micros(SAMPLE_INTERVAL_US));
    loop {
        capture.on_port_sample(port_levels());
        ticker.next().await;
    }
}
