//! Indicator chains on PIO0
//!
//! Each chain sits on its own state machine, so the writers have distinct
//! types; [`ChainPort`] folds them into one so the indicator bank can hold
//! all three.

use embassy_rp::peripherals::PIO0;
use elysion_core::indicator::IndicatorBank;
use elysion_drivers::{ChainWriter, LedChain};
use elysion_hal_rp2040::ws2812::Ws2812;

use crate::boards::CHAIN_LEN;

/// Number of LED chains on the carrier
pub const CHAIN_COUNT: usize = 3;

pub type Chain = LedChain<ChainPort, CHAIN_LEN>;
pub type Indicators = IndicatorBank<Chain, CHAIN_COUNT>;

pub enum ChainPort {
    Left(Ws2812<'static, PIO0, 0>),
    Middle(Ws2812<'static, PIO0, 1>),
    Right(Ws2812<'static, PIO0, 2>),
}

impl ChainWriter for ChainPort {
    fn write(&mut self, pixels: &[u32]) {
        match self {
            ChainPort::Left(w) => w.write(pixels),
            ChainPort::Middle(w) => w.write(pixels),
            ChainPort::Right(w) => w.write(pixels),
        }
    }
}
