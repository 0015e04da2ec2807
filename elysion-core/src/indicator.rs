//! LED indicator bank
//!
//! Boards share LED chains (on the reference hardware one chain per board
//! pair), each owning a run of LEDs on it. Positions are relative to the
//! board's run and anything past its end is dropped. Boards without the
//! indicator feature are ignored silently.

use heapless::Vec;

use crate::board::{BoardMap, LogicalBoard};
use crate::config::{LedRange, PanelConfig};
use crate::traits::indicator::{Color, IndicatorDriver};

/// Pack 8-bit channels into a color
pub const fn color_rgb(r: u8, g: u8, b: u8) -> Color {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Color from hue (full circle in `0..=65535`), saturation and value
///
/// Follows the NeoPixel library conversion so patterns designed for it look
/// the same.
pub fn color_hsv(hue: u16, saturation: u8, value: u8) -> Color {
    let hue = ((hue as u32) * 1530 + 32768) / 65536;

    let (r, g, b): (u32, u32, u32) = if hue < 510 {
        if hue < 255 {
            (255, hue, 0)
        } else {
            (510 - hue, 255, 0)
        }
    } else if hue < 1020 {
        if hue < 765 {
            (0, 255, hue - 510)
        } else {
            (0, 1020 - hue, 255)
        }
    } else if hue < 1530 {
        if hue < 1275 {
            (hue - 1020, 0, 255)
        } else {
            (255, 0, 1530 - hue)
        }
    } else {
        (255, 0, 0)
    };

    let v1 = 1 + value as u32;
    let s1 = 1 + saturation as u32;
    let s2 = 255 - saturation as u32;
    let scale = |c: u32| ((((c * s1) >> 8) + s2) * v1) >> 8;

    (scale(r) << 16) | (scale(g) << 8) | scale(b)
}

/// Errors attaching LED chains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorError {
    /// No room for another chain
    TooManyChains,
}

/// LED chains and the board → LED run mapping
pub struct IndicatorBank<I, const N: usize> {
    chains: Vec<I, N>,
    boards: BoardMap<Option<LedRange>>,
}

impl<I: IndicatorDriver, const N: usize> IndicatorBank<I, N> {
    /// Bank with the chain mapping from the panel configuration
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            chains: Vec::new(),
            boards: config.boards.map(|_, board| board.indicators()),
        }
    }

    /// Attach the next chain; chains are numbered in attach order
    pub fn attach(&mut self, chain: I) -> Result<u8, IndicatorError> {
        let index = self.chains.len() as u8;
        self.chains
            .push(chain)
            .map_err(|_| IndicatorError::TooManyChains)?;
        Ok(index)
    }

    /// Chain driving a board's indicators
    pub fn chain_mut(&mut self, board: LogicalBoard) -> Option<&mut I> {
        let leds = self.boards[board]?;
        self.chains.get_mut(leds.chain as usize)
    }

    pub fn set_led_color(&mut self, board: LogicalBoard, position: usize, color: Color) {
        let Some(leds) = self.boards[board] else {
            return;
        };
        if position >= leds.count as usize {
            return;
        }
        if let Some(chain) = self.chains.get_mut(leds.chain as usize) {
            chain.set_pixel(leds.first as usize + position, color);
        }
    }

    /// Fill `count` of the board's LEDs from `first`; `count == 0` fills to
    /// the end of the board's run
    pub fn fill_leds(&mut self, board: LogicalBoard, color: Color, first: usize, count: usize) {
        let Some(leds) = self.boards[board] else {
            return;
        };
        let owned = leds.count as usize;
        let end = if count == 0 { owned } else { first.saturating_add(count).min(owned) };
        if first >= end {
            return;
        }
        if let Some(chain) = self.chains.get_mut(leds.chain as usize) {
            chain.fill(color, leds.first as usize + first, end - first);
        }
    }

    pub fn show_leds(&mut self, board: LogicalBoard) {
        if let Some(chain) = self.chain_mut(board) {
            chain.show();
        }
    }

    /// Flush every chain
    pub fn show_all(&mut self) {
        for chain in self.chains.iter_mut() {
            chain.show();
        }
    }
}
