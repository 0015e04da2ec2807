//! Addressable LED chain
//!
//! Keeps a pixel buffer in RAM and pushes it to the LEDs only on
//! [`show`](IndicatorDriver::show), so a frame can be built up from many
//! calls without flicker.

use elysion_core::traits::indicator::{Color, IndicatorDriver};

/// Output stage for a chain (e.g. a PIO WS2812 program)
pub trait ChainWriter {
    /// Push a full frame of `0x00RRGGBB` pixels, first pixel first
    fn write(&mut self, pixels: &[Color]);
}

/// Chain of `N` addressable LEDs
pub struct LedChain<W, const N: usize> {
    pixels: [Color; N],
    brightness: u8,
    writer: W,
}

impl<W: ChainWriter, const N: usize> LedChain<W, N> {
    /// Create a dark chain at full brightness
    pub fn new(writer: W) -> Self {
        Self {
            pixels: [0; N],
            brightness: u8::MAX,
            writer,
        }
    }

    /// Scale applied to every channel on [`show`](IndicatorDriver::show)
    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub fn pixel(&self, index: usize) -> Option<Color> {
        self.pixels.get(index).copied()
    }

    pub fn clear(&mut self) {
        self.pixels = [0; N];
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W: ChainWriter, const N: usize> IndicatorDriver for LedChain<W, N> {
    fn len(&self) -> usize {
        N
    }

    fn set_pixel(&mut self, index: usize, color: Color) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    fn fill(&mut self, color: Color, first: usize, count: usize) {
        if first >= N {
            return;
        }
        let end = if count == 0 {
            N
        } else {
            first.saturating_add(count).min(N)
        };
        self.pixels[first..end].fill(color);
    }

    fn show(&mut self) {
        if self.brightness == u8::MAX {
            self.writer.write(&self.pixels);
            return;
        }
        let mut frame = [0; N];
        for (out, &pixel) in frame.iter_mut().zip(self.pixels.iter()) {
            *out = scale(pixel, self.brightness);
        }
        self.writer.write(&frame);
    }
}

/// Scale each 8-bit channel of a packed color
fn scale(color: Color, brightness: u8) -> Color {
    let level = brightness as u32 + 1;
    let channel = |shift: u32| ((((color >> shift) & 0xFF) * level) >> 8) << shift;
    channel(16) | channel(8) | channel(0)
}
