//! Button matrix scan
//!
//! The only decode step that drives hardware: each output line is pulled
//! low in turn, and inputs that read low have a key pressed on that line.

use elysion_hal::DigitalIo;
use embedded_hal::delay::DelayNs;

use super::diff::BitChanges;
use crate::config::{MatrixConfig, MAX_MATRIX_LINES};

/// Per-output shadow bytes (bit n = input line n pressed)
pub type MatrixShadow = [u8; MAX_MATRIX_LINES];

/// Scan every output line once
///
/// `on_change` is called with `(key index, pressed)` for each key that
/// changed since the previous scan. Output lines are always released before
/// the next one is driven.
pub fn scan<IO, D>(
    io: &mut IO,
    delay: &mut D,
    settle_us: u32,
    matrix: &MatrixConfig,
    shadow: &mut MatrixShadow,
    mut on_change: impl FnMut(u8, bool),
) where
    IO: DigitalIo,
    D: DelayNs,
{
    for (output, &output_pin) in matrix.outputs.iter().enumerate() {
        io.write(output_pin, false);
        delay.delay_us(settle_us);

        let mut pressed = 0u8;
        for (input, &input_pin) in matrix.inputs.iter().enumerate() {
            if !io.read(input_pin) {
                pressed |= 1 << input;
            }
        }

        for (input, value) in BitChanges::between(shadow[output], pressed) {
            on_change(matrix.key_index(output, input as usize), value);
        }
        shadow[output] = pressed;

        io.write(output_pin, true);
    }
}
