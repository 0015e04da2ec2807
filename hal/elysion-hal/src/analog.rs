//! Analog input abstractions

/// Full-scale value of an analog sample
///
/// Samples are normalized to 10 bits regardless of the converter's native
/// resolution, so calibration constants carry over between chips.
pub const ANALOG_MAX: u16 = 1023;

/// Pin-number addressed analog input
pub trait AnalogInput {
    /// Sample an analog pin, returning `0..=ANALOG_MAX`
    fn read_analog(&mut self, pin: u8) -> u16;
}
