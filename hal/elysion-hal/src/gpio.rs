//! GPIO pin abstractions
//!
//! The engine addresses pins by number so that board revisions can be
//! described as data. [`OutputPin`] covers single owned outputs such as the
//! activity LED.

/// Electrical mode of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Floating input (externally driven, e.g. touch sensor output)
    Input,
    /// Input with the internal pull-up enabled
    InputPullUp,
    /// Push-pull output
    Output,
}

/// Pin-number addressed digital I/O
///
/// Implementations map the numbers used in the panel configuration to
/// physical pins. Reading or writing a pin that was never configured must not
/// panic; implementations return `false` / ignore the write.
pub trait DigitalIo {
    /// Configure the electrical mode of a pin
    fn configure(&mut self, pin: u8, mode: PinMode);

    /// Read the logic level of a pin (`true` = high)
    fn read(&mut self, pin: u8) -> bool;

    /// Drive an output pin
    fn write(&mut self, pin: u8, high: bool);
}

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Toggle the pin state
    fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low();
        } else {
            self.set_high();
        }
    }
}
