//! Pin allocation by number
//!
//! Board tables name pins by GPIO number. The bank hands them out at
//! runtime, and [`PanelIo`] turns the rest into `Flex` pins the sync engine
//! addresses through [`DigitalIo`]. Encoder lines are read through SIO so
//! their edge-waiting tasks keep ownership.

use embassy_rp::gpio::{AnyPin, Flex, Level, Pull};
use embassy_rp::Peri;
use embassy_rp::pac;
use elysion_drivers::QuadraturePins;
use elysion_hal::{DigitalIo, PinMode};

#[cfg(feature = "defmt")]
use defmt::debug;

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: usize = 30;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
}

/// Pin bank that holds GPIO pins and allows taking them by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl PinBank {
    /// Create a pin bank over the given GPIOs, indexed by pin number
    ///
    /// Pins handed to a dedicated peripheral (I2C, ADC, PIO) are passed
    /// as `None`.
    pub fn new(pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT]) -> Self {
        Self { pins }
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.pins
            .get_mut(pin_num as usize)
            .ok_or(PinError::InvalidPin)?
            .take()
            .ok_or(PinError::AlreadyTaken)
    }

    /// Check if a pin is available
    pub fn is_available(&self, pin_num: u8) -> bool {
        matches!(self.pins.get(pin_num as usize), Some(Some(_)))
    }
}

/// Levels of every GPIO in one SIO read, bit n = GPIO n
pub fn port_levels() -> u32 {
    pac::SIO.gpio_in(0).read()
}

fn level(levels: u32, pin: u8) -> bool {
    levels.checked_shr(u32::from(pin)).is_some_and(|bits| bits & 1 != 0)
}

/// Quadrature channel pins read straight from the SIO input register
///
/// Reading through SIO leaves the pins owned by whoever waits on their
/// edges.
#[derive(Debug, Clone, Copy)]
pub struct SioPins {
    a: u8,
    b: u8,
}

impl SioPins {
    pub const fn new(a: u8, b: u8) -> Self {
        Self { a, b }
    }
}

impl QuadraturePins for SioPins {
    fn read(&self) -> (bool, bool) {
        let levels = port_levels();
        (level(levels, self.a), level(levels, self.b))
    }
}

/// Panel pins addressed by GPIO number
///
/// A pin becomes a `Flex` the first time it is configured. Pins the bank
/// no longer holds (encoder lines owned by capture tasks, bus pins) are
/// skipped: configuring them is a no-op and reading them returns high.
pub struct PanelIo {
    bank: PinBank,
    pins: [Option<Flex<'static>>; GPIO_COUNT],
}

impl PanelIo {
    pub fn new(bank: PinBank) -> Self {
        Self {
            bank,
            pins: [const { None }; GPIO_COUNT],
        }
    }

    fn flex(&mut self, pin: u8) -> Option<&mut Flex<'static>> {
        self.pins.get_mut(pin as usize)?.as_mut()
    }
}

impl DigitalIo for PanelIo {
    fn configure(&mut self, pin: u8, mode: PinMode) {
        if self.flex(pin).is_none() {
            match self.bank.take(pin) {
                Ok(raw) => self.pins[pin as usize] = Some(Flex::new(raw)),
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    debug!("GPIO{} unavailable: {:?}", pin, _e);
                    return;
                }
            }
        }
        let Some(flex) = self.flex(pin) else {
            return;
        };
        match mode {
            PinMode::Input => {
                flex.set_pull(Pull::None);
                flex.set_as_input();
            }
            PinMode::InputPullUp => {
                flex.set_pull(Pull::Up);
                flex.set_as_input();
            }
            PinMode::Output => {
                flex.set_level(Level::High);
                flex.set_as_output();
            }
        }
    }

    fn read(&mut self, pin: u8) -> bool {
        self.flex(pin).map_or(true, |flex| flex.is_high())
    }

    fn write(&mut self, pin: u8, high: bool) {
        if let Some(flex) = self.flex(pin) {
            flex.set_level(Level::from(high));
        }
    }
}
