//! ADC channel management
//!
//! The RP2040 converts at 12 bits; readings are scaled down to the 10-bit
//! range the calibration points and pot thresholds are expressed in.

use embassy_rp::adc::{Adc, Blocking, Channel};
use elysion_hal::analog::ANALOG_MAX;
use elysion_hal::AnalogInput;
use heapless::Vec;

#[cfg(feature = "defmt")]
use defmt::warn;

/// Number of ADC-capable GPIOs (26..=29)
pub const ADC_PIN_COUNT: usize = 4;

/// Error when registering a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// GPIO has no ADC input
    NotAnalog(u8),
    /// GPIO was already registered
    AlreadyRegistered(u8),
}

/// Scale a 12-bit conversion to the 10-bit range
pub fn to_ten_bit(raw: u16) -> u16 {
    (raw >> 2).min(ANALOG_MAX)
}

/// Blocking ADC with channels addressed by GPIO number
pub struct AdcBank<'d> {
    adc: Adc<'d, Blocking>,
    channels: Vec<(u8, Channel<'d>), ADC_PIN_COUNT>,
}

impl<'d> AdcBank<'d> {
    pub fn new(adc: Adc<'d, Blocking>) -> Self {
        Self {
            adc,
            channels: Vec::new(),
        }
    }

    /// Register the channel wired to `pin`
    pub fn add(&mut self, pin: u8, channel: Channel<'d>) -> Result<(), AdcError> {
        if !(26..=29).contains(&pin) {
            return Err(AdcError::NotAnalog(pin));
        }
        if self.channels.iter().any(|(p, _)| *p == pin) {
            return Err(AdcError::AlreadyRegistered(pin));
        }
        self.channels
            .push((pin, channel))
            .map_err(|_| AdcError::AlreadyRegistered(pin))
    }
}

impl<'d> AnalogInput for AdcBank<'d> {
    fn read_analog(&mut self, pin: u8) -> u16 {
        let Some((_, channel)) = self.channels.iter_mut().find(|(p, _)| *p == pin) else {
            #[cfg(feature = "defmt")]
            warn!("No ADC channel on GPIO{}", pin);
            return 0;
        };
        match self.adc.blocking_read(channel) {
            Ok(raw) => to_ten_bit(raw),
            Err(_) => {
                #[cfg(feature = "defmt")]
                warn!("ADC read failed on GPIO{}", pin);
                0
            }
        }
    }
}
