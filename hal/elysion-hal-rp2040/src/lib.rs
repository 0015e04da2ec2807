//! RP2040-specific HAL for the panel firmware
//!
//! This crate provides RP2040 implementations of the shared `elysion-hal`
//! traits:
//!
//! - Pin allocation by number and a `Flex`-backed [`DigitalIo`](elysion_hal::DigitalIo)
//! - ADC channel management scaled to the 10-bit analog range
//! - Blocking I2C bus transport
//! - Flash storage driver and the flash-backed identity store
//! - PIO WS2812 writer for the indicator chains

#![no_std]

pub mod adc;
pub mod flash;
pub mod i2c;
pub mod identity;
pub mod pins;
pub mod ws2812;

// Re-export shared traits from elysion-hal for convenience
pub use elysion_hal::{FlashStorage as FlashStorageTrait, StorageKey};
