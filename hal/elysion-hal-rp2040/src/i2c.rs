//! I2C bus transport
//!
//! The peer drives the controller in master mode for everything it sends:
//! the address request at boot and every change record afterwards. The
//! address handed to [`BusTransport::begin`] is kept so the peer can report
//! which slot it answers on.

use embassy_rp::i2c::{Blocking, Config, Error, I2c, Instance, SclPin, SdaPin};
use embassy_rp::Peri;
use elysion_hal::bus::BusConfig;
use elysion_hal::BusTransport;

#[cfg(feature = "defmt")]
use defmt::debug;

/// Blocking I2C transport for one of the RP2040 controllers
pub struct I2cTransport<'d, T: Instance> {
    i2c: I2c<'d, T, Blocking>,
    address: Option<u8>,
}

impl<'d, T: Instance> I2cTransport<'d, T> {
    pub fn new(
        peri: Peri<'d, T>,
        scl: Peri<'d, impl SclPin<T>>,
        sda: Peri<'d, impl SdaPin<T>>,
        bus: BusConfig,
    ) -> Self {
        let mut config = Config::default();
        config.frequency = bus.frequency;
        Self {
            i2c: I2c::new_blocking(peri, scl, sda, config),
            address: None,
        }
    }

    /// Address this peer joined the bus with, if any
    pub fn address(&self) -> Option<u8> {
        self.address
    }
}

impl<'d, T: Instance> BusTransport for I2cTransport<'d, T> {
    type Error = Error;

    fn begin(&mut self, address: Option<u8>) -> Result<(), Self::Error> {
        #[cfg(feature = "defmt")]
        debug!("Joining bus as {:?}", address);
        self.address = address;
        Ok(())
    }

    fn request(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.i2c.blocking_read(address, buf)?;
        Ok(buf.len())
    }

    fn send(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.i2c.blocking_write(address, data)
    }
}
