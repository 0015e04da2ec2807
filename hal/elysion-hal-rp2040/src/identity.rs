//! Flash-backed identity store
//!
//! Presents the sequential-storage map as the EEPROM-style byte slots the
//! address bootstrap expects. A slot that was never written reads as `0xFF`,
//! exactly like an erased EEPROM cell.

use embassy_futures::block_on;
use elysion_hal::store::ADDRESS_SLOT;
use elysion_hal::{FlashStorage, IdentityStore};

use crate::flash::{FlashError, Rp2040FlashStorage, StorageKey};

/// Value read back from a slot that holds nothing
pub const ERASED: u8 = 0xFF;

/// Byte slots persisted in the flash store partition
pub struct FlashIdentityStore<'d> {
    storage: Rp2040FlashStorage<'d>,
}

impl<'d> FlashIdentityStore<'d> {
    pub fn new(storage: Rp2040FlashStorage<'d>) -> Self {
        Self { storage }
    }

    fn key(slot: u8) -> Result<StorageKey, FlashError> {
        match slot {
            ADDRESS_SLOT => Ok(StorageKey::DeviceAddress),
            _ => Err(FlashError::NotFound),
        }
    }
}

impl<'d> IdentityStore for FlashIdentityStore<'d> {
    type Error = FlashError;

    fn read_byte(&mut self, slot: u8) -> Result<u8, Self::Error> {
        let key = Self::key(slot)?;
        let mut value = [ERASED; 1];
        match block_on(self.storage.read(key, &mut value)) {
            Ok(1) => Ok(value[0]),
            Ok(_) | Err(FlashError::NotFound) => Ok(ERASED),
            Err(e) => Err(e),
        }
    }

    fn write_byte(&mut self, slot: u8, value: u8) -> Result<(), Self::Error> {
        let key = Self::key(slot)?;
        block_on(self.storage.write(key, &[value]))
    }
}
