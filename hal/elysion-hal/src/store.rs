//! Durable single-byte storage

/// Slot holding the device's bus address
pub const ADDRESS_SLOT: u8 = 0;

/// Durable byte slots that survive a reset or power cycle
///
/// Modeled on an EEPROM: an erased slot reads back as `0xFF`.
pub trait IdentityStore {
    /// Error type for storage operations
    type Error;

    /// Read the byte stored at `slot`
    fn read_byte(&mut self, slot: u8) -> Result<u8, Self::Error>;

    /// Overwrite the byte stored at `slot`
    fn write_byte(&mut self, slot: u8, value: u8) -> Result<(), Self::Error>;
}
