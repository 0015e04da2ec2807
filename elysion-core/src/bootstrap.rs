//! Bus address bootstrap
//!
//! Every peer runs identical firmware, so the bus address is negotiated
//! with the master on first boot and persisted:
//!
//! ```text
//! ColdBoot ─▶ ReadPersisted ─┬─▶ UseStored(a) ──────────────┬─▶ Resolved(a)
//!                            └─▶ RequestFromMaster ─────────┤
//!                                        │                  │
//!                                        └─▶ Failed ─▶ reset
//! ```
//!
//! Requesting from the master is the only blocking bus round trip the
//! firmware ever makes.

use elysion_hal::store::ADDRESS_SLOT;
use elysion_hal::{BusTransport, IdentityStore, SystemControl};
use elysion_protocol::{
    is_usable_address, DebugMessage, PeerMessage, ADDRESS_REPLY_SIZE, MASTER_ADDRESS,
    UNASSIGNED_ADDRESS,
};
use embedded_hal::delay::DelayNs;

use crate::dispatch::send_record;

/// Wait after power-up before touching the bus
pub const POWER_UP_SETTLE_MS: u32 = 10;

/// Wait after re-joining with a fresh address before announcing it
pub const ANNOUNCE_SETTLE_MS: u32 = 900;

/// Wait before resetting after a failed handshake
pub const RESET_SETTLE_MS: u32 = 1000;

/// A usable peer address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceAddress(u8);

impl DeviceAddress {
    /// `None` for the unassigned sentinel and reserved addresses
    pub fn new(raw: u8) -> Option<Self> {
        is_usable_address(raw).then_some(Self(raw))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Why the handshake failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootError {
    /// Master replied with the sentinel or a reserved address
    NoAddressAssigned,
    /// Bus error while joining or requesting
    Transport,
}

/// Bootstrap progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootState {
    ColdBoot,
    ReadPersisted,
    UseStored(DeviceAddress),
    RequestFromMaster,
    Resolved(DeviceAddress),
    Failed(BootError),
}

/// Address bootstrap state machine
pub struct AddressBootstrap<'a, T, S, R, D> {
    transport: &'a mut T,
    store: &'a mut S,
    system: &'a mut R,
    delay: &'a mut D,
    state: BootState,
}

impl<'a, T, S, R, D> AddressBootstrap<'a, T, S, R, D>
where
    T: BusTransport,
    S: IdentityStore,
    R: SystemControl,
    D: DelayNs,
{
    pub fn new(transport: &'a mut T, store: &'a mut S, system: &'a mut R, delay: &'a mut D) -> Self {
        Self {
            transport,
            store,
            system,
            delay,
            state: BootState::ColdBoot,
        }
    }

    pub fn state(&self) -> BootState {
        self.state
    }

    /// Run to completion
    ///
    /// On failure the device is reset after [`RESET_SETTLE_MS`]. The error
    /// is only returned when the reset itself returns, which real hardware
    /// never does.
    pub fn run(mut self) -> Result<DeviceAddress, BootError> {
        loop {
            match self.step() {
                BootState::Resolved(address) => return Ok(address),
                BootState::Failed(error) => {
                    warn!("address bootstrap failed: {}, resetting", error);
                    self.delay.delay_ms(RESET_SETTLE_MS);
                    self.system.reset();
                    return Err(error);
                }
                _ => {}
            }
        }
    }

    /// Advance by one state and return the new state
    pub fn step(&mut self) -> BootState {
        self.state = match self.state {
            BootState::ColdBoot => {
                self.delay.delay_ms(POWER_UP_SETTLE_MS);
                BootState::ReadPersisted
            }
            BootState::ReadPersisted => self.read_persisted(),
            BootState::RequestFromMaster => self.request_from_master(),
            BootState::UseStored(address) => self.use_stored(address),
            terminal @ (BootState::Resolved(_) | BootState::Failed(_)) => terminal,
        };
        self.state
    }

    fn read_persisted(&mut self) -> BootState {
        match self.store.read_byte(ADDRESS_SLOT) {
            Ok(raw) => {
                info!("persisted address: {=u8}", raw);
                match DeviceAddress::new(raw) {
                    Some(address) => BootState::UseStored(address),
                    None => BootState::RequestFromMaster,
                }
            }
            Err(_) => {
                warn!("identity store unreadable, treating as unassigned");
                BootState::RequestFromMaster
            }
        }
    }

    fn request_from_master(&mut self) -> BootState {
        if self.transport.begin(None).is_err() {
            return BootState::Failed(BootError::Transport);
        }

        info!("requesting address from master");
        let mut reply = [UNASSIGNED_ADDRESS; ADDRESS_REPLY_SIZE];
        match self.transport.request(MASTER_ADDRESS, &mut reply) {
            Ok(n) if n >= ADDRESS_REPLY_SIZE => {}
            Ok(_) | Err(_) => return BootState::Failed(BootError::Transport),
        }

        let Some(address) = DeviceAddress::new(reply[0]) else {
            warn!("master assigned no address ({=u8})", reply[0]);
            return BootState::Failed(BootError::NoAddressAssigned);
        };
        info!("adopting address {=u8}", address.get());

        if self.store.write_byte(ADDRESS_SLOT, address.get()).is_err() {
            warn!("failed to persist address, handshake repeats next boot");
        }
        if self.transport.begin(Some(address.get())).is_err() {
            return BootState::Failed(BootError::Transport);
        }

        self.delay.delay_ms(ANNOUNCE_SETTLE_MS);
        self.announce(address, DebugMessage::ReceivedAddress, address.get() as u16);
        BootState::Resolved(address)
    }

    fn use_stored(&mut self, address: DeviceAddress) -> BootState {
        if self.transport.begin(Some(address.get())).is_err() {
            return BootState::Failed(BootError::Transport);
        }
        self.announce(address, DebugMessage::Boot, 1);
        BootState::Resolved(address)
    }

    fn announce(&mut self, address: DeviceAddress, message: DebugMessage, value: u16) {
        let record = PeerMessage::debug(address.get(), message, value);
        if send_record(self.transport, &record).is_err() {
            warn!("failed to announce {}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_address_rejects_reserved() {
        assert!(DeviceAddress::new(UNASSIGNED_ADDRESS).is_none());
        assert!(DeviceAddress::new(MASTER_ADDRESS).is_none());
        assert!(DeviceAddress::new(0).is_none());
        assert_eq!(DeviceAddress::new(7).map(DeviceAddress::get), Some(7));
    }
}
