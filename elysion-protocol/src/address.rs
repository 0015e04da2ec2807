//! Bus addressing

/// Address of the panel master; every record is sent here
pub const MASTER_ADDRESS: u8 = 1;

/// Sentinel for "no address": erased storage and the master's refusal reply
pub const UNASSIGNED_ADDRESS: u8 = 255;

/// Number of bytes the master answers to an address request
pub const ADDRESS_REPLY_SIZE: usize = 1;

/// Check whether a raw byte can serve as a peer address
///
/// The sentinel and everything up to and including the master's own address
/// are reserved.
pub fn is_usable_address(raw: u8) -> bool {
    raw != UNASSIGNED_ADDRESS && raw > MASTER_ADDRESS
}
