//! Fixed-size peer → master records
//!
//! Every record is exactly [`MESSAGE_SIZE`] bytes:
//! `[address][input][control type][value high][value low]`.

use crate::control::{ControlType, DebugMessage};

/// Size of a peer record in bytes
pub const MESSAGE_SIZE: usize = 5;

/// Highest per-board input index that fits the input byte
pub const MAX_INPUT_INDEX: u8 = 0x0F;

/// Errors from decoding a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Fewer than [`MESSAGE_SIZE`] bytes
    TooShort,
    /// Control type byte is not a known [`ControlType`]
    UnknownControlType(u8),
}

/// Board and input packed into the record's input byte
///
/// The high nibble carries the logical board index, the low nibble the
/// input index within that board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputId {
    pub board: u8,
    pub input: u8,
}

impl InputId {
    pub const fn new(board: u8, input: u8) -> Self {
        Self { board, input }
    }

    /// Pack into the wire byte
    pub const fn to_byte(self) -> u8 {
        (self.board << 4) | (self.input & MAX_INPUT_INDEX)
    }

    /// Unpack from the wire byte
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            board: byte >> 4,
            input: byte & MAX_INPUT_INDEX,
        }
    }
}

/// A record sent from a peer to the master
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeerMessage {
    /// Sender bus address
    pub address: u8,
    /// Input byte (packed [`InputId`] or a [`DebugMessage`])
    pub input: u8,
    /// What kind of control changed
    pub control: ControlType,
    /// 16-bit value (signed values as two's complement)
    pub value: u16,
}

impl PeerMessage {
    /// Record for an input change
    ///
    /// Values outside the 16-bit range are truncated to their low 16 bits,
    /// so negative deltas travel as their two's complement pattern.
    pub fn change(address: u8, id: InputId, control: ControlType, value: i32) -> Self {
        Self {
            address,
            input: id.to_byte(),
            control,
            value: value as u16,
        }
    }

    /// Lifecycle record
    pub fn debug(address: u8, message: DebugMessage, value: u16) -> Self {
        Self {
            address,
            input: message.to_byte(),
            control: ControlType::Debug,
            value,
        }
    }

    /// Value reinterpreted as a signed 16-bit number
    pub fn signed_value(&self) -> i16 {
        self.value as i16
    }

    /// Serialize into the fixed wire layout
    pub fn encode(&self) -> [u8; MESSAGE_SIZE] {
        let [high, low] = self.value.to_be_bytes();
        [self.address, self.input, self.control.to_byte(), high, low]
    }

    /// Parse a record; extra trailing bytes are ignored
    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        if bytes.len() < MESSAGE_SIZE {
            return Err(MessageError::TooShort);
        }

        let control =
            ControlType::from_byte(bytes[2]).ok_or(MessageError::UnknownControlType(bytes[2]))?;

        Ok(Self {
            address: bytes[0],
            input: bytes[1],
            control,
            value: u16::from_be_bytes([bytes[3], bytes[4]]),
        })
    }
}
