//! Control type and debug message identifiers

/// Kind of control a record reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ControlType {
    /// Lifecycle and diagnostic records
    Debug = 0,
    /// Relative encoder tick (signed)
    Encoder = 1,
    /// Button, pad or matrix key press (1) / release (0)
    Button = 2,
    /// Absolute position of an encoder or potentiometer
    Position = 3,
    /// Capacitive touch on (1) / off (0)
    Touch = 4,
    /// Free-form data
    Data = 5,
}

impl ControlType {
    /// Parse a control type from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(ControlType::Debug),
            1 => Some(ControlType::Encoder),
            2 => Some(ControlType::Button),
            3 => Some(ControlType::Position),
            4 => Some(ControlType::Touch),
            5 => Some(ControlType::Data),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Debug record identifiers, carried in the input byte of a `Debug` record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DebugMessage {
    /// Booted with an address from storage (value is always 1)
    Boot = 0,
    /// Booted with an address freshly assigned by the master (value is the address)
    ReceivedAddress = 1,
}

impl DebugMessage {
    /// Parse a debug message from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(DebugMessage::Boot),
            1 => Some(DebugMessage::ReceivedAddress),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values_are_stable() {
        assert_eq!(ControlType::Debug.to_byte(), 0);
        assert_eq!(ControlType::Encoder.to_byte(), 1);
        assert_eq!(ControlType::Button.to_byte(), 2);
        assert_eq!(ControlType::Position.to_byte(), 3);
        assert_eq!(ControlType::Touch.to_byte(), 4);
        assert_eq!(ControlType::Data.to_byte(), 5);
        assert_eq!(DebugMessage::Boot.to_byte(), 0);
        assert_eq!(DebugMessage::ReceivedAddress.to_byte(), 1);
    }

    #[test]
    fn test_unknown_bytes() {
        assert!(ControlType::from_byte(6).is_none());
        assert!(ControlType::from_byte(0xFF).is_none());
        assert!(DebugMessage::from_byte(2).is_none());
    }
}
