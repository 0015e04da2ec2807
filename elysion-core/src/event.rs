//! Change events
//!
//! A [`ChangeEvent`] exists only for the duration of one dispatch: the
//! engine builds it when an input differs from its previous snapshot and
//! hands it straight to the sink.

use elysion_protocol::{ControlType, InputId, PeerMessage};

use crate::board::LogicalBoard;

/// What kind of change an event reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// Press (1) or release (0) of a button, pad or matrix key
    Button,
    /// New absolute position of an encoder or potentiometer
    Position,
    /// Signed relative encoder tick
    EncoderDelta,
    /// Touch on (1) or off (0)
    Touch,
    /// Lifecycle record
    Debug,
}

impl EventKind {
    /// Wire control type for this kind
    pub fn control_type(self) -> ControlType {
        match self {
            EventKind::Button => ControlType::Button,
            EventKind::Position => ControlType::Position,
            EventKind::EncoderDelta => ControlType::Encoder,
            EventKind::Touch => ControlType::Touch,
            EventKind::Debug => ControlType::Debug,
        }
    }
}

/// One changed logical input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChangeEvent {
    pub board: LogicalBoard,
    pub kind: EventKind,
    /// Input index within the board
    pub input: u8,
    pub value: i32,
}

impl ChangeEvent {
    pub fn new(board: LogicalBoard, kind: EventKind, input: u8, value: i32) -> Self {
        Self {
            board,
            kind,
            input,
            value,
        }
    }

    /// Wire record for this event sent from `address`
    pub fn to_message(&self, address: u8) -> PeerMessage {
        PeerMessage::change(
            address,
            InputId::new(self.board as u8, self.input),
            self.kind.control_type(),
            self.value,
        )
    }
}
