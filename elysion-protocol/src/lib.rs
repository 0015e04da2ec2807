//! Elysion Panel Bus Protocol
//!
//! This crate defines the records exchanged between a panel peer board and
//! the panel master. The protocol has exactly two exchanges:
//!
//! ```text
//! Address request (boot only):
//!   peer  ──request 1 byte──▶  master (address 1)
//!   peer  ◀──── address ─────  master           (255 = none available)
//!
//! Change record (every input change):
//! ┌─────────┬───────┬──────────────┬────────────┬───────────┐
//! │ ADDRESS │ INPUT │ CONTROL TYPE │ VALUE HIGH │ VALUE LOW │
//! │ 1B      │ 1B    │ 1B           │ 1B         │ 1B        │
//! └─────────┴───────┴──────────────┴────────────┴───────────┘
//! ```
//!
//! The value is big-endian; signed values travel as their 16-bit two's
//! complement pattern.

#![no_std]
#![deny(unsafe_code)]

pub mod address;
pub mod control;
pub mod message;

pub use address::{is_usable_address, ADDRESS_REPLY_SIZE, MASTER_ADDRESS, UNASSIGNED_ADDRESS};
pub use control::{ControlType, DebugMessage};
pub use message::{InputId, MessageError, PeerMessage, MAX_INPUT_INDEX, MESSAGE_SIZE};
