//! Elysion Hardware Abstraction Layer
//!
//! This crate defines the collaborator traits the panel engine is written
//! against. Chip-specific HALs implement them; host tests implement them with
//! recording doubles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  elysion-core (sync engine, bootstrap)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  elysion-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ elysion-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::DigitalIo`] - Pin-number addressed digital I/O
//! - [`gpio::OutputPin`] - Single owned output (activity LED)
//! - [`analog::AnalogInput`] - 10-bit analog sampling
//! - [`bus::BusTransport`] - Peer-side bus to the panel master
//! - [`store::IdentityStore`] - Durable single-byte slots
//! - [`system::SystemControl`] - Device reset
//! - [`flash::FlashStorage`] - Keyed persistent storage

#![no_std]
#![deny(unsafe_code)]

pub mod analog;
pub mod bus;
pub mod flash;
pub mod gpio;
pub mod store;
pub mod system;

// Re-export key traits at crate root for convenience
pub use analog::AnalogInput;
pub use bus::BusTransport;
pub use flash::{FlashStorage, StorageKey};
pub use gpio::{DigitalIo, OutputPin, PinMode};
pub use store::IdentityStore;
pub use system::SystemControl;
