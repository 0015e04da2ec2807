//! Board-agnostic core logic for the panel peer firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Logical boards and the per-board feature table
//! - Panel configuration and load-time validation
//! - Bus address bootstrap
//! - Interrupt-side capture layer
//! - Synchronization engine (decode, diff, dispatch)
//! - LED indicator bank

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod board;
pub mod bootstrap;
pub mod capture;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod event;
pub mod indicator;
pub mod traits;

pub use board::{BoardMap, LogicalBoard, BOARD_COUNT};
pub use event::{ChangeEvent, EventKind};
