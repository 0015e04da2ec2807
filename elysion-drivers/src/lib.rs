//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the capability traits
//! defined in elysion-core:
//!
//! - Quadrature rotary encoder (interrupt-driven state machine)
//! - Addressable LED chain (pixel buffer with a pluggable writer)

#![no_std]
#![deny(unsafe_code)]

pub mod encoder;
pub mod led;

pub use encoder::{QuadratureEncoder, QuadraturePins, STEPS_PER_DETENT};
pub use led::{ChainWriter, LedChain};
