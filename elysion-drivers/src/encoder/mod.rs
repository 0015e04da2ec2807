//! Rotary encoder drivers

pub mod quadrature;

pub use quadrature::{QuadratureEncoder, QuadraturePins, STEPS_PER_DETENT};
