//! Capability traits
//!
//! These traits define the interface between the engine and the encoder,
//! LED and event-sink collaborators.

pub mod encoder;
pub mod indicator;
pub mod sink;

pub use encoder::EncoderDriver;
pub use indicator::IndicatorDriver;
pub use sink::EventSink;
