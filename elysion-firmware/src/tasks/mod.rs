//! Embassy async tasks
//!
//! Capture tasks run on the high-priority interrupt executor and only write
//! interrupt-side state.

pub mod capture;

pub use capture::{encoder_task, port_sample_task, Capture, Encoder};
