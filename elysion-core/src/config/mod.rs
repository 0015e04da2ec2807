//! Configuration types
//!
//! Board-agnostic panel description, optionally stored as postcard binary
//! data.

pub mod calibration;
pub mod features;
pub mod panel;

pub use calibration::*;
pub use features::FeatureSet;
pub use panel::*;
