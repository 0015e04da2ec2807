//! Addressable LED drivers

pub mod chain;

pub use chain::{ChainWriter, LedChain};
