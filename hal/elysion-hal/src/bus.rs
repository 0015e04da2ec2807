//! Peer bus abstractions
//!
//! Every panel board is a peer on a shared two-wire bus with a single
//! master. The peer sends records to the master and, once at boot, requests
//! its address from it.

/// Peer-side bus transport
pub trait BusTransport {
    /// Error type for bus operations
    type Error;

    /// Join the bus
    ///
    /// # Arguments
    /// * `address` - `Some(addr)` to answer as an addressed peer, `None` to
    ///   join without a fixed address (only used while requesting one)
    fn begin(&mut self, address: Option<u8>) -> Result<(), Self::Error>;

    /// Request bytes from a peer, blocking until they arrive
    ///
    /// Returns the number of bytes actually received, which may be less than
    /// `buf.len()`.
    fn request(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Send bytes to a peer
    fn send(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;
}

/// Bus configuration
#[derive(Debug, Clone, Copy)]
pub struct BusConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl BusConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };
}
