//! System control

/// Device-level control
pub trait SystemControl {
    /// Restart the device from its reset vector
    ///
    /// Never returns on hardware. Test doubles record the request and return,
    /// and callers must treat the return as "device is gone".
    fn reset(&mut self);
}
