//! Quadrature encoder driver trait

/// Trait for quadrature encoder drivers
///
/// An encoder is shared between interrupt context, which calls
/// [`tick`](EncoderDriver::tick), and the main loop, which calls
/// everything else. All methods take `&self`; implementations use atomics
/// so the two sides never lock each other out.
pub trait EncoderDriver {
    /// Sample the pins and advance the quadrature state machine
    ///
    /// Called from interrupt context on every pin transition.
    fn tick(&self);

    /// Relative movement since the previous call: -1, 0 or +1
    fn direction(&self) -> i8;

    /// Absolute position in detents
    fn position(&self) -> i32;

    /// Overwrite the absolute position
    fn set_position(&self, position: i32);
}

impl<E: EncoderDriver + ?Sized> EncoderDriver for &E {
    fn tick(&self) {
        (**self).tick()
    }

    fn direction(&self) -> i8 {
        (**self).direction()
    }

    fn position(&self) -> i32 {
        (**self).position()
    }

    fn set_position(&self, position: i32) {
        (**self).set_position(position)
    }
}
