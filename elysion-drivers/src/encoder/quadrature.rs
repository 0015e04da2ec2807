//! Quadrature encoder decoder
//!
//! Full-step decoding of a mechanical encoder with detents. Each detent is a
//! full quadrature cycle (four transitions); the detent count only moves
//! when the pins return to the resting state, so contact bounce inside a
//! cycle never shows up as a step.
//!
//! State is split by writer:
//! - interrupt side ([`tick`](EncoderDriver::tick)): pin state, quarter-step
//!   count and latched detent count
//! - main side: the position offset and the last detent seen by
//!   [`direction`](EncoderDriver::direction)
//!
//! Each atomic has a single writer, so plain loads and stores suffice.

use elysion_core::traits::EncoderDriver;
use portable_atomic::{AtomicI32, AtomicU8, Ordering};

/// Quadrature transitions per detent
pub const STEPS_PER_DETENT: i32 = 4;

/// Pin state at rest between detents (both lines pulled high)
const LATCH_STATE: u8 = 0b11;

/// Quarter-step direction indexed by `(previous << 2) | current`
///
/// Invalid transitions (both lines changed) count as no movement.
const TRANSITIONS: [i8; 16] = [
    0, -1, 1, 0, //
    1, 0, 0, -1, //
    -1, 0, 0, 1, //
    0, 1, -1, 0, //
];

/// Source of the two encoder line levels
pub trait QuadraturePins {
    /// Current `(a, b)` levels
    fn read(&self) -> (bool, bool);
}

impl<F: Fn() -> (bool, bool)> QuadraturePins for F {
    fn read(&self) -> (bool, bool) {
        self()
    }
}

/// Interrupt-driven quadrature encoder
pub struct QuadratureEncoder<P> {
    pins: P,
    // Interrupt side
    state: AtomicU8,
    steps: AtomicI32,
    detents: AtomicI32,
    // Main side
    offset: AtomicI32,
    last_seen: AtomicI32,
}

impl<P: QuadraturePins> QuadratureEncoder<P> {
    /// Create a decoder resting at position 0
    pub fn new(pins: P) -> Self {
        let state = encode(pins.read());
        Self {
            pins,
            state: AtomicU8::new(state),
            steps: AtomicI32::new(0),
            detents: AtomicI32::new(0),
            offset: AtomicI32::new(0),
            last_seen: AtomicI32::new(0),
        }
    }

    /// Raw quarter-step count
    pub fn steps(&self) -> i32 {
        self.steps.load(Ordering::Acquire)
    }

    fn latched(&self) -> i32 {
        self.detents.load(Ordering::Acquire)
    }
}

impl<P: QuadraturePins> EncoderDriver for QuadratureEncoder<P> {
    fn tick(&self) {
        let current = encode(self.pins.read());
        let previous = self.state.load(Ordering::Relaxed);
        if current == previous {
            return;
        }
        self.state.store(current, Ordering::Relaxed);

        let delta = TRANSITIONS[((previous << 2) | current) as usize] as i32;
        let steps = self.steps.load(Ordering::Relaxed) + delta;
        self.steps.store(steps, Ordering::Release);

        if current == LATCH_STATE {
            self.detents
                .store(steps.div_euclid(STEPS_PER_DETENT), Ordering::Release);
        }
    }

    fn direction(&self) -> i8 {
        let detents = self.latched();
        let last = self.last_seen.load(Ordering::Relaxed);
        self.last_seen.store(detents, Ordering::Relaxed);
        (detents - last).signum() as i8
    }

    fn position(&self) -> i32 {
        self.latched() + self.offset.load(Ordering::Relaxed)
    }

    fn set_position(&self, position: i32) {
        self.offset
            .store(position - self.latched(), Ordering::Relaxed);
    }
}

fn encode((a, b): (bool, bool)) -> u8 {
    (a as u8) | ((b as u8) << 1)
}
