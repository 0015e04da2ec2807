//! Interrupt-side capture layer
//!
//! The capture layer is the only part of the core that runs in interrupt
//! context. It advances encoder state machines and stores raw pin levels,
//! and nothing else: it never decodes, emits events or touches the bus.
//!
//! State is split by writer. Interrupt handlers write encoder counts and the
//! sample cache; the main loop only reads them. Everything the main loop
//! writes (shadows, positions) lives in the engine.

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use crate::board::{BoardMap, LogicalBoard};
use crate::traits::EncoderDriver;

/// Raw digital levels of GPIO 0..=31
///
/// Written by whichever side samples the port (an interrupt handler in
/// [`SamplingMode::Interrupt`](crate::config::SamplingMode), the engine
/// itself otherwise) and read by the engine.
#[derive(Debug, Default)]
pub struct SampleCache {
    levels: AtomicU32,
    fresh: AtomicBool,
}

impl SampleCache {
    pub const fn new() -> Self {
        Self {
            levels: AtomicU32::new(0),
            fresh: AtomicBool::new(false),
        }
    }

    /// Store a full port sample (bit n = level of GPIO n)
    pub fn store(&self, levels: u32) {
        self.levels.store(levels, Ordering::Release);
        self.fresh.store(true, Ordering::Release);
    }

    /// Latest port sample
    pub fn levels(&self) -> u32 {
        self.levels.load(Ordering::Acquire)
    }

    /// Whether anything has been stored since the last call
    pub fn take_fresh(&self) -> bool {
        self.fresh.swap(false, Ordering::AcqRel)
    }

    /// Level of one pin in the latest sample
    pub fn level(&self, pin: u8) -> bool {
        pin_level(self.levels(), pin)
    }
}

/// Level of `pin` in a port sample; pins beyond the word read low
pub fn pin_level(levels: u32, pin: u8) -> bool {
    1u32.checked_shl(pin as u32)
        .is_some_and(|mask| levels & mask != 0)
}

/// Interrupt-context entry points
pub struct CaptureLayer<'a, E> {
    encoders: BoardMap<Option<&'a E>>,
    cache: SampleCache,
}

impl<'a, E: EncoderDriver> CaptureLayer<'a, E> {
    /// Capture layer over the encoders of encoder-enabled boards
    pub fn new(encoders: BoardMap<Option<&'a E>>) -> Self {
        Self {
            encoders,
            cache: SampleCache::new(),
        }
    }

    /// Pin-change handler for a single board's encoder
    pub fn on_encoder_change(&self, board: LogicalBoard) {
        if let Some(encoder) = self.encoders[board] {
            encoder.tick();
        }
    }

    /// Port-sample handler for plain digital inputs
    pub fn on_port_sample(&self, levels: u32) {
        self.cache.store(levels);
    }

    pub fn encoder(&self, board: LogicalBoard) -> Option<&'a E> {
        self.encoders[board]
    }

    pub fn cache(&self) -> &SampleCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct CountingEncoder {
        ticks: Cell<u32>,
    }

    impl EncoderDriver for CountingEncoder {
        fn tick(&self) {
            self.ticks.set(self.ticks.get() + 1);
        }

        fn direction(&self) -> i8 {
            0
        }

        fn position(&self) -> i32 {
            0
        }

        fn set_position(&self, _position: i32) {}
    }

    #[test]
    fn test_encoder_change_ticks_only_that_board() {
        let left = CountingEncoder { ticks: Cell::new(0) };
        let right = CountingEncoder { ticks: Cell::new(0) };
        let mut encoders = BoardMap::filled(None);
        encoders[LogicalBoard::L1] = Some(&left);
        encoders[LogicalBoard::R1] = Some(&right);

        let capture = CaptureLayer::new(encoders);
        capture.on_encoder_change(LogicalBoard::L1);
        capture.on_encoder_change(LogicalBoard::R1);
        capture.on_encoder_change(LogicalBoard::R1);
        capture.on_encoder_change(LogicalBoard::M1);

        assert_eq!(left.ticks.get(), 1);
        assert_eq!(right.ticks.get(), 2);
    }

    #[test]
    fn test_sample_cache() {
        let cache = SampleCache::new();
        assert!(!cache.take_fresh());

        cache.store(0b1010);
        assert!(cache.take_fresh());
        assert!(!cache.take_fresh());
        assert!(cache.level(1));
        assert!(!cache.level(2));
        assert!(!cache.level(40));
    }
}
