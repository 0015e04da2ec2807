//! Encoder position decode

use crate::config::{ClampPolicy, EncoderConfig, EncoderMode};
use crate::event::EventKind;
use crate::traits::EncoderDriver;

/// Main-loop state of one encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderChannel {
    config: EncoderConfig,
    /// Last reported position (absolute mode only)
    position: i32,
}

impl EncoderChannel {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            position: 0,
        }
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    /// Adopt the driver's current position without reporting it
    pub fn prime<E: EncoderDriver>(&mut self, driver: &E) {
        match self.config.mode {
            EncoderMode::Absolute => self.position = self.read_clamped(driver),
            EncoderMode::Relative => {
                driver.direction();
            }
        }
    }

    /// Decode one pass; returns the event to emit, if any
    pub fn poll<E: EncoderDriver>(&mut self, driver: &E) -> Option<(EventKind, i32)> {
        match self.config.mode {
            EncoderMode::Relative => {
                let tick = driver.direction() as i32 * self.config.direction as i32;
                (tick != 0).then_some((EventKind::EncoderDelta, tick))
            }
            EncoderMode::Absolute => {
                let position = self.read_clamped(driver);
                if position == self.position {
                    return None;
                }
                self.position = position;
                Some((EventKind::Position, position))
            }
        }
    }

    /// Read, apply the multiplier and pull back into bounds
    ///
    /// A corrected position is written back to the driver so the raw count
    /// does not drift further out of range.
    fn read_clamped<E: EncoderDriver>(&self, driver: &E) -> i32 {
        let direction = self.config.direction as i32;
        let raw = driver.position() * direction;
        let clamped = self.normalize(raw);
        if clamped != raw {
            driver.set_position(clamped * direction);
        }
        clamped
    }

    fn normalize(&self, raw: i32) -> i32 {
        let EncoderConfig { min, max, clamp, .. } = self.config;
        let wrap = clamp == ClampPolicy::Wrap;
        if raw > max {
            if wrap {
                min
            } else {
                max
            }
        } else if raw < min {
            if wrap {
                max
            } else {
                min
            }
        } else {
            raw
        }
    }
}
