//! Dual-button voltage calibration
//!
//! Two buttons on one resistor divider produce three distinguishable
//! voltages: first only, second only, and both. A single analog line can
//! therefore serve two boards.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which of the two buttons on a shared line a board owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ButtonSlot {
    First,
    Second,
}

/// Decoded state of both buttons on a shared line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonPair {
    pub first: bool,
    pub second: bool,
}

impl ButtonPair {
    pub fn get(&self, slot: ButtonSlot) -> bool {
        match slot {
            ButtonSlot::First => self.first,
            ButtonSlot::Second => self.second,
        }
    }
}

/// Analog readings (0..=1023) for each press combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DualButtonCalibration {
    /// Reading with only the first button pressed
    pub first: u16,
    /// Reading with only the second button pressed
    pub second: u16,
    /// Reading with both buttons pressed
    pub both: u16,
}

impl Default for DualButtonCalibration {
    fn default() -> Self {
        Self {
            first: 485,
            second: 855,
            both: 583,
        }
    }
}

impl DualButtonCalibration {
    /// Half the smaller gap between adjacent calibration points
    pub fn tolerance(&self) -> u16 {
        let mut points = [self.first, self.second, self.both];
        points.sort_unstable();
        let low_gap = points[1] - points[0];
        let high_gap = points[2] - points[1];
        low_gap.min(high_gap) / 2
    }

    /// Points must be distinct and far enough apart to leave a window
    pub fn is_valid(&self) -> bool {
        self.tolerance() > 0
    }

    /// Classify a reading
    ///
    /// "Both" is checked first; otherwise each button is matched against its
    /// own window. Readings outside every window decode as nothing pressed.
    pub fn decode(&self, reading: u16) -> ButtonPair {
        let tolerance = self.tolerance();

        if in_window(reading, self.both, tolerance) {
            return ButtonPair {
                first: true,
                second: true,
            };
        }

        ButtonPair {
            first: in_window(reading, self.first, tolerance),
            second: in_window(reading, self.second, tolerance),
        }
    }
}

/// Strict window: `target - tolerance < reading < target + tolerance`
fn in_window(reading: u16, target: u16, tolerance: u16) -> bool {
    reading.abs_diff(target) < tolerance
}
