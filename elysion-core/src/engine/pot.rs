//! Potentiometer decode

/// Largest 7-bit position
pub const POT_MAX: u8 = 127;

/// Minimum movement (in 7-bit steps) reported away from the extremes
pub const POT_CHANGE_THRESHOLD: u8 = 5;

/// Last reported position of one potentiometer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PotChannel {
    last: u8,
}

impl PotChannel {
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    pub fn last(&self) -> u8 {
        self.last
    }

    /// Decode a 10-bit reading; returns the new position if it should be
    /// reported
    ///
    /// Small wobble is suppressed, but the extremes always report so a
    /// pot turned fully one way ends on exactly 0 or 127.
    pub fn update(&mut self, reading: u16) -> Option<u8> {
        let position = (reading >> 3).min(POT_MAX as u16) as u8;
        let changed = position != self.last
            && (position == 0
                || position == POT_MAX
                || position.abs_diff(self.last) > POT_CHANGE_THRESHOLD);

        if changed {
            self.last = position;
            Some(position)
        } else {
            None
        }
    }
}
