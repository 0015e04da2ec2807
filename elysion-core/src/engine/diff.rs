//! Snapshot diffing

/// A snapshot and the one taken on the previous pass
///
/// Both halves are always updated together, so a diff compares against the
/// immediately prior pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Shadow {
    current: u8,
    previous: u8,
}

impl Shadow {
    pub const fn new() -> Self {
        Self {
            current: 0,
            previous: 0,
        }
    }

    /// Seed both halves with the same sample so nothing is reported for it
    pub fn prime(&mut self, sample: u8) {
        self.current = sample;
        self.previous = sample;
    }

    /// Record a new sample and return the bits that flipped
    pub fn update(&mut self, sample: u8) -> BitChanges {
        self.current = sample;
        let changes = BitChanges::between(self.previous, self.current);
        self.previous = self.current;
        changes
    }

    pub fn current(&self) -> u8 {
        self.current
    }
}

/// Iterator over `(bit, new value)` for every bit that differs between two
/// snapshots, lowest bit first
#[derive(Debug, Clone, Copy)]
pub struct BitChanges {
    changed: u8,
    current: u8,
}

impl BitChanges {
    pub fn between(previous: u8, current: u8) -> Self {
        Self {
            changed: previous ^ current,
            current,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changed == 0
    }
}

impl Iterator for BitChanges {
    type Item = (u8, bool);

    fn next(&mut self) -> Option<Self::Item> {
        if self.changed == 0 {
            return None;
        }
        let bit = self.changed.trailing_zeros() as u8;
        let mask = 1 << bit;
        self.changed &= !mask;
        Some((bit, self.current & mask != 0))
    }
}
