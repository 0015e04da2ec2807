//! Logical boards and per-board arenas
//!
//! A panel is made of up to six control clusters. Every per-board table in
//! the firmware is a [`BoardMap`] indexed by [`LogicalBoard`], so lookups
//! never need bounds checks or offset arithmetic.

use core::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of logical boards
pub const BOARD_COUNT: usize = 6;

/// One physical control cluster, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum LogicalBoard {
    /// Left outer
    L2 = 0,
    /// Left inner
    L1 = 1,
    /// Middle (the only middle board on older revisions)
    M1 = 2,
    /// Second middle
    M2 = 3,
    /// Right inner
    R1 = 4,
    /// Right outer
    R2 = 5,
}

impl LogicalBoard {
    /// All boards in declaration order
    pub const ALL: [LogicalBoard; BOARD_COUNT] = [
        LogicalBoard::L2,
        LogicalBoard::L1,
        LogicalBoard::M1,
        LogicalBoard::M2,
        LogicalBoard::R1,
        LogicalBoard::R2,
    ];

    /// Arena index (also the bit position in group snapshots)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bit mask for group snapshots
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Fixed arena with one slot per [`LogicalBoard`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardMap<T>([T; BOARD_COUNT]);

impl<T> BoardMap<T> {
    pub const fn new(slots: [T; BOARD_COUNT]) -> Self {
        Self(slots)
    }

    /// Build each slot from its board
    pub fn from_fn(mut f: impl FnMut(LogicalBoard) -> T) -> Self {
        Self(core::array::from_fn(|i| f(LogicalBoard::ALL[i])))
    }

    /// Iterate `(board, slot)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (LogicalBoard, &T)> {
        LogicalBoard::ALL.into_iter().zip(self.0.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (LogicalBoard, &mut T)> {
        LogicalBoard::ALL.into_iter().zip(self.0.iter_mut())
    }

    pub fn map<U>(&self, mut f: impl FnMut(LogicalBoard, &T) -> U) -> BoardMap<U> {
        BoardMap::from_fn(|board| f(board, &self[board]))
    }
}

impl<T: Copy> BoardMap<T> {
    pub const fn filled(value: T) -> Self {
        Self([value; BOARD_COUNT])
    }
}

impl<T> Index<LogicalBoard> for BoardMap<T> {
    type Output = T;

    fn index(&self, board: LogicalBoard) -> &T {
        &self.0[board.index()]
    }
}

impl<T> IndexMut<LogicalBoard> for BoardMap<T> {
    fn index_mut(&mut self, board: LogicalBoard) -> &mut T {
        &mut self.0[board.index()]
    }
}
