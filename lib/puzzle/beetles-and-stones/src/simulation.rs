/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

//! Step by step placement of beetles on a line of stones.
//!
//! Every call to [`StoneLine::place`] hides one more beetle under the middle of the longest free
//! segment. This costs `O(log n)` per beetle and memory for every free segment, so it is only a
//! reference for checking [`crate::solve`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::{pick, Gaps};

/// Which of several equally long free segments the next beetle runs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TieBreak {
    /// The segment nearest the left end of the line.
    Leftmost,

    /// The segment nearest the right end of the line.
    Rightmost,
}

/// A run of free stones. Stones are numbered from 0 at the left end of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    /// First free stone.
    pub start: u64,

    /// Number of free stones.
    pub len: u64,
}

/// A hidden beetle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    /// The stone the beetle hides under.
    pub stone: u64,

    /// Free stones around it within the segment it split.
    pub gaps: Gaps<u64>,
}

// Heap entry. Longer segments first, then by position according to the tie break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    segment: Segment,
    tie_break: TieBreak,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_position = match self.tie_break {
            TieBreak::Leftmost => other.segment.start.cmp(&self.segment.start),
            TieBreak::Rightmost => self.segment.start.cmp(&other.segment.start),
        };
        self.segment.len.cmp(&other.segment.len).then(by_position)
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Line of stones that beetles hide under one at a time.
#[derive(Debug, Clone)]
pub struct StoneLine {
    stones: u64,
    placed: u64,
    tie_break: TieBreak,
    free: BinaryHeap<Candidate>,
}

impl StoneLine {
    /// Create a line of `stones` free stones.
    pub fn new(stones: u64, tie_break: TieBreak) -> Self {
        let mut line = Self {
            stones,
            placed: 0,
            tie_break,
            free: BinaryHeap::new(),
        };
        line.push(Segment {
            start: 0,
            len: stones,
        });
        line
    }

    /// Stones in the line, free or not.
    pub fn stones(&self) -> u64 {
        self.stones
    }

    /// Beetles hidden so far.
    pub fn placed(&self) -> u64 {
        self.placed
    }

    /// Stones without a beetle.
    pub fn free_stones(&self) -> u64 {
        self.segments().map(|segment| segment.len).sum()
    }

    /// Free segments, in no particular order. Empty segments are not kept.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.free.iter().map(|candidate| candidate.segment)
    }

    /// Hide the next beetle. `None` once every stone is taken.
    pub fn place(&mut self) -> Option<Placement> {
        let Candidate { segment, .. } = self.free.pop()?;
        let gaps = pick(segment.len);
        let stone = segment.start + gaps.left;
        self.push(Segment {
            start: segment.start,
            len: gaps.left,
        });
        self.push(Segment {
            start: stone + 1,
            len: gaps.right,
        });
        self.placed += 1;
        Some(Placement { stone, gaps })
    }

    fn push(&mut self, segment: Segment) {
        if segment.len > 0 {
            self.free.push(Candidate {
                segment,
                tie_break: self.tie_break,
            });
        }
    }
}

impl Iterator for StoneLine {
    type Item = Placement;

    fn next(&mut self) -> Option<Self::Item> {
        self.place()
    }
}

/// Gaps around the last of `beetles` beetles, found by placing every beetle. Uses the same
/// sentinels as [`crate::solve`].
pub fn simulate(stones: u64, beetles: u64, tie_break: TieBreak) -> Gaps<u64> {
    if beetles == 0 || beetles > stones {
        return Gaps::sentinel();
    }
    let mut line = StoneLine::new(stones, tie_break);
    let mut last = Gaps::sentinel();
    for _ in 0..beetles {
        match line.place() {
            Some(placement) => last = placement.gaps,
            None => return Gaps::sentinel(),
        }
    }
    last
}
