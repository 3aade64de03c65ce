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

#![warn(missing_docs)]

//! Beetles and stones.
//!
//! X stones lie in a line and Y beetles run, one after another, to hide under them. Beetles
//! don't like each other: every beetle picks the stone furthest from its neighbours and from
//! the ends of the line, and once hidden it never moves. This library finds how many free
//! stones are left and right of the last beetle, inside the segment it split.
//!
//! The line is a segment, and every beetle splits the longest free segment into two almost
//! equal halves, the smaller half on the left. So `2^h - 1` beetles cut the line into `2^h`
//! segments whose lengths differ by at most one, which gives a closed form instead of a
//! simulation. The [`simulation`] module places beetles one by one and is used to check it.

use std::fmt::{Debug, Display};

use num_traits::{PrimInt, Unsigned};
use serde::{Deserialize, Serialize};

pub mod simulation;

/// Unsigned integer type used to count stones and beetles.
pub trait Count: PrimInt + Unsigned + Debug + Display {}

impl<T> Count for T where T: PrimInt + Unsigned + Debug + Display {}

/// Placement error. [`solve`] turns every variant into the `(0, 0)` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError<T> {
    /// More beetles than stones, so some beetle has nowhere to hide.
    #[error("{beetles} beetles cannot hide under {stones} stones")]
    OutOfDomain {
        /// Stones in the line.
        stones: T,

        /// Beetles looking for a stone.
        beetles: T,
    },

    /// No beetle was placed, so there is no last beetle.
    #[error("no beetles were placed")]
    NoBeetles,
}

/// Free stones to the left and right of a beetle, counted within the segment it split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gaps<T> {
    /// Free stones on the left.
    pub left: T,

    /// Free stones on the right.
    pub right: T,
}

impl<T: Count> Gaps<T> {
    /// Create new gaps.
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    /// The `(0, 0)` sentinel, returned when there is nothing to report.
    pub fn sentinel() -> Self {
        Self::new(T::zero(), T::zero())
    }
}

impl<T: Display> Display for Gaps<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "left: {}\tright: {}", self.left, self.right)
    }
}

/// Split a free segment of `segment` stones with one beetle. The beetle takes the middle stone,
/// and for an even segment the shorter side is on the left.
///
/// An empty segment has no middle and yields the sentinel.
pub fn pick<T: Count>(segment: T) -> Gaps<T> {
    if segment.is_zero() {
        return Gaps::sentinel();
    }
    let free = segment - T::one();
    let left = free >> 1;
    Gaps::new(left, free - left)
}

/// Index of the highest set bit, i.e. `floor(log2(n))`. `None` for zero.
pub fn floor_log2<T: Count>(n: T) -> Option<u32> {
    if n.is_zero() {
        return None;
    }
    let bits = T::zero().count_zeros();
    Some(bits - 1 - n.leading_zeros())
}

/// Gaps around the last of `beetles` beetles hiding under `stones` stones.
///
/// Returns the `(0, 0)` sentinel when there are more beetles than stones, when there are no
/// beetles, and when the last beetle lands in a segment too short to have gaps.
///
/// # Examples
///
/// ```
/// use beetles_and_stones::{solve, Gaps};
///
/// assert_eq!(solve(1000u64, 1), Gaps::new(499, 500));
/// assert_eq!(solve(1_000_000_001u64, 123_456_789), Gaps::new(6, 7));
/// assert_eq!(solve(3u64, 4), Gaps::sentinel());
/// ```
pub fn solve<T: Count>(stones: T, beetles: T) -> Gaps<T> {
    try_solve(stones, beetles).unwrap_or_else(|_| Gaps::sentinel())
}

/// Like [`solve`], but reports out of domain input as an error instead of the sentinel.
pub fn try_solve<T: Count>(stones: T, beetles: T) -> Result<Gaps<T>, PlacementError<T>> {
    if beetles > stones {
        return Err(PlacementError::OutOfDomain { stones, beetles });
    }
    let height = match floor_log2(beetles) {
        Some(height) => height,
        None => return Err(PlacementError::NoBeetles),
    };
    if beetles == T::one() {
        return Ok(pick(stones));
    }

    // stones >= beetles, so both have a highest bit. Equal heights mean every segment at this
    // depth holds at most one stone.
    if floor_log2(stones) == Some(height) {
        return Ok(Gaps::sentinel());
    }

    let segments = T::one() << height as usize;
    let hidden = segments - T::one();
    let shortest = (stones - hidden) / segments;
    let longer = stones - hidden - segments * shortest;

    // The remaining beetles fill the longer segments first.
    let exposed = beetles - hidden;
    let segment = if exposed <= longer {
        shortest + T::one()
    } else {
        shortest
    };
    Ok(pick(segment))
}

#[cfg(test)]
mod tests {
    use super::simulation::{simulate, TieBreak};
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_beetle_takes_middle_of_line() {
        assert_eq!(solve(1000u64, 1), Gaps::new(499, 500));
        assert_eq!(solve(5u64, 1), Gaps::new(2, 2));
        assert_eq!(solve(1u64, 1), Gaps::new(0, 0));
    }

    #[test]
    fn test_large_numbers() {
        assert_eq!(solve(1_000_000_001u64, 123_456_789), Gaps::new(6, 7));
    }

    #[test]
    fn test_as_many_beetles_as_stones_is_sentinel() {
        assert_eq!(solve(1000u64, 1000), Gaps::sentinel());
    }

    #[test]
    fn test_degenerate_inputs_are_sentinel() {
        assert_eq!(solve(0u64, 0), Gaps::sentinel());
        assert_eq!(solve(10u64, 0), Gaps::sentinel());
        assert_eq!(solve(0u64, 1), Gaps::sentinel());
        assert_eq!(solve(3u64, 4), Gaps::sentinel());
    }

    #[test]
    fn test_try_solve_reports_errors() {
        assert_eq!(
            try_solve(3u64, 4),
            Err(PlacementError::OutOfDomain {
                stones: 3,
                beetles: 4
            })
        );
        assert_eq!(try_solve(3u64, 0), Err(PlacementError::NoBeetles));
        assert_eq!(try_solve(0u64, 0), Err(PlacementError::NoBeetles));
        assert_eq!(try_solve(10u64, 3), Ok(Gaps::new(1, 2)));
    }

    #[test]
    fn test_error_messages() {
        let err = PlacementError::OutOfDomain {
            stones: 3u64,
            beetles: 4,
        };
        assert_eq!(err.to_string(), "4 beetles cannot hide under 3 stones");
        assert_eq!(
            PlacementError::<u64>::NoBeetles.to_string(),
            "no beetles were placed"
        );
    }

    #[test]
    fn test_thousand_stones_table() {
        let expected = [
            (2, (249, 250)),
            (3, (249, 249)),
            (4, (124, 125)),
            (5, (124, 124)),
            (7, (124, 124)),
            (8, (62, 62)),
            (100, (7, 7)),
            (500, (0, 1)),
            (511, (0, 1)),
            (512, (0, 0)),
            (999, (0, 0)),
        ];
        for (beetles, (left, right)) in expected {
            assert_eq!(
                solve(1000u64, beetles),
                Gaps::new(left, right),
                "beetles: {}",
                beetles
            );
        }
    }

    #[test]
    fn test_sixteen_stones_every_beetle() {
        let expected = [
            (7, 8),
            (3, 4),
            (3, 3),
            (1, 2),
            (1, 1),
            (1, 1),
            (1, 1),
            (0, 1),
        ];
        for beetles in 1..=16u64 {
            let (left, right) = expected.get(beetles as usize - 1).copied().unwrap_or((0, 0));
            assert_eq!(solve(16u64, beetles), Gaps::new(left, right));
        }
    }

    #[test]
    fn test_pick() {
        assert_eq!(pick(0u64), Gaps::sentinel());
        assert_eq!(pick(1u64), Gaps::new(0, 0));
        assert_eq!(pick(2u64), Gaps::new(0, 1));
        assert_eq!(pick(3u64), Gaps::new(1, 1));
        assert_eq!(pick(1000u64), Gaps::new(499, 500));
        assert_eq!(pick(u64::MAX), Gaps::new(u64::MAX / 2, u64::MAX / 2));
    }

    #[test]
    fn test_floor_log2_around_powers_of_two() {
        assert_eq!(floor_log2(0u64), None);
        assert_eq!(floor_log2(u64::MAX), Some(63));
        for shift in 0..64u32 {
            let power = 1u64 << shift;
            assert_eq!(floor_log2(power), Some(shift));
            if shift > 0 {
                assert_eq!(floor_log2(power - 1), Some(shift - 1));
            }
        }
        assert_eq!(floor_log2(u8::MAX), Some(7));
        assert_eq!(floor_log2(1u128 << 100), Some(100));
    }

    #[test]
    fn test_extreme_inputs_do_not_overflow() {
        assert_eq!(solve(u64::MAX, u64::MAX), Gaps::sentinel());
        assert_eq!(
            solve(u64::MAX, 1),
            Gaps::new(u64::MAX / 2, u64::MAX / 2)
        );
        let quarter = (1u64 << 62) - 1;
        assert_eq!(solve(u64::MAX, 2), Gaps::new(quarter, quarter));
        assert_eq!(solve(u8::MAX, u8::MAX), Gaps::sentinel());
    }

    #[test]
    fn test_closed_form_matches_simulation_exhaustively_for_short_lines() {
        for stones in 0..=128u64 {
            for beetles in 0..=stones + 1 {
                let expected = simulate(stones, beetles, TieBreak::Leftmost);
                assert_eq!(
                    solve(stones, beetles),
                    expected,
                    "stones: {}, beetles: {}",
                    stones,
                    beetles
                );
            }
        }
    }

    #[test]
    fn test_gaps_display_and_serde() {
        let gaps = Gaps::new(6u64, 7);
        assert_eq!(gaps.to_string(), "left: 6\tright: 7");
        let json = serde_json::to_string(&gaps).expect("serialize failed");
        assert_eq!(json, r#"{"left":6,"right":7}"#);
        let back: Gaps<u64> = serde_json::from_str(&json).expect("deserialize failed");
        assert_eq!(back, gaps);
    }

    fn stones_and_beetles() -> impl Strategy<Value = (u64, u64)> {
        (1u64..1500).prop_flat_map(|stones| (Just(stones), 1..=stones))
    }

    // Any line, with no more beetles than stones.
    fn beetles_on_any_line() -> impl Strategy<Value = (u64, u64)> {
        (1u64..).prop_flat_map(|stones| (Just(stones), 1..=stones))
    }

    proptest! {
        #[test]
        fn test_closed_form_matches_simulation(
            (stones, beetles) in stones_and_beetles(),
            tie_break in prop_oneof![Just(TieBreak::Leftmost), Just(TieBreak::Rightmost)],
        ) {
            prop_assert_eq!(solve(stones, beetles), simulate(stones, beetles, tie_break));
        }

        #[test]
        fn test_one_beetle_is_pick(stones in 1u64..) {
            prop_assert_eq!(solve(stones, 1), pick(stones));
        }

        #[test]
        fn test_too_many_beetles_is_sentinel(stones in 0u64..u64::MAX, extra in 1u64..1000) {
            let beetles = stones.saturating_add(extra);
            prop_assert_eq!(solve(stones, beetles), Gaps::sentinel());
        }

        #[test]
        fn test_solve_is_deterministic(stones in any::<u64>(), beetles in any::<u64>()) {
            prop_assert_eq!(solve(stones, beetles), solve(stones, beetles));
        }

        #[test]
        fn test_gaps_never_exceed_first_beetle((stones, beetles) in beetles_on_any_line()) {
            let gaps = solve(stones, beetles);
            let first = pick(stones);
            prop_assert!(gaps.left <= first.left);
            prop_assert!(gaps.right <= first.right);
        }

        #[test]
        fn test_gaps_fit_in_segment(stones in 1u64.., beetles in 1u64..) {
            // left and right differ by at most one, right is never the shorter side.
            let gaps = solve(stones, beetles);
            prop_assert!(gaps.right >= gaps.left);
            prop_assert!(gaps.right - gaps.left <= 1);
        }

        #[test]
        fn test_u32_agrees_with_u64(stones in any::<u32>(), beetles in any::<u32>()) {
            let narrow = solve(stones, beetles);
            let wide = solve(u64::from(stones), u64::from(beetles));
            prop_assert_eq!(u64::from(narrow.left), wide.left);
            prop_assert_eq!(u64::from(narrow.right), wide.right);
        }
    }
}
