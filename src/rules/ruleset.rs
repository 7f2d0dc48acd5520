//! Win-condition strategy trait.
//!
//! A game mode owns one `Ruleset`. The engine never interprets the numbers
//! on the board itself: it only asks the ruleset whether a sequence of
//! values wins, and which values could fill a single gap.

use std::collections::BTreeSet;

use crate::core::StarKind;

/// Smallest and largest value a star can stand for.
pub const DIGIT_RANGE: std::ops::RangeInclusive<u8> = 0..=9;

/// Rule predicates for one game mode.
///
/// ## Implementation Notes
///
/// - `is_win_condition`: pure, called on selections and on full lines
/// - `needed_numbers`: the input holds exactly one `None`; results stay in
///   [`DIGIT_RANGE`]
/// - `order_sensitive`: when false, selection search may skip permutations
/// - `pin_star`: the default only accepts a single candidate
pub trait Ruleset: Send + Sync + std::fmt::Debug {
    /// Do these values, in this order, satisfy the mode's goal?
    fn is_win_condition(&self, values: &[u8]) -> bool;

    /// Values that would complete a line with one unknown cell.
    fn needed_numbers(&self, line: &[Option<u8>]) -> BTreeSet<u8>;

    /// Which star a spawn yields at the given cumulative score.
    fn star_kind(&self, score: u32) -> StarKind;

    /// Whether the order of selected values matters.
    fn order_sensitive(&self) -> bool;

    /// Live text for a partial selection.
    fn describe(&self, values: &[u8]) -> String;

    /// Value a silver star takes on a line where it is the only unknown,
    /// given that line's `needed_numbers`. `Ok(None)` means no value fits;
    /// `Err(count)` means the rules cannot choose among `count` candidates.
    fn pin_star(&self, candidates: &BTreeSet<u8>) -> Result<Option<u8>, usize> {
        match candidates.len() {
            0 => Ok(None),
            1 => Ok(candidates.first().copied()),
            count => Err(count),
        }
    }
}
