//! Positional ruleset: digits are read as one decimal number, which must be
//! a multiple of the goal.

use std::collections::BTreeSet;

use crate::core::StarKind;

use super::ruleset::{Ruleset, DIGIT_RANGE};

/// Digit-concatenation rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Positional {
    goal: u32,
}

impl Positional {
    #[must_use]
    pub fn new(goal: u32) -> Self {
        assert!(goal > 0, "Positional goal must be positive");
        Self { goal }
    }

    #[must_use]
    pub fn goal(&self) -> u32 {
        self.goal
    }
}

impl Default for Positional {
    fn default() -> Self {
        Self::new(7)
    }
}

/// Extended Euclid: returns `(g, x)` with `a * x = g (mod m)`.
fn extended_gcd(a: i64, m: i64) -> (i64, i64) {
    let (mut old_r, mut r) = (a, m);
    let (mut old_s, mut s) = (1i64, 0i64);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    (old_r, old_s)
}

/// Solve `a * x = b (mod m)`. Returns the least solution and the period.
fn solve_congruence(a: i64, b: i64, m: i64) -> Option<(i64, i64)> {
    let (g, inv) = extended_gcd(a.rem_euclid(m), m);
    if b.rem_euclid(g) != 0 {
        return None;
    }
    let period = m / g;
    let x0 = ((b / g) * inv).rem_euclid(period);
    Some((x0, period))
}

impl Ruleset for Positional {
    fn is_win_condition(&self, values: &[u8]) -> bool {
        if values.is_empty() {
            return false;
        }
        let modulus = u64::from(self.goal);
        let remainder = values
            .iter()
            .fold(0u64, |acc, &d| (acc * 10 + u64::from(d)) % modulus);
        remainder == 0
    }

    fn needed_numbers(&self, line: &[Option<u8>]) -> BTreeSet<u8> {
        let unknown: Vec<usize> = line
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(i, _)| i)
            .collect();
        let [gap] = unknown.as_slice() else {
            return BTreeSet::new();
        };

        // Residues of the known part and of the gap's place value.
        let m = i64::from(self.goal);
        let mut known = 0i64;
        let mut weight = 0i64;
        for (i, value) in line.iter().enumerate() {
            known = (known * 10) % m;
            weight = (weight * 10) % m;
            match value {
                Some(d) => known = (known + i64::from(*d)) % m,
                None if i == *gap => weight = 1 % m,
                None => {}
            }
        }

        let Some((x0, period)) = solve_congruence(weight, -known, m) else {
            return BTreeSet::new();
        };

        let max = i64::from(*DIGIT_RANGE.end());
        let min = i64::from(*DIGIT_RANGE.start());
        (0..)
            .map(|k| x0 + k * period)
            .take_while(|&x| x <= max)
            .filter(|&x| x >= min)
            .map(|x| x as u8)
            .collect()
    }

    fn star_kind(&self, score: u32) -> StarKind {
        if (score / 10) % 2 == 0 {
            StarKind::Golden
        } else {
            StarKind::Silver
        }
    }

    fn order_sensitive(&self) -> bool {
        true
    }

    fn describe(&self, values: &[u8]) -> String {
        values.iter().map(u8::to_string).collect()
    }

    /// A gap often admits `x` and `x + goal`; the star takes the larger, the
    /// same value a completed line resolves it to.
    fn pin_star(&self, candidates: &BTreeSet<u8>) -> Result<Option<u8>, usize> {
        Ok(candidates.last().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_condition() {
        let rules = Positional::default();
        assert!(rules.is_win_condition(&[1, 4]));
        assert!(rules.is_win_condition(&[1, 4, 0]));
        assert!(!rules.is_win_condition(&[4, 1]));
        assert!(!rules.is_win_condition(&[]));
    }

    #[test]
    fn test_needed_numbers_last_digit() {
        let rules = Positional::default();
        // 14x: 140 and 147 are multiples of 7
        assert_eq!(rules.needed_numbers(&[Some(1), Some(4), None]), BTreeSet::from([0, 7]));
    }

    #[test]
    fn test_needed_numbers_middle_digit() {
        let rules = Positional::default();
        // 1x6: 126 = 7 * 18
        assert_eq!(rules.needed_numbers(&[Some(1), None, Some(6)]), BTreeSet::from([2, 9]));
    }

    #[test]
    fn test_needed_numbers_single_candidate() {
        let rules = Positional::default();
        // x05: 105 = 7 * 15, 805 = 7 * 115
        let needed = rules.needed_numbers(&[None, Some(0), Some(5)]);
        assert_eq!(needed, BTreeSet::from([1, 8]));

        // x55: 455 = 7 * 65 is the only one
        assert_eq!(rules.needed_numbers(&[None, Some(5), Some(5)]), BTreeSet::from([4]));
    }

    #[test]
    fn test_needed_numbers_agree_with_brute_force() {
        let rules = Positional::default();
        for a in 0..=9u8 {
            for b in 0..=9u8 {
                for gap in 0..3 {
                    let mut line = vec![Some(a), Some(b)];
                    line.insert(gap, None);
                    let expected: BTreeSet<u8> = (0..=9u8)
                        .filter(|&x| {
                            let digits: Vec<u8> = line.iter().map(|v| v.unwrap_or(x)).collect();
                            rules.is_win_condition(&digits)
                        })
                        .collect();
                    assert_eq!(rules.needed_numbers(&line), expected, "line {:?}", line);
                }
            }
        }
    }

    #[test]
    fn test_needed_numbers_goal_sharing_factor_with_ten() {
        // 40 and 45 are the multiples of 5 in 40..=49
        let rules = Positional::new(5);
        assert_eq!(rules.needed_numbers(&[Some(4), None]), BTreeSet::from([0, 5]));
        // Leading digit never matters for a multiple of 5
        assert_eq!(rules.needed_numbers(&[None, Some(5)]).len(), 10);
    }

    #[test]
    fn test_star_kind_alternates_by_tens() {
        let rules = Positional::default();
        assert_eq!(rules.star_kind(0), StarKind::Golden);
        assert_eq!(rules.star_kind(15), StarKind::Silver);
        assert_eq!(rules.star_kind(20), StarKind::Golden);
    }

    #[test]
    fn test_pin_star_takes_largest() {
        let rules = Positional::default();
        assert_eq!(rules.pin_star(&BTreeSet::from([1, 8])), Ok(Some(8)));
        assert_eq!(rules.pin_star(&BTreeSet::new()), Ok(None));
    }

    #[test]
    fn test_describe_concatenates() {
        assert_eq!(Positional::default().describe(&[1, 4]), "14");
    }
}
