//! Additive ruleset: a selection or line wins when its sum is a goal.

use std::collections::BTreeSet;

use crate::core::StarKind;

use super::ruleset::{Ruleset, DIGIT_RANGE};

/// Sum-to-goal rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Additive {
    goals: Vec<u32>,
}

impl Additive {
    #[must_use]
    pub fn new(goals: Vec<u32>) -> Self {
        assert!(!goals.is_empty(), "Additive rules need at least one goal");
        Self { goals }
    }

    #[must_use]
    pub fn goals(&self) -> &[u32] {
        &self.goals
    }
}

impl Default for Additive {
    fn default() -> Self {
        Self::new(vec![7, 17])
    }
}

impl Ruleset for Additive {
    fn is_win_condition(&self, values: &[u8]) -> bool {
        let sum: u32 = values.iter().map(|&v| u32::from(v)).sum();
        self.goals.contains(&sum)
    }

    fn needed_numbers(&self, line: &[Option<u8>]) -> BTreeSet<u8> {
        let known: i64 = line.iter().flatten().map(|&v| i64::from(v)).sum();
        self.goals
            .iter()
            .map(|&g| i64::from(g) - known)
            .filter(|&missing| missing >= i64::from(*DIGIT_RANGE.start()) && missing <= i64::from(*DIGIT_RANGE.end()))
            .map(|missing| missing as u8)
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
        false
    }

    fn describe(&self, values: &[u8]) -> String {
        let terms: Vec<String> = values.iter().map(u8::to_string).collect();
        let sum: u32 = values.iter().map(|&v| u32::from(v)).sum();
        format!("{} = {}", terms.join(" + "), sum)
    }
}
