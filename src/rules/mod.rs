//! Game modes and their rule strategies.
//!
//! A [`GameMode`] bundles the per-mode constants with a [`Ruleset`]
//! strategy object. Two rulesets ship with the crate:
//!
//! - [`Additive`]: the values sum to a goal
//! - [`Positional`]: the digits, read as one number, are a multiple of the goal
//!
//! The engine never assumes a mode: every action and algorithm receives the
//! mode explicitly.

pub mod additive;
pub mod mode;
pub mod positional;
pub mod ruleset;

pub use additive::Additive;
pub use mode::{GameMode, ModeKind};
pub use positional::Positional;
pub use ruleset::{Ruleset, DIGIT_RANGE};
