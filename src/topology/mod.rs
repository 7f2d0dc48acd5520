//! Board topology: lines and how positions relate to them.
//!
//! An N x N board has `2N + 2` lines: two diagonals, N rows and N columns.
//! Each is addressed by a compact [`LineId`].

pub mod line;

pub use line::{max_lines, Direction, LineId};
