//! Analyses over a built automaton.
//!
//! - `look`: LL(1) lookahead sets, following rule calls through an
//!   explicit return stack.
//! - `closure`: checks that loop bodies always consume input and that
//!   optional blocks keep exactly one bypass.

mod closure;
mod look;

#[cfg(test)]
mod closure_tests;
#[cfg(test)]
mod look_tests;

pub(crate) use closure::check_blocks;
pub use look::Ll1Analyzer;
