#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core tables shared by the atnkit compiler passes.
//!
//! - [`IntervalSet`]: sorted, disjoint, inclusive integer intervals used for
//!   token-type and code-point sets
//! - [`chars`]: decoding of grammar char/string literals and escapes
//! - [`unicode`]: Unicode property lookup and simple case mapping
//! - [`constants`]: runtime constants with reserved names

pub mod chars;
pub mod constants;
pub mod interval_set;
pub mod unicode;

#[cfg(test)]
mod chars_tests;
#[cfg(test)]
mod interval_set_tests;

pub use interval_set::{Interval, IntervalSet};
