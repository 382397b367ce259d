//! atnkit: augmented transition network construction for ANTLR-style
//! grammars.
//!
//! Takes a checked grammar model and produces the ATN the runtime simulates:
//! rule start/stop states, decision states for every choice, loop shapes for
//! closures, lexer command actions and the flat serialized form.
//!
//! # Example
//!
//! ```
//! use atnkit_compiler::AtnBuilder;
//! use atnkit_compiler::grammar::{Block, Element, Grammar, Rule};
//!
//! let grammar = Grammar::parser("Calc")
//!     .token("INT", 1)
//!     .rule(Rule::new("expr", Block::seq(vec![Element::token("INT")])));
//!
//! let (atn, diagnostics) = AtnBuilder::new(&grammar).build().unwrap();
//! assert!(diagnostics.is_empty());
//! let data = atnkit_compiler::serialize::serialize(&atn).unwrap();
//! assert_eq!(data[0], 4);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod atn;
mod build;
mod builder;
pub mod diagnostics;
pub mod grammar;
pub mod optimize;
pub mod serialize;

#[cfg(test)]
mod serialize_tests;

/// Result type for passes that produce both output and diagnostics.
///
/// Authoring mistakes are diagnostics; broken build invariants use the
/// outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

pub use atn::Atn;
pub use build::{CommandTemplate, CommandTemplates, NoCommandTemplates};
pub use builder::{AtnBuilder, BuildConfig};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};

/// Errors that abort a build.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// An optional block did not end up with exactly one bypass edge.
    #[error("optional block at S{start} in rule {rule} has {bypasses} bypass edges")]
    InvalidOptionalBlock {
        rule: String,
        start: atn::StateId,
        bypasses: usize,
    },

    #[error("transition S{from} -> S{to} references a removed state")]
    DanglingTransition { from: atn::StateId, to: atn::StateId },

    #[error("grammar has {} errors", .0.error_count())]
    GrammarErrors(Diagnostics),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, Error>;
