//! Post-construction rewrites.
//!
//! Two passes run in order:
//!
//! 1. Epsilon elision: basic states that only forward to another state are
//!    bypassed and tombstoned.
//! 2. Set collapse (lexers): decision alternatives that each match a single
//!    atom, range or set before reaching the block end are merged into one
//!    set transition.
//!
//! Neither pass renumbers states; removed states stay as tombstones.

mod elision;
mod sets;


use crate::atn::Atn;
use crate::diagnostics::Diagnostics;
use crate::grammar::Grammar;

pub use elision::elide_epsilons;
pub use sets::collapse_sets;

/// Statistics from the optimization passes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OptimizeStats {
    /// Basic states bypassed by epsilon elision.
    pub epsilons_elided: usize,
    /// Alternatives merged away by set collapse.
    pub alternatives_merged: usize,
}

/// Runs every pass. Set collapse only applies to lexer grammars.
pub fn optimize(atn: &mut Atn, grammar: &Grammar, diagnostics: &mut Diagnostics) -> OptimizeStats {
    let mut stats = OptimizeStats {
        epsilons_elided: elide_epsilons(atn),
        ..OptimizeStats::default()
    };
    if grammar.is_lexer() {
        stats.alternatives_merged = collapse_sets(atn, grammar, diagnostics);
    }
    log::debug!(
        "optimized {}: {} epsilons elided, {} alternatives merged",
        grammar.name,
        stats.epsilons_elided,
        stats.alternatives_merged
    );
    stats
}
