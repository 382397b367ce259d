//! Loop and optional-block checks.
//!
//! A `*` or `+` body that can finish without consuming input loops forever;
//! one that can consume `EOF` never terminates either. An optional block
//! must keep exactly one bypass edge, and none of its alternatives may be
//! able to match nothing.

use atnkit_core::constants::{EOF, EPSILON};

use super::look::Ll1Analyzer;
use crate::Error;
use crate::atn::Atn;
use crate::build::BlockCheck;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::grammar::Grammar;

pub(crate) fn check_blocks(
    atn: &Atn,
    grammar: &Grammar,
    closure_blocks: &[BlockCheck],
    optional_blocks: &[BlockCheck],
    diagnostics: &mut Diagnostics,
) -> Result<(), Error> {
    let analyzer = Ll1Analyzer::new(atn);
    for block in closure_blocks {
        check_closure(&analyzer, grammar, block, diagnostics);
    }
    for block in optional_blocks {
        check_optional(atn, &analyzer, grammar, block, diagnostics)?;
    }
    Ok(())
}

fn check_closure(
    analyzer: &Ll1Analyzer<'_>,
    grammar: &Grammar,
    block: &BlockCheck,
    diagnostics: &mut Diagnostics,
) {
    let Some(rule) = grammar.rules.get(block.rule) else {
        return;
    };
    let look = analyzer.look(block.start, Some(block.end));
    if look.contains(EPSILON) {
        let kind = if rule.left_recursive {
            DiagnosticKind::EpsilonLrFollow
        } else {
            DiagnosticKind::EpsilonClosure
        };
        diagnostics
            .report(kind, rule.span.range())
            .arg(&rule.name)
            .emit();
    }
    if look.contains(EOF) {
        diagnostics
            .report(DiagnosticKind::EofClosure, rule.span.range())
            .arg(&rule.name)
            .emit();
    }
}

fn check_optional(
    atn: &Atn,
    analyzer: &Ll1Analyzer<'_>,
    grammar: &Grammar,
    block: &BlockCheck,
    diagnostics: &mut Diagnostics,
) -> Result<(), Error> {
    let Some(rule) = grammar.rules.get(block.rule) else {
        return Ok(());
    };
    let mut bypasses = 0;
    for t in atn.state(block.start).transitions() {
        if t.target == block.end {
            bypasses += 1;
            continue;
        }
        if analyzer.look(t.target, Some(block.end)).contains(EPSILON) {
            diagnostics
                .report(DiagnosticKind::EpsilonOptional, rule.span.range())
                .arg(&rule.name)
                .emit();
            return Ok(());
        }
    }
    if bypasses != 1 {
        return Err(Error::InvalidOptionalBlock {
            rule: rule.name.clone(),
            start: block.start,
            bypasses,
        });
    }
    Ok(())
}
