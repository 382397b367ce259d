//! Set collapse for lexer decisions.
//!
//! ```text
//! d -ε-> s1 -'a'-> end          d -ε-> s1 -{'a'..'c'}-> end
//! d -ε-> s2 -'b'-> end    =>
//! d -ε-> s3 -'c'-> end
//! ```
//!
//! Only runs of adjacent alternatives are merged, so alternative order (and
//! with it decision priority) is preserved.

use atnkit_core::IntervalSet;
use atnkit_core::chars::{char_literal, set_literal};
use rowan::TextRange;

use crate::atn::{Atn, StateId, StateKind, Transition, TransitionKind};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::grammar::Grammar;

/// Merges set-like alternatives of every lexer decision. Returns the number
/// of alternatives removed.
pub fn collapse_sets(atn: &mut Atn, grammar: &Grammar, diagnostics: &mut Diagnostics) -> usize {
    let mut merged = 0;
    let decisions = atn.decisions().to_vec();
    for decision in decisions {
        let state = atn.state(decision);
        if state.is_removed() {
            continue;
        }
        let rule = state.rule().and_then(|r| grammar.rules.get(r));
        if rule.is_some_and(|r| !r.is_lexer_rule()) {
            continue;
        }
        let range = rule.map_or_else(TextRange::default, |r| r.span.range());
        for run in candidate_runs(atn, decision).into_iter().rev() {
            merged += merge_run(atn, decision, &run, diagnostics, range);
        }
    }
    merged
}

/// Alternative `index` of `decision` is a candidate when it is
/// `decision -ε-> s -x-> end` with `x` an atom, range or set and `end` a
/// block end. Returns `end`.
fn candidate_end(atn: &Atn, decision: StateId, index: usize) -> Option<StateId> {
    let edge = &atn.state(decision).transitions()[index];
    if !edge.is_plain_epsilon() {
        return None;
    }
    let alt = atn.state(edge.target).single_transition()?;
    if !matches!(atn.state(alt.target).kind(), StateKind::BlockEnd { .. }) {
        return None;
    }
    match alt.kind {
        TransitionKind::Atom(_) | TransitionKind::Range { .. } | TransitionKind::Set(_) => {
            Some(alt.target)
        }
        _ => None,
    }
}

/// Maximal runs of adjacent candidates sharing a block end. Runs of one
/// alternative are dropped.
fn candidate_runs(atn: &Atn, decision: StateId) -> Vec<Vec<usize>> {
    let mut runs: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut current_end = None;
    for index in 0..atn.state(decision).transitions().len() {
        let end = candidate_end(atn, decision, index);
        if end.is_none() || end != current_end {
            if current.len() > 1 {
                runs.push(std::mem::take(&mut current));
            }
            current.clear();
        }
        current_end = end;
        if end.is_some() {
            current.push(index);
        }
    }
    if current.len() > 1 {
        runs.push(current);
    }
    runs
}

fn merge_run(
    atn: &mut Atn,
    decision: StateId,
    run: &[usize],
    diagnostics: &mut Diagnostics,
    range: TextRange,
) -> usize {
    let alt_states: Vec<StateId> = run
        .iter()
        .map(|&i| atn.state(decision).transitions()[i].target)
        .collect();
    let mut set = IntervalSet::new();
    let mut collision = None;
    for &alt in &alt_states {
        let Some(label) = atn.state(alt).transitions()[0].label() else {
            continue;
        };
        if collision.is_none() {
            collision = first_common(&set, &label);
        }
        set.add_all(&label);
    }
    if let Some(value) = collision {
        diagnostics
            .report(DiagnosticKind::CharactersCollisionInSet, range)
            .arg(char_literal(value))
            .arg(set_literal(&set))
            .emit();
    }

    let (first, rest) = (alt_states[0], &alt_states[1..]);
    let end = atn.state(first).transitions()[0].target;
    atn.state_mut(first).transitions[0] = Transition::from_set(end, set);

    let removed: Vec<usize> = run[1..].to_vec();
    let edges = &mut atn.state_mut(decision).transitions;
    for &index in removed.iter().rev() {
        edges.remove(index);
    }
    for &alt in rest {
        atn.remove_state(alt);
    }
    log::trace!("merged {} alternatives of decision S{decision}", run.len());
    rest.len()
}

/// Smallest value in both sets.
fn first_common(a: &IntervalSet, b: &IntervalSet) -> Option<i32> {
    a.intervals()
        .iter()
        .flat_map(|x| b.intervals().iter().map(move |y| (x, y)))
        .filter(|(x, y)| x.start <= y.end && y.start <= x.end)
        .map(|(x, y)| x.start.max(y.start))
        .min()
}
