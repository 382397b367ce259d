//! Flat integer encoding of an automaton.
//!
//! Layout (every entry is one `i32`):
//!
//! ```text
//! version, grammar type, max token type
//! states:      count, then per state: type, rule (-1 for none)
//!              [+ loop back state for loop ends, + end state for block starts]
//!              removed states are a single 0
//! non-greedy:  count, state ids
//! precedence:  count, rule start ids of left-recursive rules
//! rules:       count, start id per rule [+ token type for lexers]
//! modes:       count, start ids
//! sets:        count, then per set: interval count, contains-EOF, bounds
//! edges:       count, then src, trg, type, arg1, arg2, arg3 each
//! decisions:   count, state ids
//! lexer:       count, then type, arg1, arg2 per action
//! ```
//!
//! Rule stop states' outgoing edges are recomputed by the runtime from the
//! rule call edges and are not written.

use atnkit_core::IntervalSet;
use atnkit_core::constants::EOF;
use indexmap::IndexSet;

use crate::atn::{Atn, StateId, StateKind, Transition, TransitionKind};
use crate::grammar::GrammarKind;
use crate::{Error, Result};

pub const SERIALIZED_VERSION: i32 = 4;

/// Encodes `atn`. Fails if a live transition points at a removed state.
pub fn serialize(atn: &Atn) -> Result<Vec<i32>> {
    let mut out = Vec::new();
    out.push(SERIALIZED_VERSION);
    out.push(match atn.kind() {
        GrammarKind::Lexer => 0,
        GrammarKind::Parser => 1,
    });
    out.push(atn.max_token_type());

    write_states(atn, &mut out);
    write_ids(&mut out, non_greedy_states(atn));
    write_ids(&mut out, precedence_states(atn));
    write_rules(atn, &mut out);
    write_ids(&mut out, atn.mode_starts().to_vec());

    let sets = SetTable::collect(atn);
    sets.write(&mut out);
    write_edges(atn, &sets, &mut out)?;

    write_ids(&mut out, atn.decisions().to_vec());
    if atn.is_lexer() {
        out.push(atn.lexer_actions().len() as i32);
        for action in atn.lexer_actions() {
            let (a1, a2) = action.operands();
            out.extend([action.action_type(), a1, a2]);
        }
    }
    log::debug!("serialized {} states into {} values", atn.len(), out.len());
    Ok(out)
}

fn write_ids(out: &mut Vec<i32>, ids: Vec<StateId>) {
    out.push(ids.len() as i32);
    out.extend(ids.into_iter().map(|id| id as i32));
}

fn write_states(atn: &Atn, out: &mut Vec<i32>) {
    out.push(atn.len() as i32);
    for id in 0..atn.len() as StateId {
        let state = atn.state(id);
        if state.is_removed() {
            out.push(0);
            continue;
        }
        out.push(state.kind().state_type());
        out.push(state.rule().map_or(-1, |r| r as i32));
        match state.kind() {
            StateKind::LoopEnd { loop_back } => out.push(loop_back.map_or(-1, |s| s as i32)),
            StateKind::BlockStart { end, .. } => out.push(*end as i32),
            _ => {}
        }
    }
}

fn non_greedy_states(atn: &Atn) -> Vec<StateId> {
    atn.iter()
        .filter(|(_, s)| s.kind().is_decision_kind() && s.is_non_greedy())
        .map(|(id, _)| id)
        .collect()
}

fn precedence_states(atn: &Atn) -> Vec<StateId> {
    atn.iter()
        .filter(|(_, s)| {
            matches!(
                s.kind(),
                StateKind::RuleStart {
                    left_recursive: true,
                    ..
                }
            )
        })
        .map(|(id, _)| id)
        .collect()
}

fn write_rules(atn: &Atn, out: &mut Vec<i32>) {
    out.push(atn.rule_count() as i32);
    for rule in 0..atn.rule_count() {
        out.push(atn.rule_start(rule) as i32);
        if atn.is_lexer() {
            out.push(atn.rule_to_token_type().get(rule).copied().unwrap_or(0));
        }
    }
}

/// Distinct `Set`/`NotSet` labels in first-use order.
struct SetTable {
    sets: IndexSet<IntervalSet>,
}

impl SetTable {
    fn collect(atn: &Atn) -> Self {
        let mut sets = IndexSet::new();
        for (_, state) in atn.iter() {
            for t in state.transitions() {
                if let TransitionKind::Set(set) | TransitionKind::NotSet(set) = &t.kind {
                    sets.insert(set.clone());
                }
            }
        }
        Self { sets }
    }

    fn index_of(&self, set: &IntervalSet) -> i32 {
        self.sets.get_index_of(set).map_or(-1, |i| i as i32)
    }

    fn write(&self, out: &mut Vec<i32>) {
        out.push(self.sets.len() as i32);
        for set in &self.sets {
            let intervals = set.intervals();
            let contains_eof = set.contains(EOF);
            let leading_eof = intervals.first().is_some_and(|iv| iv.end == EOF);
            let count = intervals.len() - usize::from(contains_eof && leading_eof);
            out.push(count as i32);
            out.push(i32::from(contains_eof));
            for iv in intervals {
                if iv.start == EOF {
                    if iv.end == EOF {
                        continue;
                    }
                    out.push(0);
                } else {
                    out.push(iv.start);
                }
                out.push(iv.end);
            }
        }
    }
}

fn write_edges(atn: &Atn, sets: &SetTable, out: &mut Vec<i32>) -> Result<()> {
    let edges: Vec<(StateId, &Transition)> = atn
        .iter()
        .filter(|(_, s)| !matches!(s.kind(), StateKind::RuleStop))
        .flat_map(|(id, s)| s.transitions().iter().map(move |t| (id, t)))
        .collect();
    out.push(edges.len() as i32);
    for (src, t) in edges {
        for referenced in [Some(t.target), t.follow()].into_iter().flatten() {
            if !atn.contains(referenced) {
                return Err(Error::DanglingTransition {
                    from: src,
                    to: referenced,
                });
            }
        }
        let (trg, args) = edge_operands(t, sets);
        out.extend([src as i32, trg as i32, t.serialization_type()]);
        out.extend(args);
    }
    Ok(())
}

/// Serialized target and the three edge arguments.
fn edge_operands(t: &Transition, sets: &SetTable) -> (StateId, [i32; 3]) {
    let args = match &t.kind {
        TransitionKind::Epsilon | TransitionKind::Wildcard => [0, 0, 0],
        TransitionKind::Atom(label) => eof_aware(*label, 0),
        TransitionKind::Range { from, to } => eof_aware(*from, *to),
        TransitionKind::Rule {
            rule,
            precedence,
            follow,
        } => return (*follow, [t.target as i32, *rule as i32, *precedence]),
        TransitionKind::Predicate {
            rule,
            pred_index,
            ctx_dependent,
        } => [*rule as i32, *pred_index as i32, i32::from(*ctx_dependent)],
        TransitionKind::PrecedencePredicate { precedence } => [*precedence, 0, 0],
        TransitionKind::Action {
            rule,
            action_index,
            ctx_dependent,
        } => [*rule as i32, *action_index, i32::from(*ctx_dependent)],
        TransitionKind::Set(set) | TransitionKind::NotSet(set) => [sets.index_of(set), 0, 0],
    };
    (t.target, args)
}

/// `EOF` is written as 0 with the third argument flagging it.
fn eof_aware(a1: i32, a2: i32) -> [i32; 3] {
    if a1 == EOF { [0, a2, 1] } else { [a1, a2, 0] }
}
