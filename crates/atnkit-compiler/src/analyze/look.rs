//! LL(1) lookahead.
//!
//! `look(s, stop)` is the set of symbols that can be matched first when
//! starting at `s`. Reaching `stop` (or the end of the outermost rule)
//! contributes `EPSILON`, meaning "input may be consumed by whatever
//! follows". Rule calls push their follow state onto a return stack; rules
//! already on the stack are not entered again.

use std::collections::HashSet;

use atnkit_core::IntervalSet;
use atnkit_core::constants::{EPSILON, MIN_USER_TOKEN_TYPE};

use crate::atn::{Atn, StateId, StateKind, TransitionKind};

pub struct Ll1Analyzer<'a> {
    atn: &'a Atn,
}

struct Walk {
    look: IntervalSet,
    /// Return states of the rule calls being followed.
    stack: Vec<StateId>,
    busy: HashSet<(StateId, Vec<StateId>)>,
    called: Vec<bool>,
}

impl<'a> Ll1Analyzer<'a> {
    pub fn new(atn: &'a Atn) -> Self {
        Self { atn }
    }

    /// Symbols that can begin a path from `start`.
    ///
    /// With `stop` set, paths end there; otherwise they end at the stop
    /// state of the rule `start` belongs to.
    pub fn look(&self, start: StateId, stop: Option<StateId>) -> IntervalSet {
        let mut walk = Walk {
            look: IntervalSet::new(),
            stack: Vec::new(),
            busy: HashSet::new(),
            called: vec![false; self.atn.rule_count()],
        };
        self.visit(start, stop, &mut walk);
        walk.look
    }

    fn visit(&self, s: StateId, stop: Option<StateId>, walk: &mut Walk) {
        if !walk.busy.insert((s, walk.stack.clone())) {
            return;
        }
        if stop == Some(s) && walk.stack.is_empty() {
            walk.look.add(EPSILON);
            return;
        }

        let state = self.atn.state(s);
        if let StateKind::RuleStop = state.kind() {
            let Some(return_state) = walk.stack.pop() else {
                walk.look.add(EPSILON);
                return;
            };
            let rule = state.rule().filter(|&r| r < walk.called.len());
            let was_called = rule.is_some_and(|r| std::mem::replace(&mut walk.called[r], false));
            self.visit(return_state, stop, walk);
            if let Some(rule) = rule
                && was_called
            {
                walk.called[rule] = true;
            }
            walk.stack.push(return_state);
            return;
        }

        for t in state.transitions() {
            match &t.kind {
                TransitionKind::Rule { rule, follow, .. } => {
                    if walk.called.get(*rule).copied().unwrap_or(true) {
                        continue;
                    }
                    walk.called[*rule] = true;
                    walk.stack.push(*follow);
                    self.visit(t.target, stop, walk);
                    walk.stack.pop();
                    walk.called[*rule] = false;
                }
                TransitionKind::Epsilon
                | TransitionKind::Action { .. }
                | TransitionKind::Predicate { .. }
                | TransitionKind::PrecedencePredicate { .. } => {
                    self.visit(t.target, stop, walk);
                }
                TransitionKind::Wildcard => {
                    let max = self.atn.max_token_type();
                    walk.look.add_range(MIN_USER_TOKEN_TYPE, max);
                }
                TransitionKind::NotSet(set) => {
                    let complement =
                        set.complement(MIN_USER_TOKEN_TYPE, self.atn.max_token_type());
                    walk.look.add_all(&complement);
                }
                TransitionKind::Atom(_) | TransitionKind::Range { .. } | TransitionKind::Set(_) => {
                    if let Some(label) = t.label() {
                        walk.look.add_all(&label);
                    }
                }
            }
        }
    }
}
