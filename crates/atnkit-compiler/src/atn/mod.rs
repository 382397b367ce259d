//! Augmented transition network.
//!
//! The graph uses index-based state references (`StateId`) with states
//! stored in a `Vec`. Removed states stay in the arena as tombstones so ids
//! remain stable; they serialize as the invalid state type.
//!
//! ```text
//! Grammar → build (fragments, composition) → optimize → analyze → Atn
//! ```

mod dump;
mod lexer_action;
mod state;
mod transition;

#[cfg(test)]
mod dump_tests;

pub use dump::AtnPrinter;
pub use lexer_action::{CustomAction, LexerAction};
pub use state::{AtnState, BlockKind, StateId, StateKind};
pub use transition::{Transition, TransitionKind};

use crate::grammar::GrammarKind;

/// A graph fragment with single entry and exit states.
///
/// Every grammar element compiles to a fragment. Combinators connect
/// fragments through their `left`/`right` states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub left: StateId,
    pub right: StateId,
}

impl Fragment {
    pub fn new(left: StateId, right: StateId) -> Self {
        Self { left, right }
    }

    /// Single-state fragment where left equals right.
    pub fn single(state: StateId) -> Self {
        Self {
            left: state,
            right: state,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atn {
    kind: GrammarKind,
    max_token_type: i32,
    states: Vec<AtnState>,
    decisions: Vec<StateId>,
    rule_to_start: Vec<StateId>,
    rule_to_stop: Vec<StateId>,
    rule_to_token_type: Vec<i32>,
    mode_to_start: Vec<StateId>,
    lexer_actions: Vec<LexerAction>,
    custom_actions: Vec<CustomAction>,
}

impl Atn {
    pub fn new(kind: GrammarKind, max_token_type: i32) -> Self {
        Self {
            kind,
            max_token_type,
            states: Vec::new(),
            decisions: Vec::new(),
            rule_to_start: Vec::new(),
            rule_to_stop: Vec::new(),
            rule_to_token_type: Vec::new(),
            mode_to_start: Vec::new(),
            lexer_actions: Vec::new(),
            custom_actions: Vec::new(),
        }
    }

    pub fn kind(&self) -> GrammarKind {
        self.kind
    }

    pub fn is_lexer(&self) -> bool {
        self.kind == GrammarKind::Lexer
    }

    pub fn max_token_type(&self) -> i32 {
        self.max_token_type
    }

    /// Get state by ID. Removed states are still returned.
    pub fn state(&self, id: StateId) -> &AtnState {
        &self.states[id as usize]
    }

    pub(crate) fn state_mut(&mut self, id: StateId) -> &mut AtnState {
        &mut self.states[id as usize]
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.states
            .get(id as usize)
            .is_some_and(|state| !state.is_removed())
    }

    /// Number of arena slots, tombstones included.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of states that have not been removed.
    pub fn live_count(&self) -> usize {
        self.states.iter().filter(|s| !s.is_removed()).count()
    }

    /// Iterate over live states with their IDs.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &AtnState)> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_removed())
            .map(|(i, s)| (i as StateId, s))
    }

    pub fn transition_count(&self) -> usize {
        self.iter().map(|(_, s)| s.transitions.len()).sum()
    }

    /// Decision states in decision-number order.
    pub fn decisions(&self) -> &[StateId] {
        &self.decisions
    }

    pub fn rule_start(&self, rule: usize) -> StateId {
        self.rule_to_start[rule]
    }

    pub fn rule_stop(&self, rule: usize) -> StateId {
        self.rule_to_stop[rule]
    }

    pub fn rule_count(&self) -> usize {
        self.rule_to_start.len()
    }

    pub fn rule_starts(&self) -> &[StateId] {
        &self.rule_to_start
    }

    pub fn rule_stops(&self) -> &[StateId] {
        &self.rule_to_stop
    }

    /// Token type produced by each lexer rule; `0` for fragments and rules
    /// without a declared type.
    pub fn rule_to_token_type(&self) -> &[i32] {
        &self.rule_to_token_type
    }

    pub fn mode_starts(&self) -> &[StateId] {
        &self.mode_to_start
    }

    pub fn lexer_actions(&self) -> &[LexerAction] {
        &self.lexer_actions
    }

    /// Text of each custom action, by custom action index.
    pub fn custom_actions(&self) -> &[CustomAction] {
        &self.custom_actions
    }

    pub fn printer(&self) -> AtnPrinter<'_> {
        AtnPrinter::new(self)
    }

    pub fn dump(&self) -> String {
        self.printer().dump()
    }

    /// Add a state, returning its ID.
    pub(crate) fn add_state(&mut self, kind: StateKind, rule: Option<usize>) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(AtnState::new(kind, rule));
        id
    }

    pub(crate) fn add_basic(&mut self, rule: Option<usize>) -> StateId {
        self.add_state(StateKind::Basic, rule)
    }

    /// Adds a block start and its end, linked to each other.
    pub(crate) fn add_block(&mut self, kind: BlockKind, rule: Option<usize>) -> Fragment {
        let start = self.states.len() as StateId;
        let end = start + 1;
        self.add_state(
            StateKind::BlockStart {
                kind,
                end,
                loop_back: None,
            },
            rule,
        );
        self.add_state(StateKind::BlockEnd { start }, rule);
        Fragment::new(start, end)
    }

    /// Adds a rule start/stop pair and registers it under the next rule
    /// index.
    pub(crate) fn add_rule(&mut self, rule: usize, left_recursive: bool) {
        let start = self.states.len() as StateId;
        let stop = start + 1;
        self.add_state(
            StateKind::RuleStart {
                stop,
                left_recursive,
            },
            Some(rule),
        );
        self.add_state(StateKind::RuleStop, Some(rule));
        self.rule_to_start.push(start);
        self.rule_to_stop.push(stop);
    }

    /// Register a decision state, returning its decision number.
    pub(crate) fn define_decision(&mut self, id: StateId) -> usize {
        let decision = self.decisions.len();
        self.decisions.push(id);
        self.state_mut(id).decision = Some(decision);
        decision
    }

    pub(crate) fn add_mode_start(&mut self, id: StateId) {
        self.mode_to_start.push(id);
    }

    pub(crate) fn set_rule_to_token_type(&mut self, types: Vec<i32>) {
        self.rule_to_token_type = types;
    }

    pub(crate) fn set_lexer_actions(&mut self, actions: Vec<LexerAction>) {
        self.lexer_actions = actions;
    }

    pub(crate) fn set_custom_actions(&mut self, actions: Vec<CustomAction>) {
        self.custom_actions = actions;
    }

    pub(crate) fn set_loop_back(&mut self, id: StateId, loop_back_state: StateId) {
        match &mut self.state_mut(id).kind {
            StateKind::BlockStart { loop_back, .. }
            | StateKind::StarLoopEntry { loop_back }
            | StateKind::LoopEnd { loop_back } => *loop_back = Some(loop_back_state),
            _ => {}
        }
    }

    pub(crate) fn add_transition(&mut self, from: StateId, transition: Transition) {
        self.state_mut(from).add_transition(transition);
    }

    pub(crate) fn epsilon(&mut self, from: StateId, to: StateId) {
        self.add_transition(from, Transition::epsilon(to));
    }

    /// Epsilon edge placed before all existing edges.
    pub(crate) fn epsilon_first(&mut self, from: StateId, to: StateId) {
        let state = self.state_mut(from);
        state.insert_transition(0, Transition::epsilon(to));
    }

    /// Tombstone a state. Its transitions are dropped; references to it are
    /// the caller's business.
    pub(crate) fn remove_state(&mut self, id: StateId) {
        let state = self.state_mut(id);
        state.removed = true;
        state.transitions.clear();
    }

    /// True for the block end of a `(...)*` body.
    pub fn is_star_block_end(&self, id: StateId) -> bool {
        let StateKind::BlockEnd { start } = self.state(id).kind() else {
            return false;
        };
        matches!(
            self.state(*start).kind(),
            StateKind::BlockStart {
                kind: BlockKind::Star,
                ..
            }
        )
    }

    /// Transitions of live states that still reference a removed state, as
    /// `(source, missing)` pairs.
    pub fn dangling_references(&self) -> Vec<(StateId, StateId)> {
        let mut out = Vec::new();
        for (id, state) in self.iter() {
            for t in &state.transitions {
                for referenced in [Some(t.target), t.follow()].into_iter().flatten() {
                    if !self.contains(referenced) {
                        out.push((id, referenced));
                    }
                }
            }
        }
        out
    }
}
