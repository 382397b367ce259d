//! ATN construction from the grammar model.
//!
//! Each rule body is walked recursively; every element yields a `Fragment`
//! and combinators wire fragments together. Rule start/stop pairs are
//! allocated up front so rule references can point at callees that have
//! not been built yet.
//!
//! ```text
//! rules → fragments → compose → follow links + EOF (parser)
//!                             → mode wiring + action table (lexer)
//! ```

mod action_scan;
mod charset;
mod commands;
mod compose;
mod fragments;
mod lexer;

#[cfg(test)]
mod commands_tests;

use std::collections::HashSet;

use atnkit_core::constants::EOF;

pub use commands::{CommandTemplate, CommandTemplates, NoCommandTemplates};

use crate::atn::{Atn, CustomAction, Fragment, StateId, StateKind, Transition, TransitionKind};
use crate::diagnostics::Diagnostics;
use crate::grammar::{Grammar, Rule};
use commands::ActionTable;

/// A block registered for a closure or optional check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockCheck {
    pub rule: usize,
    pub start: StateId,
    pub end: StateId,
}

/// Raw automaton plus everything the later passes need.
#[derive(Debug)]
pub(crate) struct Construction {
    pub atn: Atn,
    pub diagnostics: Diagnostics,
    /// Star and plus blocks.
    pub closure_blocks: Vec<BlockCheck>,
    pub optional_blocks: Vec<BlockCheck>,
}

pub(crate) struct AtnFactory<'g> {
    grammar: &'g Grammar,
    templates: &'g dyn CommandTemplates,
    atn: Atn,
    diagnostics: Diagnostics,
    current_rule: usize,
    case_insensitive: bool,
    closure_blocks: Vec<BlockCheck>,
    optional_blocks: Vec<BlockCheck>,
    actions: ActionTable,
    custom_actions: Vec<CustomAction>,
    /// Commands seen so far in the current lexer rule.
    rule_commands: HashSet<String>,
    next_predicate: usize,
}

impl<'g> AtnFactory<'g> {
    pub fn new(grammar: &'g Grammar, templates: &'g dyn CommandTemplates) -> Self {
        Self {
            grammar,
            templates,
            atn: Atn::new(grammar.kind, grammar.max_token_type()),
            diagnostics: Diagnostics::for_file(grammar.file_name.clone()),
            current_rule: 0,
            case_insensitive: false,
            closure_blocks: Vec::new(),
            optional_blocks: Vec::new(),
            actions: ActionTable::default(),
            custom_actions: Vec::new(),
            rule_commands: HashSet::new(),
            next_predicate: 0,
        }
    }

    pub fn build(mut self) -> Construction {
        let grammar = self.grammar;
        if grammar.is_lexer() {
            self.check_reserved_names();
            self.create_mode_starts();
        }
        for (index, rule) in grammar.rules.iter().enumerate() {
            self.atn.add_rule(index, rule.left_recursive);
        }
        if grammar.is_lexer() {
            let types = grammar
                .rules
                .iter()
                .map(|rule| grammar.token_type(&rule.name).unwrap_or(0))
                .collect();
            self.atn.set_rule_to_token_type(types);
        }

        for (index, rule) in grammar.rules.iter().enumerate() {
            self.build_rule(index, rule);
        }
        log::debug!(
            "built {} rules of grammar {} into {} states",
            grammar.rules.len(),
            grammar.name,
            self.atn.len()
        );

        if grammar.is_lexer() {
            let actions = std::mem::take(&mut self.actions).into_vec();
            self.atn.set_lexer_actions(actions);
            let custom = std::mem::take(&mut self.custom_actions);
            self.atn.set_custom_actions(custom);
            self.wire_modes();
        } else {
            self.add_rule_follow_links();
            self.add_eof_transitions();
        }

        Construction {
            atn: self.atn,
            diagnostics: self.diagnostics,
            closure_blocks: self.closure_blocks,
            optional_blocks: self.optional_blocks,
        }
    }

    fn build_rule(&mut self, index: usize, rule: &Rule) {
        self.current_rule = index;
        self.case_insensitive = rule.case_insensitive;
        let body = self.block(&rule.body, None, rule.span.range());
        let start = self.atn.rule_start(index);
        let stop = self.atn.rule_stop(index);
        self.atn.epsilon(start, body.left);
        self.atn.epsilon(body.right, stop);
        if self.grammar.is_lexer() {
            self.rule_commands.clear();
        }
        log::trace!("rule {} built: S{start}..S{stop}", rule.name);
    }

    /// One `TokensStart` decision per mode, in declaration order.
    fn create_mode_starts(&mut self) {
        for _ in 0..self.grammar.modes.len() {
            let start = self.atn.add_state(StateKind::TokensStart, None);
            self.atn.add_mode_start(start);
            self.atn.define_decision(start);
        }
    }

    /// Each mode start enters every non-fragment rule of its mode.
    fn wire_modes(&mut self) {
        let grammar = self.grammar;
        for (mode, name) in grammar.modes.keys().enumerate() {
            let mode_start = self.atn.mode_starts()[mode];
            for (index, rule) in grammar.rules.iter().enumerate() {
                if rule.mode == *name && !rule.fragment {
                    let rule_start = self.atn.rule_start(index);
                    self.atn.epsilon(mode_start, rule_start);
                }
            }
        }
    }

    /// Every call site's follow state becomes reachable from the callee's
    /// stop state.
    pub(crate) fn add_rule_follow_links(&mut self) {
        let links: Vec<(usize, StateId)> = self
            .atn
            .iter()
            .filter(|(_, state)| state.is_basic())
            .filter_map(|(_, state)| match state.single_transition()?.kind {
                TransitionKind::Rule { rule, follow, .. } => Some((rule, follow)),
                _ => None,
            })
            .collect();
        for &(rule, follow) in &links {
            let stop = self.atn.rule_stop(rule);
            self.atn.epsilon(stop, follow);
        }
        log::debug!("added {} rule follow links", links.len());
    }

    /// Rules whose stop state has no way out are entry points: they must be
    /// followed by end of input. Returns how many stop states were linked.
    pub(crate) fn add_eof_transitions(&mut self) -> usize {
        let mut eof_target = None;
        let mut count = 0;
        for rule in 0..self.atn.rule_count() {
            let stop = self.atn.rule_stop(rule);
            if !self.atn.state(stop).transitions().is_empty() {
                continue;
            }
            let target = *eof_target.get_or_insert_with(|| self.atn.add_basic(None));
            self.atn.add_transition(stop, Transition::atom(target, EOF));
            count += 1;
        }
        log::debug!("linked {count} entry rules to EOF");
        count
    }

    fn new_state(&mut self) -> StateId {
        self.atn.add_basic(Some(self.current_rule))
    }

    /// `left -kind-> right`.
    fn leaf(&mut self, kind: TransitionKind) -> Fragment {
        let left = self.new_state();
        let right = self.new_state();
        self.atn.add_transition(left, Transition::new(right, kind));
        Fragment::new(left, right)
    }

    fn epsilon_fragment(&mut self) -> Fragment {
        self.leaf(TransitionKind::Epsilon)
    }

    /// Stand-in for a construct that could not be built.
    fn degraded(&mut self) -> Fragment {
        Fragment::single(self.new_state())
    }
}
