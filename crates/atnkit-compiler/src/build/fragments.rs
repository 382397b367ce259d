//! Leaf fragments: one element, one transition.

use atnkit_core::IntervalSet;
use atnkit_core::constants::{EOF, INVALID_TYPE};

use super::AtnFactory;
use super::action_scan::is_context_dependent;
use crate::atn::{Fragment, Transition, TransitionKind};
use crate::diagnostics::DiagnosticKind;
use crate::grammar::{Element, ElementKind, SetElement, SetElementKind};

impl AtnFactory<'_> {
    pub(super) fn element(&mut self, element: &Element) -> Fragment {
        let range = element.span.range();
        let lexer = self.grammar.is_lexer();
        match &element.kind {
            ElementKind::TokenRef(name) if lexer => self.lexer_token_ref(name),
            ElementKind::TokenRef(name) => self.token_ref(name),
            ElementKind::StringLiteral(text) if lexer => self.string_literal(text, range),
            ElementKind::StringLiteral(text) => {
                let ttype = self.grammar.token_type(text).unwrap_or(INVALID_TYPE);
                self.leaf(TransitionKind::Atom(ttype))
            }
            ElementKind::RuleRef { name, precedence } => {
                self.rule_ref(name, precedence.unwrap_or(0))
            }
            ElementKind::Wildcard => self.leaf(TransitionKind::Wildcard),
            ElementKind::Range { from, to } if lexer => self.char_range(from, to, range),
            ElementKind::Range { from, to } => {
                self.diagnostics
                    .report(DiagnosticKind::TokenRangeInParser, range)
                    .arg(from.as_str())
                    .arg(to.as_str())
                    .emit();
                self.epsilon_fragment()
            }
            ElementKind::Set(items) if lexer => self.lexer_set(items, false),
            ElementKind::NotSet(items) if lexer => self.lexer_set(items, true),
            ElementKind::Set(items) => self.token_set(items, false),
            ElementKind::NotSet(items) => self.token_set(items, true),
            ElementKind::CharSet(text) if lexer => self.char_set_literal(text, range),
            ElementKind::CharSet(text) => {
                log::warn!("char set {text} outside a lexer grammar ignored");
                self.epsilon_fragment()
            }
            ElementKind::Block { block, quantifier } => self.block(block, *quantifier, range),
            ElementKind::Action(text) => self.action(text),
            ElementKind::Predicate { text, precedence } => self.predicate(text, *precedence),
        }
    }

    fn token_ref(&mut self, name: &str) -> Fragment {
        let ttype = if name == "EOF" {
            EOF
        } else {
            self.grammar.token_type(name).unwrap_or(INVALID_TYPE)
        };
        self.leaf(TransitionKind::Atom(ttype))
    }

    /// In a lexer, `ID` calls the lexer rule `ID`.
    fn lexer_token_ref(&mut self, name: &str) -> Fragment {
        if name == "EOF" {
            return self.leaf(TransitionKind::Atom(EOF));
        }
        self.rule_ref(name, 0)
    }

    /// Call of `name`; the follow state is wired once all rules exist.
    fn rule_ref(&mut self, name: &str, precedence: i32) -> Fragment {
        let Some(rule) = self.grammar.rule_index(name) else {
            log::warn!("reference to undefined rule {name} replaced by epsilon");
            return self.epsilon_fragment();
        };
        let callee = self.atn.rule_start(rule);
        let left = self.new_state();
        let right = self.new_state();
        self.atn.add_transition(
            left,
            Transition::new(
                callee,
                TransitionKind::Rule {
                    rule,
                    precedence,
                    follow: right,
                },
            ),
        );
        Fragment::new(left, right)
    }

    /// Parser set of token types.
    fn token_set(&mut self, items: &[SetElement], invert: bool) -> Fragment {
        let mut set = IntervalSet::new();
        for item in items {
            let ttype = match &item.kind {
                SetElementKind::TokenRef(name) if name == "EOF" => EOF,
                SetElementKind::TokenRef(name) | SetElementKind::StringLiteral(name) => {
                    self.grammar.token_type(name).unwrap_or(INVALID_TYPE)
                }
                SetElementKind::Range { from, to } => {
                    self.diagnostics
                        .report(DiagnosticKind::TokenRangeInParser, item.span.range())
                        .arg(from.as_str())
                        .arg(to.as_str())
                        .emit();
                    continue;
                }
                SetElementKind::CharSet(text) => {
                    log::warn!("char set {text} in a parser set ignored");
                    continue;
                }
            };
            set.add(ttype);
        }
        self.set_fragment(set, invert)
    }

    /// `~set` keeps the set and negates at match time; a single interval
    /// becomes an atom or range.
    pub(super) fn set_fragment(&mut self, set: IntervalSet, invert: bool) -> Fragment {
        let left = self.new_state();
        let right = self.new_state();
        let transition = if invert {
            Transition::new(right, TransitionKind::NotSet(set))
        } else {
            Transition::from_set(right, set)
        };
        self.atn.add_transition(left, transition);
        Fragment::new(left, right)
    }

    fn action(&mut self, text: &str) -> Fragment {
        if text.trim().is_empty() {
            return self.epsilon_fragment();
        }
        if self.grammar.is_lexer() {
            return self.custom_action(text.to_string());
        }
        self.leaf(TransitionKind::Action {
            rule: self.current_rule,
            action_index: -1,
            ctx_dependent: false,
        })
    }

    fn predicate(&mut self, text: &str, precedence: Option<i32>) -> Fragment {
        let kind = match precedence {
            Some(precedence) => TransitionKind::PrecedencePredicate { precedence },
            None => {
                let pred_index = self.next_predicate;
                self.next_predicate += 1;
                TransitionKind::Predicate {
                    rule: self.current_rule,
                    pred_index,
                    ctx_dependent: is_context_dependent(text),
                }
            }
        };
        self.leaf(kind)
    }
}
