//! Dump helpers for ATN inspection and testing.
//!
//! One line per live state, transitions in order. Lexer labels print as
//! grammar char literals, parser labels as token types.

use std::fmt::Write;

use atnkit_core::IntervalSet;
use atnkit_core::chars::{char_literal, range_literal};
use atnkit_core::constants::EOF;

use super::{Atn, AtnState, StateKind, Transition, TransitionKind};

/// Printer for `Atn` with configurable output options.
pub struct AtnPrinter<'a> {
    atn: &'a Atn,
    rule_names: Option<&'a [String]>,
    show_removed: bool,
}

impl<'a> AtnPrinter<'a> {
    pub fn new(atn: &'a Atn) -> Self {
        Self {
            atn,
            rule_names: None,
            show_removed: false,
        }
    }

    /// Print a `name = S<start>` header per rule.
    pub fn with_rule_names(mut self, names: &'a [String]) -> Self {
        self.rule_names = Some(names);
        self
    }

    /// List tombstoned states as `S<n> ✗`.
    pub fn show_removed(mut self, show: bool) -> Self {
        self.show_removed = show;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = self.format(&mut out);
        out
    }

    fn format(&self, w: &mut String) -> std::fmt::Result {
        if let Some(names) = self.rule_names {
            for (rule, start) in self.atn.rule_starts().iter().enumerate() {
                let name = names.get(rule).map_or("?", String::as_str);
                writeln!(w, "{name} = S{start}")?;
            }
            if !names.is_empty() {
                writeln!(w)?;
            }
        }

        for id in 0..self.atn.len() as u32 {
            let state = self.atn.state(id);
            if state.is_removed() {
                if self.show_removed {
                    writeln!(w, "S{id} ✗")?;
                }
                continue;
            }
            write!(w, "S{id} {}", state.kind().name())?;
            self.format_attributes(w, state)?;
            for (i, t) in state.transitions().iter().enumerate() {
                let sep = if i == 0 { ": " } else { ", " };
                write!(w, "{sep}{}", self.format_transition(t))?;
            }
            writeln!(w)?;
        }

        let actions = self.atn.lexer_actions();
        if !actions.is_empty() {
            writeln!(w)?;
            for (index, action) in actions.iter().enumerate() {
                writeln!(w, "A{index} {action}")?;
            }
        }
        Ok(())
    }

    fn format_attributes(&self, w: &mut String, state: &AtnState) -> std::fmt::Result {
        if let Some(rule) = state.rule() {
            write!(w, " r{rule}")?;
        }
        if let Some(decision) = state.decision() {
            write!(w, " d{decision}")?;
        }
        if state.is_non_greedy() {
            write!(w, " lazy")?;
        }
        if let StateKind::RuleStart {
            left_recursive: true,
            ..
        } = state.kind()
        {
            write!(w, " lr")?;
        }
        Ok(())
    }

    fn format_transition(&self, t: &Transition) -> String {
        let target = t.target;
        match &t.kind {
            TransitionKind::Rule {
                rule,
                precedence,
                follow,
            } => {
                let precedence = if *precedence != 0 {
                    format!(" p={precedence}")
                } else {
                    String::new()
                };
                format!("r{rule}{precedence} -> S{target} (follow S{follow})")
            }
            kind => format!("{} -> S{target}", self.format_label(kind)),
        }
    }

    fn format_label(&self, kind: &TransitionKind) -> String {
        match kind {
            TransitionKind::Epsilon => "ε".to_string(),
            TransitionKind::Atom(label) => self.symbol(*label),
            TransitionKind::Range { from, to } => {
                if self.atn.is_lexer() && *from != EOF {
                    range_literal(*from, *to)
                } else {
                    format!("{}..{}", self.symbol(*from), self.symbol(*to))
                }
            }
            TransitionKind::Set(set) => format!("{{{}}}", self.set(set)),
            TransitionKind::NotSet(set) => format!("~{{{}}}", self.set(set)),
            TransitionKind::Wildcard => ".".to_string(),
            TransitionKind::Action {
                rule,
                action_index,
                ctx_dependent,
            } => {
                let ctx = if *ctx_dependent { ", ctx" } else { "" };
                format!("action(r{rule}, {action_index}{ctx})")
            }
            TransitionKind::Predicate {
                rule,
                pred_index,
                ctx_dependent,
            } => {
                let ctx = if *ctx_dependent { ", ctx" } else { "" };
                format!("pred(r{rule}, {pred_index}{ctx})")
            }
            TransitionKind::PrecedencePredicate { precedence } => format!("prec({precedence})"),
            TransitionKind::Rule { rule, .. } => format!("r{rule}"),
        }
    }

    fn symbol(&self, value: i32) -> String {
        if value == EOF {
            "EOF".to_string()
        } else if self.atn.is_lexer() {
            char_literal(value)
        } else {
            value.to_string()
        }
    }

    fn set(&self, set: &IntervalSet) -> String {
        let sep = if self.atn.is_lexer() { " | " } else { ", " };
        set.intervals()
            .iter()
            .map(|iv| {
                if iv.start == iv.end {
                    self.symbol(iv.start)
                } else if self.atn.is_lexer() && iv.start != EOF {
                    range_literal(iv.start, iv.end)
                } else {
                    format!("{}..{}", self.symbol(iv.start), self.symbol(iv.end))
                }
            })
            .collect::<Vec<_>>()
            .join(sep)
    }
}
