//! Lexer leaves: string literals, character ranges and sets.

use atnkit_core::IntervalSet;
use atnkit_core::chars::{char_value_from_literal, string_from_literal};
use rowan::TextRange;

use super::AtnFactory;
use super::charset::{RangeBorders, SetBuilder, check_not_implied_characters, parse_char_set};
use crate::atn::{Fragment, StateId, Transition, TransitionKind};
use crate::diagnostics::DiagnosticKind;
use crate::grammar::{SetElement, SetElementKind};

impl AtnFactory<'_> {
    /// One state per code point.
    pub(super) fn string_literal(&mut self, text: &str, range: TextRange) -> Fragment {
        let Some(code_points) = string_from_literal(text) else {
            self.diagnostics
                .report(DiagnosticKind::InvalidEscapeSequence, range)
                .arg(text)
                .emit();
            return self.degraded();
        };
        if code_points.is_empty() {
            self.diagnostics
                .report(DiagnosticKind::EmptyStringAndSetsNotAllowed, range)
                .arg(text)
                .emit();
            return self.degraded();
        }
        let left = self.new_state();
        let mut prev = left;
        for code_point in code_points {
            let next = self.new_state();
            let transition = self.code_point_transition(next, code_point, code_point, range);
            self.atn.add_transition(prev, transition);
            prev = next;
        }
        Fragment::new(left, prev)
    }

    /// `'a'..'z'`.
    pub(super) fn char_range(&mut self, from: &str, to: &str, range: TextRange) -> Fragment {
        let Some((start, end)) = self.check_range(from, to, range) else {
            return self.degraded();
        };
        let left = self.new_state();
        let right = self.new_state();
        let transition = self.code_point_transition(right, start, end, range);
        self.atn.add_transition(left, transition);
        Fragment::new(left, right)
    }

    /// Decodes both bounds of a range, reporting bad literals and inverted
    /// bounds.
    fn check_range(&mut self, from: &str, to: &str, range: TextRange) -> Option<(i32, i32)> {
        let start = char_value_from_literal(from);
        let end = char_value_from_literal(to);
        for (value, text) in [(start, from), (end, to)] {
            if value.is_none() {
                self.diagnostics
                    .report(DiagnosticKind::InvalidLiteralInLexerSet, range)
                    .arg(text)
                    .emit();
            }
        }
        let (start, end) = (start?, end?);
        if end < start {
            self.diagnostics
                .report(DiagnosticKind::EmptyStringAndSetsNotAllowed, range)
                .arg(format!("{from}..{to}"))
                .emit();
            return None;
        }
        Some((start, end))
    }

    /// Atom or range, or the lower/upper pair of ranges when the rule is
    /// case-insensitive.
    fn code_point_transition(
        &mut self,
        target: StateId,
        from: i32,
        to: i32,
        range: TextRange,
    ) -> Transition {
        check_not_implied_characters(&mut self.diagnostics, range, from, to);
        if !self.case_insensitive {
            return Transition::code_point_range(target, from, to);
        }
        let borders = RangeBorders::of(from, to);
        if borders.is_single_range() {
            return Transition::code_point_range(target, from, to);
        }
        let mut set = IntervalSet::range(borders.lower_from, borders.lower_to);
        set.add_range(borders.upper_from, borders.upper_to);
        Transition::new(target, TransitionKind::Set(set))
    }

    /// `('a' | 'c'..'f' | [xyz])` or its negation.
    pub(super) fn lexer_set(&mut self, items: &[SetElement], invert: bool) -> Fragment {
        let text = items
            .iter()
            .map(SetElement::text)
            .collect::<Vec<_>>()
            .join(" | ");
        let mut builder = SetBuilder::new(text, self.case_insensitive);
        for item in items {
            let item_range = item.span.range();
            match &item.kind {
                SetElementKind::Range { from, to } => {
                    if let Some((start, end)) = self.check_range(from, to, item_range) {
                        builder.add_range(&mut self.diagnostics, item_range, start, end);
                    }
                }
                SetElementKind::CharSet(literal) => {
                    let set = parse_char_set(
                        &mut self.diagnostics,
                        item_range,
                        literal,
                        self.case_insensitive,
                    );
                    builder.add_set(&set);
                }
                SetElementKind::StringLiteral(literal) => match char_value_from_literal(literal) {
                    Some(code_point) => {
                        builder.add_range(
                            &mut self.diagnostics,
                            item_range,
                            code_point,
                            code_point,
                        );
                    }
                    None => {
                        self.diagnostics
                            .report(DiagnosticKind::InvalidLiteralInLexerSet, item_range)
                            .arg(literal.as_str())
                            .emit();
                    }
                },
                SetElementKind::TokenRef(name) => {
                    self.diagnostics
                        .report(DiagnosticKind::UnsupportedReferenceInLexerSet, item_range)
                        .arg(name.as_str())
                        .emit();
                }
            }
        }
        self.set_fragment(builder.finish(), invert)
    }

    /// `[a-z_]` as an element.
    pub(super) fn char_set_literal(&mut self, text: &str, range: TextRange) -> Fragment {
        let set = parse_char_set(&mut self.diagnostics, range, text, self.case_insensitive);
        self.set_fragment(set, false)
    }
}
