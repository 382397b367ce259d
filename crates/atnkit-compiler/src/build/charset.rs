//! Lexer character sets.
//!
//! `SetBuilder` accumulates code points for one set, expanding letters
//! under case-insensitivity and reporting the first collision. The bracketed
//! literal parser drives it through a small state machine: a pending code
//! point or property is only committed once the next item shows it is not
//! the start of a range.

use atnkit_core::IntervalSet;
use atnkit_core::chars::{EscapeKind, char_literal, parse_escape};
use atnkit_core::unicode::{is_alphabetic, to_lower, to_upper};
use rowan::TextRange;

use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Case variants of a range's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RangeBorders {
    pub lower_from: i32,
    pub upper_from: i32,
    pub lower_to: i32,
    pub upper_to: i32,
    /// One bound is lowercase and the other is not.
    pub mixed_case: bool,
}

impl RangeBorders {
    pub fn of(from: i32, to: i32) -> Self {
        let lower_from = to_lower(from);
        let lower_to = to_lower(to);
        Self {
            lower_from,
            upper_from: to_upper(from),
            lower_to,
            upper_to: to_upper(to),
            mixed_case: (lower_from == from) != (lower_to == to),
        }
    }

    /// The range has no distinct case-folded counterpart.
    pub fn is_single_range(&self) -> bool {
        (self.lower_from == self.upper_from && self.lower_to == self.upper_to)
            || self.mixed_case
            || self.lower_to - self.lower_from != self.upper_to - self.upper_from
    }
}

/// Warns about ranges such as `A..z` that silently include punctuation.
pub(crate) fn check_not_implied_characters(
    diagnostics: &mut Diagnostics,
    range: TextRange,
    from: i32,
    to: i32,
) {
    let borders = RangeBorders::of(from, to);
    if !borders.mixed_case || from > 0x7F || to > 0x7F {
        return;
    }
    let not_implied: String = (from..to)
        .filter(|c| !is_alphabetic(*c))
        .filter_map(raw_char)
        .collect();
    if not_implied.is_empty() {
        return;
    }
    diagnostics
        .report(DiagnosticKind::RangeProbablyContainsNotImpliedCharacter, range)
        .arg(raw_text(from))
        .arg(raw_text(to))
        .arg(not_implied)
        .emit();
}

fn raw_char(code_point: i32) -> Option<char> {
    u32::try_from(code_point).ok().and_then(char::from_u32)
}

fn raw_text(code_point: i32) -> String {
    raw_char(code_point).map(String::from).unwrap_or_default()
}

/// Accumulates the contents of one lexer set.
pub(crate) struct SetBuilder {
    set: IntervalSet,
    text: String,
    case_insensitive: bool,
    collision_reported: bool,
}

impl SetBuilder {
    /// `text` is the set's source spelling, quoted by collision reports.
    pub fn new(text: impl Into<String>, case_insensitive: bool) -> Self {
        Self {
            set: IntervalSet::new(),
            text: text.into(),
            case_insensitive,
            collision_reported: false,
        }
    }

    /// Adds `from..=to`, case-expanded when the rule is case-insensitive.
    pub fn add_range(
        &mut self,
        diagnostics: &mut Diagnostics,
        range: TextRange,
        from: i32,
        to: i32,
    ) {
        check_not_implied_characters(diagnostics, range, from, to);
        if !self.case_insensitive {
            self.add_checked(diagnostics, range, from, to);
            return;
        }
        let borders = RangeBorders::of(from, to);
        if borders.is_single_range() {
            self.add_checked(diagnostics, range, from, to);
        } else {
            self.add_checked(diagnostics, range, borders.lower_from, borders.lower_to);
            self.add_checked(diagnostics, range, borders.upper_from, borders.upper_to);
        }
    }

    /// Adds a whole set (property escapes, nested literals) without
    /// collision checks.
    pub fn add_set(&mut self, other: &IntervalSet) {
        self.set.add_all(other);
    }

    fn add_checked(&mut self, diagnostics: &mut Diagnostics, range: TextRange, from: i32, to: i32) {
        if !self.collision_reported && from <= to && self.set.intersects_range(from, to) {
            let chars = if from == to {
                raw_text(from)
            } else {
                format!("{}-{}", raw_text(from), raw_text(to))
            };
            diagnostics
                .report(DiagnosticKind::CharactersCollisionInSet, range)
                .arg(chars)
                .arg(self.text.as_str())
                .emit();
            self.collision_reported = true;
        }
        self.set.add_range(from, to);
    }

    pub fn finish(self) -> IntervalSet {
        self.set
    }
}

/// Item waiting to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    None,
    CodePoint(i32),
    Property(IntervalSet),
    Error,
}

struct CharSetParser<'d> {
    diagnostics: &'d mut Diagnostics,
    range: TextRange,
    text: &'d str,
    builder: SetBuilder,
    pending: Pending,
    in_range: bool,
}

/// Parses a bracketed set literal such as `[a-z\p{Lu}_]`, brackets
/// included. Malformed input reports and yields an empty set.
pub(crate) fn parse_char_set(
    diagnostics: &mut Diagnostics,
    range: TextRange,
    text: &str,
    case_insensitive: bool,
) -> IntervalSet {
    let chars: Vec<char> = text.chars().collect();
    let inner: &[char] = if chars.len() >= 2 {
        &chars[1..chars.len() - 1]
    } else {
        &[]
    };
    let mut parser = CharSetParser {
        diagnostics,
        range,
        text,
        builder: SetBuilder::new(text, case_insensitive),
        pending: Pending::None,
        in_range: false,
    };
    parser.parse(inner)
}

impl CharSetParser<'_> {
    fn parse(mut self, chars: &[char]) -> IntervalSet {
        let n = chars.len();
        let mut i = 0;
        while i < n {
            if self.pending == Pending::Error {
                return IntervalSet::new();
            }
            let c = chars[i];
            let mut next = i + 1;
            if c == '\\' {
                let escape = parse_escape(chars, i);
                match escape.kind {
                    EscapeKind::Invalid => {
                        let end = escape.end.min(n);
                        let invalid: String = chars[escape.start..end].iter().collect();
                        self.diagnostics
                            .report(DiagnosticKind::InvalidEscapeSequence, self.range)
                            .arg(invalid)
                            .emit();
                        self.pending = Pending::Error;
                    }
                    EscapeKind::CodePoint(code_point) => self.code_point(code_point),
                    EscapeKind::Property(set) => self.property(set),
                }
                next = escape.end.max(i + 1);
            } else if c == '-'
                && !self.in_range
                && i != 0
                && i != n - 1
                && self.pending != Pending::None
            {
                if matches!(self.pending, Pending::Property(_)) {
                    self.property_in_range();
                } else {
                    self.in_range = true;
                }
            } else {
                self.code_point(c as i32);
            }
            i = next;
        }
        if self.pending == Pending::Error {
            return IntervalSet::new();
        }
        let pending = std::mem::replace(&mut self.pending, Pending::None);
        self.commit(pending);
        let set = self.builder.finish();
        if set.is_empty() {
            self.diagnostics
                .report(DiagnosticKind::EmptyStringAndSetsNotAllowed, self.range)
                .arg("[]")
                .emit();
        }
        set
    }

    fn code_point(&mut self, code_point: i32) {
        let pending = std::mem::replace(&mut self.pending, Pending::None);
        if self.in_range {
            self.in_range = false;
            if let Pending::CodePoint(start) = pending {
                if start > code_point {
                    self.diagnostics
                        .report(DiagnosticKind::EmptyStringAndSetsNotAllowed, self.range)
                        .arg(format!("{}-{}", escaped(start), escaped(code_point)))
                        .emit();
                }
                self.builder
                    .add_range(self.diagnostics, self.range, start, code_point);
            }
            return;
        }
        self.commit(pending);
        self.pending = Pending::CodePoint(code_point);
    }

    fn property(&mut self, set: IntervalSet) {
        if self.in_range {
            self.property_in_range();
            return;
        }
        let pending = std::mem::replace(&mut self.pending, Pending::None);
        self.commit(pending);
        self.pending = Pending::Property(set);
    }

    fn property_in_range(&mut self) {
        self.diagnostics
            .report(DiagnosticKind::UnicodePropertyNotAllowedInRange, self.range)
            .arg(self.text)
            .emit();
        self.pending = Pending::Error;
    }

    fn commit(&mut self, pending: Pending) {
        match pending {
            Pending::CodePoint(code_point) => {
                self.builder
                    .add_range(self.diagnostics, self.range, code_point, code_point);
            }
            Pending::Property(set) => self.builder.add_set(&set),
            Pending::None | Pending::Error => {}
        }
    }
}

/// Code point as written inside a literal, without quotes.
fn escaped(code_point: i32) -> String {
    let literal = char_literal(code_point);
    literal[1..literal.len() - 1].to_string()
}
