use rowan::TextRange;

use super::check_blocks;
use crate::atn::{Atn, Transition};
use crate::build::BlockCheck;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::grammar::{Alternative, Block, Element, Grammar, GrammarKind, Quantifier, Rule, Span};
use crate::{AtnBuilder, Error};

fn quantified(elements: Vec<Element>, quantifier: Quantifier) -> Element {
    Element::quantified(Block::seq(elements), quantifier)
}

fn grammar(rule: Rule) -> Grammar {
    Grammar::parser("P").token("A", 1).rule(rule)
}

fn diagnostics_of(grammar: &Grammar) -> Diagnostics {
    let (_, diagnostics) = AtnBuilder::new(grammar).build().unwrap();
    diagnostics
}

#[test]
fn closure_that_matches_nothing() {
    let optional_a = quantified(vec![Element::token("A")], Quantifier::optional());
    let rule = Rule::new(
        "a",
        Block::seq(vec![quantified(vec![optional_a], Quantifier::star())]),
    )
    .at(Span::new(0, 9));

    let diagnostics = diagnostics_of(&grammar(rule));

    assert_eq!(diagnostics.kinds(), [DiagnosticKind::EpsilonClosure]);
    let diag = diagnostics.iter().next().unwrap();
    assert_eq!(diag.args(), ["a"]);
    assert_eq!(diag.range(), TextRange::new(0.into(), 9.into()));
}

#[test]
fn left_recursive_rule_reports_follow() {
    let optional_a = quantified(vec![Element::token("A")], Quantifier::optional());
    let rule = Rule::new(
        "a",
        Block::seq(vec![quantified(vec![optional_a], Quantifier::star())]),
    )
    .left_recursive();

    let diagnostics = diagnostics_of(&grammar(rule));

    assert_eq!(diagnostics.kinds(), [DiagnosticKind::EpsilonLrFollow]);
}

#[test]
fn consuming_closure_is_quiet() {
    let rule = Rule::new(
        "a",
        Block::seq(vec![quantified(vec![Element::token("A")], Quantifier::star())]),
    );

    let diagnostics = diagnostics_of(&grammar(rule));

    assert!(diagnostics.is_empty());
}

#[test]
fn closure_over_eof() {
    let rule = Rule::new(
        "a",
        Block::seq(vec![quantified(vec![Element::token("EOF")], Quantifier::plus())]),
    );

    let diagnostics = diagnostics_of(&grammar(rule));

    assert_eq!(diagnostics.kinds(), [DiagnosticKind::EofClosure]);
}

#[test]
fn optional_with_empty_alternative() {
    let block = Block::new(vec![
        Alternative::new(vec![Element::token("A")]),
        Alternative::new(vec![]),
    ]);
    let rule = Rule::new(
        "a",
        Block::seq(vec![Element::quantified(block, Quantifier::optional())]),
    );

    let diagnostics = diagnostics_of(&grammar(rule));

    assert_eq!(diagnostics.kinds(), [DiagnosticKind::EpsilonOptional]);
    assert_eq!(diagnostics.iter().next().unwrap().args(), ["a"]);
}

#[test]
fn validation_can_be_skipped() {
    let optional_a = quantified(vec![Element::token("A")], Quantifier::optional());
    let rule = Rule::new(
        "a",
        Block::seq(vec![quantified(vec![optional_a], Quantifier::star())]),
    );
    let grammar = grammar(rule);

    let (_, diagnostics) = AtnBuilder::new(&grammar)
        .with_validate(false)
        .build()
        .unwrap();

    assert!(diagnostics.is_empty());
}

#[test]
fn optional_without_bypass_is_an_error() {
    let grammar = grammar(Rule::new("a", Block::seq(vec![])));
    let mut atn = Atn::new(GrammarKind::Parser, 1);
    atn.add_rule(0, false);
    let start = atn.add_basic(Some(0));
    let dead_end = atn.add_basic(Some(0));
    let end = atn.add_basic(Some(0));
    atn.add_transition(start, Transition::atom(dead_end, 1));
    let block = BlockCheck {
        rule: 0,
        start,
        end,
    };
    let mut diagnostics = Diagnostics::new();

    let err = check_blocks(&atn, &grammar, &[], &[block], &mut diagnostics).unwrap_err();

    assert!(matches!(
        err,
        Error::InvalidOptionalBlock {
            start: 2,
            bypasses: 0,
            ..
        }
    ));
    insta::assert_snapshot!(err.to_string(), @"optional block at S2 in rule a has 0 bypass edges");
    assert!(diagnostics.is_empty());
}
