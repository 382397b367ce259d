use atnkit_core::IntervalSet;
use atnkit_core::constants::EPSILON;

use super::Ll1Analyzer;
use crate::atn::Atn;
use crate::build::{AtnFactory, Construction, NoCommandTemplates};
use crate::grammar::{Alternative, Block, Element, Grammar, Quantifier, Rule, SetElement};

fn build(grammar: &Grammar) -> Construction {
    AtnFactory::new(grammar, &NoCommandTemplates).build()
}

fn parser() -> Grammar {
    Grammar::parser("P")
        .token("A", 1)
        .token("B", 2)
        .token("C", 3)
}

fn rule(name: &str, elements: Vec<Element>) -> Rule {
    Rule::new(name, Block::seq(elements))
}

fn set(values: &[i32]) -> IntervalSet {
    values.iter().copied().collect()
}

fn look_rule(atn: &Atn, rule: usize) -> IntervalSet {
    Ll1Analyzer::new(atn).look(atn.rule_start(rule), None)
}

#[test]
fn first_token_of_rule() {
    let grammar = parser().rule(rule("a", vec![Element::token("A"), Element::token("B")]));

    let result = build(&grammar);

    assert_eq!(look_rule(&result.atn, 0), set(&[1]));
}

#[test]
fn empty_alternative_reaches_rule_end() {
    let body = Block::new(vec![
        Alternative::new(vec![Element::token("B")]),
        Alternative::new(vec![]),
    ]);
    let grammar = parser().rule(Rule::new("b", body));

    let result = build(&grammar);

    assert_eq!(look_rule(&result.atn, 0), set(&[EPSILON, 2]));
}

#[test]
fn follows_through_rule_calls() {
    let optional_b = Element::quantified(
        Block::seq(vec![Element::token("B")]),
        Quantifier::optional(),
    );
    let grammar = parser()
        .rule(rule("a", vec![Element::rule("b"), Element::token("A")]))
        .rule(rule("b", vec![optional_b]));

    let result = build(&grammar);

    assert_eq!(look_rule(&result.atn, 0), set(&[1, 2]));
    assert_eq!(look_rule(&result.atn, 1), set(&[EPSILON, 2]));
}

#[test]
fn recursive_call_is_not_reentered() {
    let body = Block::new(vec![
        Alternative::new(vec![Element::rule("a"), Element::token("A")]),
        Alternative::new(vec![Element::token("B")]),
    ]);
    let grammar = parser().rule(Rule::new("a", body).left_recursive());

    let result = build(&grammar);

    assert_eq!(look_rule(&result.atn, 0), set(&[2]));
}

#[test]
fn wildcard_and_not_set_span_token_types() {
    let grammar = parser()
        .rule(rule("a", vec![Element::wildcard()]))
        .rule(rule("b", vec![Element::not(vec![SetElement::token("A")])]));

    let result = build(&grammar);

    assert_eq!(look_rule(&result.atn, 0), IntervalSet::range(1, 3));
    assert_eq!(look_rule(&result.atn, 1), IntervalSet::range(2, 3));
}

#[test]
fn stop_state_ends_the_walk() {
    let optional_a = Element::quantified(
        Block::seq(vec![Element::token("A")]),
        Quantifier::optional(),
    );
    let grammar = parser().rule(rule("a", vec![optional_a, Element::token("B")]));

    let result = build(&grammar);
    let block = &result.optional_blocks[0];

    let look = Ll1Analyzer::new(&result.atn).look(block.start, Some(block.end));
    assert_eq!(look, set(&[EPSILON, 1]));
    assert_eq!(look_rule(&result.atn, 0), set(&[1, 2]));
}
