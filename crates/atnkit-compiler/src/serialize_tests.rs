use atnkit_core::IntervalSet;
use atnkit_core::constants::EOF;

use crate::atn::{Atn, Transition, TransitionKind};
use crate::grammar::{Alternative, Block, Element, Grammar, GrammarKind, LexerCommand, Rule};
use crate::serialize::{SERIALIZED_VERSION, serialize};
use crate::{AtnBuilder, Error};

/// `a` with a single body state `S2` between start `S0` and stop `S1`.
fn single_rule_atn() -> Atn {
    let mut atn = Atn::new(GrammarKind::Parser, 2);
    atn.add_rule(0, false);
    let body = atn.add_basic(Some(0));
    atn.epsilon(0, body);
    atn
}

#[test]
fn parser_rule() {
    let grammar = Grammar::parser("P")
        .token("A", 1)
        .rule(Rule::new("a", Block::seq(vec![Element::token("A")])));
    let (atn, _) = AtnBuilder::new(&grammar).build().unwrap();

    let data = serialize(&atn).unwrap();

    #[rustfmt::skip]
    let expected = vec![
        SERIALIZED_VERSION, 1, 1,
        5, 2, 0, 7, 0, 1, 0, 0, 1, -1,
        0,
        0,
        1, 0,
        0,
        0,
        2, 0, 2, 1, 0, 0, 0, 2, 1, 5, 1, 0, 0,
        0,
    ];
    assert_eq!(data, expected);
}

#[test]
fn lexer_rule_with_action() {
    let body = Block::new(vec![
        Alternative::new(vec![Element::literal("'a'")]).command(LexerCommand::new("skip")),
    ]);
    let grammar = Grammar::lexer("L")
        .token("A", 1)
        .rule(Rule::new("A", body));
    let (atn, _) = AtnBuilder::new(&grammar).build().unwrap();

    let data = serialize(&atn).unwrap();

    #[rustfmt::skip]
    let expected = vec![
        SERIALIZED_VERSION, 0, 1,
        7, 6, -1, 2, 0, 7, 0, 1, 0, 0, 1, 0, 0,
        0,
        0,
        1, 1, 1,
        1, 0,
        0,
        4, 0, 1, 1, 0, 0, 0, 1, 3, 1, 0, 0, 0, 3, 5, 5, 97, 0, 0, 5, 2, 6, 0, 0, 0,
        1, 0,
        1, 6, 0, 0,
    ];
    assert_eq!(data, expected);
}

#[test]
fn sets_drop_leading_eof_interval() {
    let mut atn = single_rule_atn();
    let with_eof: IntervalSet = [EOF, 1].into_iter().collect();
    atn.add_transition(2, Transition::new(1, TransitionKind::Set(with_eof)));
    atn.add_transition(
        2,
        Transition::new(1, TransitionKind::NotSet(IntervalSet::range(EOF, 2))),
    );

    let data = serialize(&atn).unwrap();

    #[rustfmt::skip]
    let expected = vec![
        SERIALIZED_VERSION, 1, 2,
        3, 2, 0, 7, 0, 1, 0,
        0,
        0,
        1, 0,
        0,
        2, 1, 1, 1, 1, 1, 1, 0, 2,
        3, 0, 2, 1, 0, 0, 0, 2, 1, 7, 0, 0, 0, 2, 1, 8, 1, 0, 0,
        0,
    ];
    assert_eq!(data, expected);
}

#[test]
fn equal_sets_share_an_index() {
    let mut atn = single_rule_atn();
    let set = IntervalSet::from_iter([1, 3]);
    atn.add_transition(2, Transition::new(1, TransitionKind::Set(set.clone())));
    atn.add_transition(2, Transition::new(1, TransitionKind::NotSet(set)));

    let data = serialize(&atn).unwrap();

    // one set of two intervals: count, flag and two bounds each
    let sets_at = 3 + 7 + 1 + 1 + 2 + 1;
    assert_eq!(&data[sets_at..sets_at + 7], [1, 2, 0, 1, 1, 3, 3]);
}

#[test]
fn eof_labels_are_flagged() {
    let mut atn = single_rule_atn();
    atn.add_transition(2, Transition::atom(1, EOF));
    atn.add_transition(
        2,
        Transition::new(1, TransitionKind::Range { from: EOF, to: 2 }),
    );

    let data = serialize(&atn).unwrap();

    let edges = &data[data.len() - 13..data.len() - 1];
    assert_eq!(edges, [2, 1, 5, 0, 0, 1, 2, 1, 2, 0, 2, 1]);
}

#[test]
fn rule_edges_target_the_follow() {
    let mut atn = Atn::new(GrammarKind::Parser, 1);
    atn.add_rule(0, false);
    atn.add_rule(1, false);
    let call = atn.add_basic(Some(0));
    let follow = atn.add_basic(Some(0));
    atn.add_transition(
        call,
        Transition::new(
            2,
            TransitionKind::Rule {
                rule: 1,
                precedence: 3,
                follow,
            },
        ),
    );

    let data = serialize(&atn).unwrap();

    let edge = &data[data.len() - 7..data.len() - 1];
    assert_eq!(edge, [4, 5, 3, 2, 1, 3]);
}

#[test]
fn removed_target_is_an_error() {
    let mut atn = single_rule_atn();
    let gone = atn.add_basic(Some(0));
    atn.add_transition(2, Transition::epsilon(gone));
    atn.remove_state(gone);

    let err = serialize(&atn).unwrap_err();

    assert!(matches!(err, Error::DanglingTransition { from: 2, to: 3 }));
    insta::assert_snapshot!(err.to_string(), @"transition S2 -> S3 references a removed state");
}
