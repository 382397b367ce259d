use atnkit_core::IntervalSet;
use atnkit_core::constants::EOF;

use super::*;
use crate::grammar::GrammarKind;

fn two_rule_parser() -> Atn {
    let mut atn = Atn::new(GrammarKind::Parser, 3);
    atn.add_rule(0, false);
    atn.add_rule(1, true);
    let call = atn.add_basic(Some(0));
    let follow = atn.add_basic(Some(0));
    let body = atn.add_basic(Some(1));
    atn.epsilon(0, call);
    atn.add_transition(
        call,
        Transition::new(
            2,
            TransitionKind::Rule {
                rule: 1,
                precedence: 2,
                follow,
            },
        ),
    );
    let set: IntervalSet = [1, 3].into_iter().collect();
    atn.add_transition(follow, Transition::new(1, TransitionKind::Set(set)));
    atn.epsilon(2, body);
    atn.add_transition(body, Transition::atom(3, EOF));
    atn.epsilon(3, follow);
    atn
}

#[test]
fn parser_states() {
    let atn = two_rule_parser();

    insta::assert_snapshot!(atn.dump(), @r"
    S0 RuleStart r0: ε -> S4
    S1 RuleStop r0
    S2 RuleStart r1 lr: ε -> S6
    S3 RuleStop r1: ε -> S5
    S4 Basic r0: r1 p=2 -> S2 (follow S5)
    S5 Basic r0: {1, 3} -> S1
    S6 Basic r1: EOF -> S3
    ");
}

#[test]
fn rule_name_headers() {
    let atn = two_rule_parser();
    let names = ["expr".to_string(), "atom".to_string()];

    let dump = atn.printer().with_rule_names(&names).dump();

    insta::assert_snapshot!(dump, @r"
    expr = S0
    atom = S2

    S0 RuleStart r0: ε -> S4
    S1 RuleStop r0
    S2 RuleStart r1 lr: ε -> S6
    S3 RuleStop r1: ε -> S5
    S4 Basic r0: r1 p=2 -> S2 (follow S5)
    S5 Basic r0: {1, 3} -> S1
    S6 Basic r1: EOF -> S3
    ");
}

#[test]
fn lexer_labels_and_actions() {
    let mut atn = Atn::new(GrammarKind::Lexer, 1);
    let mode = atn.add_state(StateKind::TokensStart, None);
    atn.add_mode_start(mode);
    atn.define_decision(mode);
    atn.add_rule(0, false);
    let a = atn.add_basic(Some(0));
    let b = atn.add_basic(Some(0));
    let c = atn.add_basic(Some(0));
    atn.epsilon(mode, 1);
    atn.epsilon(1, a);
    atn.add_transition(a, Transition::code_point_range(b, 'a' as i32, 'z' as i32));
    atn.add_transition(
        b,
        Transition::new(c, TransitionKind::NotSet(IntervalSet::of('\n' as i32))),
    );
    atn.add_transition(
        c,
        Transition::new(
            2,
            TransitionKind::Action {
                rule: 0,
                action_index: 0,
                ctx_dependent: false,
            },
        ),
    );
    atn.set_lexer_actions(vec![LexerAction::Skip]);

    insta::assert_snapshot!(atn.dump(), @r"
    S0 TokensStart d0: ε -> S1
    S1 RuleStart r0: ε -> S3
    S2 RuleStop r0
    S3 Basic r0: 'a'..'z' -> S4
    S4 Basic r0: ~{'\n'} -> S5
    S5 Basic r0: action(r0, 0) -> S2

    A0 skip
    ");
}

#[test]
fn predicates_and_wildcard() {
    let mut atn = Atn::new(GrammarKind::Parser, 2);
    let from = atn.add_basic(None);
    let to = atn.add_basic(None);
    atn.add_transition(
        from,
        Transition::new(
            to,
            TransitionKind::Predicate {
                rule: 0,
                pred_index: 1,
                ctx_dependent: true,
            },
        ),
    );
    atn.add_transition(
        from,
        Transition::new(to, TransitionKind::PrecedencePredicate { precedence: 2 }),
    );
    atn.add_transition(from, Transition::new(to, TransitionKind::Wildcard));
    atn.add_transition(from, Transition::code_point_range(to, EOF, 2));

    insta::assert_snapshot!(atn.dump(), @r"
    S0 Basic: pred(r0, 1, ctx) -> S1, prec(2) -> S1, . -> S1, EOF..2 -> S1
    S1 Basic
    ");
}

#[test]
fn removed_states_hidden_by_default() {
    let mut atn = Atn::new(GrammarKind::Parser, 1);
    let block = atn.add_block(BlockKind::Star, Some(0));
    atn.define_decision(block.left);
    atn.state_mut(block.left).non_greedy = true;
    let gone = atn.add_basic(Some(0));
    atn.remove_state(gone);

    insta::assert_snapshot!(atn.dump(), @r"
    S0 StarBlockStart r0 d0 lazy
    S1 BlockEnd r0
    ");
    insta::assert_snapshot!(atn.printer().show_removed(true).dump(), @r"
    S0 StarBlockStart r0 d0 lazy
    S1 BlockEnd r0
    S2 ✗
    ");
}
