use indexmap::IndexMap;

use super::*;
use crate::atn::LexerAction;
use crate::diagnostics::DiagnosticKind;
use crate::grammar::{Alternative, Block, Element, LexerCommand};

fn rule(name: &str, literal: &str, commands: Vec<LexerCommand>) -> Rule {
    let mut alt = Alternative::new(vec![Element::literal(literal)]);
    alt.commands = commands;
    Rule::new(name, Block::new(vec![alt]))
}

fn build(grammar: &Grammar) -> Construction {
    AtnFactory::new(grammar, &NoCommandTemplates).build()
}

fn action_indices(atn: &Atn) -> Vec<i32> {
    atn.iter()
        .flat_map(|(_, s)| s.transitions())
        .filter_map(|t| match t.kind {
            TransitionKind::Action { action_index, .. } => Some(action_index),
            _ => None,
        })
        .collect()
}

#[test]
fn equal_actions_share_an_index() {
    let grammar = Grammar::lexer("L")
        .token("A", 1)
        .token("B", 2)
        .rule(rule("A", "'a'", vec![LexerCommand::new("skip")]))
        .rule(rule("B", "'b'", vec![LexerCommand::new("skip")]));

    let result = build(&grammar);

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.atn.lexer_actions(), [LexerAction::Skip]);
    assert_eq!(action_indices(&result.atn), [0, 0]);
}

#[test]
fn actions_in_first_use_order() {
    let grammar = Grammar::lexer("L")
        .mode("STRING")
        .channel("COMMENTS", 2)
        .rule(rule(
            "A",
            "'a'",
            vec![
                LexerCommand::with_arg("channel", "COMMENTS"),
                LexerCommand::with_arg("pushMode", "STRING"),
            ],
        ))
        .rule(rule("B", "'b'", vec![LexerCommand::new("popMode")]).in_mode("STRING"))
        .rule(rule("C", "'c'", vec![LexerCommand::with_arg("channel", "HIDDEN")]));

    let result = build(&grammar);

    assert!(result.diagnostics.is_empty());
    assert_eq!(
        result.atn.lexer_actions(),
        [
            LexerAction::Channel(2),
            LexerAction::PushMode(1),
            LexerAction::PopMode,
            LexerAction::Channel(1),
        ]
    );
}

#[test]
fn skip_and_more_are_incompatible() {
    let grammar = Grammar::lexer("L").rule(rule(
        "A",
        "'a'",
        vec![LexerCommand::new("skip"), LexerCommand::new("more")],
    ));

    let result = build(&grammar);

    assert_eq!(
        result.diagnostics.kinds(),
        [DiagnosticKind::IncompatibleCommands]
    );
    let diag = result.diagnostics.iter().next().unwrap();
    assert_eq!(diag.args(), ["skip", "more"]);
}

#[test]
fn repeated_mode_is_duplicated() {
    let grammar = Grammar::lexer("L").mode("M1").mode("M2").rule(rule(
        "A",
        "'a'",
        vec![
            LexerCommand::with_arg("mode", "M1"),
            LexerCommand::with_arg("mode", "M2"),
        ],
    ));

    let result = build(&grammar);

    assert_eq!(result.diagnostics.kinds(), [DiagnosticKind::DuplicatedCommand]);
    assert_eq!(result.diagnostics.iter().next().unwrap().args(), ["mode"]);
    assert_eq!(
        result.atn.lexer_actions(),
        [LexerAction::Mode(1), LexerAction::Mode(2)]
    );
}

#[test]
fn push_mode_may_repeat() {
    let grammar = Grammar::lexer("L").mode("M").rule(rule(
        "A",
        "'a'",
        vec![
            LexerCommand::with_arg("pushMode", "M"),
            LexerCommand::with_arg("pushMode", "M"),
        ],
    ));

    let result = build(&grammar);

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.atn.lexer_actions(), [LexerAction::PushMode(1)]);
    assert_eq!(action_indices(&result.atn), [0, 0]);
}

#[test]
fn commands_are_tracked_per_rule() {
    let grammar = Grammar::lexer("L")
        .rule(rule("A", "'a'", vec![LexerCommand::new("skip")]))
        .rule(rule("B", "'b'", vec![LexerCommand::new("more")]));

    let result = build(&grammar);

    assert!(result.diagnostics.is_empty());
}

#[test]
fn unresolved_constants_drop_the_command() {
    let grammar = Grammar::lexer("L").rule(rule(
        "A",
        "'a'",
        vec![
            LexerCommand::with_arg("type", "NOPE"),
            LexerCommand::with_arg("mode", "NOWHERE"),
            LexerCommand::with_arg("channel", "NOCHAN"),
        ],
    ));

    let result = build(&grammar);

    assert_eq!(
        result.diagnostics.kinds(),
        [
            DiagnosticKind::ConstantValueIsNotARecognizedTokenName,
            DiagnosticKind::ConstantValueIsNotARecognizedModeName,
            DiagnosticKind::ConstantValueIsNotARecognizedChannelName,
        ]
    );
    let args: Vec<_> = result
        .diagnostics
        .iter()
        .map(|d| d.args()[0].clone())
        .collect();
    assert_eq!(args, ["NOPE", "NOWHERE", "NOCHAN"]);
    assert!(result.atn.lexer_actions().is_empty());
}

#[test]
fn numeric_and_declared_constants() {
    let grammar = Grammar::lexer("L").token("STRING", 7).rule(rule(
        "A",
        "'a'",
        vec![
            LexerCommand::with_arg("type", "STRING"),
            LexerCommand::with_arg("channel", "5"),
        ],
    ));

    let result = build(&grammar);

    assert!(result.diagnostics.is_empty());
    assert_eq!(
        result.atn.lexer_actions(),
        [LexerAction::Type(7), LexerAction::Channel(5)]
    );
}

#[test]
fn argument_arity() {
    let grammar = Grammar::lexer("L").rule(rule(
        "A",
        "'a'",
        vec![
            LexerCommand::with_arg("skip", "1"),
            LexerCommand::new("pushMode"),
        ],
    ));

    let result = build(&grammar);

    assert_eq!(
        result.diagnostics.kinds(),
        [
            DiagnosticKind::UnwantedLexerCommandArgument,
            DiagnosticKind::MissingLexerCommandArgument,
        ]
    );
    let args: Vec<_> = result
        .diagnostics
        .iter()
        .map(|d| d.args()[0].clone())
        .collect();
    assert_eq!(args, ["skip", "pushMode"]);
}

#[test]
fn unknown_command_without_templates() {
    let grammar = Grammar::lexer("L").rule(rule("A", "'a'", vec![LexerCommand::new("foo")]));

    let result = build(&grammar);

    assert_eq!(
        result.diagnostics.kinds(),
        [DiagnosticKind::InvalidLexerCommand]
    );
    assert!(result.atn.lexer_actions().is_empty());
}

#[test]
fn template_commands_become_custom_actions() {
    let mut templates = IndexMap::new();
    templates.insert(
        "foo".to_string(),
        CommandTemplate::with_arg("setFoo(<arg>);"),
    );
    templates.insert("bar".to_string(), CommandTemplate::plain("bar();"));
    let grammar = Grammar::lexer("L").rule(rule(
        "A",
        "'a'",
        vec![
            LexerCommand::with_arg("foo", "3"),
            LexerCommand::new("bar"),
            LexerCommand::new("foo"),
        ],
    ));

    let result = AtnFactory::new(&grammar, &templates).build();

    assert_eq!(
        result.diagnostics.kinds(),
        [
            DiagnosticKind::DuplicatedCommand,
            DiagnosticKind::MissingLexerCommandArgument,
        ]
    );
    assert_eq!(
        result.atn.lexer_actions(),
        [
            LexerAction::Custom {
                rule: 0,
                action_index: 0
            },
            LexerAction::Custom {
                rule: 0,
                action_index: 1
            },
        ]
    );
    let texts: Vec<_> = result
        .atn
        .custom_actions()
        .iter()
        .map(|a| a.text.as_str())
        .collect();
    assert_eq!(texts, ["setFoo(3);", "bar();"]);
}

#[test]
fn embedded_action_is_custom() {
    let grammar = Grammar::lexer("L").rule(Rule::new(
        "A",
        Block::seq(vec![Element::literal("'a'"), Element::action("count++;")]),
    ));

    let result = build(&grammar);

    assert_eq!(
        result.atn.lexer_actions(),
        [LexerAction::Custom {
            rule: 0,
            action_index: 0
        }]
    );
    assert_eq!(result.atn.custom_actions()[0].text, "count++;");
}

#[test]
fn reserved_names() {
    let grammar = Grammar::lexer("L")
        .mode("SKIP")
        .token("HIDDEN", 1)
        .token("EOF", -1)
        .channel("MORE", 2);

    let result = build(&grammar);

    assert_eq!(
        result.diagnostics.kinds(),
        [
            DiagnosticKind::ModeConflictsWithCommonConstants,
            DiagnosticKind::TokenConflictsWithCommonConstants,
            DiagnosticKind::ChannelConflictsWithCommonConstants,
        ]
    );
}

#[test]
fn template_rendering() {
    assert_eq!(CommandTemplate::with_arg("f(<arg>)").render(Some("x")), "f(x)");
    assert_eq!(CommandTemplate::plain("g()").render(None), "g()");
    assert!(!CommandTemplate::plain("g()").takes_arg());
}
