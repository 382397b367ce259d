//! Lexer commands (`-> skip`, `-> pushMode(M)`, ...) and the action table.
//!
//! Built-in commands become `LexerAction`s. Every distinct action is stored
//! once; transitions carry the action's table index. Other commands are
//! rendered through the injected `CommandTemplates` and become custom
//! actions.

use atnkit_core::constants::{
    DEFAULT_MODE, DEFAULT_MODE_NAME, DEFAULT_TOKEN_CHANNEL, EOF, HIDDEN, MIN_USER_CHANNEL_VALUE,
    common_constant, is_common_constant,
};
use indexmap::{IndexMap, IndexSet};
use rowan::TextRange;

use super::AtnFactory;
use crate::atn::{CustomAction, Fragment, LexerAction, TransitionKind};
use crate::diagnostics::DiagnosticKind;
use crate::grammar::{Grammar, LexerCommand};

/// Code template for a lexer command the engine does not know natively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    text: String,
    takes_arg: bool,
}

impl CommandTemplate {
    /// Template without argument.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            takes_arg: false,
        }
    }

    /// Template whose `<arg>` placeholder receives the command argument.
    pub fn with_arg(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            takes_arg: true,
        }
    }

    pub fn takes_arg(&self) -> bool {
        self.takes_arg
    }

    pub fn render(&self, arg: Option<&str>) -> String {
        match arg {
            Some(arg) => self.text.replace("<arg>", arg),
            None => self.text.clone(),
        }
    }
}

/// Read-only source of command templates, provided by the code generator.
pub trait CommandTemplates {
    fn command(&self, name: &str) -> Option<CommandTemplate>;
}

/// No templates: every non-built-in command is invalid.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCommandTemplates;

impl CommandTemplates for NoCommandTemplates {
    fn command(&self, _name: &str) -> Option<CommandTemplate> {
        None
    }
}

impl CommandTemplates for IndexMap<String, CommandTemplate> {
    fn command(&self, name: &str) -> Option<CommandTemplate> {
        self.get(name).cloned()
    }
}

/// Structurally equal actions share one index.
#[derive(Debug, Default)]
pub(crate) struct ActionTable {
    actions: IndexSet<LexerAction>,
}

impl ActionTable {
    pub fn index_of(&mut self, action: LexerAction) -> usize {
        self.actions.insert_full(action).0
    }

    pub fn into_vec(self) -> Vec<LexerAction> {
        self.actions.into_iter().collect()
    }
}

enum Resolved {
    Action(LexerAction),
    Dropped,
    NotBuiltIn,
}

impl AtnFactory<'_> {
    /// Fragment for one command of a lexer alternative.
    pub(super) fn lexer_command(&mut self, command: &LexerCommand) -> Fragment {
        let range = command.span.range();
        self.check_command_compatibility(&command.name, range);
        match self.resolve_builtin(command, range) {
            Resolved::Action(action) => self.lexer_action(action),
            Resolved::Dropped => self.epsilon_fragment(),
            Resolved::NotBuiltIn => self.template_command(command, range),
        }
    }

    /// Incompatible and duplicated commands within one rule.
    fn check_command_compatibility(&mut self, name: &str, range: TextRange) {
        if name != "pushMode" && name != "popMode" {
            if self.rule_commands.contains(name) {
                self.diagnostics
                    .report(DiagnosticKind::DuplicatedCommand, range)
                    .arg(name)
                    .emit();
            }
            let conflicts: &[&str] = match name {
                "skip" => &["more", "type", "channel"],
                "more" => &["skip", "type", "channel"],
                "type" | "channel" => &["more", "skip"],
                _ => &[],
            };
            if let Some(first) = conflicts.iter().find(|c| self.rule_commands.contains(**c)) {
                self.diagnostics
                    .report(DiagnosticKind::IncompatibleCommands, range)
                    .arg(*first)
                    .arg(name)
                    .emit();
            }
        }
        self.rule_commands.insert(name.to_string());
    }

    fn resolve_builtin(&mut self, command: &LexerCommand, range: TextRange) -> Resolved {
        let name = command.name.as_str();
        let arg = command.arg.as_deref();
        let resolved = match (name, arg) {
            ("skip", None) => Ok(LexerAction::Skip),
            ("more", None) => Ok(LexerAction::More),
            ("popMode", None) => Ok(LexerAction::PopMode),
            ("mode", Some(arg)) => mode_constant(self.grammar, arg)
                .map(LexerAction::Mode)
                .ok_or(DiagnosticKind::ConstantValueIsNotARecognizedModeName),
            ("pushMode", Some(arg)) => mode_constant(self.grammar, arg)
                .map(LexerAction::PushMode)
                .ok_or(DiagnosticKind::ConstantValueIsNotARecognizedModeName),
            ("type", Some(arg)) => token_constant(self.grammar, arg)
                .map(LexerAction::Type)
                .ok_or(DiagnosticKind::ConstantValueIsNotARecognizedTokenName),
            ("channel", Some(arg)) => channel_constant(self.grammar, arg)
                .map(LexerAction::Channel)
                .ok_or(DiagnosticKind::ConstantValueIsNotARecognizedChannelName),
            ("skip" | "more" | "popMode", Some(_)) => {
                Err(DiagnosticKind::UnwantedLexerCommandArgument)
            }
            ("mode" | "pushMode" | "type" | "channel", None) => {
                Err(DiagnosticKind::MissingLexerCommandArgument)
            }
            _ => return Resolved::NotBuiltIn,
        };
        match resolved {
            Ok(action) => Resolved::Action(action),
            Err(kind) => {
                // arity errors quote the command, unresolved constants the argument
                let quoted = match kind {
                    DiagnosticKind::UnwantedLexerCommandArgument
                    | DiagnosticKind::MissingLexerCommandArgument => name,
                    _ => arg.unwrap_or(name),
                };
                self.diagnostics.report(kind, range).arg(quoted).emit();
                Resolved::Dropped
            }
        }
    }

    fn template_command(&mut self, command: &LexerCommand, range: TextRange) -> Fragment {
        let name = command.name.as_str();
        let Some(template) = self.templates.command(name) else {
            self.diagnostics
                .report(DiagnosticKind::InvalidLexerCommand, range)
                .arg(name)
                .emit();
            return self.epsilon_fragment();
        };
        let has_arg = command.arg.is_some();
        if has_arg != template.takes_arg() {
            let kind = if has_arg {
                DiagnosticKind::UnwantedLexerCommandArgument
            } else {
                DiagnosticKind::MissingLexerCommandArgument
            };
            self.diagnostics.report(kind, range).arg(name).emit();
            return self.epsilon_fragment();
        }
        let text = template.render(command.arg.as_deref());
        self.custom_action(text)
    }

    /// Custom action from `{...}` or a rendered command template.
    pub(super) fn custom_action(&mut self, text: String) -> Fragment {
        if text.trim().is_empty() {
            return self.epsilon_fragment();
        }
        let action_index = self.custom_actions.len();
        self.custom_actions.push(CustomAction {
            rule: self.current_rule,
            text,
        });
        self.lexer_action(LexerAction::Custom {
            rule: self.current_rule,
            action_index,
        })
    }

    fn lexer_action(&mut self, action: LexerAction) -> Fragment {
        let index = self.actions.index_of(action);
        self.leaf(TransitionKind::Action {
            rule: self.current_rule,
            action_index: index as i32,
            ctx_dependent: false,
        })
    }

    /// Declared modes, tokens and channels must not shadow the reserved
    /// constants.
    pub(super) fn check_reserved_names(&mut self) {
        let grammar = self.grammar;
        for (name, span) in &grammar.modes {
            if name != DEFAULT_MODE_NAME && is_common_constant(name) {
                self.diagnostics
                    .report(DiagnosticKind::ModeConflictsWithCommonConstants, span.range())
                    .arg(name)
                    .emit();
            }
        }
        for (name, declared) in &grammar.token_types {
            if name != "EOF" && is_common_constant(name) {
                let kind = DiagnosticKind::TokenConflictsWithCommonConstants;
                self.diagnostics
                    .report(kind, declared.span.range())
                    .arg(name)
                    .emit();
            }
        }
        for (name, declared) in &grammar.channels {
            if is_common_constant(name) {
                let kind = DiagnosticKind::ChannelConflictsWithCommonConstants;
                self.diagnostics
                    .report(kind, declared.span.range())
                    .arg(name)
                    .emit();
            }
        }
    }
}

pub(crate) fn mode_constant(grammar: &Grammar, name: &str) -> Option<i32> {
    if name == DEFAULT_MODE_NAME {
        return Some(DEFAULT_MODE);
    }
    common_constant(name)
        .or_else(|| grammar.mode_index(name).map(|index| index as i32))
        .or_else(|| name.parse().ok())
}

pub(crate) fn token_constant(grammar: &Grammar, name: &str) -> Option<i32> {
    if name == "EOF" {
        return Some(EOF);
    }
    common_constant(name)
        .or_else(|| grammar.token_type(name).filter(|ttype| *ttype != 0))
        .or_else(|| name.parse().ok())
}

pub(crate) fn channel_constant(grammar: &Grammar, name: &str) -> Option<i32> {
    match name {
        "HIDDEN" => return Some(HIDDEN),
        "DEFAULT_TOKEN_CHANNEL" => return Some(DEFAULT_TOKEN_CHANNEL),
        _ => {}
    }
    common_constant(name)
        .or_else(|| {
            grammar
                .channel_value(name)
                .filter(|value| *value >= MIN_USER_CHANNEL_VALUE)
        })
        .or_else(|| name.parse().ok())
}
