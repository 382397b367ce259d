//! Grammar input model.
//!
//! This is the hand-off format from the grammar front end: rules are
//! already parsed and semantically checked, token types and channels are
//! resolved, and every node keeps the span of its source text. All types
//! (de)serialize with serde so a front end in another process can feed the
//! builder through JSON.

mod element;
mod quantifier;


use atnkit_core::constants::DEFAULT_MODE_NAME;
use indexmap::IndexMap;
use rowan::TextRange;
use serde::{Deserialize, Serialize};

pub use element::{
    Alternative, Block, Element, ElementKind, LexerCommand, SetElement, SetElementKind,
};
pub use quantifier::{Quantifier, QuantifierKind};

/// Byte range into the grammar source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn range(self) -> TextRange {
        TextRange::new(self.start.into(), self.end.max(self.start).into())
    }
}

impl From<Span> for TextRange {
    fn from(span: Span) -> Self {
        span.range()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarKind {
    Lexer,
    Parser,
}

/// A declared name bound to an integer (token type or channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declared {
    pub value: i32,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GrammarFields")]
pub struct Grammar {
    pub name: String,
    pub kind: GrammarKind,
    pub file_name: Option<String>,
    pub rules: Vec<Rule>,
    /// Token names and string literals (quoted) to token types.
    pub token_types: IndexMap<String, Declared>,
    /// User channels; values start at 2.
    pub channels: IndexMap<String, Declared>,
    /// Lexer modes in declaration order; the position is the mode number.
    pub modes: IndexMap<String, Span>,
}

/// Serialized shape of `Grammar`. Lexers always end up with
/// `DEFAULT_MODE` as mode 0, whether or not the input lists it.
#[derive(Deserialize)]
struct GrammarFields {
    name: String,
    kind: GrammarKind,
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default)]
    rules: Vec<Rule>,
    #[serde(default)]
    token_types: IndexMap<String, Declared>,
    #[serde(default)]
    channels: IndexMap<String, Declared>,
    #[serde(default)]
    modes: IndexMap<String, Span>,
}

impl From<GrammarFields> for Grammar {
    fn from(fields: GrammarFields) -> Self {
        let mut modes = fields.modes;
        if fields.kind == GrammarKind::Lexer && !modes.contains_key(DEFAULT_MODE_NAME) {
            modes.shift_insert(0, DEFAULT_MODE_NAME.to_string(), Span::default());
        }
        Self {
            name: fields.name,
            kind: fields.kind,
            file_name: fields.file_name,
            rules: fields.rules,
            token_types: fields.token_types,
            channels: fields.channels,
            modes,
        }
    }
}

impl Grammar {
    pub fn new(name: impl Into<String>, kind: GrammarKind) -> Self {
        let mut modes = IndexMap::new();
        if kind == GrammarKind::Lexer {
            modes.insert(DEFAULT_MODE_NAME.to_string(), Span::default());
        }
        Self {
            name: name.into(),
            kind,
            file_name: None,
            rules: Vec::new(),
            token_types: IndexMap::new(),
            channels: IndexMap::new(),
            modes,
        }
    }

    pub fn parser(name: impl Into<String>) -> Self {
        Self::new(name, GrammarKind::Parser)
    }

    pub fn lexer(name: impl Into<String>) -> Self {
        Self::new(name, GrammarKind::Lexer)
    }

    pub fn is_lexer(&self) -> bool {
        self.kind == GrammarKind::Lexer
    }

    pub fn file(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Appends a rule, assigning the next rule index.
    pub fn rule(mut self, mut rule: Rule) -> Self {
        rule.index = self.rules.len();
        self.rules.push(rule);
        self
    }

    pub fn token(mut self, name: impl Into<String>, value: i32) -> Self {
        self.token_types.insert(
            name.into(),
            Declared {
                value,
                span: Span::default(),
            },
        );
        self
    }

    pub fn channel(mut self, name: impl Into<String>, value: i32) -> Self {
        self.channels.insert(
            name.into(),
            Declared {
                value,
                span: Span::default(),
            },
        );
        self
    }

    pub fn mode(mut self, name: impl Into<String>) -> Self {
        self.modes.insert(name.into(), Span::default());
        self
    }

    pub fn rule_index(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.name == name)
    }

    pub fn token_type(&self, name: &str) -> Option<i32> {
        self.token_types.get(name).map(|d| d.value)
    }

    pub fn channel_value(&self, name: &str) -> Option<i32> {
        self.channels.get(name).map(|d| d.value)
    }

    pub fn mode_index(&self, name: &str) -> Option<usize> {
        self.modes.get_index_of(name)
    }

    /// Highest declared token type, at least 0.
    pub fn max_token_type(&self) -> i32 {
        self.token_types
            .values()
            .map(|d| d.value)
            .max()
            .unwrap_or(0)
            .max(0)
    }

    /// Rules of `mode` in rule order.
    pub fn rules_in_mode<'a>(&'a self, mode: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |r| r.mode == mode)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    #[serde(default)]
    pub index: usize,
    pub body: Block,
    #[serde(default)]
    pub left_recursive: bool,
    #[serde(default)]
    pub fragment: bool,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub case_insensitive: bool,
    /// Span of the rule name.
    #[serde(default)]
    pub span: Span,
}

fn default_mode() -> String {
    DEFAULT_MODE_NAME.to_string()
}

impl Rule {
    pub fn new(name: impl Into<String>, body: Block) -> Self {
        Self {
            name: name.into(),
            index: 0,
            body,
            left_recursive: false,
            fragment: false,
            mode: default_mode(),
            case_insensitive: false,
            span: Span::default(),
        }
    }

    pub fn left_recursive(mut self) -> Self {
        self.left_recursive = true;
        self
    }

    pub fn fragment(mut self) -> Self {
        self.fragment = true;
        self
    }

    pub fn in_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Lexer rule names start with an uppercase letter.
    pub fn is_lexer_rule(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}
