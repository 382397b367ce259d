//! Rule bodies: blocks, alternatives and the elements inside them.
//!
//! Literal text is kept exactly as written (quotes and escapes included);
//! decoding happens during construction so errors can point at the source.

use serde::{Deserialize, Serialize};

use super::Span;
use super::quantifier::Quantifier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub alts: Vec<Alternative>,
    #[serde(default)]
    pub span: Span,
}

impl Block {
    pub fn new(alts: Vec<Alternative>) -> Self {
        Self {
            alts,
            span: Span::default(),
        }
    }

    /// Block with a single alternative.
    pub fn seq(elements: Vec<Element>) -> Self {
        Self::new(vec![Alternative::new(elements)])
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub elements: Vec<Element>,
    /// Lexer commands after `->`, in source order.
    #[serde(default)]
    pub commands: Vec<LexerCommand>,
    #[serde(default)]
    pub span: Span,
}

impl Alternative {
    pub fn new(elements: Vec<Element>) -> Self {
        Self {
            elements,
            commands: Vec::new(),
            span: Span::default(),
        }
    }

    pub fn command(mut self, command: LexerCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// An alternative made of a single `.`.
    pub fn is_bare_wildcard(&self) -> bool {
        matches!(self.elements.as_slice(), [e] if matches!(e.kind, ElementKind::Wildcard))
    }
}

/// `-> name` or `-> name(arg)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexerCommand {
    pub name: String,
    #[serde(default)]
    pub arg: Option<String>,
    #[serde(default)]
    pub span: Span,
}

impl LexerCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg: None,
            span: Span::default(),
        }
    }

    pub fn with_arg(name: impl Into<String>, arg: impl Into<String>) -> Self {
        Self {
            arg: Some(arg.into()),
            ..Self::new(name)
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// `ID`, or `EOF`.
    TokenRef(String),
    /// `'abc'`, quotes included.
    StringLiteral(String),
    /// `expr` or `expr<p=3>`.
    RuleRef {
        name: String,
        #[serde(default)]
        precedence: Option<i32>,
    },
    Wildcard,
    /// `'a'..'z'` in a lexer, `A..B` in a parser.
    Range { from: String, to: String },
    /// `(A | 'b' | 'c'..'f')` collapsed into a set.
    Set(Vec<SetElement>),
    /// `~x` or `~(...)`.
    NotSet(Vec<SetElement>),
    /// `[a-z\p{Lu}]`, brackets included.
    CharSet(String),
    /// `( ... )` with an optional quantifier.
    Block {
        block: Block,
        #[serde(default)]
        quantifier: Option<Quantifier>,
    },
    /// `{ ... }`, text without braces.
    Action(String),
    /// `{ ... }?` or `{ ... }?<p=2>`.
    Predicate {
        text: String,
        #[serde(default)]
        precedence: Option<i32>,
    },
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            span: Span::default(),
        }
    }

    pub fn token(name: impl Into<String>) -> Self {
        Self::new(ElementKind::TokenRef(name.into()))
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(ElementKind::StringLiteral(text.into()))
    }

    pub fn rule(name: impl Into<String>) -> Self {
        Self::new(ElementKind::RuleRef {
            name: name.into(),
            precedence: None,
        })
    }

    pub fn rule_with_precedence(name: impl Into<String>, precedence: i32) -> Self {
        Self::new(ElementKind::RuleRef {
            name: name.into(),
            precedence: Some(precedence),
        })
    }

    pub fn wildcard() -> Self {
        Self::new(ElementKind::Wildcard)
    }

    pub fn range(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(ElementKind::Range {
            from: from.into(),
            to: to.into(),
        })
    }

    pub fn set(elements: Vec<SetElement>) -> Self {
        Self::new(ElementKind::Set(elements))
    }

    pub fn not(elements: Vec<SetElement>) -> Self {
        Self::new(ElementKind::NotSet(elements))
    }

    pub fn char_set(text: impl Into<String>) -> Self {
        Self::new(ElementKind::CharSet(text.into()))
    }

    pub fn block(block: Block) -> Self {
        Self::new(ElementKind::Block {
            block,
            quantifier: None,
        })
    }

    pub fn quantified(block: Block, quantifier: Quantifier) -> Self {
        Self::new(ElementKind::Block {
            block,
            quantifier: Some(quantifier),
        })
    }

    pub fn action(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Action(text.into()))
    }

    pub fn predicate(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Predicate {
            text: text.into(),
            precedence: None,
        })
    }

    pub fn precedence_predicate(precedence: i32) -> Self {
        Self::new(ElementKind::Predicate {
            text: String::new(),
            precedence: Some(precedence),
        })
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// One member of a `Set`/`NotSet` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetElement {
    pub kind: SetElementKind,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetElementKind {
    TokenRef(String),
    StringLiteral(String),
    Range { from: String, to: String },
    CharSet(String),
}

impl SetElement {
    pub fn new(kind: SetElementKind) -> Self {
        Self {
            kind,
            span: Span::default(),
        }
    }

    pub fn token(name: impl Into<String>) -> Self {
        Self::new(SetElementKind::TokenRef(name.into()))
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(SetElementKind::StringLiteral(text.into()))
    }

    pub fn range(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(SetElementKind::Range {
            from: from.into(),
            to: to.into(),
        })
    }

    pub fn char_set(text: impl Into<String>) -> Self {
        Self::new(SetElementKind::CharSet(text.into()))
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Source spelling, used when a diagnostic quotes the whole set.
    pub fn text(&self) -> String {
        match &self.kind {
            SetElementKind::TokenRef(text)
            | SetElementKind::StringLiteral(text)
            | SetElementKind::CharSet(text) => text.clone(),
            SetElementKind::Range { from, to } => format!("{from}..{to}"),
        }
    }
}
