//! Attribute references inside action and predicate text.
//!
//! A predicate that reads `$x`, `$x.y` or `$x::y` depends on the rule
//! context it runs in. Comments, string and char literals, and escaped
//! dollars are skipped.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum ActionToken {
    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    #[regex(r"'(?:[^'\\]|\\.)*'")]
    StringLiteral,

    #[regex(r"\\.")]
    Escape,

    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_]*")]
    Attribute,

    #[regex(r#"[^$/'"\\]+"#)]
    Text,
}

/// True when `text` references at least one attribute.
pub(crate) fn is_context_dependent(text: &str) -> bool {
    ActionToken::lexer(text).any(|token| token == Ok(ActionToken::Attribute))
}
