//! Quantifier kinds applied to sub-blocks.

use serde::{Deserialize, Serialize};

/// The three quantifier shapes. Greediness is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantifierKind {
    /// `?` or `??` - zero or one.
    Optional,
    /// `*` or `*?` - zero or more.
    ZeroOrMore,
    /// `+` or `+?` - one or more.
    OneOrMore,
}

impl QuantifierKind {
    /// Whether the construct loops back into its block.
    pub fn is_loop(self) -> bool {
        matches!(self, Self::ZeroOrMore | Self::OneOrMore)
    }

    /// Whether this quantifier can match zero times.
    pub fn can_be_empty(self) -> bool {
        matches!(self, Self::Optional | Self::ZeroOrMore)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quantifier {
    pub kind: QuantifierKind,
    #[serde(default = "greedy_default")]
    pub greedy: bool,
}

fn greedy_default() -> bool {
    true
}

impl Quantifier {
    pub fn optional() -> Self {
        Self::greedy(QuantifierKind::Optional)
    }

    pub fn star() -> Self {
        Self::greedy(QuantifierKind::ZeroOrMore)
    }

    pub fn plus() -> Self {
        Self::greedy(QuantifierKind::OneOrMore)
    }

    fn greedy(kind: QuantifierKind) -> Self {
        Self { kind, greedy: true }
    }

    pub fn non_greedy(self) -> Self {
        Self {
            greedy: false,
            ..self
        }
    }

    /// Source spelling: `?`, `*?`, `+`, ...
    pub fn suffix(self) -> &'static str {
        match (self.kind, self.greedy) {
            (QuantifierKind::Optional, true) => "?",
            (QuantifierKind::Optional, false) => "??",
            (QuantifierKind::ZeroOrMore, true) => "*",
            (QuantifierKind::ZeroOrMore, false) => "*?",
            (QuantifierKind::OneOrMore, true) => "+",
            (QuantifierKind::OneOrMore, false) => "+?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_loop() {
        assert!(!QuantifierKind::Optional.is_loop());
        assert!(QuantifierKind::ZeroOrMore.is_loop());
        assert!(QuantifierKind::OneOrMore.is_loop());
    }

    #[test]
    fn can_be_empty() {
        assert!(QuantifierKind::Optional.can_be_empty());
        assert!(QuantifierKind::ZeroOrMore.can_be_empty());
        assert!(!QuantifierKind::OneOrMore.can_be_empty());
    }

    #[test]
    fn suffix() {
        assert_eq!(Quantifier::star().suffix(), "*");
        assert_eq!(Quantifier::plus().non_greedy().suffix(), "+?");
        assert_eq!(Quantifier::optional().non_greedy().suffix(), "??");
    }
}
