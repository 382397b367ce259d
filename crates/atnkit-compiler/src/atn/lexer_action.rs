//! Lexer actions executed when a token is accepted.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexerAction {
    Channel(i32),
    Custom { rule: usize, action_index: usize },
    Mode(i32),
    More,
    PopMode,
    PushMode(i32),
    Skip,
    Type(i32),
}

impl LexerAction {
    /// Serialized action type.
    pub fn action_type(&self) -> i32 {
        match self {
            Self::Channel(_) => 0,
            Self::Custom { .. } => 1,
            Self::Mode(_) => 2,
            Self::More => 3,
            Self::PopMode => 4,
            Self::PushMode(_) => 5,
            Self::Skip => 6,
            Self::Type(_) => 7,
        }
    }

    /// The two serialized operands.
    pub fn operands(&self) -> (i32, i32) {
        match *self {
            Self::Channel(value) | Self::Mode(value) | Self::PushMode(value) | Self::Type(value) => {
                (value, 0)
            }
            Self::Custom { rule, action_index } => (rule as i32, action_index as i32),
            Self::More | Self::PopMode | Self::Skip => (0, 0),
        }
    }
}

impl fmt::Display for LexerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(value) => write!(f, "channel({value})"),
            Self::Custom { rule, action_index } => write!(f, "custom({rule}, {action_index})"),
            Self::Mode(value) => write!(f, "mode({value})"),
            Self::More => write!(f, "more"),
            Self::PopMode => write!(f, "popMode"),
            Self::PushMode(value) => write!(f, "pushMode({value})"),
            Self::Skip => write!(f, "skip"),
            Self::Type(value) => write!(f, "type({value})"),
        }
    }
}

/// Source text of a custom lexer action, stored at its action index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomAction {
    pub rule: usize,
    pub text: String,
}
