//! Runtime constants baked into generated recognizers.
//!
//! Token types and channels share one integer space with the lexer's
//! control values, so a few names are reserved and cannot be redeclared.

/// End of input.
pub const EOF: i32 = -1;

/// Label used by first-set analysis to mark "reached the stop state
/// without consuming anything".
pub const EPSILON: i32 = -2;

/// Token type of an unresolved symbol.
pub const INVALID_TYPE: i32 = 0;

pub const MIN_USER_TOKEN_TYPE: i32 = 1;

pub const DEFAULT_MODE: i32 = 0;
pub const DEFAULT_MODE_NAME: &str = "DEFAULT_MODE";

pub const DEFAULT_TOKEN_CHANNEL: i32 = 0;
pub const HIDDEN: i32 = 1;

/// Channels below this value are predefined.
pub const MIN_USER_CHANNEL_VALUE: i32 = 2;

pub const SKIP: i32 = -3;
pub const MORE: i32 = -2;

pub const MIN_CHAR_VALUE: i32 = 0;
pub const MAX_CHAR_VALUE: i32 = 0x10FFFF;

/// Names usable as lexer command arguments in any grammar.
pub const COMMON_CONSTANTS: &[(&str, i32)] = &[
    ("HIDDEN", HIDDEN),
    ("DEFAULT_TOKEN_CHANNEL", DEFAULT_TOKEN_CHANNEL),
    ("DEFAULT_MODE", DEFAULT_MODE),
    ("SKIP", SKIP),
    ("MORE", MORE),
    ("EOF", EOF),
    ("MAX_CHAR_VALUE", MAX_CHAR_VALUE),
    ("MIN_CHAR_VALUE", MIN_CHAR_VALUE),
];

pub fn common_constant(name: &str) -> Option<i32> {
    COMMON_CONSTANTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| *v)
}

pub fn is_common_constant(name: &str) -> bool {
    common_constant(name).is_some()
}
