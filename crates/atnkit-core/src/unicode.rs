//! Unicode property tables and simple case mapping.
//!
//! Property lookup reuses `regex-syntax`'s Unicode tables: `\p{Name}` is
//! parsed as a regex class and its ranges are copied out. This covers
//! general categories, scripts, binary properties and the `gc=`/`sc=`/
//! `Script=`/`General_Category=` prefixed forms.

use regex_syntax::hir::{Class, HirKind};

use crate::IntervalSet;

/// Code points having the Unicode property `name`, or `None` when the
/// property is unknown.
pub fn property_code_points(name: &str) -> Option<IntervalSet> {
    if name.is_empty() || name.contains(['{', '}', '\\']) {
        return None;
    }
    let pattern = format!("\\p{{{name}}}");
    let hir = regex_syntax::ParserBuilder::new()
        .build()
        .parse(&pattern)
        .ok()?;
    let HirKind::Class(Class::Unicode(class)) = hir.kind() else {
        return None;
    };
    let mut set = IntervalSet::new();
    for range in class.ranges() {
        set.add_range(range.start() as i32, range.end() as i32);
    }
    Some(set)
}

/// Simple lowercase mapping. Code points without a one-to-one mapping map
/// to themselves.
pub fn to_lower(code_point: i32) -> i32 {
    map_single(code_point, |c| c.to_lowercase().collect())
}

/// Simple uppercase mapping. Code points without a one-to-one mapping map
/// to themselves.
pub fn to_upper(code_point: i32) -> i32 {
    map_single(code_point, |c| c.to_uppercase().collect())
}

pub fn is_alphabetic(code_point: i32) -> bool {
    as_char(code_point).is_some_and(char::is_alphabetic)
}

pub fn is_lowercase(code_point: i32) -> bool {
    as_char(code_point).is_some_and(char::is_lowercase)
}

fn map_single(code_point: i32, map: impl Fn(char) -> Vec<char>) -> i32 {
    let Some(c) = as_char(code_point) else {
        return code_point;
    };
    match map(c).as_slice() {
        [single] => *single as i32,
        _ => code_point,
    }
}

fn as_char(code_point: i32) -> Option<char> {
    u32::try_from(code_point).ok().and_then(char::from_u32)
}
