use crate::IntervalSet;
use crate::chars::{
    EscapeKind, char_literal, char_value_from_literal, parse_escape, parse_hex, set_literal,
    string_from_literal,
};

fn escape(text: &str) -> (EscapeKind, usize, usize) {
    let chars: Vec<char> = text.chars().collect();
    let e = parse_escape(&chars, 0);
    (e.kind, e.start, e.end)
}

#[test]
fn char_literal_values() {
    assert_eq!(char_value_from_literal("'a'"), Some('a' as i32));
    assert_eq!(char_value_from_literal("'\\n'"), Some('\n' as i32));
    assert_eq!(char_value_from_literal("'\\''"), Some('\'' as i32));
    assert_eq!(char_value_from_literal("'\\u00E9'"), Some(0xE9));
    assert_eq!(char_value_from_literal("'\\u{1F600}'"), Some(0x1F600));
    assert_eq!(char_value_from_literal("'😀'"), Some(0x1F600));
}

#[test]
fn char_literal_rejects() {
    assert_eq!(char_value_from_literal("'ab'"), None);
    assert_eq!(char_value_from_literal("''"), None);
    assert_eq!(char_value_from_literal("'\\q'"), None);
    assert_eq!(char_value_from_literal("'\\u00G9'"), None);
    assert_eq!(char_value_from_literal("'\\u{}'"), None);
}

#[test]
fn string_literal_code_points() {
    assert_eq!(
        string_from_literal("'a\\tb'"),
        Some(vec!['a' as i32, '\t' as i32, 'b' as i32])
    );
    assert_eq!(
        string_from_literal("'\\u0041\\u{42}'"),
        Some(vec![0x41, 0x42])
    );
    assert_eq!(string_from_literal("''"), Some(vec![]));
}

#[test]
fn string_literal_invalid_escapes() {
    assert_eq!(string_from_literal("'\\x'"), None);
    assert_eq!(string_from_literal("'\\u12'"), None);
    assert_eq!(string_from_literal("'\\u{12'"), None);
    assert_eq!(string_from_literal("'\\'"), None);
}

#[test]
fn hex() {
    assert_eq!(parse_hex("10FFFF"), Some(0x10FFFF));
    assert_eq!(parse_hex(""), None);
    assert_eq!(parse_hex("+1"), None);
    assert_eq!(parse_hex("FFFFFFFFF"), None);
}

#[test]
fn escape_code_points() {
    assert_eq!(escape("\\n"), (EscapeKind::CodePoint('\n' as i32), 0, 2));
    assert_eq!(escape("\\]"), (EscapeKind::CodePoint(']' as i32), 0, 2));
    assert_eq!(escape("\\-x"), (EscapeKind::CodePoint('-' as i32), 0, 2));
    assert_eq!(escape("\\u0061z"), (EscapeKind::CodePoint('a' as i32), 0, 6));
    assert_eq!(escape("\\u{1F600}"), (EscapeKind::CodePoint(0x1F600), 0, 9));
}

#[test]
fn escape_invalid() {
    assert_eq!(escape("\\q"), (EscapeKind::Invalid, 0, 2));
    assert_eq!(escape("\\u{110000}"), (EscapeKind::Invalid, 0, 6));
    assert_eq!(escape("\\u{12"), (EscapeKind::Invalid, 0, 5));
    assert_eq!(escape("\\p{Bogus}"), (EscapeKind::Invalid, 0, 9));
    assert_eq!(escape("\\"), (EscapeKind::Invalid, 0, 1));
}

#[test]
fn escape_properties() {
    let (kind, _, end) = escape("\\p{Lu}");
    let EscapeKind::Property(upper) = kind else {
        panic!("expected property");
    };
    assert_eq!(end, 6);
    assert!(upper.contains('A' as i32));

    let (kind, _, _) = escape("\\P{Lu}");
    let EscapeKind::Property(not_upper) = kind else {
        panic!("expected property");
    };
    assert!(!not_upper.contains('A' as i32));
    assert!(not_upper.contains('a' as i32));
    assert!(not_upper.contains(0x10FFFF));
}

#[test]
fn literal_spelling() {
    assert_eq!(char_literal('a' as i32), "'a'");
    assert_eq!(char_literal('\n' as i32), "'\\n'");
    assert_eq!(char_literal('\'' as i32), "'\\''");
    assert_eq!(char_literal(0xE9), "'\\u00E9'");
    assert_eq!(char_literal(0x1F600), "'\\u{01F600}'");
    assert_eq!(char_literal(-1), "'<INVALID>'");

    let mut set = IntervalSet::range('a' as i32, 'f' as i32);
    set.add('x' as i32);
    assert_eq!(set_literal(&set), "'a'..'f' | 'x'");
}
