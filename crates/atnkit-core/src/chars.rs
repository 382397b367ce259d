//! Decoding of grammar literals.
//!
//! Grammar literals arrive as raw source text, quotes included. Everything
//! here works on Unicode code points (`char` slices), never on bytes, and
//! values are `i32` so they can share label space with `EOF`.

use crate::IntervalSet;
use crate::constants::{MAX_CHAR_VALUE, MIN_CHAR_VALUE};
use crate::unicode::property_code_points;

/// Value of a single-character escape (`\n`, `\r`, `\t`, `\b`, `\f`, `\\`).
pub fn escaped_char_value(escaped: char) -> Option<i32> {
    let value = match escaped {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'b' => '\u{8}',
        'f' => '\u{c}',
        '\\' => '\\',
        _ => return None,
    };
    Some(value as i32)
}

/// Parses hex digits, rejecting empty input, signs and values that do not
/// fit a code point.
pub fn parse_hex(digits: &str) -> Option<i32> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    i32::try_from(value).ok()
}

/// Code point of a quoted char literal such as `'a'`, `'\n'` or `'é'`.
pub fn char_value_from_literal(literal: &str) -> Option<i32> {
    let inner = strip_quotes(literal)?;
    char_value_from_char_in_literal(inner)
}

/// Code point of one (possibly escaped) character between literal quotes.
pub fn char_value_from_char_in_literal(text: &str) -> Option<i32> {
    let chars: Vec<char> = text.chars().collect();
    match chars.as_slice() {
        [c] => Some(*c as i32),
        ['\\', '\''] => Some('\'' as i32),
        ['\\', escaped] => escaped_char_value(*escaped),
        ['\\', 'u', '{', rest @ ..] => {
            let (close, digits) = rest.split_last()?;
            if *close != '}' {
                return None;
            }
            let digits: String = digits.iter().collect();
            parse_hex(&digits)
        }
        ['\\', 'u', digits @ ..] if digits.len() == 4 => {
            let digits: String = digits.iter().collect();
            parse_hex(&digits)
        }
        _ => None,
    }
}

/// Code points of a quoted string literal, or `None` when it contains an
/// invalid escape.
pub fn string_from_literal(literal: &str) -> Option<Vec<i32>> {
    let chars: Vec<char> = literal.chars().collect();
    if chars.len() < 2 {
        return None;
    }
    let n = chars.len() - 1;
    let mut out = Vec::new();
    let mut i = 1;
    while i < n {
        let mut end = i + 1;
        if chars[i] == '\\' {
            end = i + 2;
            if i + 1 < n && chars[i + 1] == 'u' {
                if i + 2 < n && chars[i + 2] == '{' {
                    end = i + 3;
                    loop {
                        if end + 1 > n {
                            return None;
                        }
                        let c = chars[end];
                        end += 1;
                        if c == '}' {
                            break;
                        }
                        if !c.is_ascii_hexdigit() {
                            return None;
                        }
                    }
                } else {
                    end = i + 6;
                    if end > n || !chars[i + 2..end].iter().all(char::is_ascii_hexdigit) {
                        return None;
                    }
                }
            }
        }
        if end > n {
            return None;
        }
        let piece: String = chars[i..end].iter().collect();
        out.push(char_value_from_char_in_literal(&piece)?);
        i = end;
    }
    Some(out)
}

fn strip_quotes(literal: &str) -> Option<&str> {
    let mut chars = literal.chars();
    chars.next()?;
    chars.next_back()?;
    let inner = chars.as_str();
    if inner.is_empty() { None } else { Some(inner) }
}

/// Result of decoding one escape inside a bracketed set literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscapeKind {
    Invalid,
    CodePoint(i32),
    Property(IntervalSet),
}

/// A decoded escape covering `chars[start..end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escape {
    pub kind: EscapeKind,
    pub start: usize,
    pub end: usize,
}

impl Escape {
    fn invalid(start: usize, last: usize) -> Self {
        Self {
            kind: EscapeKind::Invalid,
            start,
            end: last + 1,
        }
    }
}

/// Decodes the escape starting at `chars[start]` (which must be `\`).
///
/// Besides the literal escapes, sets accept `\]`, `\-`, `\uXXXX`,
/// `\u{X...}` and Unicode property escapes `\p{Name}` / `\P{Name}`. An
/// invalid escape still reports the span it was scanned over.
pub fn parse_escape(chars: &[char], start: usize) -> Escape {
    let len = chars.len();
    let last = len.saturating_sub(1);
    if start + 2 > len || chars[start] != '\\' {
        return Escape::invalid(start, last);
    }
    let escaped = chars[start + 1];
    let mut offset = start + 2;
    match escaped {
        'u' => {
            if offset + 3 > len {
                return Escape::invalid(start, last);
            }
            let (hex_start, hex_end) = if chars[offset] == '{' {
                let hex_start = offset + 1;
                let Some(close) = find(chars, '}', hex_start) else {
                    return Escape::invalid(start, last);
                };
                offset = close + 1;
                (hex_start, close)
            } else {
                if offset + 4 > len {
                    return Escape::invalid(start, last);
                }
                offset += 4;
                (offset - 4, offset)
            };
            let digits: String = chars[hex_start..hex_end].iter().collect();
            match parse_hex(&digits) {
                Some(value) if value <= MAX_CHAR_VALUE => Escape {
                    kind: EscapeKind::CodePoint(value),
                    start,
                    end: offset,
                },
                _ => Escape::invalid(start, (start + 5).min(last)),
            }
        }
        'p' | 'P' => {
            if offset + 3 > len {
                return Escape::invalid(start, last);
            }
            if chars[offset] != '{' {
                return Escape::invalid(start, offset);
            }
            let Some(close) = find(chars, '}', offset) else {
                return Escape::invalid(start, last);
            };
            let name: String = chars[offset + 1..close].iter().collect();
            let Some(mut set) = property_code_points(&name).filter(|s| !s.is_empty()) else {
                return Escape::invalid(start, close);
            };
            if escaped == 'P' {
                set = set.complement(MIN_CHAR_VALUE, MAX_CHAR_VALUE);
            }
            Escape {
                kind: EscapeKind::Property(set),
                start,
                end: close + 1,
            }
        }
        ']' | '-' => Escape {
            kind: EscapeKind::CodePoint(escaped as i32),
            start,
            end: offset,
        },
        _ => match escaped_char_value(escaped) {
            Some(value) => Escape {
                kind: EscapeKind::CodePoint(value),
                start,
                end: offset,
            },
            None => Escape::invalid(start, start + 1),
        },
    }
}

fn find(chars: &[char], needle: char, from: usize) -> Option<usize> {
    chars
        .get(from..)?
        .iter()
        .position(|c| *c == needle)
        .map(|p| p + from)
}

/// Quoted grammar spelling of a code point, for diagnostics.
pub fn char_literal(code_point: i32) -> String {
    if code_point < MIN_CHAR_VALUE {
        return "'<INVALID>'".to_string();
    }
    let body = match code_point {
        0x0A => "\\n".to_string(),
        0x0D => "\\r".to_string(),
        0x09 => "\\t".to_string(),
        0x08 => "\\b".to_string(),
        0x0C => "\\f".to_string(),
        0x5C => "\\\\".to_string(),
        0x27 => "\\'".to_string(),
        0x20..=0x7E => char::from_u32(code_point as u32)
            .map(String::from)
            .unwrap_or_default(),
        0..=0xFFFF => format!("\\u{code_point:04X}"),
        _ => format!("\\u{{{code_point:06X}}}"),
    };
    format!("'{body}'")
}

/// `'a'..'z'` for a range, `'a'` for a single code point.
pub fn range_literal(start: i32, end: i32) -> String {
    if start == end {
        char_literal(start)
    } else {
        format!("{}..{}", char_literal(start), char_literal(end))
    }
}

/// Every interval of `set` in grammar spelling, joined by ` | `.
pub fn set_literal(set: &IntervalSet) -> String {
    set.intervals()
        .iter()
        .map(|iv| range_literal(iv.start, iv.end))
        .collect::<Vec<_>>()
        .join(" | ")
}
