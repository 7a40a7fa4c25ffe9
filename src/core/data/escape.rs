//! Conversions between raw UTF-8 text and `\uXXXX` escape sequences.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static UNICODE_ESCAPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\u([0-9a-fA-F]{4})|\\U([0-9a-fA-F]{8})").unwrap());

/// Whether `c` is allowed unescaped in a gettext value.
///
/// Printable 7-bit ASCII plus tab; newlines are handled by the newline rule.
pub fn is_plain_ascii(c: char) -> bool {
    matches!(c, ' '..='~' | '\t' | '\n' | '\r')
}

/// Replace every character outside printable ASCII with an escape sequence.
pub fn escape_unicode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if is_plain_ascii(c) {
            out.push(c);
        } else if (c as u32) <= 0xFFFF {
            out.push_str(&format!("\\u{:04x}", c as u32));
        } else {
            out.push_str(&format!("\\U{:08x}", c as u32));
        }
    }
    out
}

/// Decode `\uXXXX` and `\UXXXXXXXX` sequences; invalid code points stay escaped.
pub fn unescape_unicode(text: &str) -> String {
    UNICODE_ESCAPE_REGEX
        .replace_all(text, |caps: &Captures| {
            let hex = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub fn contains_unicode_escape(text: &str) -> bool {
    UNICODE_ESCAPE_REGEX.is_match(text)
}
