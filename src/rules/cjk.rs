//! CJK ratio rule.
//!
//! Flags non-CJK locales whose value is mostly CJK script, which usually means
//! a machine translation answered in the wrong language. Advisory only: it is
//! never auto-fixed and never blocks a write.

use crate::core::data::{TranslationGroup, escape::unescape_unicode};

pub const DEFAULT_CJK_THRESHOLD: f64 = 0.3;

const CJK_LANGUAGES: &[&str] = &["zh", "ja", "ko"];

pub fn is_cjk_locale(locale: &str) -> bool {
    let language = locale.split(['_', '-']).next().unwrap_or(locale);
    CJK_LANGUAGES.contains(&language.to_ascii_lowercase().as_str())
}

pub fn is_cjk_char(c: char) -> bool {
    matches!(c as u32,
        0x3040..=0x30FF      // kana
        | 0x3400..=0x4DBF    // CJK extension A
        | 0x4E00..=0x9FFF    // CJK unified ideographs
        | 0xAC00..=0xD7AF    // hangul syllables
        | 0xF900..=0xFAFF    // compatibility ideographs
        | 0x20000..=0x2A6DF) // extension B
}

/// Share of CJK characters among the non-whitespace characters of `text`.
pub fn cjk_ratio(text: &str) -> f64 {
    let decoded = unescape_unicode(text);
    let (total, cjk) = decoded
        .chars()
        .filter(|c| !c.is_whitespace())
        .fold((0usize, 0usize), |(total, cjk), c| {
            (total + 1, cjk + usize::from(is_cjk_char(c)))
        });
    if total == 0 {
        0.0
    } else {
        cjk as f64 / total as f64
    }
}

pub fn check_cjk_ratio(group: &TranslationGroup, threshold: f64) -> Vec<String> {
    group
        .translated_values()
        .filter(|(locale, _)| !is_cjk_locale(locale))
        .filter(|(_, value)| {
            let ratio = cjk_ratio(value);
            ratio > 0.0 && ratio >= threshold
        })
        .map(|(locale, _)| locale.to_string())
        .collect()
}
