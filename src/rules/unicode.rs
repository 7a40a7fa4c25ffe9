//! Unicode encoding rule.
//!
//! Escaped catalogs must only hold printable ASCII; decoded catalogs must not
//! hold literal `\uXXXX` sequences.

use super::EncodingPolicy;
use crate::core::data::{
    TranslationGroup,
    escape::{contains_unicode_escape, escape_unicode, is_plain_ascii, unescape_unicode},
};

pub fn is_invalid_unicode(value: &str, policy: EncodingPolicy) -> bool {
    match policy {
        EncodingPolicy::Escaped => !value.chars().all(is_plain_ascii),
        EncodingPolicy::Literal => contains_unicode_escape(value),
    }
}

/// Held locales whose value is wrongly encoded.
pub fn check_unicode(group: &TranslationGroup, policy: EncodingPolicy) -> Vec<String> {
    group
        .values()
        .iter()
        .filter(|(_, value)| is_invalid_unicode(value, policy))
        .map(|(locale, _)| locale.clone())
        .collect()
}

/// Re-encode the flagged locales. Returns how many values changed.
pub fn fix_unicode(group: &mut TranslationGroup, policy: EncodingPolicy) -> usize {
    let mut fixed = 0;
    for value in group.values_mut().values_mut() {
        if !is_invalid_unicode(value, policy) {
            continue;
        }
        let encoded = match policy {
            EncodingPolicy::Escaped => escape_unicode(value),
            EncodingPolicy::Literal => unescape_unicode(value),
        };
        if encoded != *value {
            *value = encoded;
            fixed += 1;
        }
    }
    fixed
}
