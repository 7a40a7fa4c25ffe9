//! Leading and trailing whitespace rule.

use crate::core::data::TranslationGroup;

pub fn leading_whitespace(text: &str) -> usize {
    text.chars().take_while(|c| c.is_whitespace()).count()
}

pub fn trailing_whitespace(text: &str) -> usize {
    text.chars().rev().take_while(|c| c.is_whitespace()).count()
}

fn whitespace_matches(value: &str, default: &str) -> bool {
    leading_whitespace(value) == leading_whitespace(default)
        && trailing_whitespace(value) == trailing_whitespace(default)
}

pub fn check_whitespace(group: &TranslationGroup) -> Vec<String> {
    let default = group.default_value();
    group
        .translated_values()
        .filter(|(_, value)| !whitespace_matches(value, default))
        .map(|(locale, _)| locale.to_string())
        .collect()
}

/// Pad with spaces or trim so `value` has the default's whitespace counts.
pub fn align_whitespace(value: &str, default: &str) -> String {
    let mut chars: Vec<char> = value.chars().collect();

    let (want, have) = (leading_whitespace(default), leading_whitespace(value));
    if want > have {
        chars.splice(0..0, std::iter::repeat_n(' ', want - have));
    } else {
        chars.drain(0..have - want);
    }

    let (want, have) = (trailing_whitespace(default), trailing_whitespace(&String::from_iter(&chars)));
    if want > have {
        chars.extend(std::iter::repeat_n(' ', want - have));
    } else {
        chars.truncate(chars.len() - (have - want));
    }

    chars.into_iter().collect()
}

/// Returns how many values changed.
pub fn fix_whitespace(group: &mut TranslationGroup) -> usize {
    let default = group.default_value().to_string();
    let flagged = check_whitespace(group);
    let mut fixed = 0;
    for locale in flagged {
        let Some(value) = group.values_mut().get_mut(&locale) else {
            continue;
        };
        let aligned = align_whitespace(value, &default);
        if aligned != *value {
            *value = aligned;
            fixed += 1;
        }
    }
    fixed
}
