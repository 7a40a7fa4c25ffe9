//! Newline rule.
//!
//! Escaped catalogs must spell line breaks as `\n` escapes; decoded catalogs
//! must hold real line breaks. In both, a translation must break lines as
//! often as the default value does.

use super::EncodingPolicy;
use crate::core::data::TranslationGroup;

const ESCAPED_NEWLINE: &str = "\\n";

fn newline_count(text: &str) -> usize {
    text.matches(ESCAPED_NEWLINE).count() + text.matches('\n').count()
}

fn has_wrong_form(text: &str, policy: EncodingPolicy) -> bool {
    match policy {
        EncodingPolicy::Escaped => text.contains('\n'),
        EncodingPolicy::Literal => text.contains(ESCAPED_NEWLINE),
    }
}

/// Held locales with wrongly encoded newlines, or a different number of
/// line breaks than the default value.
pub fn check_newlines(group: &TranslationGroup, policy: EncodingPolicy) -> Vec<String> {
    let default_locale = group.default_locale();
    let expected = newline_count(group.default_value());
    group
        .values()
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .filter(|(locale, value)| {
            has_wrong_form(value, policy)
                || (*locale != default_locale && newline_count(value) != expected)
        })
        .map(|(locale, _)| locale.clone())
        .collect()
}

/// Convert newlines into the policy's form. Returns how many values changed.
pub fn fix_newlines(group: &mut TranslationGroup, policy: EncodingPolicy) -> usize {
    let mut fixed = 0;
    for value in group.values_mut().values_mut() {
        if !has_wrong_form(value, policy) {
            continue;
        }
        *value = match policy {
            EncodingPolicy::Escaped => value.replace("\r\n", "\n").replace('\n', ESCAPED_NEWLINE),
            EncodingPolicy::Literal => value.replace(ESCAPED_NEWLINE, "\n"),
        };
        fixed += 1;
    }
    fixed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::TranslationKey;
    use pretty_assertions::assert_eq;

    fn group(default: &str, values: &[(&str, &str)]) -> TranslationGroup {
        let mut group = TranslationGroup::new(TranslationKey::new("k"), "en", true);
        group.add("en", default);
        for (locale, value) in values {
            group.add(locale, *value);
        }
        group
    }

    #[test]
    fn test_escaped_policy_flags_raw_newline() {
        let group = group("Line one\\nLine two", &[("fr", "Ligne un\nLigne deux")]);
        assert_eq!(check_newlines(&group, EncodingPolicy::Escaped), vec!["fr"]);
    }

    #[test]
    fn test_count_mismatch_is_flagged() {
        let group = group("One\\nTwo", &[("fr", "Un Deux"), ("de", "Eins\\nZwei")]);
        assert_eq!(check_newlines(&group, EncodingPolicy::Escaped), vec!["fr"]);
    }

    #[test]
    fn test_fix_escaped() {
        let mut group = group("One\\nTwo", &[("fr", "Un\nDeux")]);
        assert_eq!(fix_newlines(&mut group, EncodingPolicy::Escaped), 1);
        assert_eq!(group.get("fr"), "Un\\nDeux");
        assert!(check_newlines(&group, EncodingPolicy::Escaped).is_empty());
        assert_eq!(fix_newlines(&mut group, EncodingPolicy::Escaped), 0);
    }

    #[test]
    fn test_fix_literal() {
        let mut group = group("One\nTwo", &[("fr", "Un\\nDeux")]);
        assert_eq!(check_newlines(&group, EncodingPolicy::Literal), vec!["fr"]);
        fix_newlines(&mut group, EncodingPolicy::Literal);
        assert_eq!(group.get("fr"), "Un\nDeux");
        assert!(check_newlines(&group, EncodingPolicy::Literal).is_empty());
    }
}
