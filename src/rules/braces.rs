//! Bracket rule.
//!
//! Parentheses must balance within each translation (a full-width `）` closes
//! too). Square, angle and curly brackets must appear as often as in the
//! default value.

use crate::core::data::TranslationGroup;

const COUNTED_PAIRS: [(char, char); 3] = [('[', ']'), ('<', '>'), ('{', '}')];

fn count(text: &str, c: char) -> usize {
    text.chars().filter(|&ch| ch == c).count()
}

fn parens_balanced(text: &str) -> bool {
    count(text, '(') + count(text, '（') == count(text, ')') + count(text, '）')
}

pub fn has_brace_mismatch(value: &str, default: &str) -> bool {
    if !parens_balanced(value) {
        return true;
    }
    COUNTED_PAIRS.iter().any(|&(open, close)| {
        count(value, open) != count(default, open) || count(value, close) != count(default, close)
    })
}

pub fn check_braces(group: &TranslationGroup) -> Vec<String> {
    let default = group.default_value();
    group
        .translated_values()
        .filter(|(_, value)| has_brace_mismatch(value, default))
        .map(|(locale, _)| locale.to_string())
        .collect()
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
    fn test_unbalanced_parens() {
        let group = group("Files (all)", &[("fr", "Fichiers (tous"), ("de", "Dateien (alle)")]);
        assert_eq!(check_braces(&group), vec!["fr"]);
    }

    #[test]
    fn test_fullwidth_close_paren_balances() {
        let group = group("Files (all)", &[("zh", "文件（全部）"), ("ja", "ファイル(すべて）")]);
        assert!(check_braces(&group).is_empty());
    }

    #[test]
    fn test_curly_count_must_match_default() {
        let group = group("Hi {name}", &[("fr", "Salut name}"), ("de", "Hallo {name}")]);
        assert_eq!(check_braces(&group), vec!["fr"]);
    }

    #[test]
    fn test_angle_and_square_counts() {
        let group = group("<b>[x]</b>", &[("fr", "<b>[x]</b>"), ("de", "<b>x</b>")]);
        assert_eq!(check_braces(&group), vec!["de"]);
    }
}
