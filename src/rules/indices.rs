//! Positional placeholder rule.
//!
//! When the default value uses `{0}`, `{1}`, ... every translation must use
//! exactly the same set of indices.

use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

use crate::core::data::TranslationGroup;

static INDEX_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(\d+)\}").unwrap());

/// Distinct placeholder indices in `text`.
pub fn placeholder_indices(text: &str) -> BTreeSet<u32> {
    INDEX_REGEX
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}

/// Translated locales whose placeholder set differs from the default's.
///
/// # Arguments
/// * `group` - The group to check; the default value decides whether the rule applies
///
/// # Returns
/// Sorted locale codes, empty when the default value has no placeholders
pub fn check_format_indices(group: &TranslationGroup) -> Vec<String> {
    let expected = placeholder_indices(group.default_value());
    if expected.is_empty() {
        return Vec::new();
    }

    group
        .translated_values()
        .filter(|(_, value)| placeholder_indices(value) != expected)
        .map(|(locale, _)| locale.to_string())
        .collect()
}
