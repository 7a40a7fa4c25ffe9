//! Aggregated defect groupings for a whole translation map.
//!
//! Groupings are always computed from the live map; nothing is cached.

use std::{collections::BTreeMap, fmt};

use super::{
    EncodingPolicy,
    braces::check_braces,
    cjk::{DEFAULT_CJK_THRESHOLD, check_cjk_ratio},
    indices::check_format_indices,
    newline::{check_newlines, fix_newlines},
    unicode::{check_unicode, fix_unicode},
    whitespace::{check_whitespace, fix_whitespace},
};
use crate::core::data::{TranslationKey, TranslationMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DefectKind {
    NotInBase,
    Missing,
    InvalidUnicode,
    InvalidFormatIndices,
    InvalidBraces,
    InvalidWhitespace,
    InvalidNewline,
    InvalidCjkRatio,
}

impl DefectKind {
    pub const ALL: [DefectKind; 8] = [
        DefectKind::NotInBase,
        DefectKind::Missing,
        DefectKind::InvalidUnicode,
        DefectKind::InvalidFormatIndices,
        DefectKind::InvalidBraces,
        DefectKind::InvalidWhitespace,
        DefectKind::InvalidNewline,
        DefectKind::InvalidCjkRatio,
    ];

    /// Whether the write pass corrects this defect automatically.
    pub fn is_fixable(self) -> bool {
        matches!(
            self,
            DefectKind::InvalidUnicode | DefectKind::InvalidWhitespace | DefectKind::InvalidNewline
        )
    }

    /// Advisory defects are reported but never count as errors.
    pub fn is_advisory(self) -> bool {
        matches!(self, DefectKind::InvalidCjkRatio)
    }

    pub fn description(self) -> &'static str {
        match self {
            DefectKind::NotInBase => "keys not in base catalog",
            DefectKind::Missing => "missing translations",
            DefectKind::InvalidUnicode => "invalid unicode encoding",
            DefectKind::InvalidFormatIndices => "mismatched format indices",
            DefectKind::InvalidBraces => "unbalanced braces",
            DefectKind::InvalidWhitespace => "leading/trailing whitespace",
            DefectKind::InvalidNewline => "invalid newlines",
            DefectKind::InvalidCjkRatio => "unexpected CJK text",
        }
    }
}

impl fmt::Display for DefectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DefectKind::NotInBase => "not-in-base",
            DefectKind::Missing => "missing",
            DefectKind::InvalidUnicode => "invalid-unicode",
            DefectKind::InvalidFormatIndices => "invalid-format-indices",
            DefectKind::InvalidBraces => "invalid-braces",
            DefectKind::InvalidWhitespace => "invalid-whitespace",
            DefectKind::InvalidNewline => "invalid-newline",
            DefectKind::InvalidCjkRatio => "invalid-cjk-ratio",
        };
        f.write_str(name)
    }
}

/// One key and the locales affected by a defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDefect {
    pub key: TranslationKey,
    pub locales: Vec<String>,
}

/// Inputs that shape defect detection for one project.
#[derive(Debug, Clone)]
pub struct DefectOptions {
    pub policy: EncodingPolicy,
    pub cjk_threshold: f64,
    /// Non-default locales every base key is expected in.
    pub expected_locales: Vec<String>,
    /// Stale keys are only reported while some locale is still unwritten.
    pub report_not_in_base: bool,
}

impl DefectOptions {
    pub fn new(policy: EncodingPolicy, expected_locales: Vec<String>) -> Self {
        Self {
            policy,
            cjk_threshold: DEFAULT_CJK_THRESHOLD,
            expected_locales,
            report_not_in_base: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefectGroups {
    groups: BTreeMap<DefectKind, Vec<KeyDefect>>,
}

impl DefectGroups {
    /// Run every validator over `map`.
    pub fn collect(map: &TranslationMap, options: &DefectOptions) -> Self {
        let mut defects = DefectGroups::default();

        for group in map.values() {
            let key = group.key();
            if !group.is_in_base() {
                if options.report_not_in_base {
                    defects.push(
                        DefectKind::NotInBase,
                        key,
                        group.locales().map(str::to_string).collect(),
                    );
                }
                continue;
            }

            defects.push(
                DefectKind::Missing,
                key,
                group.missing_locales(&options.expected_locales),
            );
            defects.push(DefectKind::InvalidUnicode, key, check_unicode(group, options.policy));
            defects.push(DefectKind::InvalidFormatIndices, key, check_format_indices(group));
            defects.push(DefectKind::InvalidBraces, key, check_braces(group));
            defects.push(DefectKind::InvalidWhitespace, key, check_whitespace(group));
            defects.push(DefectKind::InvalidNewline, key, check_newlines(group, options.policy));
            defects.push(
                DefectKind::InvalidCjkRatio,
                key,
                check_cjk_ratio(group, options.cjk_threshold),
            );
        }

        defects
    }

    fn push(&mut self, kind: DefectKind, key: &TranslationKey, locales: Vec<String>) {
        if kind != DefectKind::NotInBase && locales.is_empty() {
            return;
        }
        self.groups.entry(kind).or_default().push(KeyDefect {
            key: key.clone(),
            locales,
        });
    }

    pub fn get(&self, kind: DefectKind) -> &[KeyDefect] {
        self.groups.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Number of affected keys for `kind`.
    pub fn count(&self, kind: DefectKind) -> usize {
        self.get(kind).len()
    }

    /// Number of affected (key, locale) slots for `kind`.
    pub fn slot_count(&self, kind: DefectKind) -> usize {
        self.get(kind).iter().map(|d| d.locales.len().max(1)).sum()
    }

    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// True when any non-advisory defect exists.
    pub fn has_errors(&self) -> bool {
        self.groups
            .iter()
            .any(|(kind, entries)| !kind.is_advisory() && !entries.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DefectKind, &[KeyDefect])> {
        self.groups
            .iter()
            .map(|(kind, entries)| (*kind, entries.as_slice()))
    }

    /// Missing slots per locale.
    pub fn missing_by_locale(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for defect in self.get(DefectKind::Missing) {
            for locale in &defect.locales {
                *counts.entry(locale.clone()).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Values changed by [`fix_defects`], per rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixSummary {
    pub unicode: usize,
    pub newline: usize,
    pub whitespace: usize,
}

impl FixSummary {
    pub fn total(&self) -> usize {
        self.unicode + self.newline + self.whitespace
    }
}

/// Correct every fixable defect in the base-marked groups.
///
/// Rules run in a fixed order (unicode, newline, whitespace) and each one
/// re-checks right before fixing, so running the pass again changes nothing.
pub fn fix_defects(map: &mut TranslationMap, policy: EncodingPolicy) -> FixSummary {
    let mut summary = FixSummary::default();
    for group in map.values_mut().filter(|g| g.is_in_base()) {
        summary.unicode += fix_unicode(group, policy);
        summary.newline += fix_newlines(group, policy);
        summary.whitespace += fix_whitespace(group);
    }
    summary
}
