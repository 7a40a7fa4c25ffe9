//! Content snapshots for detecting what a regeneration changed.

use std::collections::{BTreeMap, BTreeSet};

use super::data::{TranslationKey, TranslationMap, base_groups};

/// Base keys and their values at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSnapshot {
    entries: BTreeMap<TranslationKey, BTreeMap<String, String>>,
}

impl ContentSnapshot {
    pub fn capture(map: &TranslationMap) -> Self {
        let entries = base_groups(map)
            .map(|group| (group.key().clone(), group.values().clone()))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &TranslationKey> {
        self.entries.keys()
    }

    /// What changed going from `self` to `newer`.
    pub fn diff(&self, newer: &ContentSnapshot) -> ContentDiff {
        let old_keys: BTreeSet<&TranslationKey> = self.entries.keys().collect();
        let new_keys: BTreeSet<&TranslationKey> = newer.entries.keys().collect();

        ContentDiff {
            added: new_keys.difference(&old_keys).map(|k| (*k).clone()).collect(),
            removed: old_keys.difference(&new_keys).map(|k| (*k).clone()).collect(),
            changed: old_keys
                .intersection(&new_keys)
                .filter(|k| self.entries.get(**k) != newer.entries.get(**k))
                .map(|k| (*k).clone())
                .collect(),
        }
    }
}

/// Keys added, removed or with different values, each sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentDiff {
    pub added: Vec<TranslationKey>,
    pub removed: Vec<TranslationKey>,
    pub changed: Vec<TranslationKey>,
}

impl ContentDiff {
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn total(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }
}
