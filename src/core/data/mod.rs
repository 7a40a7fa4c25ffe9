//! Translation data model.
//!
//! - `key`: `TranslationKey`, the identity of one string
//! - `group`: `TranslationGroup`, all locale values of one key
//! - `escape`: unicode escape helpers shared by rules and backends

pub mod escape;
mod group;
mod key;

use indexmap::IndexMap;

pub use group::{Occurrence, TranslationGroup};
pub use key::TranslationKey;

/// Key to group map in discovery order.
pub type TranslationMap = IndexMap<TranslationKey, TranslationGroup>;

/// Get the group for `key`, creating it when absent.
///
/// A group first seen outside the base extraction starts with
/// `is_in_base = false`; seeing it in the base later marks it.
pub fn group_entry<'a>(
    map: &'a mut TranslationMap,
    key: TranslationKey,
    default_locale: &str,
    in_base: bool,
) -> &'a mut TranslationGroup {
    let group = map
        .entry(key.clone())
        .or_insert_with(|| TranslationGroup::new(key, default_locale, in_base));
    if in_base {
        group.mark_in_base();
    }
    group
}

/// Base-marked groups in discovery order.
pub fn base_groups(map: &TranslationMap) -> impl Iterator<Item = &TranslationGroup> {
    map.values().filter(|g| g.is_in_base())
}
