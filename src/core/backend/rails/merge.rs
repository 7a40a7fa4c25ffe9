//! Nested mapping edits used when rewriting locale trees.

use serde_yaml::{Mapping, Value};

use super::scan::key_text;

fn find_key(mapping: &Mapping, segment: &str) -> Option<Value> {
    mapping
        .keys()
        .find(|key| key_text(key).as_deref() == Some(segment))
        .cloned()
}

/// Set `value` at `segments`, creating intermediate mappings.
///
/// A non-mapping value in the way is replaced by a mapping.
pub fn set_path(root: &mut Mapping, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = root;
    for segment in parents {
        let key = find_key(current, segment).unwrap_or_else(|| Value::from(*segment));
        let slot = current
            .entry(key)
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if !slot.is_mapping() {
            *slot = Value::Mapping(Mapping::new());
        }
        let Value::Mapping(child) = slot else {
            return;
        };
        current = child;
    }
    let key = find_key(current, last).unwrap_or_else(|| Value::from(*last));
    current.insert(key, value);
}

/// Remove the leaf at `segments`, pruning parents left empty.
///
/// Returns whether anything was removed.
pub fn remove_path(root: &mut Mapping, segments: &[&str]) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return false;
    };
    let Some(key) = find_key(root, first) else {
        return false;
    };
    if rest.is_empty() {
        return root.remove(&key).is_some();
    }
    let Some(Value::Mapping(child)) = root.get_mut(&key) else {
        return false;
    };
    let removed = remove_path(child, rest);
    if removed && child.is_empty() {
        root.remove(&key);
    }
    removed
}

/// Merge `updates` into `target`; mappings merge recursively, leaves overwrite.
///
/// A string replacing a tagged string keeps the tag.
pub fn deep_merge(target: &mut Mapping, updates: &Mapping) {
    for (key, value) in updates {
        let existing = key_text(key).and_then(|text| find_key(target, &text));
        match (existing, value) {
            (Some(existing), Value::Mapping(incoming)) => {
                if let Some(Value::Mapping(current)) = target.get_mut(&existing) {
                    deep_merge(current, incoming);
                } else {
                    target.insert(existing, value.clone());
                }
            }
            (Some(existing), Value::String(_)) => match target.get_mut(&existing) {
                Some(Value::Tagged(tagged)) if tagged.value.is_string() => {
                    tagged.value = value.clone();
                }
                _ => {
                    target.insert(existing, value.clone());
                }
            },
            (Some(existing), _) => {
                target.insert(existing, value.clone());
            }
            (None, _) => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
