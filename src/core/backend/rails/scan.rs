//! Locate, gather and flatten Rails locale files.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde_yaml::{Mapping, Value};
use walkdir::WalkDir;

use crate::core::{CatalogError, CatalogResult};
use crate::utils::is_locale_code;

/// Candidate locale directories, in lookup order.
pub const LOCALE_DIR_CANDIDATES: [&str; 3] = ["config/locales", "locales", "locale"];

/// First existing candidate, else the Rails default `config/locales`.
pub fn find_locale_dir(project_dir: &Path) -> PathBuf {
    LOCALE_DIR_CANDIDATES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|dir| dir.is_dir())
        .unwrap_or_else(|| project_dir.join(LOCALE_DIR_CANDIDATES[0]))
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml") | Some("yaml")
    )
}

/// Locale encoded in a file name: `en.yml` or `devise.en.yml`.
pub fn locale_from_file_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let candidate = stem.rsplit('.').next()?;
    is_locale_code(candidate).then(|| candidate.to_string())
}

fn yaml_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && is_yaml(e.path()))
        .map(|e| e.into_path())
        .collect()
}

/// Every locale file under `locale_dir`, grouped by the locale it holds.
///
/// A directory named like a locale owns every YAML file beneath it. Files
/// elsewhere are attributed by their `<locale>.yml` / `<name>.<locale>.yml`
/// suffix; files without one are ignored. Locale directories without any
/// file still appear with an empty list.
pub fn gather_files(locale_dir: &Path) -> CatalogResult<BTreeMap<String, Vec<PathBuf>>> {
    let mut files: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    let mut entries: Vec<_> = fs::read_dir(locale_dir)
        .map_err(|e| CatalogError::io(format!("Failed to read {}", locale_dir.display()), e))?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .collect();
    entries.sort();

    for path in entries {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if path.is_dir() {
            if is_locale_code(&name) {
                files.entry(name).or_default().extend(yaml_files(&path));
            } else {
                for file in yaml_files(&path) {
                    if let Some(locale) = locale_from_file_name(&file) {
                        files.entry(locale).or_default().push(file);
                    }
                }
            }
        } else if is_yaml(&path)
            && let Some(locale) = locale_from_file_name(&path)
        {
            files.entry(locale).or_default().push(path);
        }
    }

    for list in files.values_mut() {
        list.sort();
    }
    Ok(files)
}

/// Parse a locale file; an empty document is an empty mapping.
pub fn parse_document(path: &Path, content: &str) -> CatalogResult<Mapping> {
    let value: Value =
        serde_yaml::from_str(content).map_err(|e| CatalogError::MalformedYaml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(CatalogError::MalformedYaml {
            path: path.to_path_buf(),
            message: "top level is not a mapping".to_string(),
        }),
    }
}

/// Mapping keys as text; keys that are not scalars are skipped.
pub fn key_text(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A translatable leaf: a string, or a key declared without a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    /// Dotted form of `segments`.
    pub path: String,
    /// Mapping keys from the locale root down; a key may itself hold dots.
    pub segments: Vec<String>,
    pub value: Option<String>,
}

/// Flatten a locale subtree into dotted-path leaves in document order.
///
/// Sequences, numbers and booleans are not translatable strings and stay
/// out of the result; they are left untouched on rewrite.
pub fn flatten(mapping: &Mapping) -> Vec<Leaf> {
    let mut leaves = Vec::new();
    flatten_into(mapping, &mut Vec::new(), &mut leaves);
    leaves
}

fn flatten_into(mapping: &Mapping, parents: &mut Vec<String>, leaves: &mut Vec<Leaf>) {
    for (key, value) in mapping {
        let Some(key) = key_text(key) else {
            continue;
        };
        parents.push(key);
        // Outer `None`: not a leaf; inner `None`: declared without a value.
        let leaf_value = match value {
            Value::Mapping(child) => {
                flatten_into(child, parents, leaves);
                None
            }
            Value::String(s) => Some(Some(s.clone())),
            Value::Null => Some(None),
            Value::Tagged(tagged) => match &tagged.value {
                Value::String(s) => Some(Some(s.clone())),
                _ => None,
            },
            _ => None,
        };
        if let Some(value) = leaf_value {
            leaves.push(Leaf {
                path: parents.join("."),
                segments: parents.clone(),
                value,
            });
        }
        parents.pop();
    }
}

/// The subtree stored under `locale` at the top of a document.
pub fn locale_tree<'a>(document: &'a Mapping, locale: &str) -> Option<&'a Mapping> {
    document.iter().find_map(|(key, value)| {
        (key_text(key).as_deref() == Some(locale))
            .then_some(value)
            .and_then(Value::as_mapping)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_find_locale_dir_prefers_config_locales() {
        let dir = tempdir().unwrap();
        assert_eq!(find_locale_dir(dir.path()), dir.path().join("config/locales"));

        fs::create_dir_all(dir.path().join("locale")).unwrap();
        assert_eq!(find_locale_dir(dir.path()), dir.path().join("locale"));

        fs::create_dir_all(dir.path().join("config/locales")).unwrap();
        assert_eq!(find_locale_dir(dir.path()), dir.path().join("config/locales"));
    }

    #[test]
    fn test_locale_from_file_name() {
        assert_eq!(locale_from_file_name(Path::new("en.yml")).as_deref(), Some("en"));
        assert_eq!(
            locale_from_file_name(Path::new("devise.pt-BR.yml")).as_deref(),
            Some("pt-BR")
        );
        assert_eq!(locale_from_file_name(Path::new("tasks.yml")), None);
    }

    #[test]
    fn test_gather_files_all_layouts() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("en/models")).unwrap();
        fs::create_dir_all(root.join("de")).unwrap();
        fs::create_dir_all(root.join("gems")).unwrap();
        fs::write(root.join("en/tasks.yml"), "en: {}\n").unwrap();
        fs::write(root.join("en/models/task.yml"), "en: {}\n").unwrap();
        fs::write(root.join("fr.yml"), "fr: {}\n").unwrap();
        fs::write(root.join("devise.en.yml"), "en: {}\n").unwrap();
        fs::write(root.join("gems/kaminari.fr.yml"), "fr: {}\n").unwrap();
        fs::write(root.join("gems/readme.yml"), "x: 1\n").unwrap();

        let files = gather_files(root).unwrap();
        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["de", "en", "fr"]);
        assert!(files["de"].is_empty());
        assert_eq!(files["en"].len(), 3);
        assert_eq!(
            files["fr"],
            vec![root.join("fr.yml"), root.join("gems/kaminari.fr.yml")]
        );
    }

    #[test]
    fn test_flatten_skips_non_strings() {
        let doc = parse_document(
            Path::new("en.yml"),
            "en:\n  tasks:\n    title: Tasks\n    empty:\n  count: 3\n  days: [Mon, Tue]\n",
        )
        .unwrap();
        let tree = locale_tree(&doc, "en").unwrap();
        assert_eq!(
            flatten(tree),
            vec![
                Leaf {
                    path: "tasks.title".to_string(),
                    segments: vec!["tasks".to_string(), "title".to_string()],
                    value: Some("Tasks".to_string()),
                },
                Leaf {
                    path: "tasks.empty".to_string(),
                    segments: vec!["tasks".to_string(), "empty".to_string()],
                    value: None,
                },
            ]
        );
    }

    #[test]
    fn test_flatten_keeps_dotted_keys_whole() {
        let doc = parse_document(
            Path::new("en.yml"),
            "en:\n  number:\n    \"1.5\": One and a half\n  unit: !ruby/symbol kg\n",
        )
        .unwrap();
        let leaves = flatten(locale_tree(&doc, "en").unwrap());
        assert_eq!(leaves[0].path, "number.1.5");
        assert_eq!(leaves[0].segments, vec!["number", "1.5"]);
        assert_eq!(leaves[1].value.as_deref(), Some("kg"));
    }

    #[test]
    fn test_parse_document_errors() {
        assert!(matches!(
            parse_document(Path::new("bad.yml"), "en:\n  a: [unclosed\n"),
            Err(CatalogError::MalformedYaml { .. })
        ));
        assert!(parse_document(Path::new("list.yml"), "- a\n").is_err());
        assert!(parse_document(Path::new("empty.yml"), "").unwrap().is_empty());
    }
}
