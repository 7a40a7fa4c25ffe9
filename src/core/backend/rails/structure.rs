//! File-structure bookkeeping for Rails locale trees.
//!
//! Tracks which file every (key, locale) pair came from, the set of files the
//! default locale is split into, and the raw text of every file read. All of
//! it is rebuilt from scratch on each load.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    path::{Component, Path, PathBuf},
};

use crate::core::data::TranslationKey;

/// How a locale file's path encodes its locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileLayout {
    /// `<dir>/<locale>/**/<name>.yml`
    DirectoryPerLocale,
    /// `<dir>/<locale>.yml`
    FlatPerLocale,
    /// `<dir>/**/<name>.<locale>.yml`
    Prefixed,
}

/// Split `name.yml` / `name.en.yml` into (stem, optional locale suffix, extension).
fn split_file_name(file_name: &str) -> Option<(&str, Option<&str>, &str)> {
    let (rest, extension) = file_name.rsplit_once('.')?;
    match rest.rsplit_once('.') {
        Some((stem, locale)) => Some((stem, Some(locale), extension)),
        None => Some((rest, None, extension)),
    }
}

/// Which layout `path` (inside `locale_dir`) uses for `locale`.
pub fn classify(locale_dir: &Path, path: &Path, locale: &str) -> Option<FileLayout> {
    let relative = path.strip_prefix(locale_dir).ok()?;
    let mut components = relative.components();
    let first = match components.next()? {
        Component::Normal(name) => name.to_string_lossy(),
        _ => return None,
    };
    if components.next().is_some() && first == locale {
        return Some(FileLayout::DirectoryPerLocale);
    }
    let file_name = path.file_name()?.to_string_lossy();
    match split_file_name(&file_name)? {
        (stem, None, _) if stem == locale => Some(FileLayout::FlatPerLocale),
        (_, Some(suffix), _) if suffix == locale => Some(FileLayout::Prefixed),
        _ => None,
    }
}

/// The path `to` would use for the file `path` holds for `from`.
///
/// Returns `None` when `path` does not encode `from` in any known layout.
pub fn translate_path(locale_dir: &Path, path: &Path, from: &str, to: &str) -> Option<PathBuf> {
    let layout = classify(locale_dir, path, from)?;
    let parent = path.parent()?;
    let file_name = path.file_name()?.to_string_lossy();
    match layout {
        FileLayout::DirectoryPerLocale => {
            let relative = path.strip_prefix(locale_dir.join(from)).ok()?;
            Some(locale_dir.join(to).join(relative))
        }
        FileLayout::FlatPerLocale => {
            let (_, _, extension) = split_file_name(&file_name)?;
            Some(parent.join(format!("{}.{}", to, extension)))
        }
        FileLayout::Prefixed => {
            let (stem, _, extension) = split_file_name(&file_name)?;
            Some(parent.join(format!("{}.{}.{}", stem, to, extension)))
        }
    }
}

#[derive(Debug, Default)]
pub struct FileStructure {
    locale_dir: PathBuf,
    sources: HashMap<(TranslationKey, String), PathBuf>,
    default_files: BTreeSet<PathBuf>,
    locale_files: BTreeMap<String, BTreeSet<PathBuf>>,
    original_content: HashMap<PathBuf, String>,
    /// Keys with a dot inside one of their mapping keys.
    dotted: HashMap<TranslationKey, Vec<String>>,
}

impl FileStructure {
    pub fn new(locale_dir: &Path) -> Self {
        Self {
            locale_dir: locale_dir.to_path_buf(),
            ..Default::default()
        }
    }

    pub fn locale_dir(&self) -> &Path {
        &self.locale_dir
    }

    pub fn record_source(&mut self, key: &TranslationKey, locale: &str, path: &Path) {
        self.sources
            .insert((key.clone(), locale.to_string()), path.to_path_buf());
    }

    pub fn source(&self, key: &TranslationKey, locale: &str) -> Option<&Path> {
        self.sources
            .get(&(key.clone(), locale.to_string()))
            .map(PathBuf::as_path)
    }

    pub fn record_segments(&mut self, key: &TranslationKey, segments: &[String]) {
        if segments.iter().any(|s| s.contains('.')) {
            self.dotted.insert(key.clone(), segments.to_vec());
        }
    }

    /// Mapping path of `key` inside a locale tree.
    pub fn segments(&self, key: &TranslationKey) -> Vec<String> {
        match self.dotted.get(key) {
            Some(segments) => segments.clone(),
            None => key.id().split('.').map(str::to_string).collect(),
        }
    }

    pub fn add_file(&mut self, locale: &str, path: &Path, is_default: bool) {
        if is_default {
            self.default_files.insert(path.to_path_buf());
        }
        self.locale_files
            .entry(locale.to_string())
            .or_default()
            .insert(path.to_path_buf());
    }

    /// Files the default locale is split into; the shape every locale must match.
    pub fn default_files(&self) -> &BTreeSet<PathBuf> {
        &self.default_files
    }

    pub fn files_for(&self, locale: &str) -> impl Iterator<Item = &PathBuf> {
        self.locale_files.get(locale).into_iter().flatten()
    }

    pub fn cache_content(&mut self, path: &Path, content: String) {
        self.original_content.insert(path.to_path_buf(), content);
    }

    pub fn original_content(&self, path: &Path) -> Option<&str> {
        self.original_content.get(path).map(String::as_str)
    }

    pub fn translate(&self, path: &Path, from: &str, to: &str) -> Option<PathBuf> {
        translate_path(&self.locale_dir, path, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dir() -> PathBuf {
        PathBuf::from("/app/config/locales")
    }

    #[test]
    fn test_translate_directory_layout() {
        let path = dir().join("en/models/task.yml");
        assert_eq!(
            translate_path(&dir(), &path, "en", "de"),
            Some(dir().join("de/models/task.yml"))
        );
    }

    #[test]
    fn test_translate_flat_layout() {
        assert_eq!(
            translate_path(&dir(), &dir().join("en.yml"), "en", "pt-BR"),
            Some(dir().join("pt-BR.yml"))
        );
    }

    #[test]
    fn test_translate_prefixed_layout() {
        let path = dir().join("models/task.en.yml");
        assert_eq!(
            translate_path(&dir(), &path, "en", "de"),
            Some(dir().join("models/task.de.yml"))
        );
    }

    #[test]
    fn test_translate_unrelated_file() {
        assert_eq!(
            translate_path(&dir(), &dir().join("fr.yml"), "en", "de"),
            None
        );
        assert_eq!(
            translate_path(Path::new("/elsewhere"), &dir().join("en.yml"), "en", "de"),
            None
        );
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify(&dir(), &dir().join("en/tasks.yml"), "en"),
            Some(FileLayout::DirectoryPerLocale)
        );
        assert_eq!(
            classify(&dir(), &dir().join("en.yml"), "en"),
            Some(FileLayout::FlatPerLocale)
        );
        assert_eq!(
            classify(&dir(), &dir().join("devise.en.yml"), "en"),
            Some(FileLayout::Prefixed)
        );
    }

    #[test]
    fn test_sources_and_files() {
        let mut structure = FileStructure::new(&dir());
        let key = TranslationKey::new("tasks.title");
        let path = dir().join("en/tasks.yml");
        structure.record_source(&key, "en", &path);
        structure.add_file("en", &path, true);

        assert_eq!(structure.source(&key, "en"), Some(path.as_path()));
        assert_eq!(structure.source(&key, "de"), None);
        assert_eq!(structure.default_files().len(), 1);
        assert_eq!(structure.files_for("en").count(), 1);
        assert_eq!(structure.files_for("de").count(), 0);
    }

    #[test]
    fn test_segments_keep_dotted_keys() {
        let mut structure = FileStructure::new(&dir());
        let dotted = TranslationKey::new("number.1.5");
        structure.record_segments(&dotted, &["number".to_string(), "1.5".to_string()]);

        assert_eq!(structure.segments(&dotted), vec!["number", "1.5"]);
        assert_eq!(
            structure.segments(&TranslationKey::new("tasks.title")),
            vec!["tasks", "title"]
        );
    }
}
