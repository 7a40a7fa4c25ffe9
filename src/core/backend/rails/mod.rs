//! Rails-style nested YAML backend.
//!
//! Locale files live under `config/locales` (or `locales`, `locale`) in any
//! mix of three layouts: a directory per locale, one flat `<locale>.yml`, or
//! prefixed `<name>.<locale>.yml` files. Nested maps flatten to dotted keys.
//!
//! Writes deep-merge into existing files and keep every file the default
//! locale has mirrored in every other locale, with `""` placeholders for
//! untranslated keys.

pub mod merge;
pub mod scan;
pub mod structure;
pub mod yaml_writer;

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use serde_yaml::{Mapping, Value};
use tracing::{debug, info, warn};

use self::{
    merge::{deep_merge, remove_path, set_path},
    scan::{find_locale_dir, flatten, gather_files, locale_tree, parse_document},
    structure::FileStructure,
    yaml_writer::{has_interior_comments, leading_block, render_document},
};
use super::{CatalogBackend, write_file};
use crate::core::{
    CatalogError, CatalogResult, LocaleStatus, ManagementResult, ProjectSettings, ProjectType,
    data::{TranslationKey, TranslationMap, base_groups, group_entry},
};
use crate::rules::EncodingPolicy;
use crate::utils::modified_time;

const GENERATED_FILE: &str = "application.yml";

/// File gaps of one non-default locale, relative to the locale directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleParity {
    /// Default-locale files with no counterpart on disk.
    pub missing: Vec<PathBuf>,
    /// Files with no default-locale original.
    pub extra: Vec<PathBuf>,
}

impl LocaleParity {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Read-only comparison of every locale's file set with the default's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParityReport {
    pub default_locale: String,
    pub default_files: Vec<PathBuf>,
    pub locales: BTreeMap<String, LocaleParity>,
}

impl ParityReport {
    pub fn is_clean(&self) -> bool {
        self.locales.values().all(LocaleParity::is_clean)
    }

    pub fn missing_count(&self) -> usize {
        self.locales.values().map(|p| p.missing.len()).sum()
    }

    pub fn extra_count(&self) -> usize {
        self.locales.values().map(|p| p.extra.len()).sum()
    }
}

/// Pending edits to one file.
#[derive(Debug, Default)]
struct FilePlan {
    updates: Mapping,
    removals: Vec<Vec<String>>,
    keys: Vec<TranslationKey>,
    /// Default-locale file whose leading comments a new file inherits.
    template: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RailsBackend {
    project_dir: PathBuf,
    locale_dir: Option<PathBuf>,
    default_locale: String,
    structure: FileStructure,
    locales: Vec<String>,
}

impl RailsBackend {
    pub fn new(project_dir: &Path) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            locale_dir: None,
            default_locale: String::new(),
            structure: FileStructure::default(),
            locales: Vec::new(),
        }
    }

    fn resolved_locale_dir(&self) -> PathBuf {
        self.locale_dir
            .clone()
            .unwrap_or_else(|| find_locale_dir(&self.project_dir))
    }

    /// Compare each locale's files with the default locale's, without writing.
    pub fn check_parity(&self) -> ParityReport {
        let locale_dir = self.structure.locale_dir();
        let relative = |path: &Path| {
            path.strip_prefix(locale_dir)
                .unwrap_or(path)
                .to_path_buf()
        };
        let default_files = self.structure.default_files();
        let mut report = ParityReport {
            default_locale: self.default_locale.clone(),
            default_files: default_files.iter().map(|p| relative(p)).collect(),
            locales: BTreeMap::new(),
        };

        for locale in self.locales.iter().filter(|l| **l != self.default_locale) {
            let expected: BTreeSet<PathBuf> = default_files
                .iter()
                .filter_map(|file| self.structure.translate(file, &self.default_locale, locale))
                .collect();
            let actual: BTreeSet<PathBuf> = self
                .structure
                .files_for(locale)
                .filter(|file| file.is_file())
                .cloned()
                .collect();

            let parity = LocaleParity {
                missing: expected
                    .iter()
                    .filter(|file| !file.is_file())
                    .map(|file| relative(file))
                    .collect(),
                extra: actual.difference(&expected).map(|file| relative(file)).collect(),
            };
            if !parity.is_clean() {
                warn!(
                    "Locale {} is out of parity: {} missing, {} extra files",
                    locale,
                    parity.missing.len(),
                    parity.extra.len()
                );
            }
            report.locales.insert(locale.clone(), parity);
        }
        report
    }

    /// Read one file and merge its `locale` subtree into `map`.
    fn load_file(
        &self,
        structure: &mut FileStructure,
        map: &mut TranslationMap,
        locale: &str,
        path: &Path,
        result: &mut ManagementResult,
    ) -> CatalogResult<()> {
        let content = fs::read_to_string(path)
            .map_err(|e| CatalogError::io(format!("Failed to read {}", path.display()), e))?;
        let document = parse_document(path, &content)?;
        let is_default = locale == self.default_locale;
        structure.add_file(locale, path, is_default);

        match locale_tree(&document, locale) {
            Some(tree) => {
                for leaf in flatten(tree) {
                    let key = TranslationKey::new(leaf.path);
                    let group = group_entry(map, key.clone(), &self.default_locale, is_default);
                    if let Some(value) = leaf.value {
                        group.add(locale, value);
                    }
                    structure.record_source(&key, locale, path);
                    structure.record_segments(&key, &leaf.segments);
                }
            }
            None if !document.is_empty() => result.warn(format!(
                "{} has no top-level \"{}\" key",
                path.display(),
                locale
            )),
            None => {}
        }
        structure.cache_content(path, content);
        Ok(())
    }

    /// File a key should be written to for `locale`.
    fn target_file(&self, key: &TranslationKey, locale: &str) -> PathBuf {
        if let Some(path) = self.structure.source(key, locale) {
            return path.to_path_buf();
        }
        if let Some(default_path) = self.structure.source(key, &self.default_locale)
            && let Some(path) = self
                .structure
                .translate(default_path, &self.default_locale, locale)
        {
            return path;
        }
        let locale_dir = self.structure.locale_dir();
        let flat = locale_dir.join(format!("{}.yml", locale));
        if flat.is_file() {
            return flat;
        }
        fallback_path(&locale_dir.join(locale), key.id())
    }

    /// Apply a plan to one file; returns whether the file changed.
    fn write_plan(&mut self, locale: &str, path: &Path, plan: FilePlan) -> CatalogResult<bool> {
        let existing = match path.is_file() {
            true => Some(fs::read_to_string(path).map_err(|e| {
                CatalogError::io(format!("Failed to read {}", path.display()), e)
            })?),
            false => None,
        };
        let mut document = match &existing {
            Some(content) => parse_document(path, content)?,
            None => Mapping::new(),
        };

        let mut tree = locale_tree(&document, locale).cloned().unwrap_or_default();
        for segments in &plan.removals {
            let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
            if remove_path(&mut tree, &segments) {
                debug!("Dropped stale key {} from {}", segments.join("."), path.display());
            }
        }
        deep_merge(&mut tree, &plan.updates);
        set_path(&mut document, &[locale], Value::Mapping(tree));

        let leading = match &existing {
            Some(content) => leading_block(content),
            None => plan
                .template
                .as_deref()
                .and_then(|template| self.structure.original_content(template))
                .map(leading_block)
                .unwrap_or_default(),
        };
        let rendered = render_document(&document, Some(&leading));

        let is_default = locale == self.default_locale;
        for key in &plan.keys {
            self.structure.record_source(key, locale, path);
        }
        self.structure.add_file(locale, path, is_default);
        if existing.as_deref() == Some(rendered.as_str()) {
            debug!("{} is unchanged", path.display());
            return Ok(false);
        }
        if let Some(content) = &existing
            && has_interior_comments(content)
        {
            warn!(
                "Comments inside {} could not be kept; only the leading block was preserved",
                path.display()
            );
        }

        write_file(path, &rendered)?;
        info!("Wrote {}", path.display());
        self.structure.cache_content(path, rendered);
        Ok(true)
    }
}

/// Where a key with no known file goes, inside `<locale dir>/<locale>`.
fn fallback_path(locale_root: &Path, key: &str) -> PathBuf {
    let segments: Vec<&str> = key.split('.').collect();
    match segments.as_slice() {
        [namespace, _, name, ..] if matches!(*namespace, "activerecord" | "activemodel") => {
            locale_root.join("models").join(format!("{}.yml", name))
        }
        ["models", name, ..] => locale_root.join("models").join(format!("{}.yml", name)),
        ["views", name, _, ..] => locale_root.join("views").join(format!("{}.yml", name)),
        [_] | [] => locale_root.join(GENERATED_FILE),
        [first, ..] => locale_root.join(format!("{}.yml", first)),
    }
}

impl CatalogBackend for RailsBackend {
    fn project_type(&self) -> ProjectType {
        ProjectType::Rails
    }

    fn encoding_policy(&self) -> EncodingPolicy {
        EncodingPolicy::Literal
    }

    fn locales(&self) -> &[String] {
        &self.locales
    }

    fn load(
        &mut self,
        settings: &ProjectSettings,
        result: &mut ManagementResult,
    ) -> CatalogResult<TranslationMap> {
        let locale_dir = find_locale_dir(&self.project_dir);
        if !locale_dir.is_dir() {
            return Err(CatalogError::NoLocaleDir(self.project_dir.clone()));
        }
        let files = gather_files(&locale_dir)?;
        self.default_locale = settings.default_locale.clone();

        let mut structure = FileStructure::new(&locale_dir);
        let mut map = TranslationMap::new();
        // The default locale goes first so it defines the base key set.
        let default_files = files.get(&self.default_locale).cloned().unwrap_or_default();
        for path in &default_files {
            self.load_file(&mut structure, &mut map, &self.default_locale, path, result)?;
        }
        debug!(
            "Default locale {} has {} keys in {} files",
            self.default_locale,
            map.len(),
            default_files.len()
        );
        for (locale, paths) in files.iter().filter(|(l, _)| **l != self.default_locale) {
            for path in paths {
                self.load_file(&mut structure, &mut map, locale, path, result)?;
            }
        }

        let mut locales: Vec<String> = files.keys().cloned().collect();
        if !locales.contains(&self.default_locale) {
            locales.push(self.default_locale.clone());
            locales.sort();
        }

        self.locale_dir = Some(locale_dir);
        self.structure = structure;
        self.locales = locales;
        Ok(map)
    }

    fn write_locale(
        &mut self,
        locale: &str,
        map: &TranslationMap,
        settings: &ProjectSettings,
    ) -> CatalogResult<()> {
        if self.default_locale.is_empty() {
            self.default_locale = settings.default_locale.clone();
        }
        if self.structure.locale_dir().as_os_str().is_empty() {
            self.structure = FileStructure::new(&self.resolved_locale_dir());
        }
        let is_default = locale == self.default_locale;

        let mut plans: BTreeMap<PathBuf, FilePlan> = BTreeMap::new();
        for group in base_groups(map) {
            let value = match group.value(locale) {
                Some(value) => value.to_string(),
                None if !is_default => String::new(),
                None => continue,
            };
            let key = group.key();
            let plan = plans.entry(self.target_file(key, locale)).or_default();
            let segments = self.structure.segments(key);
            let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
            set_path(&mut plan.updates, &segments, Value::String(value));
            plan.keys.push(key.clone());
        }

        for group in map.values().filter(|g| !g.is_in_base()) {
            if let Some(path) = self.structure.source(group.key(), locale) {
                plans
                    .entry(path.to_path_buf())
                    .or_default()
                    .removals
                    .push(self.structure.segments(group.key()));
            }
        }

        if !is_default {
            for default_file in self.structure.default_files() {
                if let Some(target) =
                    self.structure
                        .translate(default_file, &self.default_locale, locale)
                {
                    plans.entry(target).or_default().template = Some(default_file.clone());
                }
            }
        }

        let mut changed = 0;
        for (path, plan) in plans {
            if self.write_plan(locale, &path, plan)? {
                changed += 1;
            }
        }
        debug!("Locale {}: {} files changed", locale, changed);

        if !self.locales.iter().any(|l| l == locale) {
            self.locales.push(locale.to_string());
            self.locales.sort();
        }
        Ok(())
    }

    fn compile(&mut self, _settings: &ProjectSettings, _result: &mut ManagementResult) {
        debug!("YAML catalogs are loaded directly; nothing to compile");
    }

    fn generate_base(
        &mut self,
        map: &TranslationMap,
        settings: &ProjectSettings,
        result: &mut ManagementResult,
    ) -> CatalogResult<()> {
        let locale_dir = self.resolved_locale_dir();
        if self.structure.locale_dir().as_os_str().is_empty() {
            self.structure = FileStructure::new(&locale_dir);
        }
        self.locale_dir = Some(locale_dir.clone());
        self.default_locale = settings.default_locale.clone();
        let default_locale = self.default_locale.clone();

        let count = base_groups(map).count();
        if count > 0 {
            self.write_locale(&default_locale, map, settings)?;
            result.total_strings = count;
        } else if self.structure.default_files().is_empty() {
            let path = locale_dir.join(&default_locale).join(GENERATED_FILE);
            if path.exists() {
                return Err(CatalogError::io(
                    format!("Refusing to replace {}", path.display()),
                    std::io::Error::from(std::io::ErrorKind::AlreadyExists),
                ));
            }
            let mut document = Mapping::new();
            set_path(
                &mut document,
                &[default_locale.as_str(), "application", "name"],
                Value::from("Application Name"),
            );
            let content = render_document(&document, None);
            write_file(&path, &content)?;
            info!("Created {}", path.display());
            self.structure.add_file(&default_locale, &path, true);
            self.structure.cache_content(&path, content);
            result.total_strings = 1;
        } else {
            debug!("Default locale files exist but hold no keys");
        }

        if !self.locales.contains(&default_locale) {
            self.locales.push(default_locale.clone());
            self.locales.sort();
        }
        result.mark_updated(&default_locale);
        Ok(())
    }

    fn fill_status(&self, settings: &ProjectSettings, result: &mut ManagementResult) {
        let locale_dir = self.resolved_locale_dir();
        let default_files = self.structure.default_files();
        let default_dir = locale_dir.join(&settings.default_locale);

        result.locale_dir = locale_dir.is_dir().then(|| locale_dir.clone());
        result.base_path = if default_dir.is_dir() {
            Some(default_dir)
        } else {
            default_files.iter().next().cloned()
        };
        result.base_modified = default_files.iter().filter_map(|p| modified_time(p)).max();
        result.total_locales = self.locales.len();

        for locale in &self.locales {
            let dir = locale_dir.join(locale);
            let files: Vec<&PathBuf> = self
                .structure
                .files_for(locale)
                .filter(|p| p.is_file())
                .collect();
            let catalog_path = if dir.is_dir() {
                Some(dir.clone())
            } else {
                files.first().map(|p| p.to_path_buf())
            };
            result.locale_statuses.insert(
                locale.clone(),
                LocaleStatus {
                    has_directory: dir.is_dir(),
                    has_catalog: !files.is_empty(),
                    has_compiled: false,
                    catalog_modified: files.iter().filter_map(|p| modified_time(p)).max(),
                    catalog_path,
                    ..Default::default()
                },
            );
        }
    }
}
