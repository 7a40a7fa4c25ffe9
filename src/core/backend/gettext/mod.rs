//! Gettext PO/POT backend.
//!
//! Layout: exactly one base template (`*.pot`) at the project root or in the
//! locale directory, and per-locale catalogs at
//! `<locale dir>/<locale>/LC_MESSAGES/<base name>.po`.

mod compile;
pub mod extract;
pub mod po;
pub mod writer;

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use chrono::Local;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use self::{
    compile::compile_catalog,
    extract::{ExtractedMessage, Extractor},
    po::{PoEntry, parse_po},
    writer::{CatalogHeader, render_entry},
};
use super::{CatalogBackend, write_file};
use crate::core::{
    CatalogError, CatalogResult, LocaleStatus, ManagementResult, ProjectSettings, ProjectType,
    data::{TranslationGroup, TranslationKey, TranslationMap, base_groups, group_entry},
};
use crate::rules::EncodingPolicy;
use crate::utils::{display_path, is_locale_code, modified_time};

const LOCALE_DIR_NAMES: [&str; 2] = ["locale", "locales"];
const MESSAGES_DIR: &str = "LC_MESSAGES";
const DEFAULT_BASE_NAME: &str = "base";

#[derive(Debug)]
pub struct GettextBackend {
    project_dir: PathBuf,
    locale_dir: Option<PathBuf>,
    base_path: Option<PathBuf>,
    catalogs: BTreeMap<String, PathBuf>,
    locales: Vec<String>,
}

impl GettextBackend {
    pub fn new(project_dir: &Path) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            locale_dir: None,
            base_path: None,
            catalogs: BTreeMap::new(),
            locales: Vec::new(),
        }
    }

    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    fn find_locale_dir(&self) -> Option<PathBuf> {
        LOCALE_DIR_NAMES
            .iter()
            .map(|name| self.project_dir.join(name))
            .find(|dir| dir.is_dir())
    }

    fn base_name(&self) -> String {
        self.base_path
            .as_deref()
            .and_then(Path::file_stem)
            .map_or_else(|| DEFAULT_BASE_NAME.to_string(), |s| s.to_string_lossy().into_owned())
    }

    /// Directory catalogs live in: the locale dir, else the base template's dir.
    fn catalog_root(&self) -> PathBuf {
        self.locale_dir
            .clone()
            .or_else(|| self.base_path.as_deref().and_then(Path::parent).map(Path::to_path_buf))
            .unwrap_or_else(|| self.project_dir.join(LOCALE_DIR_NAMES[0]))
    }

    fn catalog_path(&self, locale: &str, extension: &str) -> PathBuf {
        match self.catalogs.get(locale) {
            Some(po) if extension == "po" => po.clone(),
            Some(po) => po.with_extension(extension),
            None => self
                .catalog_root()
                .join(locale)
                .join(MESSAGES_DIR)
                .join(format!("{}.{}", self.base_name(), extension)),
        }
    }
}

/// The single `*.pot` file in `dir`, if the directory has any.
fn templates_in(dir: &Path) -> CatalogResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| CatalogError::io(format!("Failed to read {}", dir.display()), e))?;
    let mut templates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "pot"))
        .collect();
    templates.sort();
    Ok(templates)
}

fn find_base_catalog(project_dir: &Path, locale_dir: Option<&Path>) -> CatalogResult<PathBuf> {
    let mut templates = templates_in(project_dir)?;
    let mut searched = project_dir;
    if templates.is_empty()
        && let Some(dir) = locale_dir
    {
        templates = templates_in(dir)?;
        searched = dir;
    }
    match templates.len() {
        1 => Ok(templates.remove(0)),
        found => Err(CatalogError::BaseCatalogCount {
            dir: searched.to_path_buf(),
            found,
        }),
    }
}

/// Per-locale catalogs under `root` whose file name matches the template.
///
/// The default locale has no catalog of its own: the template is its content.
fn find_catalogs(
    root: &Path,
    base_stem: &str,
    default_locale: &str,
    result: &mut ManagementResult,
) -> BTreeMap<String, PathBuf> {
    let mut catalogs = BTreeMap::new();
    for entry in WalkDir::new(root).sort_by_file_name().into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|e| e != "po") {
            continue;
        }
        let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        if stem != base_stem {
            let message = format!(
                "Skipping {}: file name does not match base catalog {}.pot",
                display_path(path, root),
                base_stem
            );
            warn!("{}", message);
            result.warn(message);
            continue;
        }
        let locale = path
            .parent()
            .and_then(Path::parent)
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !is_locale_code(&locale) {
            let message = format!(
                "Skipping {}: \"{}\" is not a locale code",
                display_path(path, root),
                locale
            );
            warn!("{}", message);
            result.warn(message);
            continue;
        }
        if locale == default_locale {
            debug!(
                "Ignoring {}: the base template holds the default locale",
                display_path(path, root)
            );
            continue;
        }
        catalogs.insert(locale, path.to_path_buf());
    }
    catalogs
}

fn read_entries(path: &Path) -> CatalogResult<Vec<PoEntry>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CatalogError::io(format!("Failed to read {}", path.display()), e))?;
    parse_po(&content, path)
}

fn entry_key(entry: &PoEntry) -> TranslationKey {
    TranslationKey::with_context(entry.context.clone(), entry.msgid.clone())
}

fn apply_provenance(group: &mut TranslationGroup, entry: &PoEntry) {
    if entry.extracted_comment.is_some() {
        group.usage_comment = entry.extracted_comment.clone();
    }
    if entry.translator_comment.is_some() {
        group.translator_comment = entry.translator_comment.clone();
    }
    if !entry.references.is_empty() {
        group.occurrences = entry.references.clone();
    }
}

impl CatalogBackend for GettextBackend {
    fn project_type(&self) -> ProjectType {
        ProjectType::Gettext
    }

    fn encoding_policy(&self) -> EncodingPolicy {
        EncodingPolicy::Escaped
    }

    fn locales(&self) -> &[String] {
        &self.locales
    }

    fn load(
        &mut self,
        settings: &ProjectSettings,
        result: &mut ManagementResult,
    ) -> CatalogResult<TranslationMap> {
        let default_locale = settings.default_locale.as_str();
        let locale_dir = self.find_locale_dir();
        let base_path = find_base_catalog(&self.project_dir, locale_dir.as_deref())?;
        let base_stem = base_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let root = locale_dir
            .clone()
            .or_else(|| base_path.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| self.project_dir.clone());

        let mut map = TranslationMap::new();
        for entry in read_entries(&base_path)? {
            if entry.is_header() || entry.msgid.is_empty() {
                continue;
            }
            let group = group_entry(&mut map, entry_key(&entry), default_locale, true);
            apply_provenance(group, &entry);
        }
        debug!("Base catalog {} has {} entries", base_path.display(), map.len());

        let catalogs = find_catalogs(&root, &base_stem, default_locale, result);
        for (locale, path) in &catalogs {
            for entry in read_entries(path)? {
                if entry.is_header() || entry.msgid.is_empty() {
                    continue;
                }
                let group = group_entry(&mut map, entry_key(&entry), default_locale, false);
                if !group.is_in_base() {
                    apply_provenance(group, &entry);
                }
                group.add(locale, entry.msgstr);
            }
        }

        // Locale directories without a catalog yet still count as locales.
        let mut locales: Vec<String> = catalogs.keys().cloned().collect();
        if let Some(dir) = &locale_dir
            && let Ok(entries) = fs::read_dir(dir)
        {
            for entry in entries.filter_map(Result::ok) {
                let name = entry.file_name().to_string_lossy().into_owned();
                if entry.path().is_dir()
                    && is_locale_code(&name)
                    && name != default_locale
                    && !locales.contains(&name)
                {
                    locales.push(name);
                }
            }
        }
        locales.sort();

        self.locale_dir = locale_dir;
        self.base_path = Some(base_path);
        self.catalogs = catalogs;
        self.locales = locales;
        Ok(map)
    }

    fn write_locale(
        &mut self,
        locale: &str,
        map: &TranslationMap,
        settings: &ProjectSettings,
    ) -> CatalogResult<()> {
        let path = self.catalog_path(locale, "po");
        let now = Local::now();
        let header = CatalogHeader {
            details: &settings.header,
            locale: Some(locale),
            created: self
                .base_path
                .as_deref()
                .and_then(modified_time)
                .unwrap_or(now),
            revised: now,
        };

        let mut content = header.render();
        content.push('\n');
        for group in base_groups(map) {
            content.push_str(&render_entry(group, group.get(locale)));
        }
        let content = format!("{}\n", content.trim_end_matches('\n'));
        write_file(&path, &content)?;

        info!("Wrote {}", path.display());
        self.catalogs.insert(locale.to_string(), path);
        if !self.locales.iter().any(|l| l == locale) {
            self.locales.push(locale.to_string());
            self.locales.sort();
        }
        Ok(())
    }

    fn compile(&mut self, settings: &ProjectSettings, result: &mut ManagementResult) {
        for locale in self.locales.clone() {
            let po = self.catalog_path(locale.as_str(), "po");
            if !po.is_file() {
                result.fail_locale(&locale, "no catalog to compile");
                continue;
            }
            let mo = po.with_extension("mo");
            match compile_catalog(&settings.compiler, &po, &mo) {
                Ok(()) => result.mark_updated(&locale),
                Err(reason) => {
                    warn!("Compiling {} failed: {}", locale, reason);
                    result.fail_locale(&locale, reason);
                }
            }
        }
    }

    fn generate_base(
        &mut self,
        map: &TranslationMap,
        settings: &ProjectSettings,
        result: &mut ManagementResult,
    ) -> CatalogResult<()> {
        if self.locale_dir.is_none() {
            self.locale_dir = self.find_locale_dir();
        }
        let path = match &self.base_path {
            Some(path) => path.clone(),
            None => match find_base_catalog(&self.project_dir, self.locale_dir.as_deref()) {
                Ok(path) => path,
                Err(e) if e.is_absent_catalog() => self
                    .catalog_root()
                    .join(format!("{}.pot", DEFAULT_BASE_NAME)),
                Err(e) => return Err(e),
            },
        };

        let extractor = Extractor::new(&settings.extraction)?;
        let skip: Vec<PathBuf> = self.locale_dir.iter().cloned().collect();
        let mut messages = extractor.extract_dir(&self.project_dir, &skip)?;
        if messages.is_empty() {
            debug!("No source strings found, generating base from memory");
            messages = base_groups(map)
                .map(|group| ExtractedMessage {
                    key: group.key().clone(),
                    comment: group.usage_comment.clone(),
                    occurrences: group.occurrences.clone(),
                })
                .collect();
        }

        let now = Local::now();
        let mut content = CatalogHeader {
            details: &settings.header,
            locale: None,
            created: now,
            revised: now,
        }
        .render();
        for message in &messages {
            let mut group =
                TranslationGroup::new(message.key.clone(), &settings.default_locale, true);
            group.usage_comment = message.comment.clone();
            group.occurrences = message.occurrences.clone();
            content.push('\n');
            content.push_str(render_entry(&group, "").trim_end_matches('\n'));
            content.push('\n');
        }
        write_file(&path, &content)?;

        info!("Wrote {} ({} strings)", path.display(), messages.len());
        result.total_strings = messages.len();
        result.mark_updated(&settings.default_locale);
        self.base_path = Some(path);
        Ok(())
    }

    fn fill_status(&self, _settings: &ProjectSettings, result: &mut ManagementResult) {
        result.locale_dir = self.locale_dir.clone();
        result.base_path = self.base_path.clone();
        result.base_modified = self.base_path.as_deref().and_then(modified_time);
        result.total_locales = self.locales.len();

        for locale in &self.locales {
            let po = self.catalog_path(locale, "po");
            let mo = self.catalog_path(locale, "mo");
            let has_directory = self.catalog_root().join(locale).is_dir();
            result.locale_statuses.insert(
                locale.clone(),
                LocaleStatus {
                    has_directory,
                    has_catalog: po.is_file(),
                    has_compiled: mo.is_file(),
                    catalog_modified: modified_time(&po),
                    compiled_modified: modified_time(&mo),
                    catalog_path: Some(po),
                    compiled_path: Some(mo),
                },
            );
        }
    }
}
