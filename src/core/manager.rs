//! The façade every caller goes through: one action per call, one report back.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use super::{
    Action, CatalogResult, ManagementResult, ProjectSettings, ProjectType,
    backend::{Backend, CatalogBackend, ParityReport},
    data::{TranslationMap, base_groups},
    detect::ProjectDetector,
    snapshot::{ContentDiff, ContentSnapshot},
};
use crate::rules::{
    DefectGroups, DefectOptions,
    defects::fix_defects,
    hardcoded::{self, HardcodedString},
};

/// Owns one project's backend and in-memory translations.
///
/// Not meant to be shared between threads; callers serialize access.
#[derive(Debug)]
pub struct TranslationManager {
    project_dir: PathBuf,
    settings: ProjectSettings,
    backend: Backend,
    translations: TranslationMap,
    written_locales: BTreeSet<String>,
    loaded: bool,
}

impl TranslationManager {
    pub fn new(project_dir: &Path, settings: ProjectSettings, project_type: ProjectType) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            backend: Backend::new(project_type, project_dir),
            settings,
            translations: TranslationMap::new(),
            written_locales: BTreeSet::new(),
            loaded: false,
        }
    }

    /// Build a manager whose type comes from `detector`.
    pub fn detect(project_dir: &Path, settings: ProjectSettings, detector: &ProjectDetector) -> Self {
        let project_type = detector.resolve(project_dir, &settings);
        debug!("{} resolved as {}", project_dir.display(), project_type);
        Self::new(project_dir, settings, project_type)
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn project_type(&self) -> ProjectType {
        self.backend.project_type()
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    pub fn default_locale(&self) -> &str {
        &self.settings.default_locale
    }

    /// Locales known to the backend, sorted.
    pub fn locales(&self) -> &[String] {
        self.backend.locales()
    }

    /// Known locales other than the default.
    pub fn target_locales(&self) -> Vec<String> {
        self.locales()
            .iter()
            .filter(|l| **l != self.settings.default_locale)
            .cloned()
            .collect()
    }

    pub fn translations(&self) -> &TranslationMap {
        &self.translations
    }

    pub fn translations_mut(&mut self) -> &mut TranslationMap {
        &mut self.translations
    }

    pub fn written_locales(&self) -> &BTreeSet<String> {
        &self.written_locales
    }

    /// Point the manager at another project; all per-project state is dropped.
    pub fn set_project_dir(&mut self, project_dir: &Path, project_type: ProjectType) {
        *self = Self::new(project_dir, self.settings.clone(), project_type);
    }

    /// Run one action and report on it.
    ///
    /// `locales` narrows WRITE_CATALOG; `None` writes every known locale.
    pub fn manage(&mut self, action: Action, locales: Option<&[String]>) -> ManagementResult {
        let mut result = ManagementResult::new(
            action,
            &self.project_dir,
            self.project_type(),
            &self.settings.default_locale,
        );

        match action {
            Action::CheckStatus => self.reload(&mut result),
            Action::WriteCatalog => {
                if self.ensure_loaded(&mut result) {
                    self.write_catalogs(locales, &mut result);
                }
            }
            Action::WriteCompiled => {
                if self.ensure_loaded(&mut result) {
                    self.backend.compile(&self.settings, &mut result);
                }
            }
            Action::GenerateBase => {
                if self.prepare_generate(&mut result)
                    && let Err(e) =
                        self.backend
                            .generate_base(&self.translations, &self.settings, &mut result)
                {
                    warn!("Generating base for {} failed: {}", self.project_dir.display(), e);
                    result.extend_error(e.to_string());
                }
            }
        }

        self.backend.fill_status(&self.settings, &mut result);
        if action != Action::GenerateBase {
            result.total_strings = base_groups(&self.translations).count();
        }
        result.record_defects(self.collect_defects());
        result.finalize()
    }

    /// Current defect groupings of the in-memory map.
    pub fn collect_defects(&self) -> DefectGroups {
        let mut options = DefectOptions::new(self.backend.encoding_policy(), self.target_locales());
        options.cjk_threshold = self.settings.cjk_threshold;
        options.report_not_in_base = !self.all_locales_written();
        DefectGroups::collect(&self.translations, &options)
    }

    /// Rails file-set comparison; `None` for formats without one.
    pub fn parity_report(&self) -> Option<ParityReport> {
        match &self.backend {
            Backend::Rails(rails) => Some(rails.check_parity()),
            Backend::Gettext(_) => None,
        }
    }

    /// UI strings in the project's sources that no translation call wraps.
    pub fn find_hardcoded(&self) -> Vec<HardcodedString> {
        hardcoded::find_hardcoded(&self.project_dir, self.project_type(), &self.settings)
    }

    /// Regenerate the base catalog, reload, and report what content changed.
    ///
    /// The diff is empty when generation or the reload after it failed.
    pub fn regenerate_and_detect_changes(&mut self) -> (ManagementResult, ContentDiff) {
        if !self.loaded {
            self.manage(Action::CheckStatus, None);
        }
        let before = ContentSnapshot::capture(&self.translations);
        let mut result = self.manage(Action::GenerateBase, None);
        if !result.success {
            return (result, ContentDiff::default());
        }

        let reloaded = self.manage(Action::CheckStatus, None);
        if let Some(error) = reloaded.error_message {
            result.extend_error(format!("Failed to reload translations: {}", error));
            return (result.finalize(), ContentDiff::default());
        }
        let after = ContentSnapshot::capture(&self.translations);
        (result, before.diff(&after))
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Read every catalog; the previous map survives a failure but no longer
    /// counts as loaded, so writes reload before touching disk.
    fn load(&mut self, result: &mut ManagementResult) -> CatalogResult<()> {
        match self.backend.load(&self.settings, result) {
            Ok(map) => {
                debug!(
                    "Loaded {} keys from {}",
                    map.len(),
                    self.project_dir.display()
                );
                self.translations = map;
                self.written_locales.clear();
                self.loaded = true;
                Ok(())
            }
            Err(e) => {
                self.loaded = false;
                Err(e)
            }
        }
    }

    fn reload(&mut self, result: &mut ManagementResult) {
        if let Err(e) = self.load(result) {
            warn!("Loading {} failed: {}", self.project_dir.display(), e);
            result.extend_error(e.to_string());
        }
    }

    /// Load before generating; only a project with no catalogs at all may
    /// proceed without a successful load.
    fn prepare_generate(&mut self, result: &mut ManagementResult) -> bool {
        if self.loaded {
            return true;
        }
        match self.load(result) {
            Ok(()) => true,
            Err(e) if e.is_absent_catalog() => {
                debug!("No catalogs in {} yet: {}", self.project_dir.display(), e);
                true
            }
            Err(e) => {
                warn!(
                    "Not generating base for {}: existing catalogs failed to load: {}",
                    self.project_dir.display(),
                    e
                );
                result.extend_error(e.to_string());
                false
            }
        }
    }

    fn ensure_loaded(&mut self, result: &mut ManagementResult) -> bool {
        if !self.loaded {
            self.reload(result);
        }
        self.loaded
    }

    fn all_locales_written(&self) -> bool {
        let locales = self.backend.locales();
        !locales.is_empty() && locales.iter().all(|l| self.written_locales.contains(l))
    }

    fn write_catalogs(&mut self, locales: Option<&[String]>, result: &mut ManagementResult) {
        result.fixed = fix_defects(&mut self.translations, self.backend.encoding_policy());
        if result.fixed.total() > 0 {
            info!("Fixed {} values before writing", result.fixed.total());
        }

        let targets: Vec<String> = match locales {
            Some(locales) => locales.to_vec(),
            None => self.backend.locales().to_vec(),
        };
        for locale in targets {
            match self
                .backend
                .write_locale(&locale, &self.translations, &self.settings)
            {
                Ok(()) => {
                    result.mark_updated(&locale);
                    self.written_locales.insert(locale);
                }
                Err(e) => {
                    warn!("Writing {} failed: {}", locale, e);
                    result.fail_locale(&locale, e.to_string());
                }
            }
        }

        if self.all_locales_written() {
            let before = self.translations.len();
            self.translations.retain(|_, group| group.is_in_base());
            let purged = before - self.translations.len();
            if purged > 0 {
                debug!("Purged {} stale keys", purged);
            }
        }
    }
}
