//! Per-action management report.
//!
//! A `ManagementResult` is created when an action starts, filled in while it
//! runs and handed back to the caller. It is never persisted.

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};

use super::ProjectType;
use crate::rules::{DefectGroups, DefectKind, FixSummary};
use crate::utils::display_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Scan and parse, no writes.
    CheckStatus,
    /// Fix what can be fixed, then rewrite locale catalogs.
    WriteCatalog,
    /// Produce runtime artifacts (`.mo`); no-op for formats without one.
    WriteCompiled,
    /// Rebuild the default-locale catalog.
    GenerateBase,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CheckStatus => "check-status",
            Action::WriteCatalog => "write-catalog",
            Action::WriteCompiled => "write-compiled",
            Action::GenerateBase => "generate-base",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Artifacts present on disk for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleStatus {
    pub has_directory: bool,
    pub has_catalog: bool,
    pub has_compiled: bool,
    pub catalog_path: Option<PathBuf>,
    pub compiled_path: Option<PathBuf>,
    pub catalog_modified: Option<DateTime<Local>>,
    pub compiled_modified: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFailure {
    pub locale: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct ManagementResult {
    pub action: Action,
    pub project_dir: PathBuf,
    pub project_type: ProjectType,
    pub started_at: DateTime<Local>,
    pub success: bool,
    pub default_locale: String,
    pub locale_dir: Option<PathBuf>,
    pub base_path: Option<PathBuf>,
    pub base_modified: Option<DateTime<Local>>,
    pub locale_statuses: BTreeMap<String, LocaleStatus>,
    pub failed_locales: Vec<LocaleFailure>,
    pub error_message: Option<String>,
    pub warnings: Vec<String>,
    pub total_strings: usize,
    pub total_locales: usize,
    pub missing_count: usize,
    pub stale_count: usize,
    pub invalid_unicode_count: usize,
    pub invalid_index_count: usize,
    pub updated_locales: Vec<String>,
    pub fixed: FixSummary,
    pub defects: DefectGroups,
}

impl ManagementResult {
    pub fn new(
        action: Action,
        project_dir: &Path,
        project_type: ProjectType,
        default_locale: &str,
    ) -> Self {
        Self {
            action,
            project_dir: project_dir.to_path_buf(),
            project_type,
            started_at: Local::now(),
            success: true,
            default_locale: default_locale.to_string(),
            locale_dir: None,
            base_path: None,
            base_modified: None,
            locale_statuses: BTreeMap::new(),
            failed_locales: Vec::new(),
            error_message: None,
            warnings: Vec::new(),
            total_strings: 0,
            total_locales: 0,
            missing_count: 0,
            stale_count: 0,
            invalid_unicode_count: 0,
            invalid_index_count: 0,
            updated_locales: Vec::new(),
            fixed: FixSummary::default(),
            defects: DefectGroups::default(),
        }
    }

    /// Record a per-locale failure; other locales keep going.
    pub fn fail_locale(&mut self, locale: &str, reason: impl Into<String>) {
        self.failed_locales.push(LocaleFailure {
            locale: locale.to_string(),
            reason: reason.into(),
        });
    }

    /// Append to the error message instead of overwriting it.
    pub fn extend_error(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        self.error_message = Some(match self.error_message.take() {
            Some(existing) => format!("{}\n{}", existing, message),
            None => message.to_string(),
        });
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn mark_updated(&mut self, locale: &str) {
        if !self.updated_locales.iter().any(|l| l == locale) {
            self.updated_locales.push(locale.to_string());
        }
    }

    /// Copy the defect snapshot and its headline counts.
    pub fn record_defects(&mut self, defects: DefectGroups) {
        self.missing_count = defects.slot_count(DefectKind::Missing);
        self.stale_count = defects.count(DefectKind::NotInBase);
        self.invalid_unicode_count = defects.count(DefectKind::InvalidUnicode);
        self.invalid_index_count = defects.count(DefectKind::InvalidFormatIndices);
        self.defects = defects;
    }

    /// Derive the success flag from what happened during the action.
    pub fn finalize(mut self) -> Self {
        self.success = self.error_message.is_none() && self.failed_locales.is_empty();
        self.updated_locales.sort();
        self
    }

    pub fn is_failed(&self, locale: &str) -> bool {
        self.failed_locales.iter().any(|f| f.locale == locale)
    }

    /// True when the project lacks the base catalog or any locale catalog.
    pub fn needs_setup(&self) -> bool {
        self.locale_dir.is_none() || self.base_path.is_none() || self.locale_statuses.is_empty()
    }

    pub fn missing_catalogs(&self) -> Vec<&str> {
        self.locale_statuses
            .iter()
            .filter(|(_, s)| !s.has_catalog)
            .map(|(l, _)| l.as_str())
            .collect()
    }

    /// Always empty for formats loaded without compilation.
    pub fn missing_compiled(&self) -> Vec<&str> {
        if self.project_type == ProjectType::Rails {
            return Vec::new();
        }
        self.locale_statuses
            .iter()
            .filter(|(_, s)| s.has_catalog && !s.has_compiled)
            .map(|(l, _)| l.as_str())
            .collect()
    }

    /// Locales whose catalog is older than the base catalog.
    pub fn outdated_catalogs(&self) -> Vec<&str> {
        let Some(base_modified) = self.base_modified else {
            return Vec::new();
        };
        self.locale_statuses
            .iter()
            .filter(|(_, s)| s.catalog_modified.is_some_and(|m| m < base_modified))
            .map(|(l, _)| l.as_str())
            .collect()
    }

    /// Multi-line, human readable summary.
    pub fn format_status_report(&self) -> String {
        self.to_string()
    }
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl fmt::Display for ManagementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = &self.project_dir;
        writeln!(f, "Project: {} ({})", base.display(), self.project_type)?;
        writeln!(f, "Action: {}", self.action)?;
        writeln!(f, "Default locale: {}", self.default_locale)?;
        match &self.locale_dir {
            Some(dir) => writeln!(f, "Locale directory: {}", display_path(dir, base))?,
            None => writeln!(f, "Locale directory: (not found)")?,
        }
        match (&self.base_path, self.base_modified) {
            (Some(path), Some(modified)) => writeln!(
                f,
                "Base catalog: {} (modified {})",
                display_path(path, base),
                modified.format(TIME_FORMAT)
            )?,
            (Some(path), None) => writeln!(f, "Base catalog: {}", display_path(path, base))?,
            (None, _) => writeln!(f, "Base catalog: (not found)")?,
        }

        writeln!(f, "Locales: {}", self.total_locales)?;
        let outdated = self.outdated_catalogs();
        for (locale, status) in &self.locale_statuses {
            let mark = |present: bool| if present { "yes" } else { "no" };
            let mut line = format!(
                "  {:<8} catalog: {:<3}  compiled: {:<3}",
                locale,
                mark(status.has_catalog),
                mark(status.has_compiled)
            );
            if outdated.contains(&locale.as_str()) {
                line.push_str("  (outdated)");
            }
            writeln!(f, "{}", line.trim_end())?;
        }

        writeln!(
            f,
            "Strings: {}  missing: {}  stale: {}  unicode: {}  indices: {}",
            self.total_strings,
            self.missing_count,
            self.stale_count,
            self.invalid_unicode_count,
            self.invalid_index_count
        )?;

        if !self.updated_locales.is_empty() {
            writeln!(f, "Updated: {}", self.updated_locales.join(", "))?;
        }
        for failure in &self.failed_locales {
            writeln!(f, "Failed: {} ({})", failure.locale, failure.reason)?;
        }
        for warning in &self.warnings {
            writeln!(f, "Warning: {}", warning)?;
        }
        if let Some(error) = &self.error_message {
            writeln!(f, "Error: {}", error)?;
        }
        write!(f, "Status: {}", if self.success { "ok" } else { "failed" })
    }
}
