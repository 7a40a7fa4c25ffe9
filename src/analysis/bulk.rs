//! Bulk analysis: regenerate every project's base and count what is missing.

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::vcs::{VcsStatus, vcs_status};
use crate::core::{
    Action, ContentDiff, ProjectDetector, ProjectType, SettingsSource, TranslationManager,
    data::base_groups,
};

/// Outcome for one project.
#[derive(Debug, Clone)]
pub struct ProjectAnalysis {
    pub project_dir: PathBuf,
    pub name: String,
    pub project_type: ProjectType,
    pub vcs: VcsStatus,
    /// Regenerating the base changed keys or values.
    pub base_changed: bool,
    pub changes: ContentDiff,
    pub total_strings: usize,
    /// Missing base keys per non-default locale.
    pub missing_by_locale: BTreeMap<String, usize>,
    pub error: Option<String>,
}

impl ProjectAnalysis {
    fn new(project_dir: &Path, project_type: ProjectType) -> Self {
        let name = project_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| project_dir.display().to_string());
        Self {
            project_dir: project_dir.to_path_buf(),
            name,
            project_type,
            vcs: VcsStatus::Unknown,
            base_changed: false,
            changes: ContentDiff::default(),
            total_strings: 0,
            missing_by_locale: BTreeMap::new(),
            error: None,
        }
    }

    pub fn missing_total(&self) -> usize {
        self.missing_by_locale.values().sum()
    }

    pub fn has_missing(&self) -> bool {
        self.missing_total() > 0
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Failed or missing translations.
    pub fn needs_attention(&self) -> bool {
        self.is_failed() || self.has_missing()
    }

    pub fn locales_with_missing(&self) -> Vec<&str> {
        self.missing_by_locale
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(locale, _)| locale.as_str())
            .collect()
    }
}

/// Run the bulk steps on one already-created manager.
pub fn analyze_project(manager: &mut TranslationManager) -> ProjectAnalysis {
    let dir = manager.project_dir().to_path_buf();
    let mut analysis = ProjectAnalysis::new(&dir, manager.project_type());
    analysis.vcs = vcs_status(&dir, manager.settings().vcs_timeout);

    let status = manager.manage(Action::CheckStatus, None);
    let (generated, changes) = manager.regenerate_and_detect_changes();
    if !generated.success {
        let reason = generated
            .error_message
            .unwrap_or_else(|| "base generation failed".to_string());
        analysis.error = Some(match status.error_message {
            Some(_) if !manager.is_loaded() => {
                format!("Failed to reload translations: {}", reason)
            }
            _ => reason,
        });
        warn!("{}: {}", analysis.name, analysis.error.as_deref().unwrap_or_default());
        return analysis;
    }
    analysis.base_changed = !changes.is_empty();
    analysis.changes = changes;

    let translations = manager.translations();
    analysis.total_strings = base_groups(translations).count();
    for locale in manager.target_locales() {
        let missing = base_groups(translations)
            .filter(|group| group.is_missing(&locale))
            .count();
        analysis.missing_by_locale.insert(locale, missing);
    }
    debug!(
        "{}: {} strings, {} missing",
        analysis.name,
        analysis.total_strings,
        analysis.missing_total()
    );
    analysis
}

/// Failed projects and those with missing translations first, then by name
/// ignoring case.
pub fn sort_analyses(analyses: &mut [ProjectAnalysis]) {
    analyses.sort_by(|a, b| {
        b.needs_attention()
            .cmp(&a.needs_attention())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

/// Keeps one manager per project across runs.
pub struct BulkAnalyzer<'a> {
    settings: &'a dyn SettingsSource,
    detector: ProjectDetector,
    managers: HashMap<PathBuf, TranslationManager>,
}

impl<'a> BulkAnalyzer<'a> {
    pub fn new(settings: &'a dyn SettingsSource) -> Self {
        Self {
            settings,
            detector: ProjectDetector::new(),
            managers: HashMap::new(),
        }
    }

    /// Analyze `projects` in parallel; each project keeps its own manager.
    pub fn analyze_all(&mut self, projects: &[PathBuf]) -> Vec<ProjectAnalysis> {
        let mut unique: Vec<PathBuf> = projects.to_vec();
        unique.sort();
        unique.dedup();

        let jobs: Vec<(PathBuf, Option<TranslationManager>)> = unique
            .into_iter()
            .map(|dir| {
                let cached = self.managers.remove(&dir);
                (dir, cached)
            })
            .collect();

        let settings = self.settings;
        let detector = &self.detector;
        let finished: Vec<(ProjectAnalysis, TranslationManager)> = jobs
            .into_par_iter()
            .map(|(dir, cached)| {
                let mut manager = cached.unwrap_or_else(|| {
                    TranslationManager::detect(&dir, settings.settings_for(&dir), detector)
                });
                let analysis = analyze_project(&mut manager);
                (analysis, manager)
            })
            .collect();

        let mut analyses = Vec::with_capacity(finished.len());
        for (analysis, manager) in finished {
            self.managers
                .insert(manager.project_dir().to_path_buf(), manager);
            analyses.push(analysis);
        }
        sort_analyses(&mut analyses);
        info!("Bulk analysis finished for {} projects", analyses.len());
        analyses
    }

    pub fn cached_projects(&self) -> usize {
        self.managers.len()
    }

    pub fn clear(&mut self) {
        self.managers.clear();
        self.detector.clear();
    }
}
