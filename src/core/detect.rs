//! Project type detection from directory contents.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::debug;
use walkdir::WalkDir;

use super::{ProjectSettings, ProjectType};

const PYTHON_INDICATORS: [&str; 9] = [
    "requirements.txt",
    "setup.py",
    "pyproject.toml",
    "Pipfile",
    "poetry.lock",
    "manage.py",
    "app.py",
    "main.py",
    "__init__.py",
];

const RUBY_INDICATORS: [&str; 11] = [
    "Gemfile",
    "Gemfile.lock",
    "Rakefile",
    "config.ru",
    "config/application.rb",
    "app/controllers",
    "app/models",
    "app/views",
    "db/migrate",
    "config/routes.rb",
    "config/environments",
];

const RAILS_INDICATORS: [&str; 9] = [
    "config/application.rb",
    "config/routes.rb",
    "app/controllers",
    "app/models",
    "app/views",
    "db/migrate",
    "config/environments",
    "config/initializers",
    "config/locales",
];

const RAILS_MIN_INDICATORS: usize = 3;
const SOURCE_SCAN_DEPTH: usize = 4;
const SKIPPED_DIRS: [&str; 6] = [".git", "node_modules", "vendor", "venv", ".venv", "tmp"];

fn count_present(dir: &Path, indicators: &[&str]) -> usize {
    indicators
        .iter()
        .filter(|indicator| dir.join(indicator).exists())
        .count()
}

fn has_source_file(dir: &Path, extension: &str) -> bool {
    WalkDir::new(dir)
        .max_depth(SOURCE_SCAN_DEPTH)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            e.depth() == 0 || !SKIPPED_DIRS.iter().any(|skipped| *skipped == name)
        })
        .filter_map(Result::ok)
        .any(|e| {
            e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == extension)
        })
}

/// Guess the catalog format of `dir`; `None` when nothing points either way.
///
/// A Rails app (several Rails markers) wins over stray Python files; after
/// that, Python markers are checked before Ruby ones.
pub fn detect_project_type(dir: &Path) -> Option<ProjectType> {
    if !dir.is_dir() {
        return None;
    }
    let rails = count_present(dir, &RAILS_INDICATORS);
    if rails >= RAILS_MIN_INDICATORS {
        debug!("{} has {} Rails indicators", dir.display(), rails);
        return Some(ProjectType::Rails);
    }
    if count_present(dir, &PYTHON_INDICATORS) > 0 {
        return Some(ProjectType::Gettext);
    }
    if count_present(dir, &RUBY_INDICATORS) > 0 {
        return Some(ProjectType::Rails);
    }
    if has_source_file(dir, "py") {
        return Some(ProjectType::Gettext);
    }
    if has_source_file(dir, "rb") {
        return Some(ProjectType::Rails);
    }
    None
}

/// Caches detection results per directory.
#[derive(Debug, Default)]
pub struct ProjectDetector {
    cache: Mutex<HashMap<PathBuf, Option<ProjectType>>>,
}

impl ProjectDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detect(&self, dir: &Path) -> Option<ProjectType> {
        if let Ok(cache) = self.cache.lock()
            && let Some(cached) = cache.get(dir)
        {
            return *cached;
        }
        let detected = detect_project_type(dir);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(dir.to_path_buf(), detected);
        }
        detected
    }

    /// Explicit override, then the saved type, then detection, then gettext.
    pub fn resolve(&self, dir: &Path, settings: &ProjectSettings) -> ProjectType {
        settings
            .project_type
            .or(settings.saved_project_type)
            .or_else(|| self.detect(dir))
            .unwrap_or(ProjectType::Gettext)
    }

    /// Forget cached results, e.g. after the project directory changed.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}
