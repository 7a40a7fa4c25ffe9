//! Per-project inputs supplied to the engine by its caller.
//!
//! The engine never reads these from disk itself; the config layer builds
//! them (see `config::FileSettingsSource`).

use std::{fmt, path::Path, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::rules::cjk::DEFAULT_CJK_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Gettext,
    Rails,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Gettext => "gettext",
            ProjectType::Rails => "rails",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gettext" | "python" | "po" => Ok(ProjectType::Gettext),
            "rails" | "ruby" | "yaml" => Ok(ProjectType::Rails),
            other => Err(format!("unknown project type: {}", other)),
        }
    }
}

/// Source string extraction for gettext base generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Globs, relative to the project root, of files to scan.
    pub patterns: Vec<String>,
    /// Function names whose first string argument is translatable.
    pub keywords: Vec<String>,
    /// Comment prefix marking notes for translators.
    pub comment_tag: String,
    /// Directory names never descended into.
    pub ignore_dirs: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            patterns: vec!["**/*.py".to_string()],
            keywords: ["_", "gettext", "ngettext", "pgettext"].map(String::from).to_vec(),
            comment_tag: "TRANSLATORS:".to_string(),
            ignore_dirs: [".git", "__pycache__", "node_modules", "venv", ".venv", "build", "dist"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Values written into catalog headers.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderDetails {
    pub application_name: String,
    pub version: String,
    pub first_author: String,
    pub last_translator: String,
    pub team_email: String,
}

impl Default for HeaderDetails {
    fn default() -> Self {
        Self {
            application_name: "APPLICATION".to_string(),
            version: "1.0".to_string(),
            first_author: "FIRST AUTHOR <EMAIL@ADDRESS>".to_string(),
            last_translator: "FULL NAME <EMAIL@ADDRESS>".to_string(),
            team_email: "EMAIL".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSettings {
    pub default_locale: String,
    /// Explicit type chosen for this run; wins over everything else.
    pub project_type: Option<ProjectType>,
    /// Type remembered from an earlier session.
    pub saved_project_type: Option<ProjectType>,
    pub cjk_threshold: f64,
    pub extraction: ExtractionConfig,
    pub header: HeaderDetails,
    /// Program turning `.po` into `.mo`.
    pub compiler: String,
    pub vcs_timeout: Duration,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            project_type: None,
            saved_project_type: None,
            cjk_threshold: DEFAULT_CJK_THRESHOLD,
            extraction: ExtractionConfig::default(),
            header: HeaderDetails::default(),
            compiler: "msgfmt".to_string(),
            vcs_timeout: Duration::from_secs(10),
        }
    }
}

/// Supplies settings for projects other than the one being worked on.
pub trait SettingsSource: Sync {
    fn settings_for(&self, project_dir: &Path) -> ProjectSettings;
}

/// Every project gets the same settings.
#[derive(Debug, Clone, Default)]
pub struct FixedSettings(pub ProjectSettings);

impl SettingsSource for FixedSettings {
    fn settings_for(&self, _project_dir: &Path) -> ProjectSettings {
        self.0.clone()
    }
}
