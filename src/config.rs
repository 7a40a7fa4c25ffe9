use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{
    ExtractionConfig, HeaderDetails, ProjectSettings, ProjectType, SettingsSource,
};
use crate::rules::cjk::DEFAULT_CJK_THRESHOLD;
use crate::utils::is_locale_code;

pub const CONFIG_FILE_NAME: &str = ".lexisrc.json";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_locale")]
    pub default_locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
    #[serde(default = "default_cjk_threshold")]
    pub cjk_threshold: f64,
    #[serde(default)]
    pub extraction: ExtractionSection,
    #[serde(default)]
    pub header: HeaderSection,
    #[serde(default = "default_compiler")]
    pub compiler: String,
    #[serde(default = "default_vcs_timeout_secs")]
    pub vcs_timeout_secs: u64,
    /// Sibling projects for `match` and `bulk`, relative to the config file.
    #[serde(default)]
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionSection {
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    #[serde(default = "default_comment_tag")]
    pub comment_tag: String,
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderSection {
    #[serde(default = "default_application_name")]
    pub application_name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_first_author")]
    pub first_author: String,
    #[serde(default = "default_last_translator")]
    pub last_translator: String,
    #[serde(default = "default_team")]
    pub team: String,
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_cjk_threshold() -> f64 {
    DEFAULT_CJK_THRESHOLD
}

fn default_compiler() -> String {
    ProjectSettings::default().compiler
}

fn default_vcs_timeout_secs() -> u64 {
    ProjectSettings::default().vcs_timeout.as_secs()
}

fn default_patterns() -> Vec<String> {
    ExtractionConfig::default().patterns
}

fn default_keywords() -> Vec<String> {
    ExtractionConfig::default().keywords
}

fn default_comment_tag() -> String {
    ExtractionConfig::default().comment_tag
}

fn default_ignore() -> Vec<String> {
    ExtractionConfig::default().ignore_dirs
}

fn default_application_name() -> String {
    HeaderDetails::default().application_name
}

fn default_version() -> String {
    HeaderDetails::default().version
}

fn default_first_author() -> String {
    HeaderDetails::default().first_author
}

fn default_last_translator() -> String {
    HeaderDetails::default().last_translator
}

fn default_team() -> String {
    HeaderDetails::default().team_email
}

impl Default for ExtractionSection {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            keywords: default_keywords(),
            comment_tag: default_comment_tag(),
            ignore: default_ignore(),
        }
    }
}

impl Default for HeaderSection {
    fn default() -> Self {
        Self {
            application_name: default_application_name(),
            version: default_version(),
            first_author: default_first_author(),
            last_translator: default_last_translator(),
            team: default_team(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            project_type: None,
            cjk_threshold: default_cjk_threshold(),
            extraction: ExtractionSection::default(),
            header: HeaderSection::default(),
            compiler: default_compiler(),
            vcs_timeout_secs: default_vcs_timeout_secs(),
            projects: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for a malformed locale code, a threshold outside
    /// `0.0..=1.0`, an invalid extraction glob or an empty keyword list.
    pub fn validate(&self) -> Result<()> {
        if !is_locale_code(&self.default_locale) {
            bail!(
                "Invalid locale code in 'defaultLocale': \"{}\"",
                self.default_locale
            );
        }
        if !(0.0..=1.0).contains(&self.cjk_threshold) {
            bail!(
                "'cjkThreshold' must be between 0.0 and 1.0, got {}",
                self.cjk_threshold
            );
        }
        for pattern in &self.extraction.patterns {
            Pattern::new(pattern).with_context(|| {
                format!("Invalid glob pattern in 'extraction.patterns': \"{}\"", pattern)
            })?;
        }
        if self.extraction.keywords.iter().all(|k| k.trim().is_empty()) {
            bail!("'extraction.keywords' must name at least one function");
        }
        Ok(())
    }

    /// The engine's view of this configuration.
    pub fn to_settings(&self) -> ProjectSettings {
        ProjectSettings {
            default_locale: self.default_locale.clone(),
            project_type: self.project_type,
            saved_project_type: None,
            cjk_threshold: self.cjk_threshold,
            extraction: ExtractionConfig {
                patterns: self.extraction.patterns.clone(),
                keywords: self.extraction.keywords.clone(),
                comment_tag: self.extraction.comment_tag.clone(),
                ignore_dirs: self.extraction.ignore.clone(),
            },
            header: HeaderDetails {
                application_name: self.header.application_name.clone(),
                version: self.header.version.clone(),
                first_author: self.header.first_author.clone(),
                last_translator: self.header.last_translator.clone(),
                team_email: self.header.team.clone(),
            },
            compiler: self.compiler.clone(),
            vcs_timeout: Duration::from_secs(self.vcs_timeout_secs),
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// The file the config came from; `None` when using defaults.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    pub fn from_file(&self) -> bool {
        self.path.is_some()
    }

    /// `projects` entries resolved against the config file's directory.
    pub fn project_paths(&self, fallback_base: &Path) -> Vec<PathBuf> {
        let base = self
            .path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(fallback_base);
        self.config
            .projects
            .iter()
            .map(|project| base.join(project))
            .collect()
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}

/// Settings for sibling projects, read from each project's own config file.
///
/// Projects without a config file (or with a broken one) get `fallback`.
#[derive(Debug, Clone)]
pub struct FileSettingsSource {
    fallback: ProjectSettings,
}

impl FileSettingsSource {
    pub fn new(fallback: ProjectSettings) -> Self {
        Self { fallback }
    }
}

impl SettingsSource for FileSettingsSource {
    fn settings_for(&self, project_dir: &Path) -> ProjectSettings {
        match load_config(project_dir) {
            Ok(loaded) if loaded.from_file() => loaded.config.to_settings(),
            Ok(_) => self.fallback.clone(),
            Err(e) => {
                warn!("Ignoring config for {}: {:#}", project_dir.display(), e);
                self.fallback.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_locale, "en");
        assert_eq!(config.cjk_threshold, 0.3);
        assert_eq!(config.extraction.patterns, vec!["**/*.py"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "defaultLocale": "de",
              "projectType": "rails",
              "extraction": { "keywords": ["_", "t"] },
              "header": { "applicationName": "Shop" },
              "vcsTimeoutSecs": 3
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.default_locale, "de");
        assert_eq!(config.project_type, Some(ProjectType::Rails));
        assert_eq!(config.extraction.keywords, vec!["_", "t"]);
        assert_eq!(config.extraction.comment_tag, "TRANSLATORS:");
        assert_eq!(config.header.application_name, "Shop");
        assert_eq!(config.header.version, "1.0");

        let settings = config.to_settings();
        assert_eq!(settings.vcs_timeout, Duration::from_secs(3));
        assert_eq!(settings.header.application_name, "Shop");
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("app").join("views");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file());
        assert_eq!(result.config, Config::default());
    }

    #[test]
    fn test_load_config_rejects_bad_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_path, r#"{ "defaultLocale": "english" }"#).unwrap();
        let err = load_config(dir.path()).err().unwrap();
        assert!(err.to_string().contains("defaultLocale"));

        fs::write(&config_path, r#"{ "cjkThreshold": 1.5 }"#).unwrap();
        assert!(load_config(dir.path()).is_err());

        fs::write(&config_path, r#"{ "extraction": { "patterns": ["[bad"] } }"#).unwrap();
        let err = load_config(dir.path()).err().unwrap();
        assert!(err.to_string().contains("extraction.patterns"));
    }

    #[test]
    fn test_project_paths_resolve_against_config_dir() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "projects": ["../shop", "admin"] }"#,
        )
        .unwrap();
        let sub = dir.path().join("src");
        fs::create_dir_all(&sub).unwrap();

        let loaded = load_config(&sub).unwrap();
        assert_eq!(
            loaded.project_paths(&sub),
            vec![dir.path().join("../shop"), dir.path().join("admin")]
        );
    }

    #[test]
    fn test_file_settings_source() {
        let configured = tempdir().unwrap();
        fs::write(
            configured.path().join(CONFIG_FILE_NAME),
            r#"{ "defaultLocale": "fr" }"#,
        )
        .unwrap();
        let bare = tempdir().unwrap();
        fs::create_dir(bare.path().join(".git")).unwrap();

        let fallback = ProjectSettings {
            default_locale: "es".to_string(),
            ..Default::default()
        };
        let source = FileSettingsSource::new(fallback);

        assert_eq!(source.settings_for(configured.path()).default_locale, "fr");
        assert_eq!(source.settings_for(bare.path()).default_locale, "es");
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let json = default_config_json().unwrap();
        assert!(json.contains("defaultLocale"));
        assert!(json.contains("vcsTimeoutSecs"));
        assert!(!json.contains("projectType"));
    }
}
