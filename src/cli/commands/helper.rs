use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::super::args::CommonArgs;
use crate::config::{ConfigLoadResult, FileSettingsSource, load_config};
use crate::core::{
    ManagementResult, ProjectDetector, ProjectSettings, SettingsSource, TranslationManager,
};
use crate::utils::is_locale_code;

/// A project opened from the command line.
pub struct Project {
    pub dir: PathBuf,
    pub manager: TranslationManager,
}

pub fn project_dir(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("Project directory not found: {}", path.display()))
}

pub fn validate_overrides(common: &CommonArgs) -> Result<()> {
    if let Some(locale) = &common.default_locale
        && !is_locale_code(locale)
    {
        bail!("Invalid locale code in '--default-locale': \"{}\"", locale);
    }
    Ok(())
}

fn apply_overrides(settings: &mut ProjectSettings, common: &CommonArgs) {
    if let Some(locale) = &common.default_locale {
        settings.default_locale = locale.clone();
    }
    if common.project_type.is_some() {
        settings.project_type = common.project_type;
    }
}

/// Config file values with command-line overrides applied.
pub fn project_settings(config: &ConfigLoadResult, common: &CommonArgs) -> Result<ProjectSettings> {
    validate_overrides(common)?;
    let mut settings = config.config.to_settings();
    apply_overrides(&mut settings, common);
    Ok(settings)
}

pub fn open_project(path: &Path, common: &CommonArgs) -> Result<Project> {
    let dir = project_dir(path)?;
    let config = load_config(&dir)?;
    let settings = project_settings(&config, common)?;
    let manager = TranslationManager::detect(&dir, settings, &ProjectDetector::new());
    Ok(Project { dir, manager })
}

/// Each project's own config file, with the command-line overrides on top.
pub struct CliSettings {
    files: FileSettingsSource,
    common: CommonArgs,
}

impl CliSettings {
    pub fn new(common: &CommonArgs) -> Result<Self> {
        validate_overrides(common)?;
        Ok(Self {
            files: FileSettingsSource::new(ProjectSettings::default()),
            common: common.clone(),
        })
    }
}

impl SettingsSource for CliSettings {
    fn settings_for(&self, project_dir: &Path) -> ProjectSettings {
        let mut settings = self.files.settings_for(project_dir);
        apply_overrides(&mut settings, &self.common);
        settings
    }
}

/// Slots affected by defects that count as errors.
pub fn defect_problems(result: &ManagementResult) -> usize {
    result
        .defects
        .iter()
        .filter(|(kind, _)| !kind.is_advisory())
        .map(|(kind, _)| result.defects.slot_count(kind))
        .sum()
}

/// Whether the result holds a structural error rather than per-locale failures.
pub fn is_fatal(result: &ManagementResult) -> bool {
    result.error_message.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE_NAME;
    use crate::core::ProjectType;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cli_settings_override_config() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "defaultLocale": "fr", "cjkThreshold": 0.5 }"#,
        )
        .unwrap();

        let common = CommonArgs {
            default_locale: Some("de".to_string()),
            project_type: Some(ProjectType::Rails),
            verbose: false,
        };
        let settings = CliSettings::new(&common).unwrap().settings_for(dir.path());
        assert_eq!(settings.default_locale, "de");
        assert_eq!(settings.project_type, Some(ProjectType::Rails));
        assert_eq!(settings.cjk_threshold, 0.5);
    }

    #[test]
    fn test_invalid_locale_override() {
        let common = CommonArgs {
            default_locale: Some("english".to_string()),
            ..Default::default()
        };
        assert!(CliSettings::new(&common).is_err());
    }
}
