use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

mod bulk;
mod generate;
mod hardcoded;
mod init;
mod matching;
mod parity;
mod status;
mod write;

const BIN_NAME: &str = "lexis";

pub const POT: &str = r#"msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"

msgid "Hello {0}"
msgstr ""

msgid "Save"
msgstr ""
"#;

pub const FR_PO: &str = r#"msgid ""
msgstr ""
"Language: fr\n"

msgid "Hello {0}"
msgstr "Bonjour {0}"

msgid "Save"
msgstr "Enregistrer"
"#;

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Keeps config lookup from walking above the test project.
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn with_file(path: &str, content: &str) -> Result<Self> {
        let test = Self::new()?;
        test.write_file(path, content)?;
        Ok(test)
    }

    /// gettext project with a base template and a complete French catalog.
    pub fn gettext() -> Result<Self> {
        let test = Self::with_file("app.py", "print(_(\"Save\"))\n")?;
        test.write_file("locale/messages.pot", POT)?;
        test.write_file("locale/fr/LC_MESSAGES/messages.po", FR_PO)?;
        Ok(test)
    }

    /// Rails project with `en` and `de` locale directories.
    pub fn rails() -> Result<Self> {
        let test = Self::with_file("Gemfile", "source \"https://rubygems.org\"\n")?;
        test.write_file(
            "config/locales/en/app.yml",
            "en:\n  greeting: \"Hello\"\n  nav:\n    home: \"Home\"\n",
        )?;
        test.write_file("config/locales/de/app.yml", "de:\n  greeting: \"Hallo\"\n")?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self.command().args(args).output()?;
        Ok(CommandOutput::from(output))
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}

/// Captured process output with lossy UTF-8 text.
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl CommandOutput {
    #[track_caller]
    pub fn assert_code(&self, expected: i32) -> &Self {
        assert_eq!(
            self.code,
            Some(expected),
            "unexpected exit code\nstdout:\n{}\nstderr:\n{}",
            self.stdout,
            self.stderr
        );
        self
    }
}
