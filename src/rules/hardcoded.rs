//! Hardcoded UI text: string literals handed to widget or view helpers
//! without a translation call around them.
//!
//! Detection is line-oriented regex matching over source files, so it reports
//! candidates rather than proof. A literal that the same file also passes to
//! a translation call anywhere is treated as translated.

use std::{collections::HashSet, fs, path::Path, sync::LazyLock};

use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::{ProjectSettings, ProjectType, backend::gettext::extract::source_patterns};
use crate::utils::{build_line_index, display_path, has_letters, offset_to_line};

/// Qt widgets and setters whose string arguments end up on screen.
static QT_UI_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"\b(?:QLabel|QPushButton|QCheckBox|QRadioButton|QGroupBox)\(\s*["']([^"'\n]+)["']"#,
        r#"|\b(?:setWindowTitle|setText|setTitle|setPlaceholderText|setToolTip)\(\s*["']([^"'\n]+)["']"#,
        r#"|\bQMessageBox\.(?:information|warning|critical|question)\([^,\n]+,\s*["']([^"'\n]+)["']\s*,\s*["']([^"'\n]+)["']"#,
        r#"|\baddTab\([^,\n]+,\s*["']([^"'\n]+)["']"#,
    ))
    .unwrap()
});

/// Rails view helpers, form builders and flash assignments.
static RUBY_UI_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"\b(?:label|button|title|text|placeholder)\(\s*["']([^"'\n]+)["']\s*\)"#,
        r#"|\bflash(?:\.now)?\[\s*:?["']?\w+["']?\s*\]\s*=\s*["']([^"'\n]+)["']"#,
        r#"|\bflash\.(?:notice|alert|error)\s*=\s*["']([^"'\n]+)["']"#,
        r#"|\bcontent_tag[\s(][^,\n]+,\s*["']([^"'\n]+)["']"#,
        r#"|\blink_to[\s(]\s*["']([^"'\n]+)["']"#,
        r#"|\boptions_for_select\([^,\n]*,\s*["']([^"'\n]+)["']"#,
    ))
    .unwrap()
});

static GETTEXT_WRAPPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b_\(\s*["']([^"'\n]+)["']\s*\)"#).unwrap());

static RAILS_WRAPPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:_|t|I18n\.t)\(\s*["']([^"'\n]+)["']\s*\)|\b_["']([^"'\n]+)["']"#).unwrap()
});

const RUBY_SOURCES: [&str; 2] = ["**/*.rb", "**/*.erb"];

/// Rails directories that hold no application source.
const RAILS_SKIPPED_DIRS: [&str; 4] = ["vendor", "tmp", "log", "node_modules"];

/// A UI string literal with no translation call around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardcodedString {
    /// Path relative to the project root, `/`-separated.
    pub file: String,
    pub line: usize,
    pub text: String,
}

/// Regexes for one project type.
struct SourceRules {
    ui_text: &'static Regex,
    wrapped: &'static Regex,
}

impl SourceRules {
    fn for_type(project_type: ProjectType) -> Self {
        match project_type {
            ProjectType::Gettext => Self {
                ui_text: &QT_UI_TEXT,
                wrapped: &GETTEXT_WRAPPED,
            },
            ProjectType::Rails => Self {
                ui_text: &RUBY_UI_TEXT,
                wrapped: &RAILS_WRAPPED,
            },
        }
    }
}

/// Candidates in one source text, in source order.
pub fn check_source(project_type: ProjectType, source: &str, file: &str) -> Vec<HardcodedString> {
    let rules = SourceRules::for_type(project_type);

    let mut translated: HashSet<&str> = HashSet::new();
    for caps in rules.wrapped.captures_iter(source) {
        translated.extend(caps.iter().skip(1).flatten().map(|m| m.as_str()));
    }

    let line_index = build_line_index(source);
    let mut found = Vec::new();
    for caps in rules.ui_text.captures_iter(source) {
        for text in caps.iter().skip(1).flatten() {
            if !has_letters(text.as_str()) || translated.contains(text.as_str()) {
                continue;
            }
            found.push(HardcodedString {
                file: file.to_string(),
                line: offset_to_line(&line_index, text.start()),
                text: text.as_str().to_string(),
            });
        }
    }
    found
}

/// Scan a project's source files, ordered by path then line.
///
/// Gettext projects scan the extraction globs; Rails projects scan Ruby and
/// ERB files. Files that cannot be read as UTF-8 are skipped.
pub fn find_hardcoded(
    project_dir: &Path,
    project_type: ProjectType,
    settings: &ProjectSettings,
) -> Vec<HardcodedString> {
    let patterns = match project_type {
        ProjectType::Gettext => source_patterns(settings.extraction.patterns.as_slice()),
        ProjectType::Rails => source_patterns(&RUBY_SOURCES[..]),
    };
    let ignore_dirs = &settings.extraction.ignore_dirs;
    let is_skipped = |name: &str| {
        ignore_dirs.iter().any(|d| d == name)
            || (project_type == ProjectType::Rails && RAILS_SKIPPED_DIRS.contains(&name))
    };

    let walker = WalkDir::new(project_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !(entry.file_type().is_dir()
                    && is_skipped(&entry.file_name().to_string_lossy()))
        });

    let mut found = Vec::new();
    for entry in walker.filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = display_path(entry.path(), project_dir);
        if !patterns.iter().any(|p| p.matches(&relative)) {
            continue;
        }
        let source = match fs::read_to_string(entry.path()) {
            Ok(source) => source,
            Err(e) => {
                warn!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };
        found.extend(check_source(project_type, &source, &relative));
    }
    debug!(
        "Found {} hardcoded strings in {}",
        found.len(),
        project_dir.display()
    );
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn texts(found: &[HardcodedString]) -> Vec<&str> {
        found.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn test_qt_widgets_and_setters() {
        let source = r#"
title = QLabel("Welcome back")
ok = QPushButton('OK', self)
self.setWindowTitle("Settings")
edit.setPlaceholderText("Search...")
QMessageBox.warning(self, "Careful", "Unsaved changes")
tabs.addTab(page, "General")
"#;
        let found = check_source(ProjectType::Gettext, source, "app.py");
        assert_eq!(
            texts(&found),
            vec![
                "Welcome back",
                "OK",
                "Settings",
                "Search...",
                "Careful",
                "Unsaved changes",
                "General"
            ]
        );
        assert_eq!(found[0].line, 2);
        assert_eq!(found[5].line, 6);
    }

    #[test]
    fn test_wrapped_and_symbolic_strings_are_skipped() {
        let source = r#"
QLabel(_("Translated"))
button.setText("Save")
label.setText(_("Save"))
QLabel("123")
QLabel("-->")
"#;
        let found = check_source(ProjectType::Gettext, source, "app.py");
        assert!(found.is_empty(), "{:?}", found);
    }

    #[test]
    fn test_rails_helpers() {
        let source = r#"
<%= link_to "Home", root_path %>
<%= content_tag :h1, "Dashboard" %>
<%= link_to t("nav.home"), root_path %>
"#;
        let found = check_source(ProjectType::Rails, source, "app/views/home.html.erb");
        assert_eq!(texts(&found), vec!["Home", "Dashboard"]);
        assert_eq!(found[1].line, 3);

        let controller = r#"
flash[:notice] = "Task saved"
flash.alert = 'Not allowed'
flash.now[:error] = t("errors.failed")
"#;
        let found = check_source(ProjectType::Rails, controller, "app/controllers/tasks.rb");
        assert_eq!(texts(&found), vec!["Task saved", "Not allowed"]);
    }

    #[test]
    fn test_rails_translated_elsewhere_in_file() {
        let source = "flash[:notice] = \"Saved\"\nlogger.info(t(\"Saved\"))\n";
        assert!(check_source(ProjectType::Rails, source, "a.rb").is_empty());
    }

    #[test]
    fn test_find_hardcoded_walks_sources() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("ui")).unwrap();
        fs::create_dir_all(root.join("venv/lib")).unwrap();
        fs::write(root.join("main.py"), "w = QLabel(\"Ready\")\n").unwrap();
        fs::write(root.join("ui/dialog.py"), "\n\nd.setTitle('Options')\n").unwrap();
        fs::write(root.join("venv/lib/qt.py"), "QLabel(\"Vendored\")\n").unwrap();
        fs::write(root.join("notes.txt"), "QLabel(\"Text\")\n").unwrap();
        fs::write(root.join("legacy.py"), b"QLabel(\"Caf\xe9\")\n").unwrap();

        let found = find_hardcoded(root, ProjectType::Gettext, &ProjectSettings::default());
        assert_eq!(
            found,
            vec![
                HardcodedString {
                    file: "main.py".to_string(),
                    line: 1,
                    text: "Ready".to_string(),
                },
                HardcodedString {
                    file: "ui/dialog.py".to_string(),
                    line: 3,
                    text: "Options".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_find_hardcoded_rails_skips_vendor() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("app/views")).unwrap();
        fs::create_dir_all(root.join("vendor/bundle")).unwrap();
        fs::write(root.join("app/views/index.html.erb"), "<%= link_to \"Back\", :back %>\n")
            .unwrap();
        fs::write(root.join("vendor/bundle/gem.rb"), "link_to \"Gem\", x\n").unwrap();

        let found = find_hardcoded(root, ProjectType::Rails, &ProjectSettings::default());
        assert_eq!(texts(&found), vec!["Back"]);
        assert_eq!(found[0].file, "app/views/index.html.erb");
    }
}
