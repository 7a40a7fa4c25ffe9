//! Source string extraction for the base catalog.
//!
//! Finds calls such as `_("Save")`, `ngettext("file", "files", n)` and
//! `pgettext("menu", "Open")` in files matched by the extraction globs, and
//! collects translator comments written on the lines right above the call.

use std::{
    fs,
    path::{Path, PathBuf},
};

use glob::Pattern;
use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::{
    CatalogError, CatalogResult, ExtractionConfig,
    data::{Occurrence, TranslationKey},
};
use crate::utils::{build_line_index, display_path, offset_to_line};

/// A translatable string found in source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMessage {
    pub key: TranslationKey,
    pub comment: Option<String>,
    pub occurrences: Vec<Occurrence>,
}

/// Keywords whose first argument is a context, not the message.
const CONTEXT_KEYWORDS: &[&str] = &["pgettext", "npgettext"];

/// Compile source globs relative to a project root; invalid globs are logged
/// and dropped.
pub fn source_patterns<S: AsRef<str>>(globs: &[S]) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    for pattern in globs {
        let pattern = pattern.as_ref();
        // `**/*.py` should also match files at the root.
        let variants = match pattern.strip_prefix("**/") {
            Some(rest) => vec![pattern, rest],
            None => vec![pattern],
        };
        for variant in variants {
            match Pattern::new(variant) {
                Ok(p) => patterns.push(p),
                Err(e) => warn!("Ignoring invalid source pattern \"{}\": {}", variant, e),
            }
        }
    }
    patterns
}

pub struct Extractor {
    call_regex: Regex,
    patterns: Vec<Pattern>,
    comment_tag: String,
    ignore_dirs: Vec<String>,
}

impl Extractor {
    pub fn new(config: &ExtractionConfig) -> CatalogResult<Self> {
        let keywords: Vec<String> = config.keywords.iter().map(|k| regex::escape(k)).collect();
        let call_regex = Regex::new(&format!(r"\b({})\s*\(", keywords.join("|")))
            .map_err(|e| CatalogError::InvalidKeywords(e.to_string()))?;

        Ok(Self {
            call_regex,
            patterns: source_patterns(&config.patterns),
            comment_tag: config.comment_tag.clone(),
            ignore_dirs: config.ignore_dirs.clone(),
        })
    }

    /// Scan `project_dir`, skipping `skip` directories (the locale tree).
    pub fn extract_dir(
        &self,
        project_dir: &Path,
        skip: &[PathBuf],
    ) -> CatalogResult<Vec<ExtractedMessage>> {
        let mut messages: IndexMap<TranslationKey, ExtractedMessage> = IndexMap::new();

        let walker = WalkDir::new(project_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let path = entry.path();
                if skip.iter().any(|s| path.starts_with(s)) {
                    return false;
                }
                !(entry.file_type().is_dir()
                    && entry.depth() > 0
                    && self
                        .ignore_dirs
                        .iter()
                        .any(|d| entry.file_name().to_string_lossy() == d.as_str()))
            });

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("Cannot access path: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = display_path(entry.path(), project_dir);
            if !self.patterns.iter().any(|p| p.matches(&relative)) {
                continue;
            }
            let source = match fs::read_to_string(entry.path()) {
                Ok(source) => source,
                Err(e) => {
                    warn!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            for found in self.extract_source(&source, &relative) {
                match messages.get_mut(&found.key) {
                    Some(existing) => merge(existing, found),
                    None => {
                        messages.insert(found.key.clone(), found);
                    }
                }
            }
        }

        debug!(
            "Extracted {} messages from {}",
            messages.len(),
            project_dir.display()
        );
        Ok(messages.into_values().collect())
    }

    /// Extract messages from one source text. `file` names the occurrences.
    pub fn extract_source(&self, source: &str, file: &str) -> Vec<ExtractedMessage> {
        let lines: Vec<&str> = source.lines().collect();
        let line_index = build_line_index(source);
        let mut found = Vec::new();

        for caps in self.call_regex.captures_iter(source) {
            let (Some(call), Some(keyword)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let mut cursor = ArgCursor::new(&source[call.end()..]);
            let Some(first) = cursor.string_arg() else {
                continue;
            };
            let (context, msgid) = if CONTEXT_KEYWORDS.contains(&keyword.as_str()) {
                if !cursor.comma() {
                    continue;
                }
                let Some(msgid) = cursor.string_arg() else {
                    continue;
                };
                (Some(first), msgid)
            } else {
                (None, first)
            };
            if msgid.is_empty() {
                continue;
            }

            let line = offset_to_line(&line_index, call.start());
            found.push(ExtractedMessage {
                key: TranslationKey::with_context(context, msgid),
                comment: self.comment_above(&lines, line),
                occurrences: vec![Occurrence::new(file, Some(line))],
            });
        }
        found
    }

    /// Tagged comment block directly above 1-based `line`.
    fn comment_above(&self, lines: &[&str], line: usize) -> Option<String> {
        let mut block = Vec::new();
        for text in lines[..line.saturating_sub(1)].iter().rev() {
            match text.trim().strip_prefix('#') {
                Some(comment) => block.push(comment.trim()),
                None => break,
            }
        }
        block.reverse();
        let start = block.iter().position(|c| c.starts_with(&self.comment_tag))?;
        Some(block[start..].join(" "))
    }
}

fn merge(existing: &mut ExtractedMessage, found: ExtractedMessage) {
    existing.occurrences.extend(found.occurrences);
    if let Some(comment) = found.comment {
        match &mut existing.comment {
            Some(current) if current.lines().any(|l| l == comment) => {}
            Some(current) => {
                current.push('\n');
                current.push_str(&comment);
            }
            None => existing.comment = Some(comment),
        }
    }
}

/// Reads string-literal arguments after an opening parenthesis.
struct ArgCursor<'a> {
    rest: &'a str,
}

impl<'a> ArgCursor<'a> {
    fn new(rest: &'a str) -> Self {
        Self { rest }
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn comma(&mut self) -> bool {
        self.skip_whitespace();
        match self.rest.strip_prefix(',') {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    /// One argument made of adjacent string literals, converted to PO text.
    fn string_arg(&mut self) -> Option<String> {
        let mut value = String::new();
        let mut any = false;
        while let Some(literal) = self.literal() {
            value.push_str(&literal);
            any = true;
        }
        any.then_some(value)
    }

    fn literal(&mut self) -> Option<String> {
        self.skip_whitespace();
        let prefix_len = self
            .rest
            .find(['"', '\''])
            .filter(|&i| i <= 2 && self.rest[..i].chars().all(|c| "uUrR".contains(c)))?;
        let raw = self.rest[..prefix_len].to_ascii_lowercase().contains('r');
        let body = &self.rest[prefix_len..];
        let quote = body.chars().next()?;
        if body.starts_with(&quote.to_string().repeat(3)) {
            return None;
        }

        let mut out = String::new();
        let mut chars = body[1..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    let (_, next) = chars.next()?;
                    if raw {
                        out.push_str("\\\\");
                        if next == quote {
                            out.push_str(if quote == '"' { "\\\"" } else { "'" });
                        } else {
                            out.push(next);
                        }
                    } else if next == '\'' {
                        out.push('\'');
                    } else {
                        out.push('\\');
                        out.push(next);
                    }
                }
                '\n' => return None,
                c if c == quote => {
                    self.rest = &body[1 + i + c.len_utf8()..];
                    return Some(out);
                }
                '"' => out.push_str("\\\""),
                c => out.push(c),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn extractor() -> Extractor {
        Extractor::new(&ExtractionConfig::default()).unwrap()
    }

    fn ids(messages: &[ExtractedMessage]) -> Vec<String> {
        messages.iter().map(|m| m.key.to_string()).collect()
    }

    #[test]
    fn test_extract_keywords() {
        let source = r#"
title = _("Save")
label = gettext('Cancel')
count = ngettext("{0} file", "{0} files", n)
menu = pgettext("menu", "Open")
other = my_("Not this")
"#;
        let found = extractor().extract_source(source, "app.py");
        assert_eq!(
            ids(&found),
            vec!["Save", "Cancel", "{0} file", "[menu] Open"]
        );
        assert_eq!(found[0].occurrences, vec![Occurrence::new("app.py", Some(2))]);
    }

    #[test]
    fn test_translator_comments() {
        let source = r#"
# TRANSLATORS: shown on the save button
button = _("Save")
# unrelated note
label = _("Cancel")
"#;
        let found = extractor().extract_source(source, "app.py");
        assert_eq!(
            found[0].comment.as_deref(),
            Some("TRANSLATORS: shown on the save button")
        );
        assert_eq!(found[1].comment, None);
    }

    #[test]
    fn test_literal_conversion() {
        let source = r#"a = _('It\'s "quoted"')
b = _("Line\nbreak")
c = _("Hello "
      "world")
"#;
        let found = extractor().extract_source(source, "app.py");
        assert_eq!(
            ids(&found),
            vec![r#"It's \"quoted\""#, r"Line\nbreak", "Hello world"]
        );
    }

    #[test]
    fn test_non_literal_argument_is_skipped() {
        let found = extractor().extract_source("x = _(name)\n", "app.py");
        assert!(found.is_empty());
    }

    #[test]
    fn test_extract_dir_merges_duplicates() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pkg")).unwrap();
        fs::create_dir_all(dir.path().join("venv")).unwrap();
        fs::write(dir.path().join("app.py"), "_(\"Save\")\n").unwrap();
        fs::write(dir.path().join("pkg/views.py"), "\n_(\"Save\")\n_(\"Quit\")\n").unwrap();
        fs::write(dir.path().join("venv/lib.py"), "_(\"Vendored\")\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "_(\"Text\")\n").unwrap();

        let found = extractor().extract_dir(dir.path(), &[]).unwrap();
        assert_eq!(ids(&found), vec!["Save", "Quit"]);
        assert_eq!(
            found[0].occurrences,
            vec![
                Occurrence::new("app.py", Some(1)),
                Occurrence::new("pkg/views.py", Some(2)),
            ]
        );
    }

    #[test]
    fn test_extract_dir_skips_non_utf8_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.py"), "_(\"Save\")\n").unwrap();
        fs::write(dir.path().join("legacy.py"), b"_(\"Caf\xe9\")\n").unwrap();

        let found = extractor().extract_dir(dir.path(), &[]).unwrap();
        assert_eq!(ids(&found), vec!["Save"]);
    }
}
