//! Gettext catalog rendering.

use chrono::{DateTime, Local};

use crate::core::{HeaderDetails, data::TranslationGroup};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M%z";

/// Metadata for the header entry of one catalog.
pub struct CatalogHeader<'a> {
    pub details: &'a HeaderDetails,
    /// `None` renders a template (`.pot`) header.
    pub locale: Option<&'a str>,
    pub created: DateTime<Local>,
    pub revised: DateTime<Local>,
}

impl CatalogHeader<'_> {
    pub fn render(&self) -> String {
        let details = self.details;
        let year = self.created.format("%Y");
        let mut out = String::new();
        out.push_str(&format!("# {} translations.\n", details.application_name));
        out.push_str(&format!("# Copyright (C) {}\n", year));
        out.push_str(&format!("# {}, {}.\n", details.first_author, year));
        out.push_str("#\n");
        out.push_str("msgid \"\"\n");
        out.push_str("msgstr \"\"\n");

        let (language, team) = match self.locale {
            Some(locale) => (
                locale.to_string(),
                format!("{} Team <{}>", locale, details.team_email),
            ),
            None => (String::new(), "LANGUAGE <LL@li.org>".to_string()),
        };
        let fields = [
            (
                "Project-Id-Version",
                format!("{} {}", details.application_name, details.version),
            ),
            ("POT-Creation-Date", self.created.format(DATE_FORMAT).to_string()),
            ("PO-Revision-Date", self.revised.format(DATE_FORMAT).to_string()),
            ("Last-Translator", details.last_translator.clone()),
            ("Language", language),
            ("Language-Team", team),
            ("MIME-Version", "1.0".to_string()),
            ("Content-Type", "text/plain; charset=UTF-8".to_string()),
            ("Content-Transfer-Encoding", "8bit".to_string()),
            ("Plural-Forms", "nplurals=2; plural=(n != 1);".to_string()),
        ];
        for (name, value) in fields {
            out.push_str(&format!("\"{}: {}\\n\"\n", name, escape_raw(&value)));
        }
        out
    }
}

/// Render one entry followed by a blank line.
pub fn render_entry(group: &TranslationGroup, value: &str) -> String {
    let mut out = String::new();
    if let Some(comment) = &group.translator_comment {
        for line in comment.lines() {
            push_comment(&mut out, "#", line);
        }
    }
    if let Some(comment) = &group.usage_comment {
        for line in comment.lines() {
            push_comment(&mut out, "#.", line);
        }
    }
    if !group.occurrences.is_empty() {
        let references: Vec<String> = group.occurrences.iter().map(ToString::to_string).collect();
        out.push_str(&format!("#: {}\n", references.join(" ")));
    }
    let key = group.key();
    if let Some(context) = key.context() {
        out.push_str(&render_string("msgctxt", context));
    }
    out.push_str(&render_string("msgid", key.id()));
    out.push_str(&render_string("msgstr", value));
    out.push('\n');
    out
}

fn push_comment(out: &mut String, marker: &str, line: &str) {
    if line.is_empty() {
        out.push_str(marker);
    } else {
        out.push_str(&format!("{} {}", marker, line));
    }
    out.push('\n');
}

/// Render a keyword and its string, one line per embedded `\n` escape.
pub fn render_string(keyword: &str, value: &str) -> String {
    let value = escape_raw(value);
    let pieces = split_after_newlines(&value);
    if pieces.len() <= 1 {
        return format!("{} \"{}\"\n", keyword, value);
    }
    let mut out = format!("{} \"\"\n", keyword);
    for piece in pieces {
        out.push_str(&format!("\"{}\"\n", piece));
    }
    out
}

/// Escape characters that cannot appear raw inside a PO string.
///
/// Existing escape sequences are left alone, so already escaped text is
/// returned unchanged.
pub fn escape_raw(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push_str("\\\\"),
            },
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

fn split_after_newlines(value: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        current.push(c);
        if c == '\\'
            && let Some(next) = chars.next()
        {
            current.push(next);
            if next == 'n' {
                pieces.push(std::mem::take(&mut current));
            }
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
