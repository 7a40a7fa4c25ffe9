//! Gettext `.po`/`.pot` parser.
//!
//! String values are kept exactly as written between the quotes, so escape
//! sequences such as `\n`, `\"` and `é` survive a parse/write cycle
//! unchanged. Continuation lines are concatenated.

use std::path::Path;

use crate::core::{CatalogError, CatalogResult, data::Occurrence};

/// One entry of a catalog file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoEntry {
    pub context: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgstr: String,
    pub translator_comment: Option<String>,
    pub extracted_comment: Option<String>,
    pub references: Vec<Occurrence>,
    pub flags: Vec<String>,
    /// 1-based line of the `msgid` keyword.
    pub line: usize,
}

impl PoEntry {
    /// The header entry carries catalog metadata, not a translatable string.
    pub fn is_header(&self) -> bool {
        self.msgid.is_empty() && self.context.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Context,
    Id,
    IdPlural,
    Str,
    /// `msgstr[n]` for n > 0; parsed but not kept.
    OtherPlural,
}

#[derive(Default)]
struct EntryBuilder {
    entry: PoEntry,
    has_id: bool,
    has_str: bool,
    has_content: bool,
}

impl EntryBuilder {
    fn push_comment(slot: &mut Option<String>, text: &str) {
        match slot {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(text);
            }
            None => *slot = Some(text.to_string()),
        }
    }
}

/// Parse catalog text. `path` is only used in error messages.
pub fn parse_po(content: &str, path: &Path) -> CatalogResult<Vec<PoEntry>> {
    let mut entries = Vec::new();
    let mut current = EntryBuilder::default();
    let mut field: Option<Field> = None;

    let malformed = |line: usize, message: &str| CatalogError::MalformedEntry {
        path: path.to_path_buf(),
        line,
        message: message.to_string(),
    };

    for (index, raw_line) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();

        if line.is_empty() {
            finish(&mut current, &mut entries, path)?;
            field = None;
            continue;
        }

        if line.starts_with("#~") || line.starts_with("#|") {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            // A comment after a complete entry starts the next one.
            if current.has_str {
                finish(&mut current, &mut entries, path)?;
                field = None;
            }
            current.has_content = true;
            if let Some(flags) = comment.strip_prefix(',') {
                current.entry.flags.extend(
                    flags
                        .split(',')
                        .map(str::trim)
                        .filter(|f| !f.is_empty())
                        .map(str::to_string),
                );
            } else if let Some(extracted) = comment.strip_prefix('.') {
                EntryBuilder::push_comment(&mut current.entry.extracted_comment, extracted.trim());
            } else if let Some(references) = comment.strip_prefix(':') {
                current
                    .entry
                    .references
                    .extend(references.split_whitespace().map(Occurrence::parse));
            } else {
                let text = comment.strip_prefix(' ').unwrap_or(comment);
                EntryBuilder::push_comment(&mut current.entry.translator_comment, text);
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("msgctxt") {
            if current.has_id {
                finish(&mut current, &mut entries, path)?;
            }
            current.entry.context = Some(quoted(rest, line_no, path)?.to_string());
            current.has_content = true;
            field = Some(Field::Context);
        } else if let Some(rest) = line.strip_prefix("msgid_plural") {
            if !current.has_id {
                return Err(malformed(line_no, "msgid_plural without msgid"));
            }
            current.entry.msgid_plural = Some(quoted(rest, line_no, path)?.to_string());
            field = Some(Field::IdPlural);
        } else if let Some(rest) = line.strip_prefix("msgid") {
            if current.has_id {
                finish(&mut current, &mut entries, path)?;
            }
            current.entry.msgid = quoted(rest, line_no, path)?.to_string();
            current.entry.line = line_no;
            current.has_id = true;
            current.has_content = true;
            field = Some(Field::Id);
        } else if let Some(rest) = line.strip_prefix("msgstr") {
            if !current.has_id {
                return Err(malformed(line_no, "msgstr without msgid"));
            }
            let (target, rest) = match rest.strip_prefix('[') {
                Some(indexed) => {
                    let (index, rest) = indexed
                        .split_once(']')
                        .ok_or_else(|| malformed(line_no, "unterminated msgstr index"))?;
                    match index.trim() {
                        "0" => (Field::Str, rest),
                        _ => (Field::OtherPlural, rest),
                    }
                }
                None => (Field::Str, rest),
            };
            let value = quoted(rest, line_no, path)?;
            if target == Field::Str {
                current.entry.msgstr = value.to_string();
            }
            current.has_str = true;
            field = Some(target);
        } else if line.starts_with('"') {
            let value = quoted(line, line_no, path)?;
            let slot = match field {
                Some(Field::Context) => current.entry.context.get_or_insert_with(String::new),
                Some(Field::Id) => &mut current.entry.msgid,
                Some(Field::IdPlural) => current.entry.msgid_plural.get_or_insert_with(String::new),
                Some(Field::Str) => &mut current.entry.msgstr,
                Some(Field::OtherPlural) => continue,
                None => return Err(malformed(line_no, "string continuation outside of an entry")),
            };
            slot.push_str(value);
        } else {
            return Err(malformed(line_no, &format!("unexpected line: {}", line)));
        }
    }

    finish(&mut current, &mut entries, path)?;
    Ok(entries)
}

fn finish(
    current: &mut EntryBuilder,
    entries: &mut Vec<PoEntry>,
    path: &Path,
) -> CatalogResult<()> {
    let builder = std::mem::take(current);
    if !builder.has_content {
        return Ok(());
    }
    if !builder.has_id {
        // Comment-only blocks (file headers, stray notes) carry no entry.
        if builder.entry.context.is_none() {
            return Ok(());
        }
        return Err(CatalogError::MalformedEntry {
            path: path.to_path_buf(),
            line: builder.entry.line,
            message: "msgctxt without msgid".to_string(),
        });
    }
    if !builder.has_str {
        return Err(CatalogError::MalformedEntry {
            path: path.to_path_buf(),
            line: builder.entry.line,
            message: format!("msgid \"{}\" has no msgstr", builder.entry.msgid),
        });
    }
    entries.push(builder.entry);
    Ok(())
}

/// The raw text between the quotes of a PO string literal.
fn quoted<'a>(text: &'a str, line: usize, path: &Path) -> CatalogResult<&'a str> {
    let text = text.trim();
    let malformed = |message: &str| CatalogError::MalformedEntry {
        path: path.to_path_buf(),
        line,
        message: message.to_string(),
    };

    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .ok_or_else(|| malformed("expected a quoted string"))?;

    // The closing quote must not be escaped, and no bare quote may appear inside.
    let mut escaped = false;
    for c in inner.chars() {
        match (escaped, c) {
            (true, _) => escaped = false,
            (false, '\\') => escaped = true,
            (false, '"') => return Err(malformed("unescaped quote in string")),
            _ => {}
        }
    }
    if escaped {
        return Err(malformed("unterminated string"));
    }
    Ok(inner)
}
