//! Deterministic YAML emitter for locale files.
//!
//! String values are always double-quoted so translations never change type
//! on reload. Keys stay bare unless YAML 1.1 would read them as something
//! other than a string (`no`, `yes`, `on`, `~`, numbers).

use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::{Mapping, Value};

const INDENT: &str = "  ";

static PLAIN_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*$").unwrap());

/// Words YAML 1.1 resolves to booleans or null.
const RESERVED_WORDS: [&str; 12] = [
    "y", "n", "yes", "no", "on", "off", "true", "false", "null", "~", "Y", "N",
];

/// Render a whole document, prefixed by `leading` verbatim.
pub fn render_document(root: &Mapping, leading: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(leading) = leading
        && !leading.is_empty()
    {
        out.push_str(leading);
        if !leading.ends_with('\n') {
            out.push('\n');
        }
    }
    if root.is_empty() {
        out.push_str("{}\n");
    } else {
        emit_mapping(&mut out, root, 0);
    }
    out
}

/// Comment, blank and `---` lines before the first content line.
pub fn leading_block(content: &str) -> String {
    let mut block = String::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---" {
            block.push_str(line);
            block.push('\n');
        } else {
            break;
        }
    }
    block
}

/// Whether `content` has full-line comments past its leading block.
///
/// Those are not carried over by a rewrite.
pub fn has_interior_comments(content: &str) -> bool {
    content
        .lines()
        .skip_while(|line| {
            let trimmed = line.trim();
            trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---"
        })
        .any(|line| line.trim_start().starts_with('#'))
}

fn emit_mapping(out: &mut String, mapping: &Mapping, depth: usize) {
    for (key, value) in mapping {
        out.push_str(&INDENT.repeat(depth));
        out.push_str(&render_key(key));
        out.push(':');
        emit_value(out, value, depth);
    }
}

/// Emit whatever follows `key:` (or `-`), including the line break.
fn emit_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Mapping(child) if !child.is_empty() => {
            out.push('\n');
            emit_mapping(out, child, depth + 1);
        }
        Value::Sequence(items) if !items.is_empty() => {
            out.push('\n');
            emit_sequence(out, items, depth + 1);
        }
        Value::Null => out.push('\n'),
        _ => {
            out.push(' ');
            out.push_str(&render_inline(value));
            out.push('\n');
        }
    }
}

fn emit_sequence(out: &mut String, items: &[Value], depth: usize) {
    for item in items {
        out.push_str(&INDENT.repeat(depth));
        out.push('-');
        match item {
            Value::Mapping(child) if !child.is_empty() => {
                // First entry shares the dash line, the rest align under it.
                let mut nested = String::new();
                emit_mapping(&mut nested, child, depth + 1);
                let prefix_len = INDENT.len() * (depth + 1);
                out.push(' ');
                out.push_str(&nested[prefix_len..]);
            }
            Value::Null => out.push_str(" ~\n"),
            _ => {
                out.push(' ');
                out.push_str(&render_inline(item));
                out.push('\n');
            }
        }
    }
}

/// Single-line form, used for scalars and nested sequences.
fn render_inline(value: &Value) -> String {
    match value {
        Value::Null => "~".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Sequence(items) => {
            let inner: Vec<String> = items.iter().map(render_inline).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Mapping(mapping) => {
            let inner: Vec<String> = mapping
                .iter()
                .map(|(k, v)| format!("{}: {}", render_key(k), render_inline(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, render_inline(&tagged.value)),
    }
}

fn render_key(key: &Value) -> String {
    match key {
        Value::String(s) if is_plain_key(s) => s.clone(),
        Value::String(s) => quote(s),
        other => render_inline(other),
    }
}

fn is_plain_key(key: &str) -> bool {
    PLAIN_KEY.is_match(key) && !RESERVED_WORDS.iter().any(|w| w.eq_ignore_ascii_case(key))
}

/// Double-quoted YAML scalar.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
