//! Common utility functions shared across the codebase.

use std::{path::Path, sync::LazyLock, time::SystemTime};

use chrono::{DateTime, Local};
use regex::Regex;

static LOCALE_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z]{2}([-_][a-z]{2})?$").unwrap());

/// Checks if the text looks like a locale code: two letters, optionally
/// followed by a two-letter region.
///
/// # Examples
///
/// ```
/// use lexis::utils::is_locale_code;
///
/// assert!(is_locale_code("en"));
/// assert!(is_locale_code("pt_BR"));
/// assert!(is_locale_code("zh-TW"));
/// assert!(!is_locale_code("LC_MESSAGES"));
/// assert!(!is_locale_code("models"));
/// ```
pub fn is_locale_code(text: &str) -> bool {
    LOCALE_CODE_REGEX.is_match(text)
}

/// Last modification time of `path`, if it exists.
pub fn modified_time(path: &Path) -> Option<DateTime<Local>> {
    path.metadata()
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Local>::from)
}

pub fn system_time(time: SystemTime) -> DateTime<Local> {
    DateTime::<Local>::from(time)
}

/// `path` relative to `base` when possible, using `/` separators.
pub fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Whether the text has at least one letter, in any script.
///
/// # Examples
///
/// ```
/// use lexis::utils::has_letters;
///
/// assert!(has_letters("Save"));
/// assert!(has_letters("保存"));
/// assert!(!has_letters("42"));
/// assert!(!has_letters("-->"));
/// ```
pub fn has_letters(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

/// Byte offsets where each line starts.
pub fn build_line_index(content: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, c) in content.char_indices() {
        if c == '\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// 1-based line number of a byte offset.
pub fn offset_to_line(line_index: &[usize], offset: usize) -> usize {
    match line_index.binary_search(&offset) {
        Ok(line) => line + 1,
        Err(line) => line,
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::*;

    #[test]
    fn test_offset_to_line() {
        let index = build_line_index("a\nbc\n\nd");
        assert_eq!(index, vec![0, 2, 5, 6]);
        assert_eq!(offset_to_line(&index, 0), 1);
        assert_eq!(offset_to_line(&index, 3), 2);
        assert_eq!(offset_to_line(&index, 5), 3);
        assert_eq!(offset_to_line(&index, 6), 4);
    }

    #[test]
    fn test_is_locale_code() {
        assert!(is_locale_code("en"));
        assert!(is_locale_code("EN"));
        assert!(is_locale_code("en_US"));
        assert!(is_locale_code("en-us"));

        assert!(!is_locale_code("eng"));
        assert!(!is_locale_code("en_USA"));
        assert!(!is_locale_code("e1"));
        assert!(!is_locale_code(""));
        assert!(!is_locale_code("views"));
    }

    #[test]
    fn test_display_path() {
        let base = Path::new("/project");
        assert_eq!(
            display_path(Path::new("/project/locale/base.pot"), base),
            "locale/base.pot"
        );
        assert_eq!(display_path(Path::new("/other/x.po"), base), "/other/x.po");
    }

    #[test]
    fn test_modified_time_missing_file() {
        assert!(modified_time(Path::new("/definitely/not/here")).is_none());
    }
}
