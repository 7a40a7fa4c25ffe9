use std::collections::BTreeMap;

use super::TranslationKey;
use crate::core::CatalogError;

/// A source location where a gettext string is used (`#: app/views.py:42`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub path: String,
    pub line: Option<usize>,
}

impl Occurrence {
    pub fn new(path: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    /// Parse a single reference token such as `app.py:12`.
    pub fn parse(token: &str) -> Self {
        match token.rsplit_once(':') {
            Some((path, line)) if !path.is_empty() => match line.parse() {
                Ok(line) => Self::new(path, Some(line)),
                Err(_) => Self::new(token, None),
            },
            _ => Self::new(token, None),
        }
    }
}

impl std::fmt::Display for Occurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.path, line),
            None => f.write_str(&self.path),
        }
    }
}

/// All known values of one key, one entry per locale.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationGroup {
    key: TranslationKey,
    default_locale: String,
    values: BTreeMap<String, String>,
    is_in_base: bool,
    /// Extracted comment shown to translators (`#.` lines).
    pub usage_comment: Option<String>,
    /// Free-form translator comment (`# ` lines).
    pub translator_comment: Option<String>,
    pub occurrences: Vec<Occurrence>,
}

impl TranslationGroup {
    pub fn new(key: TranslationKey, default_locale: &str, is_in_base: bool) -> Self {
        Self {
            key,
            default_locale: default_locale.to_string(),
            values: BTreeMap::new(),
            is_in_base,
            usage_comment: None,
            translator_comment: None,
            occurrences: Vec::new(),
        }
    }

    pub fn key(&self) -> &TranslationKey {
        &self.key
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn is_in_base(&self) -> bool {
        self.is_in_base
    }

    pub fn mark_in_base(&mut self) {
        self.is_in_base = true;
    }

    /// Store `text` for `locale`, replacing any previous value.
    pub fn add(&mut self, locale: &str, text: impl Into<String>) {
        self.values.insert(locale.to_string(), text.into());
    }

    pub fn remove(&mut self, locale: &str) -> Option<String> {
        self.values.remove(locale)
    }

    /// The stored value for `locale`, without any fallback.
    pub fn value(&self, locale: &str) -> Option<&str> {
        self.values.get(locale).map(String::as_str)
    }

    /// The value for `locale`.
    ///
    /// Falls back to the key text only for the default locale; every other
    /// locale without a stored value yields `""`.
    pub fn get(&self, locale: &str) -> &str {
        match self.values.get(locale) {
            Some(value) => value,
            None if locale == self.default_locale => self.key.id(),
            None => "",
        }
    }

    /// Like [`get`](Self::get), but fails when nothing is stored and no
    /// fallback applies.
    pub fn require(&self, locale: &str) -> Result<&str, CatalogError> {
        match self.values.get(locale) {
            Some(value) => Ok(value),
            None if locale == self.default_locale => Ok(self.key.id()),
            None => Err(CatalogError::MissingValue {
                key: self.key.to_string(),
                locale: locale.to_string(),
            }),
        }
    }

    /// Value in the default locale, with the key-text fallback.
    pub fn default_value(&self) -> &str {
        self.get(&self.default_locale)
    }

    /// Locales from `expected` that have no value or only whitespace.
    pub fn missing_locales<S: AsRef<str>>(&self, expected: &[S]) -> Vec<String> {
        expected
            .iter()
            .map(AsRef::as_ref)
            .filter(|locale| is_blank(self.values.get(*locale).map(String::as_str)))
            .map(str::to_string)
            .collect()
    }

    pub fn is_missing(&self, locale: &str) -> bool {
        is_blank(self.value(locale))
    }

    /// Locales holding a value, in sorted order.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.values
    }

    /// Held values outside the default locale that carry real content.
    pub fn translated_values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter(|(locale, value)| *locale != &self.default_locale && !value.trim().is_empty())
            .map(|(locale, value)| (locale.as_str(), value.as_str()))
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn greeting() -> TranslationGroup {
        let mut group = TranslationGroup::new(TranslationKey::new("greeting"), "en", true);
        group.add("en", "Hello {0}");
        group
    }

    #[test]
    fn test_missing_locale_without_entry() {
        let group = greeting();
        assert_eq!(group.missing_locales(&["fr"]), vec!["fr".to_string()]);
        assert_eq!(group.get("fr"), "");
    }

    #[test]
    fn test_whitespace_value_counts_as_missing() {
        let mut group = greeting();
        group.add("de", "   ");
        group.add("fr", "Bonjour {0}");
        assert_eq!(group.missing_locales(&["de", "fr"]), vec!["de".to_string()]);
    }

    #[test]
    fn test_default_locale_falls_back_to_key() {
        let group = TranslationGroup::new(TranslationKey::new("Save"), "en", true);
        assert_eq!(group.get("en"), "Save");
        assert_eq!(group.get("fr"), "");
        assert!(group.require("en").is_ok());
        assert!(group.require("fr").is_err());
    }

    #[test]
    fn test_add_overwrites() {
        let mut group = greeting();
        group.add("fr", "Salut");
        group.add("fr", "Bonjour");
        assert_eq!(group.get("fr"), "Bonjour");
    }

    #[test]
    fn test_translated_values_skip_default_and_blank() {
        let mut group = greeting();
        group.add("fr", "Bonjour {0}");
        group.add("de", "");
        let translated: Vec<_> = group.translated_values().collect();
        assert_eq!(translated, vec![("fr", "Bonjour {0}")]);
    }

    #[test]
    fn test_occurrence_parse() {
        assert_eq!(
            Occurrence::parse("app/views.py:42"),
            Occurrence::new("app/views.py", Some(42))
        );
        assert_eq!(Occurrence::parse("setup.py"), Occurrence::new("setup.py", None));
        assert_eq!(Occurrence::parse("C:tmp"), Occurrence::new("C:tmp", None));
    }
}
