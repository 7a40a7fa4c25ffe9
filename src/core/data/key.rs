use std::fmt;

/// Identity of one translatable string.
///
/// Gettext keys are `(msgctxt, msgid)` pairs; Rails keys carry no context and
/// use the dot-separated path as the id (`tasks.title`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TranslationKey {
    context: Option<String>,
    id: String,
}

impl TranslationKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            context: None,
            id: id.into(),
        }
    }

    pub fn with_context(context: Option<String>, id: impl Into<String>) -> Self {
        Self {
            context: context.filter(|c| !c.is_empty()),
            id: id.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Segments of a dot-path key (`"tasks.title"` -> `["tasks", "title"]`).
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.id.split('.')
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "[{}] {}", context, self.id),
            None => f.write_str(&self.id),
        }
    }
}

impl From<&str> for TranslationKey {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
