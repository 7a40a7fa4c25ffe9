use std::path::PathBuf;

use thiserror::Error;

/// Structural failures that abort a whole action.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("expected exactly one base catalog (*.pot) in {}, found {found}", .dir.display())]
    BaseCatalogCount { dir: PathBuf, found: usize },

    #[error("no locale directory found in {}", .0.display())]
    NoLocaleDir(PathBuf),

    #[error("{}:{line}: {message}", .path.display())]
    MalformedEntry {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("failed to parse YAML file {}: {message}", .path.display())]
    MalformedYaml { path: PathBuf, message: String },

    #[error("invalid extraction keywords: {0}")]
    InvalidKeywords(String),

    #[error("no value for key \"{key}\" in locale {locale}")]
    MissingValue { key: String, locale: String },

    #[error("catalog for locale {0} does not exist")]
    MissingCatalog(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// The project has no catalogs yet, as opposed to catalogs that cannot be read.
    pub fn is_absent_catalog(&self) -> bool {
        matches!(
            self,
            Self::BaseCatalogCount { found: 0, .. } | Self::NoLocaleDir(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_only_missing_catalogs_are_absent() {
        let dir = Path::new("/project").to_path_buf();
        assert!(CatalogError::BaseCatalogCount { dir: dir.clone(), found: 0 }.is_absent_catalog());
        assert!(CatalogError::NoLocaleDir(dir.clone()).is_absent_catalog());
        assert!(!CatalogError::BaseCatalogCount { dir: dir.clone(), found: 2 }.is_absent_catalog());
        assert!(
            !CatalogError::MalformedYaml {
                path: dir,
                message: "bad".to_string()
            }
            .is_absent_catalog()
        );
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
