//! Catalog format backends.
//!
//! Each format implements [`CatalogBackend`]; [`Backend`] is the closed set
//! the manager dispatches over. Adding a format means adding one variant.

pub mod gettext;
pub mod rails;

use std::{fs, path::Path};

use enum_dispatch::enum_dispatch;

pub use gettext::GettextBackend;
pub use rails::{ParityReport, RailsBackend};

use super::{CatalogError, CatalogResult, ManagementResult, ProjectSettings, ProjectType, data::TranslationMap};
use crate::rules::EncodingPolicy;

/// Operations every catalog format provides.
#[enum_dispatch]
pub trait CatalogBackend {
    fn project_type(&self) -> ProjectType;

    /// How values are encoded in this format's files.
    fn encoding_policy(&self) -> EncodingPolicy;

    /// Locales known after the last successful load, sorted.
    fn locales(&self) -> &[String];

    /// Scan the project and parse every catalog into a fresh map.
    ///
    /// On error the backend keeps the bookkeeping of its previous load.
    fn load(
        &mut self,
        settings: &ProjectSettings,
        result: &mut ManagementResult,
    ) -> CatalogResult<TranslationMap>;

    /// Rewrite the catalog file(s) of one locale from `map`.
    fn write_locale(
        &mut self,
        locale: &str,
        map: &TranslationMap,
        settings: &ProjectSettings,
    ) -> CatalogResult<()>;

    /// Produce runtime artifacts; failures are recorded per locale.
    fn compile(&mut self, settings: &ProjectSettings, result: &mut ManagementResult);

    /// Rebuild the default-locale catalog.
    fn generate_base(
        &mut self,
        map: &TranslationMap,
        settings: &ProjectSettings,
        result: &mut ManagementResult,
    ) -> CatalogResult<()>;

    /// Record what exists on disk into `result`.
    fn fill_status(&self, settings: &ProjectSettings, result: &mut ManagementResult);
}

#[enum_dispatch(CatalogBackend)]
#[derive(Debug)]
pub enum Backend {
    Gettext(GettextBackend),
    Rails(RailsBackend),
}

impl Backend {
    pub fn new(project_type: ProjectType, project_dir: &Path) -> Self {
        match project_type {
            ProjectType::Gettext => Backend::Gettext(GettextBackend::new(project_dir)),
            ProjectType::Rails => Backend::Rails(RailsBackend::new(project_dir)),
        }
    }
}

/// Write `content` to `path`, creating parent directories.
pub(crate) fn write_file(path: &Path, content: &str) -> CatalogResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CatalogError::io(format!("Failed to create directory {}", parent.display()), e)
        })?;
    }
    fs::write(path, content)
        .map_err(|e| CatalogError::io(format!("Failed to write {}", path.display()), e))
}
