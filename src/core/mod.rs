//! Translation management engine.
//!
//! - `data`: translation keys and groups
//! - `backend`: gettext and Rails YAML catalog formats
//! - `manager`: `TranslationManager`, the per-project façade
//! - `detect`: project type detection
//! - `report`: `ManagementResult`, the per-action report
//! - `snapshot`: content snapshots for change detection

pub mod backend;
pub mod data;
pub mod detect;
mod error;
pub mod manager;
mod report;
mod settings;
pub mod snapshot;

pub use backend::{Backend, CatalogBackend, ParityReport};
pub use detect::{ProjectDetector, detect_project_type};
pub use error::{CatalogError, CatalogResult};
pub use manager::TranslationManager;
pub use report::{Action, LocaleFailure, LocaleStatus, ManagementResult};
pub use settings::{
    ExtractionConfig, FixedSettings, HeaderDetails, ProjectSettings, ProjectType, SettingsSource,
};
pub use snapshot::{ContentDiff, ContentSnapshot};
