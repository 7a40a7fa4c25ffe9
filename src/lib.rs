//! Lexis - translation catalog manager for gettext and Rails projects
//!
//! Lexis loads a project's translation catalogs (gettext `.po`/`.pot` files or
//! Rails locale YAML), reports missing and malformed translations, rewrites
//! catalogs from the base, compiles them, and fills gaps from sibling projects.
//!
//! ## Module Structure
//!
//! - `analysis`: Cross-project matching, bulk analysis, VCS status
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Data model, catalog backends and the translation manager
//! - `rules`: Defect validators and fixes
//! - `utils`: Shared utility functions

pub mod analysis;
pub mod cli;
pub mod config;
pub mod core;
pub mod rules;
pub mod utils;
