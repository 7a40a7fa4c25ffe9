//! Multi-project analysis.
//!
//! - `cross_project`: fill one project's gaps from sibling projects
//! - `bulk`: regenerate and audit many projects at once
//! - `vcs`: version-control status, shown alongside bulk results

pub mod bulk;
pub mod cross_project;
pub mod vcs;

pub use bulk::{BulkAnalyzer, ProjectAnalysis};
pub use cross_project::{
    ApplyOutcome, ApplyScope, CrossProjectAnalyzer, KeyMatchGroup, MatchStrategy, PairAnalysis,
    TranslationMatch, analyze_pair, apply_matches, consolidated_matches,
};
pub use vcs::{VcsStatus, vcs_status};
