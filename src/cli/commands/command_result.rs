use std::path::PathBuf;

use crate::analysis::{ApplyOutcome, ApplyScope, PairAnalysis, ProjectAnalysis};
use crate::core::{ContentDiff, ManagementResult, ParityReport};
use crate::rules::hardcoded::HardcodedString;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Status,
    Write,
    Compile,
    Generate,
    Parity,
    Match,
    FindHardcoded,
    Bulk,
    Init,
}

#[derive(Debug)]
pub enum CommandSummary {
    /// `status`, `write` and `compile` all end in one management report.
    Manage(ManagementResult),
    Generate(GenerateSummary),
    Parity(ParitySummary),
    Match(MatchSummary),
    Hardcoded(HardcodedSummary),
    Bulk(BulkSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct GenerateSummary {
    pub result: ManagementResult,
    pub changes: ContentDiff,
}

#[derive(Debug)]
pub struct ParitySummary {
    pub project_dir: PathBuf,
    pub report: ParityReport,
}

#[derive(Debug)]
pub struct MatchSummary {
    pub recipient: PathBuf,
    /// Donors with at least one match, best match rate first.
    pub analyses: Vec<PairAnalysis>,
    /// Donors that could not be compared, with their reason.
    pub skipped: Vec<PairAnalysis>,
    pub scope: ApplyScope,
    pub outcome: ApplyOutcome,
}

#[derive(Debug)]
pub struct HardcodedSummary {
    pub project_dir: PathBuf,
    /// Ordered by file, then line.
    pub strings: Vec<HardcodedString>,
}

#[derive(Debug)]
pub struct BulkSummary {
    pub projects: Vec<ProjectAnalysis>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running lexis commands
#[derive(Debug)]
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    /// Defects, gaps or failed locales the command found.
    pub problem_count: usize,
    /// If true, exit code 1 should be returned when problem_count > 0.
    /// If false, always exit 0 (used for dry-run commands that report work to do).
    pub exit_on_problems: bool,
    /// The command could not do its job at all (exit code 2).
    pub failed: bool,
}
