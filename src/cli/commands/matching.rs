use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};

use super::super::args::MatchCommand;
use super::{
    CommandKind, CommandResult, CommandSummary, MatchSummary,
    helper::{CliSettings, is_fatal, project_dir},
};
use crate::analysis::{
    ApplyScope, CrossProjectAnalyzer, PairAnalysis, apply_matches, consolidated_matches,
};
use crate::config::{CONFIG_FILE_NAME, load_config};

pub fn matching(cmd: MatchCommand) -> Result<CommandResult> {
    let recipient = project_dir(&cmd.project.path)?;
    let config = load_config(&recipient)?;
    let settings = CliSettings::new(&cmd.project.common)?;

    let donor_paths = if cmd.from.is_empty() {
        config.project_paths(&recipient)
    } else {
        cmd.from.clone()
    };
    let donors = donor_paths
        .iter()
        .map(|path| project_dir(path))
        .collect::<Result<Vec<PathBuf>>>()?;
    if donors.iter().all(|donor| *donor == recipient) {
        bail!(
            "No donor projects: pass --from or list them under 'projects' in {}",
            CONFIG_FILE_NAME
        );
    }

    let mut analyzer = CrossProjectAnalyzer::new(&settings);
    analyzer
        .manager(&recipient)
        .map_err(|reason| anyhow!("Failed to load {}: {}", recipient.display(), reason))?;

    let locales = (!cmd.locales.is_empty()).then_some(cmd.locales.as_slice());
    let (mut analyses, skipped): (Vec<PairAnalysis>, Vec<PairAnalysis>) = donors
        .iter()
        .filter(|donor| **donor != recipient)
        .map(|donor| analyzer.analyze_pair(donor, &recipient, locales))
        .partition(|analysis| analysis.skipped_reason.is_none());
    analyses.sort_by(|a, b| b.match_rate().total_cmp(&a.match_rate()));

    let scope = if cmd.all {
        ApplyScope::All
    } else {
        ApplyScope::MissingOnly
    };
    let matches = consolidated_matches(&analyses);
    let manager = analyzer
        .manager(&recipient)
        .map_err(|reason| anyhow!("Failed to load {}: {}", recipient.display(), reason))?;
    let outcome = apply_matches(manager, &matches, scope, !cmd.apply);

    let (problem_count, failed) = match &outcome.write {
        Some(write) => (write.failed_locales.len(), is_fatal(write)),
        None => (0, false),
    };

    Ok(CommandResult {
        kind: CommandKind::Match,
        problem_count,
        exit_on_problems: true,
        failed,
        summary: CommandSummary::Match(MatchSummary {
            recipient,
            analyses,
            skipped,
            scope,
            outcome,
        }),
    })
}
