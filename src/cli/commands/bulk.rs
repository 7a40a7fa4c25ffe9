use std::env;

use anyhow::{Context, Result, bail};

use super::super::args::BulkCommand;
use super::{
    BulkSummary, CommandKind, CommandResult, CommandSummary,
    helper::{CliSettings, project_dir},
};
use crate::analysis::BulkAnalyzer;
use crate::config::{CONFIG_FILE_NAME, load_config};

pub fn bulk(cmd: BulkCommand) -> Result<CommandResult> {
    let paths = if cmd.paths.is_empty() {
        let cwd = env::current_dir().context("Failed to read current directory")?;
        load_config(&cwd)?.project_paths(&cwd)
    } else {
        cmd.paths.clone()
    };
    if paths.is_empty() {
        bail!(
            "No projects given: pass paths or list them under 'projects' in {}",
            CONFIG_FILE_NAME
        );
    }
    let dirs = paths
        .iter()
        .map(|path| project_dir(path))
        .collect::<Result<Vec<_>>>()?;

    let settings = CliSettings::new(&cmd.common)?;
    let mut analyzer = BulkAnalyzer::new(&settings);
    let projects = analyzer.analyze_all(&dirs);

    let problem_count = projects.iter().filter(|p| p.needs_attention()).count();

    Ok(CommandResult {
        kind: CommandKind::Bulk,
        problem_count,
        exit_on_problems: true,
        failed: false,
        summary: CommandSummary::Bulk(BulkSummary { projects }),
    })
}
