use anyhow::{Result, bail};

use super::super::args::ProjectArgs;
use super::{
    CommandKind, CommandResult, CommandSummary, ParitySummary,
    helper::{is_fatal, open_project},
};
use crate::core::Action;

pub fn parity(args: ProjectArgs) -> Result<CommandResult> {
    let mut project = open_project(&args.path, &args.common)?;

    let status = project.manager.manage(Action::CheckStatus, None);
    if is_fatal(&status) {
        return Ok(CommandResult {
            kind: CommandKind::Parity,
            problem_count: 0,
            exit_on_problems: true,
            failed: true,
            summary: CommandSummary::Manage(status),
        });
    }

    let Some(report) = project.manager.parity_report() else {
        bail!(
            "parity is only available for Rails projects ({} is {})",
            project.dir.display(),
            project.manager.project_type()
        );
    };

    Ok(CommandResult {
        kind: CommandKind::Parity,
        problem_count: report.missing_count() + report.extra_count(),
        exit_on_problems: true,
        failed: false,
        summary: CommandSummary::Parity(ParitySummary {
            project_dir: project.dir,
            report,
        }),
    })
}
