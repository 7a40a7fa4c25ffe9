use anyhow::Result;

use super::super::args::ProjectArgs;
use super::{
    CommandKind, CommandResult, CommandSummary,
    helper::{defect_problems, is_fatal, open_project},
};
use crate::core::Action;

pub fn status(args: ProjectArgs) -> Result<CommandResult> {
    let mut project = open_project(&args.path, &args.common)?;
    let result = project.manager.manage(Action::CheckStatus, None);

    Ok(CommandResult {
        kind: CommandKind::Status,
        problem_count: defect_problems(&result),
        exit_on_problems: true,
        failed: is_fatal(&result),
        summary: CommandSummary::Manage(result),
    })
}
