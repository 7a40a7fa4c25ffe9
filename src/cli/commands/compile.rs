use anyhow::Result;

use super::super::args::ProjectArgs;
use super::{
    CommandKind, CommandResult, CommandSummary,
    helper::{is_fatal, open_project},
};
use crate::core::Action;

pub fn compile(args: ProjectArgs) -> Result<CommandResult> {
    let mut project = open_project(&args.path, &args.common)?;

    let status = project.manager.manage(Action::CheckStatus, None);
    let result = if is_fatal(&status) {
        status
    } else {
        project.manager.manage(Action::WriteCompiled, None)
    };

    Ok(CommandResult {
        kind: CommandKind::Compile,
        problem_count: result.failed_locales.len(),
        exit_on_problems: true,
        failed: is_fatal(&result),
        summary: CommandSummary::Manage(result),
    })
}
