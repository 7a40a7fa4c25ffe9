use anyhow::Result;

use super::super::args::WriteCommand;
use super::{
    CommandKind, CommandResult, CommandSummary,
    helper::{is_fatal, open_project},
};
use crate::core::Action;

pub fn write(cmd: WriteCommand) -> Result<CommandResult> {
    let mut project = open_project(&cmd.project.path, &cmd.project.common)?;

    let status = project.manager.manage(Action::CheckStatus, None);
    if is_fatal(&status) {
        return Ok(CommandResult {
            kind: CommandKind::Write,
            problem_count: 0,
            exit_on_problems: true,
            failed: true,
            summary: CommandSummary::Manage(status),
        });
    }

    let locales = (!cmd.locales.is_empty()).then_some(cmd.locales.as_slice());
    let result = project.manager.manage(Action::WriteCatalog, locales);

    Ok(CommandResult {
        kind: CommandKind::Write,
        problem_count: result.failed_locales.len(),
        exit_on_problems: true,
        failed: is_fatal(&result),
        summary: CommandSummary::Manage(result),
    })
}
