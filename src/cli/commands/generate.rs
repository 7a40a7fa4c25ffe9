use anyhow::Result;

use super::super::args::ProjectArgs;
use super::{
    CommandKind, CommandResult, CommandSummary, GenerateSummary,
    helper::{is_fatal, open_project},
};

pub fn generate(args: ProjectArgs) -> Result<CommandResult> {
    let mut project = open_project(&args.path, &args.common)?;
    let (result, changes) = project.manager.regenerate_and_detect_changes();

    Ok(CommandResult {
        kind: CommandKind::Generate,
        problem_count: result.failed_locales.len(),
        exit_on_problems: true,
        failed: is_fatal(&result),
        summary: CommandSummary::Generate(GenerateSummary { result, changes }),
    })
}
