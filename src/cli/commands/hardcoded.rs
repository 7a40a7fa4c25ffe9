use anyhow::Result;

use super::super::args::ProjectArgs;
use super::{CommandKind, CommandResult, CommandSummary, HardcodedSummary, helper::open_project};

pub fn find_hardcoded(args: ProjectArgs) -> Result<CommandResult> {
    let project = open_project(&args.path, &args.common)?;
    let strings = project.manager.find_hardcoded();

    Ok(CommandResult {
        kind: CommandKind::FindHardcoded,
        problem_count: strings.len(),
        exit_on_problems: true,
        failed: false,
        summary: CommandSummary::Hardcoded(HardcodedSummary {
            project_dir: project.dir,
            strings,
        }),
    })
}
