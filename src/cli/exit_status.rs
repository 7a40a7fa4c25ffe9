use std::process::ExitCode;

use super::commands::CommandResult;

/// Exit status for CLI commands.
///
/// - `Success` (0): Command completed successfully, nothing to report
/// - `Failure` (1): Command completed but found problems (defects, gaps, failed locales)
/// - `Error` (2): Command failed (unreadable catalogs, config error, etc.)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}

impl From<&CommandResult> for ExitStatus {
    fn from(result: &CommandResult) -> Self {
        if result.failed {
            ExitStatus::Error
        } else if result.exit_on_problems && result.problem_count > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::{CommandKind, CommandSummary, InitSummary};

    fn result(problem_count: usize, exit_on_problems: bool, failed: bool) -> CommandResult {
        CommandResult {
            kind: CommandKind::Init,
            summary: CommandSummary::Init(InitSummary { created: true }),
            problem_count,
            exit_on_problems,
            failed,
        }
    }

    #[test]
    fn exit_code_values() {
        assert_eq!(ExitCode::from(ExitStatus::Success), ExitCode::from(0));
        assert_eq!(ExitCode::from(ExitStatus::Failure), ExitCode::from(1));
        assert_eq!(ExitCode::from(ExitStatus::Error), ExitCode::from(2));
    }

    #[test]
    fn exit_status_from_result() {
        assert_eq!(ExitStatus::from(&result(0, true, false)), ExitStatus::Success);
        assert_eq!(ExitStatus::from(&result(3, true, false)), ExitStatus::Failure);
        assert_eq!(ExitStatus::from(&result(3, false, false)), ExitStatus::Success);
        assert_eq!(ExitStatus::from(&result(0, true, true)), ExitStatus::Error);
    }
}
