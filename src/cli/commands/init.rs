use std::{fs, path::Path};

use anyhow::{Context, Result};

use super::{CommandKind, CommandResult, CommandSummary, InitSummary};
use crate::config::{CONFIG_FILE_NAME, default_config_json};

pub fn init() -> Result<CommandResult> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    let created = !config_path.exists();

    if created {
        fs::write(config_path, default_config_json()?)
            .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;
    }

    Ok(CommandResult {
        kind: CommandKind::Init,
        problem_count: usize::from(!created),
        exit_on_problems: true,
        failed: false,
        summary: CommandSummary::Init(InitSummary { created }),
    })
}
