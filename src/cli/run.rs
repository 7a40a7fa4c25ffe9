/// Dispatches to the appropriate command handler based on the parsed arguments.
///
/// # Returns
/// - `Ok(CommandResult)` with the problem count and exit behavior
/// - `Err` if the command cannot start (e.g., missing directory, bad config)
use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{
        CommandResult, bulk::bulk, compile::compile, generate::generate, hardcoded::find_hardcoded,
        init::init, matching::matching, parity::parity, status::status, write::write,
    },
};

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Status(args)) => status(args),
        Some(Command::Write(cmd)) => write(cmd),
        Some(Command::Compile(args)) => compile(args),
        Some(Command::Generate(args)) => generate(args),
        Some(Command::Parity(args)) => parity(args),
        Some(Command::Match(cmd)) => matching(cmd),
        Some(Command::FindHardcoded(args)) => find_hardcoded(args),
        Some(Command::Bulk(cmd)) => bulk(cmd),
        Some(Command::Init) => init(),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
