//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `status`: Load catalogs and report their state and defects
//! - `write`: Rewrite locale catalogs from the base, fixing what can be fixed
//! - `compile`: Compile gettext catalogs into `.mo` files
//! - `generate`: Regenerate the base catalog from sources
//! - `parity`: Compare Rails locale file sets against the default locale
//! - `match`: Fill missing translations from sibling projects
//! - `find-hardcoded`: List UI strings in sources without a translation call
//! - `bulk`: Regenerate and audit many projects at once
//! - `init`: Initialize lexis configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::ProjectType;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Status(cmd))
            | Some(Command::Compile(cmd))
            | Some(Command::Generate(cmd))
            | Some(Command::Parity(cmd))
            | Some(Command::FindHardcoded(cmd)) => cmd.common.verbose,
            Some(Command::Write(cmd)) => cmd.project.common.verbose,
            Some(Command::Match(cmd)) => cmd.project.common.verbose,
            Some(Command::Bulk(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Default locale (overrides config file)
    #[arg(long, env = "LEXIS_DEFAULT_LOCALE")]
    pub default_locale: Option<String>,

    /// Catalog format: gettext or rails (overrides detection)
    #[arg(long)]
    pub project_type: Option<ProjectType>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// A single project directory plus the common flags.
#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    /// Project directory
    #[arg(default_value = ".")]
    pub path: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct WriteCommand {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Only write these locales (default: all)
    /// Can be specified multiple times: --locale de --locale fr
    #[arg(long = "locale")]
    pub locales: Vec<String>,
}

#[derive(Debug, Args)]
pub struct MatchCommand {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Donor project to take translations from (default: config `projects`)
    #[arg(long = "from")]
    pub from: Vec<PathBuf>,

    /// Only match these locales (default: all target locales)
    #[arg(long = "locale")]
    pub locales: Vec<String>,

    /// Overwrite existing translations too, not only missing ones
    #[arg(long)]
    pub all: bool,

    /// Actually write matches (default is dry-run)
    #[arg(long)]
    pub apply: bool,
}

#[derive(Debug, Args)]
pub struct BulkCommand {
    /// Project directories (default: config `projects`)
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report catalog state, missing translations and other defects
    Status(ProjectArgs),
    /// Rewrite locale catalogs from the base catalog
    Write(WriteCommand),
    /// Compile gettext catalogs (.po -> .mo)
    Compile(ProjectArgs),
    /// Regenerate the base catalog from source files
    Generate(ProjectArgs),
    /// Compare Rails locale files against the default locale's files
    Parity(ProjectArgs),
    /// Fill missing translations from sibling projects
    Match(MatchCommand),
    /// List UI strings in source files that are not wrapped in a translation call
    FindHardcoded(ProjectArgs),
    /// Regenerate and audit several projects at once
    Bulk(BulkCommand),
    /// Initialize a new .lexisrc.json configuration file
    Init,
}
