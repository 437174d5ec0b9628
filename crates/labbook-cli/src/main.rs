use std::error::Error;

use clap::{ArgAction, Parser, Subcommand};
use commands::{
    collect::{self, CollectArgs},
    commit::{self, CommitArgs},
    expand::{self, ExpandArgs},
    init::{self, InitArgs},
    savename::{self, SavenameArgs},
    version::{self, VersionArgs},
};

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "labbook", about = "Reproducible run naming, sweeps and result tables")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canonical name of a parameter file.
    Savename(SavenameArgs),
    /// Expand a sweep template into its configurations.
    Expand(ExpandArgs),
    /// Collect result files into a table.
    Collect(CollectArgs),
    /// Create a new project with the standard layout.
    Init(InitArgs),
    /// Print the current commit id of a repository.
    Commit(CommitArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet)?;
    match cli.command {
        Command::Savename(args) => savename::run(&args),
        Command::Expand(args) => expand::run(&args),
        Command::Collect(args) => collect::run(&args),
        Command::Init(args) => init::run(&args),
        Command::Commit(args) => commit::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
