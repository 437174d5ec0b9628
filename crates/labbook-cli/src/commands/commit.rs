use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use labbook_core::{ErrorInfo, LabError};
use labbook_exp::{CommitSource, GitRepo};

#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Directory inside the repository.
    #[arg(long, default_value = ".")]
    pub path: PathBuf,
}

pub fn run(args: &CommitArgs) -> Result<(), Box<dyn Error>> {
    let commit = GitRepo::new(&args.path).current_commit().ok_or_else(|| {
        LabError::Project(
            ErrorInfo::new("commit.unavailable", "no commit available")
                .with_context("path", args.path.display().to_string())
                .with_hint("check that the path is inside a git repository"),
        )
    })?;
    println!("{commit}");
    Ok(())
}
