use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use labbook_project::{initialize_project, InitOptions};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to create the project in.
    pub path: PathBuf,
    /// Project name; defaults to the directory name.
    #[arg(long)]
    pub name: Option<String>,
    /// Author recorded in the manifest; repeatable.
    #[arg(long = "author")]
    pub authors: Vec<String>,
    #[arg(long)]
    pub no_readme: bool,
    /// Wipe a non-empty directory.
    #[arg(long)]
    pub force: bool,
    /// Skip `git init` and the initial commit.
    #[arg(long)]
    pub no_git: bool,
}

pub fn run(args: &InitArgs) -> Result<(), Box<dyn Error>> {
    let opts = InitOptions {
        readme: !args.no_readme,
        authors: args.authors.clone(),
        force: args.force,
        git: !args.no_git,
    };
    let project = initialize_project(&args.path, args.name.as_deref(), &opts)?;
    println!("{}", project.projectdir().display());
    Ok(())
}
