use std::error::Error;
use std::process::Command;

use clap::Args;
use labbook_core::to_canonical_json_bytes;
use labbook_exp::{CommitSource, GitRepo};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Emit extended metadata including git and toolchain information.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: String,
    commit: String,
    rustc: String,
}

pub fn run(args: &VersionArgs) -> Result<(), Box<dyn Error>> {
    if !args.long {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let info = VersionInfo {
        version: env!("CARGO_PKG_VERSION").into(),
        commit: GitRepo::new(".")
            .current_commit()
            .unwrap_or_else(|| "unknown".into()),
        rustc: rustc_version().unwrap_or_else(|| "rustc unavailable".into()),
    };
    println!("{}", String::from_utf8(to_canonical_json_bytes(&info)?)?);
    Ok(())
}

fn rustc_version() -> Option<String> {
    let out = Command::new("rustc").arg("--version").output().ok()?;
    out.status
        .success()
        .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
}
