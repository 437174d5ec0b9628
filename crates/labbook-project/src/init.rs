use std::fs;
use std::path::Path;
use std::process::Command;

use labbook_core::errors::{ErrorInfo, LabError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::context::ProjectContext;
use crate::manifest::{ProjectManifest, MANIFEST_FILE};

/// Directories created by [`initialize_project`], relative to the root.
pub const DEFAULT_LAYOUT: &[&str] = &[
    "_research",
    "data/sims",
    "data/exp_raw",
    "data/exp_pro",
    "plots",
    "notebooks",
    "papers",
    "scripts",
    "src",
    "videos",
];

const GITIGNORE: &str = "/videos\n/plots\n/notebooks/.ipynb_checkpoints\n/papers\n/data\n";

/// Options for [`initialize_project`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitOptions {
    /// Write a `README.md`.
    #[serde(default = "enabled")]
    pub readme: bool,
    /// Recorded in the manifest and the README.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Wipe a non-empty target directory instead of refusing.
    #[serde(default)]
    pub force: bool,
    /// Initialise a git repository with one commit.
    #[serde(default = "enabled")]
    pub git: bool,
}

const fn enabled() -> bool {
    true
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            readme: true,
            authors: Vec::new(),
            force: false,
            git: true,
        }
    }
}

fn init_error(code: &str, message: impl Into<String>, path: &Path) -> LabError {
    LabError::Project(ErrorInfo::new(code, message).with_context("path", path.display().to_string()))
}

fn clear_directory(path: &Path) -> Result<(), LabError> {
    let entries = fs::read_dir(path).map_err(|err| LabError::io("init.read", path, err))?;
    for entry in entries {
        let entry = entry.map_err(|err| LabError::io("init.read", path, err))?;
        let target = entry.path();
        let removed = if target.is_dir() {
            fs::remove_dir_all(&target)
        } else {
            fs::remove_file(&target)
        };
        removed.map_err(|err| LabError::io("init.remove", &target, err))?;
    }
    Ok(())
}

fn readme(name: &str, authors: &[String]) -> String {
    let mut text = format!("# {name}\n\nThis is a labbook project");
    if !authors.is_empty() {
        text.push_str(" authored by ");
        text.push_str(&authors.join(", "));
    }
    text.push_str(".\n\nRun `labbook init` to recreate the directory layout on another machine;\n");
    text.push_str("raw and simulated data live below `data/` and are not tracked by git.\n");
    text
}

fn git(dir: &Path, args: &[&str]) -> bool {
    match Command::new("git").arg("-C").arg(dir).args(args).output() {
        Ok(output) if output.status.success() => true,
        Ok(output) => {
            warn!(
                command = %args.join(" "),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git command failed"
            );
            false
        }
        Err(err) => {
            warn!(error = %err, "git is not available");
            false
        }
    }
}

/// Creates a project at `path` with the default layout and activates it.
///
/// `name` defaults to the directory name. Git problems are reported as
/// warnings and never fail the call.
pub fn initialize_project(
    path: &Path,
    name: Option<&str>,
    opts: &InitOptions,
) -> Result<ProjectContext, LabError> {
    let name = match name {
        Some(name) => name.to_string(),
        None => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| init_error("init.name", "cannot derive a project name", path))?,
    };
    let manifest = ProjectManifest {
        name: name.clone(),
        authors: opts.authors.clone(),
        naming: None,
    };
    manifest.validate()?;

    if path.is_dir() {
        let occupied = fs::read_dir(path)
            .map_err(|err| LabError::io("init.read", path, err))?
            .next()
            .is_some();
        if occupied {
            if !opts.force {
                return Err(LabError::Project(
                    ErrorInfo::new("init.not-empty", "target directory is not empty")
                        .with_context("path", path.display().to_string())
                        .with_hint("pass force to overwrite it"),
                ));
            }
            warn!(path = %path.display(), "overwriting non-empty directory");
            clear_directory(path)?;
        }
    } else if path.exists() {
        return Err(init_error("init.not-a-directory", "target is a file", path));
    }

    for dir in DEFAULT_LAYOUT {
        let target = path.join(dir);
        fs::create_dir_all(&target).map_err(|err| LabError::io("init.mkdir", &target, err))?;
    }

    manifest.save(&path.join(MANIFEST_FILE))?;
    let ignore = path.join(".gitignore");
    fs::write(&ignore, GITIGNORE).map_err(|err| LabError::io("init.write", &ignore, err))?;
    if opts.readme {
        let target = path.join("README.md");
        fs::write(&target, readme(&name, &opts.authors))
            .map_err(|err| LabError::io("init.write", &target, err))?;
    }

    if opts.git {
        let committed = git(path, &["init", "-q"])
            && git(path, &["add", "-A"])
            && git(path, &["commit", "-q", "-m", "Initial commit"]);
        if !committed {
            warn!(path = %path.display(), "project created without an initial commit");
        }
    }

    info!(name = %name, path = %path.display(), "initialized project");
    ProjectContext::open(path)
}
