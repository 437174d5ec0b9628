use std::path::{Path, PathBuf};
use std::process::Command;

use labbook_core::errors::LabError;
use labbook_core::{ArtifactStore, ParamSet, ParamValue};
use tracing::{debug, warn};

/// Reserved field holding the commit identifier of a tagged record.
pub const COMMIT_FIELD: &str = "commit";

/// Appended to the commit id when the working tree has uncommitted changes.
pub const DIRTY_SUFFIX: &str = "_dirty";

/// Source of the version-control identifier attached to saved records.
pub trait CommitSource {
    /// Current commit id, or `None` when it cannot be determined.
    fn current_commit(&self) -> Option<String>;
}

impl<F> CommitSource for F
where
    F: Fn() -> Option<String>,
{
    fn current_commit(&self) -> Option<String> {
        self()
    }
}

/// Reads the commit of a git working tree through the `git` executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    /// Uses the repository containing `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Directory the repository is queried from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` when tracked files differ from `HEAD`.
    pub fn is_dirty(&self) -> bool {
        run_git(&self.path, &["status", "--porcelain", "--untracked-files=no"])
            .map(|status| !status.is_empty())
            .unwrap_or(false)
    }
}

impl CommitSource for GitRepo {
    fn current_commit(&self) -> Option<String> {
        let head = run_git(&self.path, &["rev-parse", "HEAD"])?;
        if self.is_dirty() {
            Some(format!("{head}{DIRTY_SUFFIX}"))
        } else {
            Some(head)
        }
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map_err(|err| debug!(error = %err, "git unavailable"))
        .ok()?;
    if !output.status.success() {
        debug!(
            dir = %dir.display(),
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "git command failed"
        );
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Adds the current commit under [`COMMIT_FIELD`] unless the field exists.
///
/// Never fails: when no commit is available the record is left untouched.
/// Returns whether a tag was added.
pub fn tag(params: &mut ParamSet, source: &dyn CommitSource) -> bool {
    if params.contains_key(COMMIT_FIELD) {
        debug!("record already tagged");
        return false;
    }
    match source.current_commit() {
        Some(commit) => {
            params.insert(COMMIT_FIELD.to_string(), ParamValue::Text(commit));
            true
        }
        None => {
            warn!("no commit available, record saved without tag");
            false
        }
    }
}

/// Tags a copy of `params` and saves it under `key`, returning the saved record.
pub fn tagsave<S: ArtifactStore + ?Sized>(
    store: &S,
    key: &str,
    params: &ParamSet,
    source: &dyn CommitSource,
) -> Result<ParamSet, LabError> {
    let mut record = params.clone();
    tag(&mut record, source);
    store.save(key, &record)?;
    Ok(record)
}
