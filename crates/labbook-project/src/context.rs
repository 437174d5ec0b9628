use std::env;
use std::path::{Path, PathBuf};

use labbook_core::errors::{ErrorInfo, LabError};
use labbook_exp::{GitRepo, NamingPolicy};
use tracing::{debug, warn};

use crate::manifest::{ProjectManifest, MANIFEST_FILE};

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn search(start: &Path, stop: Option<&Path>) -> Option<PathBuf> {
    let start = absolute(start);
    let mut current = Some(start.as_path());
    while let Some(dir) = current {
        if dir.join(MANIFEST_FILE).is_file() {
            debug!(root = %dir.display(), "found project");
            return Some(dir.to_path_buf());
        }
        if stop == Some(dir) {
            break;
        }
        current = dir.parent();
    }
    None
}

/// Walks `start` and its parents looking for [`MANIFEST_FILE`], giving up after
/// `stop` or at the filesystem root.
pub fn find_project_in(start: &Path, stop: Option<&Path>) -> Option<PathBuf> {
    let found = search(start, stop);
    if found.is_none() {
        warn!(start = %start.display(), "no {MANIFEST_FILE} found");
    }
    found
}

/// [`find_project_in`] bounded by the user's home directory.
pub fn find_project(start: &Path) -> Option<PathBuf> {
    let home = home_dir();
    find_project_in(start, home.as_deref())
}

/// An activated project: its root directory and manifest.
///
/// Created once and handed to whatever needs project paths.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectContext {
    root: PathBuf,
    manifest: ProjectManifest,
}

impl ProjectContext {
    /// Opens the project whose manifest sits directly in `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, LabError> {
        let root = root.into();
        let manifest = ProjectManifest::load(&root.join(MANIFEST_FILE))?;
        Ok(Self { root, manifest })
    }

    /// Opens the project containing `start`, if any, without warning when
    /// there is none.
    pub fn detect(start: &Path) -> Result<Option<Self>, LabError> {
        let home = home_dir();
        match search(start, home.as_deref()) {
            Some(root) => Self::open(root).map(Some),
            None => Ok(None),
        }
    }

    /// Finds the project containing `path` and activates it, optionally
    /// checking its name.
    pub fn activate(path: &Path, expected_name: Option<&str>) -> Result<Self, LabError> {
        let root = find_project(path).ok_or_else(|| {
            LabError::Project(
                ErrorInfo::new("project.not-found", "no project contains this path")
                    .with_context("path", path.display().to_string())
                    .with_hint("run `labbook init` to create one"),
            )
        })?;
        let context = Self::open(root)?;
        if let Some(expected) = expected_name {
            if context.manifest.name != expected {
                return Err(LabError::Project(
                    ErrorInfo::new("project.name-mismatch", "found a different project")
                        .with_context("expected", expected)
                        .with_context("found", context.manifest.name.clone())
                        .with_context("root", context.root.display().to_string()),
                ));
            }
        }
        debug!(name = %context.manifest.name, root = %context.root.display(), "activated project");
        Ok(context)
    }

    /// Name from the manifest.
    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    /// Parsed `Lab.toml`.
    pub fn manifest(&self) -> &ProjectManifest {
        &self.manifest
    }

    /// Naming defaults from the manifest, or the stock policy.
    pub fn naming(&self) -> NamingPolicy {
        self.manifest.naming.clone().unwrap_or_default()
    }

    /// Commit source for the project repository.
    pub fn repository(&self) -> GitRepo {
        GitRepo::new(&self.root)
    }

    /// Project root.
    pub fn projectdir(&self) -> &Path {
        &self.root
    }

    /// `folder` below the project root.
    pub fn subdir(&self, folder: impl AsRef<Path>) -> PathBuf {
        self.root.join(folder)
    }

    /// `data/`, where simulations and raw data live.
    pub fn datadir(&self) -> PathBuf {
        self.subdir("data")
    }

    /// `src/`.
    pub fn srcdir(&self) -> PathBuf {
        self.subdir("src")
    }

    /// `plots/`.
    pub fn plotsdir(&self) -> PathBuf {
        self.subdir("plots")
    }

    /// `scripts/`.
    pub fn scriptsdir(&self) -> PathBuf {
        self.subdir("scripts")
    }

    /// `papers/`.
    pub fn papersdir(&self) -> PathBuf {
        self.subdir("papers")
    }

    /// `notebooks/`.
    pub fn notebooksdir(&self) -> PathBuf {
        self.subdir("notebooks")
    }

    /// Joins `parts` onto [`ProjectContext::datadir`].
    pub fn data_path<I, P>(&self, parts: I) -> PathBuf
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        parts
            .into_iter()
            .fold(self.datadir(), |path, part| path.join(part))
    }
}
