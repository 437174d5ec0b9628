#![deny(missing_docs)]
//! Locates labbook projects and derives their standard directories.

mod context;
mod init;
mod manifest;

pub use context::{find_project, find_project_in, ProjectContext};
pub use init::{initialize_project, InitOptions, DEFAULT_LAYOUT};
pub use manifest::{ProjectManifest, MANIFEST_FILE};
