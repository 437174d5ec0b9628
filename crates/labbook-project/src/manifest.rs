use std::fs;
use std::path::Path;

use labbook_core::errors::{ErrorInfo, LabError};
use labbook_exp::NamingPolicy;
use serde::{Deserialize, Serialize};

/// File marking the root of a project.
pub const MANIFEST_FILE: &str = "Lab.toml";

/// Contents of `Lab.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectManifest {
    /// Project name, checked on activation.
    pub name: String,
    /// Authors listed in the README.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    /// Naming defaults for runs of this project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naming: Option<NamingPolicy>,
}

impl ProjectManifest {
    /// Manifest with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            authors: Vec::new(),
            naming: None,
        }
    }

    /// Rejects a blank name.
    pub fn validate(&self) -> Result<(), LabError> {
        if self.name.trim().is_empty() {
            return Err(LabError::Project(
                ErrorInfo::new("manifest.name", "project manifest missing name")
                    .with_hint(format!("set `name` in {MANIFEST_FILE}")),
            ));
        }
        Ok(())
    }

    /// Reads and validates a manifest file.
    pub fn load(path: &Path) -> Result<Self, LabError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            LabError::Project(
                ErrorInfo::new("manifest.read", format!("failed to read manifest: {err}"))
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let manifest: Self = toml::from_str(&contents).map_err(|err| {
            LabError::Project(
                ErrorInfo::new("manifest.parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Writes the manifest as TOML.
    pub fn save(&self, path: &Path) -> Result<(), LabError> {
        let text = toml::to_string_pretty(self).map_err(|err| {
            LabError::Serde(ErrorInfo::new("manifest.serialize", err.to_string()))
        })?;
        fs::write(path, text).map_err(|err| LabError::io("manifest.write", path, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naming_table_is_optional() {
        let bare: ProjectManifest = toml::from_str("name = \"wave\"").unwrap();
        assert_eq!(bare, ProjectManifest::new("wave"));

        let with_naming: ProjectManifest = toml::from_str(
            "name = \"wave\"\nauthors = [\"A. Researcher\"]\n\n[naming]\ndigits = 5\nsuffix = \"json\"\n",
        )
        .unwrap();
        let naming = with_naming.naming.unwrap();
        assert_eq!(naming.digits, 5);
        assert_eq!(naming.connector, "_");
        assert_eq!(naming.suffix, "json");
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = ProjectManifest::new("  ").validate().unwrap_err();
        assert_eq!(err.info().code, "manifest.name");
    }
}
