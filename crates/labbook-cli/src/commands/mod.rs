use std::collections::BTreeSet;
use std::env;
use std::path::Path;

use clap::Args;
use labbook_core::{LabError, ValueKind};
use labbook_exp::NamingPolicy;
use labbook_project::ProjectContext;
use tracing::debug;

pub mod collect;
pub mod commit;
pub mod expand;
pub mod init;
pub mod savename;
pub mod version;

/// Naming flags shared by the commands that derive names. Unset flags fall
/// back to the `[naming]` table of the enclosing project.
#[derive(Args, Debug, Default, Clone)]
pub struct NamingArgs {
    /// Text placed before the name; a trailing `/` makes it a directory.
    #[arg(long)]
    pub prefix: Option<String>,
    /// Extension appended after a dot.
    #[arg(long)]
    pub suffix: Option<String>,
    /// Decimal places kept for floats.
    #[arg(long)]
    pub digits: Option<i32>,
    /// Separator between `key=value` pairs.
    #[arg(long)]
    pub connector: Option<String>,
    /// Value kinds or groups admitted into the name (`real`, `string`, `scalar`, ...).
    #[arg(long, value_delimiter = ',')]
    pub allowed: Vec<String>,
    /// Keys considered for the name.
    #[arg(long, value_delimiter = ',')]
    pub accesses: Vec<String>,
}

impl NamingArgs {
    /// Overrides `policy` with every flag that was given.
    pub fn apply(&self, mut policy: NamingPolicy) -> Result<NamingPolicy, LabError> {
        if let Some(prefix) = &self.prefix {
            policy = policy.with_prefix(prefix.clone());
        }
        if let Some(suffix) = &self.suffix {
            policy = policy.with_suffix(suffix.clone());
        }
        if let Some(digits) = self.digits {
            policy = policy.with_digits(digits);
        }
        if let Some(connector) = &self.connector {
            policy = policy.with_connector(connector.clone());
        }
        if !self.allowed.is_empty() {
            let mut kinds = BTreeSet::new();
            for group in &self.allowed {
                kinds.extend(ValueKind::parse_group(group)?);
            }
            policy.allowed = Some(kinds);
        }
        if !self.accesses.is_empty() {
            policy = policy.with_accesses(self.accesses.iter().cloned());
        }
        Ok(policy)
    }

    /// Project defaults from the working directory with the flags on top.
    pub fn resolve(&self) -> Result<NamingPolicy, LabError> {
        self.apply(project_naming()?)
    }
}

fn project_naming() -> Result<NamingPolicy, LabError> {
    let cwd = env::current_dir().map_err(|err| LabError::io("cli.cwd", Path::new("."), err))?;
    match ProjectContext::detect(&cwd)? {
        Some(project) => {
            debug!(project = %project.name(), "using project naming defaults");
            Ok(project.naming())
        }
        None => Ok(NamingPolicy::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_project_defaults() {
        let base = NamingPolicy::default()
            .with_digits(5)
            .with_connector(",")
            .with_suffix("bson");
        let args = NamingArgs {
            suffix: Some("json".to_string()),
            allowed: vec!["real".to_string(), "bool".to_string()],
            ..NamingArgs::default()
        };
        let policy = args.apply(base).unwrap();
        assert_eq!(policy.digits, 5);
        assert_eq!(policy.connector, ",");
        assert_eq!(policy.suffix, "json");
        let allowed = policy.allowed.unwrap();
        assert!(allowed.contains(&ValueKind::Int));
        assert!(allowed.contains(&ValueKind::Float));
        assert!(allowed.contains(&ValueKind::Bool));
        assert!(!allowed.contains(&ValueKind::Text));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let args = NamingArgs {
            allowed: vec!["complex".to_string()],
            ..NamingArgs::default()
        };
        let err = args.apply(NamingPolicy::default()).unwrap_err();
        assert!(matches!(err, LabError::InvalidPolicy(_)));
    }
}
