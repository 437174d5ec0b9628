use std::collections::BTreeSet;
use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use labbook_core::errors::{ErrorInfo, LabError};
use labbook_core::{load_params_file, to_canonical_json_bytes, ArtifactStore, JsonFileStore};
use labbook_exp::{savename, Expansion};
use tracing::info;

use super::NamingArgs;

#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Sweep template; list values are the axes.
    #[arg(long)]
    pub template: PathBuf,
    /// Only print the number of configurations.
    #[arg(long)]
    pub count: bool,
    /// Write each configuration into this directory, named after its parameters.
    #[arg(long, conflicts_with = "count")]
    pub out: Option<PathBuf>,
    #[command(flatten)]
    pub naming: NamingArgs,
}

pub fn run(args: &ExpandArgs) -> Result<(), Box<dyn Error>> {
    let template = load_params_file(&args.template)?;
    let configs = Expansion::new(&template)?;
    if args.count {
        println!("{}", configs.total());
        return Ok(());
    }

    let Some(out) = &args.out else {
        for config in configs {
            println!("{}", String::from_utf8(to_canonical_json_bytes(&config)?)?);
        }
        return Ok(());
    };

    let mut policy = args.naming.resolve()?;
    if policy.suffix.is_empty() {
        policy = policy.with_suffix("json");
    }
    let total = configs.total();
    let mut named = Vec::with_capacity(total);
    let mut seen = BTreeSet::new();
    for config in configs {
        let key = savename(&config, &policy)?;
        if !seen.insert(key.clone()) {
            return Err(LabError::InvalidTemplate(
                ErrorInfo::new("expand.name-collision", "two configurations share a name")
                    .with_context("name", key)
                    .with_hint("pass `--allowed scalar,list` to name list axes or raise `--digits`"),
            )
            .into());
        }
        named.push((key, config));
    }

    let store = JsonFileStore::new(out);
    for (key, config) in &named {
        store.save(key, config)?;
        println!("{key}");
    }
    info!(total, out = %out.display(), "wrote configurations");
    Ok(())
}
