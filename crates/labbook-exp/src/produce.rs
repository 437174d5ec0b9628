use labbook_core::errors::LabError;
use labbook_core::{ArtifactStore, ParamSet};
use tracing::info;

use crate::savename::{savename, NamingPolicy};
use crate::tag::{tag, CommitSource};

/// Options for [`produce_or_load`].
#[derive(Clone)]
pub struct ProduceOptions<'a> {
    /// Policy used to derive the artifact key. Defaults to a `json` suffix.
    pub naming: NamingPolicy,
    /// When set, freshly produced records are tagged with this source.
    pub commit: Option<&'a dyn CommitSource>,
}

impl Default for ProduceOptions<'_> {
    fn default() -> Self {
        Self {
            naming: NamingPolicy::default().with_suffix("json"),
            commit: None,
        }
    }
}

/// Whether a record came from the store or was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// An artifact with the derived key already existed.
    Loaded,
    /// The producer ran and its output was saved.
    Produced,
}

/// Record returned by [`produce_or_load`].
#[derive(Debug, Clone, PartialEq)]
pub struct Produced {
    /// Store key derived from the parameters.
    pub key: String,
    /// Loaded or produced record.
    pub data: ParamSet,
    /// Where the record came from.
    pub origin: Origin,
}

/// Loads the artifact named after `params`, or produces and saves it.
pub fn produce_or_load<S, F>(
    store: &S,
    params: &ParamSet,
    opts: &ProduceOptions<'_>,
    produce: F,
) -> Result<Produced, LabError>
where
    S: ArtifactStore + ?Sized,
    F: FnOnce(&ParamSet) -> Result<ParamSet, LabError>,
{
    let key = savename(params, &opts.naming)?;
    if store.exists(&key) {
        info!(key = %key, "loading existing artifact");
        let data = store.load(&key)?;
        return Ok(Produced {
            key,
            data,
            origin: Origin::Loaded,
        });
    }
    info!(key = %key, "artifact missing, producing");
    let mut data = produce(params)?;
    if let Some(source) = opts.commit {
        tag(&mut data, source);
    }
    store.save(&key, &data)?;
    Ok(Produced {
        key,
        data,
        origin: Origin::Produced,
    })
}
