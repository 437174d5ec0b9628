#![deny(missing_docs)]
#![doc = "Core parameter types, errors and artifact storage shared by the labbook crates."]

pub mod errors;
pub mod params;
/// Canonical JSON and YAML helpers.
pub mod serde;
pub mod store;
pub mod value;

pub use errors::{ErrorInfo, LabError};
pub use params::{access_path, params_from_serialize, params_into_typed, ParamSet, Parameters};
pub use self::serde::{
    from_json_slice, from_yaml_slice, load_params_file, to_canonical_json_bytes,
    to_canonical_json_pretty, to_yaml_string,
};
pub use store::{ArtifactStore, JsonFileStore, MemoryStore};
pub use value::{ParamValue, ValueKind};
