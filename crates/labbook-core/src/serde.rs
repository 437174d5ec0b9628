use std::collections::BTreeMap;
use std::fs;
use std::iter::FromIterator;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ErrorInfo, LabError};
use crate::params::ParamSet;

fn serde_error(code: &str, err: impl ToString) -> LabError {
    LabError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Serializes a value into canonical JSON bytes with deterministic key ordering.
pub fn to_canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, LabError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json_serialize", err))?;
    let canonical = canonicalize(value);
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonical).map_err(|err| serde_error("json_write", err))?;
    Ok(bytes)
}

/// Pretty-printed variant of [`to_canonical_json_bytes`], used for files meant
/// to be read by people.
pub fn to_canonical_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, LabError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json_serialize", err))?;
    serde_json::to_string_pretty(&canonicalize(value))
        .map_err(|err| serde_error("json_write", err))
}

/// Deserializes a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, LabError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json_deserialize", err))
}

/// Serializes a value into YAML.
pub fn to_yaml_string<T: Serialize + ?Sized>(value: &T) -> Result<String, LabError> {
    serde_yaml::to_string(value).map_err(|err| serde_error("yaml_serialize", err))
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, LabError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("yaml_deserialize", err))
}

/// Reads a parameter file, choosing YAML for `.yaml`/`.yml` and JSON otherwise.
///
/// Failures are reported as [`LabError::Load`] so callers scanning many files
/// can tell them apart from their own errors.
pub fn load_params_file(path: &Path) -> Result<ParamSet, LabError> {
    let bytes = fs::read(path).map_err(|err| {
        LabError::Load(
            ErrorInfo::new("params.read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed = if is_yaml {
        from_yaml_slice::<ParamSet>(&bytes)
    } else {
        from_json_slice::<ParamSet>(&bytes)
    };
    parsed.map_err(|err| {
        LabError::Load(
            ErrorInfo::new("params.parse", err.info().message.clone())
                .with_context("path", path.display().to_string()),
        )
    })
}
