//! Parameter containers and the access capability used by naming and collection.

use std::collections::{BTreeMap, BTreeSet};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::{ErrorInfo, LabError};
use crate::value::{ParamValue, ValueKind};

/// Ordered mapping from parameter name to value.
pub type ParamSet = BTreeMap<String, ParamValue>;

/// Capability of a container to behave as a parameter set.
///
/// Composite types opt in through an explicit implementation; there is no
/// reflection. Implementors may also override the naming defaults used by
/// `savename` when a policy leaves them unset.
pub trait Parameters {
    /// Every key the container can be accessed with.
    fn all_keys(&self) -> Vec<&str>;

    /// Value stored under `key`.
    fn access(&self, key: &str) -> Option<&ParamValue>;

    /// Kinds admitted into generated names by default.
    fn default_allowed(&self) -> BTreeSet<ValueKind> {
        ValueKind::default_allowed()
    }

    /// Prefix used in generated names by default.
    fn default_prefix(&self) -> String {
        String::new()
    }
}

impl Parameters for ParamSet {
    fn all_keys(&self) -> Vec<&str> {
        BTreeMap::keys(self).map(String::as_str).collect()
    }

    fn access(&self, key: &str) -> Option<&ParamValue> {
        BTreeMap::get(self, key)
    }
}

/// Follows `path` through nested maps, starting at `params`.
pub fn access_path<'a, P: Parameters + ?Sized>(
    params: &'a P,
    path: &[&str],
) -> Option<&'a ParamValue> {
    let (first, rest) = path.split_first()?;
    let mut current = params.access(first)?;
    for key in rest {
        current = current.as_map()?.get(*key)?;
    }
    Some(current)
}

/// Converts any serializable struct or map into a [`ParamSet`].
pub fn params_from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<ParamSet, LabError> {
    let json = serde_json::to_value(value)
        .map_err(|err| LabError::Serde(ErrorInfo::new("params.serialize", err.to_string())))?;
    match ParamValue::from(json) {
        ParamValue::Map(map) => Ok(map),
        other => Err(LabError::Serde(
            ErrorInfo::new("params.shape", "value does not serialize to a mapping")
                .with_context("kind", other.kind().to_string()),
        )),
    }
}

/// Converts a [`ParamSet`] back into a typed structure.
pub fn params_into_typed<T: DeserializeOwned>(params: &ParamSet) -> Result<T, LabError> {
    let json = Value::from(ParamValue::Map(params.clone()));
    serde_json::from_value(json)
        .map_err(|err| LabError::Serde(ErrorInfo::new("params.deserialize", err.to_string())))
}

/// Builds a [`ParamSet`] from local variables or explicit pairs.
///
/// ```
/// use labbook_core::{param_set, ParamValue};
///
/// let alpha = 0.5;
/// let mode = "fast";
/// let from_vars = param_set!(alpha, mode);
/// let from_pairs = param_set!("alpha" => 0.5, "mode" => "fast");
/// assert_eq!(from_vars, from_pairs);
/// assert_eq!(from_vars["alpha"], ParamValue::Float(0.5));
/// ```
#[macro_export]
macro_rules! param_set {
    () => {
        $crate::ParamSet::new()
    };
    ($($key:literal => $value:expr),+ $(,)?) => {{
        let mut set = $crate::ParamSet::new();
        $(
            set.insert(::std::string::String::from($key), $crate::ParamValue::from($value));
        )+
        set
    }};
    ($($name:ident),+ $(,)?) => {{
        let mut set = $crate::ParamSet::new();
        $(
            set.insert(
                ::std::string::String::from(stringify!($name)),
                $crate::ParamValue::from($name.clone()),
            );
        )+
        set
    }};
}
