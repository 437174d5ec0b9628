//! Closed value model for parameter containers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::{ErrorInfo, LabError};

/// A single parameter value.
///
/// `List` is the only variant treated as a sweep axis during expansion; `Map`
/// is an opaque compound scalar everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ParamValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Free text.
    Text(String),
    /// Enum-like identifier. Serializes as a plain string.
    Symbol(String),
    /// Ordered sequence of values.
    List(Vec<ParamValue>),
    /// Nested mapping.
    Map(BTreeMap<String, ParamValue>),
    /// Absent or null value.
    Null,
}

/// Runtime category of a [`ParamValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// [`ParamValue::Bool`].
    Bool,
    /// [`ParamValue::Int`].
    Int,
    /// [`ParamValue::Float`].
    Float,
    /// [`ParamValue::Text`].
    Text,
    /// [`ParamValue::Symbol`].
    Symbol,
    /// [`ParamValue::List`].
    List,
    /// [`ParamValue::Map`].
    Map,
    /// [`ParamValue::Null`].
    Null,
}

impl ValueKind {
    /// Kinds used in names when nothing else is configured: numbers, text and
    /// enum-like values.
    pub fn default_allowed() -> BTreeSet<ValueKind> {
        [
            ValueKind::Bool,
            ValueKind::Int,
            ValueKind::Float,
            ValueKind::Text,
            ValueKind::Symbol,
        ]
        .into_iter()
        .collect()
    }

    /// Parses a kind name or one of the group aliases `numeric`, `string`,
    /// `scalar` and `all` into the set of kinds it denotes.
    pub fn parse_group(name: &str) -> Result<Vec<ValueKind>, LabError> {
        let kinds = match name.trim().to_ascii_lowercase().as_str() {
            "numeric" | "real" | "number" => vec![ValueKind::Bool, ValueKind::Int, ValueKind::Float],
            "string" => vec![ValueKind::Text],
            "scalar" => ValueKind::default_allowed().into_iter().collect(),
            "all" => vec![
                ValueKind::Bool,
                ValueKind::Int,
                ValueKind::Float,
                ValueKind::Text,
                ValueKind::Symbol,
                ValueKind::List,
                ValueKind::Map,
                ValueKind::Null,
            ],
            other => vec![other.parse()?],
        };
        Ok(kinds)
    }
}

impl FromStr for ValueKind {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Ok(ValueKind::Bool),
            "int" | "integer" => Ok(ValueKind::Int),
            "float" => Ok(ValueKind::Float),
            "text" | "str" => Ok(ValueKind::Text),
            "symbol" | "enum" => Ok(ValueKind::Symbol),
            "list" | "sequence" | "vec" => Ok(ValueKind::List),
            "map" | "dict" => Ok(ValueKind::Map),
            "null" => Ok(ValueKind::Null),
            other => Err(LabError::InvalidPolicy(
                ErrorInfo::new("value.kind", "unknown value kind")
                    .with_context("kind", other)
                    .with_hint("expected one of bool, int, float, text, symbol, list, map, null"),
            )),
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::Symbol => "symbol",
            ValueKind::List => "list",
            ValueKind::Map => "map",
            ValueKind::Null => "null",
        };
        f.write_str(name)
    }
}

impl ParamValue {
    /// Creates an enum-like symbol value.
    pub fn symbol(name: impl Into<String>) -> Self {
        ParamValue::Symbol(name.into())
    }

    /// Returns the runtime category of the value.
    pub fn kind(&self) -> ValueKind {
        match self {
            ParamValue::Bool(_) => ValueKind::Bool,
            ParamValue::Int(_) => ValueKind::Int,
            ParamValue::Float(_) => ValueKind::Float,
            ParamValue::Text(_) => ValueKind::Text,
            ParamValue::Symbol(_) => ValueKind::Symbol,
            ParamValue::List(_) => ValueKind::List,
            ParamValue::Map(_) => ValueKind::Map,
            ParamValue::Null => ValueKind::Null,
        }
    }

    /// Numeric view of the value; integers and booleans widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(value) => Some(*value),
            ParamValue::Int(value) => Some(*value as f64),
            ParamValue::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Integer view of the value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// String view of text and symbol values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(text) | ParamValue::Symbol(text) => Some(text),
            _ => None,
        }
    }

    /// Element view of list values.
    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Entry view of map values.
    pub fn as_map(&self) -> Option<&BTreeMap<String, ParamValue>> {
        match self {
            ParamValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns `true` for [`ParamValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(flag) => write!(f, "{flag}"),
            ParamValue::Int(value) => write!(f, "{value}"),
            ParamValue::Float(value) => write!(f, "{value}"),
            ParamValue::Text(text) | ParamValue::Symbol(text) => f.write_str(text),
            ParamValue::List(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            ParamValue::Map(map) => {
                write!(f, "{{")?;
                for (idx, (key, value)) in map.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                write!(f, "}}")
            }
            ParamValue::Null => f.write_str("null"),
        }
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ParamValue::Null,
            Value::Bool(flag) => ParamValue::Bool(flag),
            Value::Number(number) => match number.as_i64() {
                Some(int) => ParamValue::Int(int),
                None => ParamValue::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(text) => ParamValue::Text(text),
            Value::Array(items) => ParamValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => ParamValue::Map(
                map.into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

// Non-finite floats have no JSON representation and become null.
impl From<ParamValue> for Value {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Null => Value::Null,
            ParamValue::Bool(flag) => Value::Bool(flag),
            ParamValue::Int(int) => Value::Number(int.into()),
            ParamValue::Float(float) => Number::from_f64(float)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ParamValue::Text(text) | ParamValue::Symbol(text) => Value::String(text),
            ParamValue::List(items) => Value::Array(items.into_iter().map(Into::into).collect()),
            ParamValue::Map(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        match i64::try_from(value) {
            Ok(int) => ParamValue::Int(int),
            Err(_) => ParamValue::Float(value as f64),
        }
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Float(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, ParamValue>> for ParamValue {
    fn from(map: BTreeMap<String, ParamValue>) -> Self {
        ParamValue::Map(map)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ParamValue::Null)
    }
}
