use std::collections::BTreeSet;

use labbook_core::errors::{ErrorInfo, LabError};
use labbook_core::{ParamValue, Parameters, ValueKind};
use serde::{Deserialize, Serialize};

/// Largest rounding precision accepted by [`savename`].
pub const MAX_DIGITS: i32 = 15;

/// Controls how [`savename`] turns a parameter container into a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamingPolicy {
    /// Kinds admitted into the name. `None` defers to the container's defaults.
    #[serde(default)]
    pub allowed: Option<BTreeSet<ValueKind>>,
    /// Keys considered for the name. `None` means every key of the container.
    #[serde(default)]
    pub accesses: Option<Vec<String>>,
    /// Decimal places kept for floating point values.
    #[serde(default = "NamingPolicy::default_digits")]
    pub digits: i32,
    /// Separator placed between `key=value` pairs and after the prefix.
    #[serde(default = "NamingPolicy::default_connector")]
    pub connector: String,
    /// Leading text. `None` defers to the container's default prefix.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Extension appended after a `.`; empty for none.
    #[serde(default)]
    pub suffix: String,
}

impl NamingPolicy {
    const fn default_digits() -> i32 {
        3
    }

    fn default_connector() -> String {
        "_".to_string()
    }

    /// Sets the prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Sets the rounding precision.
    pub fn with_digits(mut self, digits: i32) -> Self {
        self.digits = digits;
        self
    }

    /// Sets the connector.
    pub fn with_connector(mut self, connector: impl Into<String>) -> Self {
        self.connector = connector.into();
        self
    }

    /// Restricts the admitted value kinds.
    pub fn with_allowed(mut self, kinds: impl IntoIterator<Item = ValueKind>) -> Self {
        self.allowed = Some(kinds.into_iter().collect());
        self
    }

    /// Restricts the keys considered.
    pub fn with_accesses<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accesses = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    fn validate(&self) -> Result<(), LabError> {
        if !(0..=MAX_DIGITS).contains(&self.digits) {
            return Err(LabError::InvalidPolicy(
                ErrorInfo::new("savename.digits", "digits out of range")
                    .with_context("digits", self.digits.to_string())
                    .with_hint(format!("use a precision between 0 and {MAX_DIGITS}")),
            ));
        }
        Ok(())
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            allowed: None,
            accesses: None,
            digits: Self::default_digits(),
            connector: Self::default_connector(),
            prefix: None,
            suffix: String::new(),
        }
    }
}

/// Builds the canonical `key=value` name of a parameter container.
///
/// Keys are sorted, floats are rounded to `policy.digits` and printed without a
/// decimal point when the rounding leaves an integer. A prefix ending in `/` or
/// `\` is treated as a directory and joined without the connector.
///
/// ```
/// use labbook_core::param_set;
/// use labbook_exp::{savename, NamingPolicy};
///
/// let d = param_set!("a" => 0.153456453, "b" => 5.0, "mode" => "double");
/// let name = savename(&d, &NamingPolicy::default().with_digits(4)).unwrap();
/// assert_eq!(name, "a=0.1535_b=5_mode=double");
/// ```
pub fn savename<P: Parameters + ?Sized>(
    params: &P,
    policy: &NamingPolicy,
) -> Result<String, LabError> {
    policy.validate()?;
    let allowed = policy
        .allowed
        .clone()
        .unwrap_or_else(|| params.default_allowed());
    let candidates: Vec<&str> = match &policy.accesses {
        Some(keys) => keys.iter().map(String::as_str).collect(),
        None => params.all_keys(),
    };

    let mut entries: Vec<(&str, &ParamValue)> = candidates
        .into_iter()
        .filter_map(|key| params.access(key).map(|value| (key, value)))
        .filter(|(_, value)| allowed.contains(&value.kind()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries.dedup_by(|a, b| a.0 == b.0);

    let body = entries
        .iter()
        .map(|(key, value)| format!("{key}={}", render_value(value, policy.digits)))
        .collect::<Vec<_>>()
        .join(&policy.connector);

    let prefix = policy
        .prefix
        .clone()
        .unwrap_or_else(|| params.default_prefix());
    let mut name = String::with_capacity(prefix.len() + body.len() + policy.suffix.len() + 2);
    if !prefix.is_empty() {
        name.push_str(&prefix);
        let is_directory = prefix.ends_with('/') || prefix.ends_with('\\');
        if !body.is_empty() && !is_directory {
            name.push_str(&policy.connector);
        }
    }
    name.push_str(&body);
    // A leading dot in the suffix is accepted and not doubled.
    let suffix = policy.suffix.trim_start_matches('.');
    if !suffix.is_empty() {
        name.push('.');
        name.push_str(suffix);
    }
    Ok(name)
}

/// Renders one value the way it appears in a name.
pub fn render_value(value: &ParamValue, digits: i32) -> String {
    match value {
        ParamValue::Float(float) => render_float(*float, digits),
        other => other.to_string(),
    }
}

fn render_float(value: f64, digits: i32) -> String {
    let rounded = round_to(value, digits);
    if rounded.is_finite() && rounded == rounded.round() {
        if rounded.abs() < 9.0e15 {
            return format!("{}", rounded as i64);
        }
        return format!("{rounded:.0}");
    }
    format!("{rounded}")
}

fn round_to(value: f64, digits: i32) -> f64 {
    // Beyond 2^52 every f64 is already an integer.
    if value.abs() >= 4_503_599_627_370_496.0 {
        return value;
    }
    let scale = 10f64.powi(digits);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_close_to_integers_drop_the_point() {
        assert_eq!(render_float(4.9996, 3), "5");
        assert_eq!(render_float(-0.0001, 3), "0");
        assert_eq!(render_float(0.153456453, 3), "0.153");
    }

    #[test]
    fn halves_round_to_even() {
        assert_eq!(render_float(2.5, 0), "2");
        assert_eq!(render_float(3.5, 0), "4");
        assert_eq!(render_float(-2.5, 0), "-2");
        assert_eq!(render_float(0.125, 2), "0.12");
    }

    #[test]
    fn non_finite_floats_render_verbatim() {
        assert_eq!(render_float(f64::NAN, 3), "NaN");
        assert_eq!(render_float(f64::INFINITY, 3), "inf");
    }

    #[test]
    fn huge_floats_stay_integral() {
        assert_eq!(render_float(1.0e20, 3), "100000000000000000000");
    }
}
