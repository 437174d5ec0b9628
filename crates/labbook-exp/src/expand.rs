use labbook_core::errors::{ErrorInfo, LabError};
use labbook_core::{ParamSet, ParamValue};

/// Lazy Cartesian expansion of a sweep template.
///
/// Every `List` value of the template is a sweep axis; all other values are
/// copied verbatim into each configuration. Axes are taken in key order and the
/// first axis varies fastest.
#[derive(Debug, Clone)]
pub struct Expansion<'a> {
    template: &'a ParamSet,
    axes: Vec<(&'a str, &'a [ParamValue])>,
    total: usize,
    cursor: usize,
}

impl<'a> Expansion<'a> {
    /// Validates `template` and prepares the expansion without materialising it.
    pub fn new(template: &'a ParamSet) -> Result<Self, LabError> {
        let mut axes = Vec::new();
        let mut total: usize = 1;
        for (key, value) in template {
            let ParamValue::List(values) = value else {
                continue;
            };
            check_axis(key, values)?;
            total = total.checked_mul(values.len()).ok_or_else(|| {
                LabError::InvalidTemplate(
                    ErrorInfo::new("expand.overflow", "number of configurations overflows")
                        .with_context("axis", key.clone()),
                )
            })?;
            axes.push((key.as_str(), values.as_slice()));
        }
        Ok(Self {
            template,
            axes,
            total,
            cursor: 0,
        })
    }

    /// Names of the sweep axes in variation order, fastest first.
    pub fn axes(&self) -> impl Iterator<Item = &str> + '_ {
        self.axes.iter().map(|(key, _)| *key)
    }

    /// Total number of configurations, independent of iteration progress.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Builds the configuration at `index` directly.
    pub fn config_at(&self, index: usize) -> Option<ParamSet> {
        if index >= self.total {
            return None;
        }
        let mut remainder = index;
        let mut config = self.template.clone();
        for (key, values) in &self.axes {
            let slot = remainder % values.len();
            remainder /= values.len();
            config.insert((*key).to_string(), values[slot].clone());
        }
        Some(config)
    }
}

impl Iterator for Expansion<'_> {
    type Item = ParamSet;

    fn next(&mut self) -> Option<Self::Item> {
        let config = self.config_at(self.cursor)?;
        self.cursor += 1;
        Some(config)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total.saturating_sub(self.cursor);
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.cursor = self.cursor.saturating_add(n);
        self.next()
    }
}

impl ExactSizeIterator for Expansion<'_> {}

/// An axis whose elements are partly lists and partly scalars cannot be told
/// apart from a literal compound value.
fn check_axis(key: &str, values: &[ParamValue]) -> Result<(), LabError> {
    let nested = values
        .iter()
        .filter(|value| matches!(value, ParamValue::List(_)))
        .count();
    if nested != 0 && nested != values.len() {
        return Err(LabError::InvalidTemplate(
            ErrorInfo::new("expand.mixed-axis", "sweep axis mixes lists and scalars")
                .with_context("axis", key)
                .with_hint("wrap a constant list in a one-element list to keep it fixed"),
        ));
    }
    Ok(())
}

/// Expands `template` into every configuration of its sweep axes.
///
/// ```
/// use labbook_core::param_set;
/// use labbook_exp::expand;
///
/// let template = param_set!("a" => vec![1, 2], "b" => 4);
/// let configs = expand(&template).unwrap();
/// assert_eq!(configs, vec![param_set!("a" => 1, "b" => 4), param_set!("a" => 2, "b" => 4)]);
/// ```
pub fn expand(template: &ParamSet) -> Result<Vec<ParamSet>, LabError> {
    Ok(Expansion::new(template)?.collect())
}

/// Number of configurations [`expand`] would produce, computed without
/// building them.
pub fn count(template: &ParamSet) -> Result<usize, LabError> {
    Ok(Expansion::new(template)?.total())
}
