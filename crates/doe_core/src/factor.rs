//! Factor definitions: named experimental variables with a finite level set.
//!
//! A factor is either categorical (an ordered list of distinct labels) or a
//! numeric range (`min..=max` stepped by `step`). Levels are realized by
//! index arithmetic only, so floating-point accumulation can never duplicate
//! a level or drop the minimum.

use serde::{Deserialize, Serialize};

use crate::error::DesignError;

/// One concrete value a factor may take in a run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactorValue {
    Number(f64),
    Text(String),
}

impl FactorValue {
    /// Render the value the way engine command lines expect it: whole
    /// numbers without a fractional part, everything else verbatim.
    pub fn render(&self) -> String {
        match self {
            FactorValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            FactorValue::Text(s) => s.clone(),
        }
    }
}

impl std::fmt::Display for FactorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// The kind of level set a factor carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FactorLevels {
    /// Ordered, deduplicated categorical labels.
    Categorical(Vec<String>),
    /// Arithmetic sequence `min, min+step, ...` up to and including `max`
    /// when the step divides the range evenly.
    Numeric { min: f64, max: f64, step: f64 },
}

/// A named experimental variable with a non-empty, order-stable level set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    name: String,
    levels: FactorLevels,
}

// Guards the count formula against a step that lands epsilon short of max.
const RANGE_EPSILON: f64 = 1e-9;

impl Factor {
    /// Define a categorical factor. Duplicate labels are dropped, keeping
    /// the first occurrence so declared order is preserved.
    ///
    /// # Errors
    ///
    /// Returns `EmptyLevels` if no labels remain after deduplication.
    pub fn categorical(
        name: impl Into<String>,
        levels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, DesignError> {
        let name = name.into();
        let mut seen = std::collections::HashSet::new();
        let mut deduped = Vec::new();
        for level in levels {
            let level = level.into();
            if seen.insert(level.clone()) {
                deduped.push(level);
            }
        }
        if deduped.is_empty() {
            return Err(DesignError::EmptyLevels { name });
        }
        Ok(Self {
            name,
            levels: FactorLevels::Categorical(deduped),
        })
    }

    /// Define a numeric range factor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNumericRange` unless `step > 0`, `min <= max` and all
    /// three are finite.
    pub fn numeric(
        name: impl Into<String>,
        min: f64,
        max: f64,
        step: f64,
    ) -> Result<Self, DesignError> {
        let name = name.into();
        if !(min.is_finite() && max.is_finite() && step.is_finite()) || step <= 0.0 || min > max {
            return Err(DesignError::InvalidNumericRange {
                name,
                min,
                max,
                step,
            });
        }
        Ok(Self {
            name,
            levels: FactorLevels::Numeric { min, max, step },
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn levels(&self) -> &FactorLevels {
        &self.levels
    }

    /// Number of realized levels. Always >= 1.
    pub fn level_count(&self) -> usize {
        match &self.levels {
            FactorLevels::Categorical(labels) => labels.len(),
            FactorLevels::Numeric { min, max, step } => {
                ((max - min) / step + RANGE_EPSILON).floor() as usize + 1
            }
        }
    }

    /// The level at `index`, which must be `< level_count()`.
    pub fn level_at(&self, index: usize) -> FactorValue {
        match &self.levels {
            FactorLevels::Categorical(labels) => FactorValue::Text(labels[index].clone()),
            FactorLevels::Numeric { min, step, .. } => {
                FactorValue::Number(min + index as f64 * step)
            }
        }
    }

    /// Materialize the full level sequence in declared order.
    pub fn realized_levels(&self) -> Vec<FactorValue> {
        (0..self.level_count()).map(|i| self.level_at(i)).collect()
    }

    /// Map a unit sample `u` in `[0, 1)` to a level.
    ///
    /// Numeric factors interpolate across `[min, max]` and snap to the
    /// nearest step-aligned level by index rounding; categorical factors
    /// partition `[0, 1)` into equal-width bins, one per level.
    pub fn level_for_unit_sample(&self, u: f64) -> FactorValue {
        let count = self.level_count();
        match &self.levels {
            FactorLevels::Categorical(_) => {
                let index = ((u * count as f64) as usize).min(count - 1);
                self.level_at(index)
            }
            FactorLevels::Numeric { min, max, step } => {
                let value = min + u * (max - min);
                let index = (((value - min) / step).round() as usize).min(count - 1);
                self.level_at(index)
            }
        }
    }

    /// The factor's low extreme: numeric minimum, or the first declared label.
    pub fn low_extreme(&self) -> FactorValue {
        self.level_at(0)
    }

    /// The factor's high extreme: numeric maximum, or the last declared label.
    pub fn high_extreme(&self) -> FactorValue {
        self.level_at(self.level_count() - 1)
    }
}
