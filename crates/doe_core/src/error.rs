//! Error taxonomy for catalog assembly and design generation.
//!
//! Configuration problems (empty catalog, duplicate factors, invalid ranges)
//! and resource limits (combinatorial explosion) are all fatal to the
//! generation call and surfaced before any plan rows are materialized.

/// Errors raised while assembling a factor catalog or generating a design.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignError {
    /// The catalog contains no factors; every design needs at least one.
    EmptyCatalog,
    /// Two factor sources declared the same factor name.
    DuplicateFactor { name: String },
    /// A numeric factor violates `step > 0 && min <= max`.
    InvalidNumericRange {
        name: String,
        min: f64,
        max: f64,
        step: f64,
    },
    /// A categorical factor declared no levels.
    EmptyLevels { name: String },
    /// A sampling design was requested with zero samples.
    InvalidSampleCount { samples: usize },
    /// Full factorial would exceed the hard run ceiling; nothing was allocated.
    CombinatorialExplosion { runs: u128, limit: u64 },
    /// The screening design construction has no generator row for this many factors.
    TooManyFactors { count: usize, limit: usize },
    /// A long-format view could not be reassembled into a consistent plan.
    MalformedLongView { detail: String },
}

impl std::fmt::Display for DesignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesignError::EmptyCatalog => {
                write!(f, "factor catalog is empty; at least one factor is required")
            }
            DesignError::DuplicateFactor { name } => {
                write!(f, "duplicate factor name '{name}' across merged sources")
            }
            DesignError::InvalidNumericRange {
                name,
                min,
                max,
                step,
            } => write!(
                f,
                "factor '{name}' has invalid numeric range (min={min}, max={max}, step={step}); \
                 step must be > 0 and min <= max"
            ),
            DesignError::EmptyLevels { name } => {
                write!(f, "factor '{name}' has no defined levels")
            }
            DesignError::InvalidSampleCount { samples } => {
                write!(f, "sample count must be >= 1, got {samples}")
            }
            DesignError::CombinatorialExplosion { runs, limit } => write!(
                f,
                "full factorial would generate {runs} runs (> {limit}); \
                 reduce factor levels or switch to a sampling design"
            ),
            DesignError::TooManyFactors { count, limit } => write!(
                f,
                "screening design supports at most {limit} factors, got {count}"
            ),
            DesignError::MalformedLongView { detail } => {
                write!(f, "long-format records do not form a consistent plan: {detail}")
            }
        }
    }
}

impl std::error::Error for DesignError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_factor() {
        let error = DesignError::DuplicateFactor {
            name: "speed".to_string(),
        };
        assert!(error.to_string().contains("'speed'"));
    }

    #[test]
    fn display_reports_count_and_threshold() {
        let error = DesignError::CombinatorialExplosion {
            runs: 8_000_000,
            limit: 1_000_000,
        };
        let text = error.to_string();
        assert!(text.contains("8000000"));
        assert!(text.contains("1000000"));
    }
}
