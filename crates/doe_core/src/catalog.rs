//! Factor catalog: the merged, name-unique set of factors for one study.
//!
//! Catalogs are assembled from one or more independently-defined factor
//! sources (a single manual factor, a table-derived group, ...) and frozen
//! before generation. Duplicate names across sources are an error, never a
//! silent overwrite.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::DesignError;
use crate::factor::Factor;

/// Ordered, name-unique collection of factors. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorCatalog {
    factors: Vec<Factor>,
}

impl FactorCatalog {
    /// Build a catalog from a single factor list.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateFactor` if two factors share a name.
    pub fn new(factors: Vec<Factor>) -> Result<Self, DesignError> {
        let mut seen = HashSet::new();
        for factor in &factors {
            if !seen.insert(factor.name().to_string()) {
                return Err(DesignError::DuplicateFactor {
                    name: factor.name().to_string(),
                });
            }
        }
        Ok(Self { factors })
    }

    /// Merge several independently-defined factor sources into one catalog,
    /// preserving source order and declaration order within each source.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateFactor` naming the first factor declared twice.
    pub fn from_sources<I>(sources: I) -> Result<Self, DesignError>
    where
        I: IntoIterator<Item = Vec<Factor>>,
    {
        let mut merged = Vec::new();
        for source in sources {
            merged.extend(source);
        }
        Self::new(merged)
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Factor> {
        self.factors.iter()
    }

    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Factor names in declaration order.
    pub fn names(&self) -> Vec<String> {
        self.factors
            .iter()
            .map(|factor| factor.name().to_string())
            .collect()
    }

    /// Look a factor up by name.
    pub fn get(&self, name: &str) -> Option<&Factor> {
        self.factors.iter().find(|factor| factor.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speed() -> Factor {
        Factor::numeric("speed", 1.0, 10.0, 3.0).unwrap()
    }

    fn mode() -> Factor {
        Factor::categorical("mode", ["fast", "slow"]).unwrap()
    }

    #[test]
    fn merge_preserves_source_and_declaration_order() {
        let catalog = FactorCatalog::from_sources([vec![speed()], vec![mode()]]).unwrap();
        assert_eq!(catalog.names(), vec!["speed", "mode"]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn duplicate_names_across_sources_are_rejected() {
        let error = FactorCatalog::from_sources([vec![speed()], vec![speed()]])
            .expect_err("duplicate should fail");
        assert_eq!(
            error,
            DesignError::DuplicateFactor {
                name: "speed".to_string()
            }
        );
    }

    #[test]
    fn duplicate_names_within_one_source_are_rejected() {
        let error =
            FactorCatalog::new(vec![mode(), mode()]).expect_err("duplicate should fail");
        assert!(matches!(error, DesignError::DuplicateFactor { .. }));
    }

    #[test]
    fn lookup_by_name() {
        let catalog = FactorCatalog::new(vec![speed(), mode()]).unwrap();
        assert!(catalog.get("mode").is_some());
        assert!(catalog.get("missing").is_none());
    }
}
