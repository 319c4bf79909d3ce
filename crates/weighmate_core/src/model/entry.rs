//! Weigh-in value type and the entry merge engine.
//!
//! # Responsibility
//! - Define the dated weight observation shared by store and views.
//! - Maintain a participant's observation series under upsert semantics.
//!
//! # Invariants
//! - A merged series holds at most one entry per calendar date.
//! - A merged series is sorted strictly ascending by date.
//! - `merge_entry` never mutates its input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One dated weight observation for a participant.
///
/// Immutable value; an upsert for the same date replaces it wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeighIn {
    /// Calendar date of the observation; serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Observed weight in kilograms.
    pub weight: f64,
}

/// Validation error for weigh-in values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeighInValidationError {
    /// Weight is NaN or infinite.
    NonFiniteWeight(f64),
}

impl Display for WeighInValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteWeight(weight) => write!(f, "weight must be finite, got {weight}"),
        }
    }
}

impl Error for WeighInValidationError {}

impl WeighIn {
    pub fn new(date: NaiveDate, weight: f64) -> Self {
        Self { date, weight }
    }

    /// Checks the weigh-in against domain invariants.
    pub fn validate(&self) -> Result<(), WeighInValidationError> {
        if !self.weight.is_finite() {
            return Err(WeighInValidationError::NonFiniteWeight(self.weight));
        }
        Ok(())
    }
}

/// Upserts `incoming` into an observation series keyed by date.
///
/// The input series does not need to be sorted. Later duplicates in
/// `existing` overwrite earlier ones (callers guarantee uniqueness, so this
/// only matters for the incoming entry itself). The result is a new series,
/// sorted ascending by calendar date.
pub fn merge_entry(existing: &[WeighIn], incoming: WeighIn) -> Vec<WeighIn> {
    let mut by_date: BTreeMap<NaiveDate, f64> = existing
        .iter()
        .map(|entry| (entry.date, entry.weight))
        .collect();
    by_date.insert(incoming.date, incoming.weight);

    by_date
        .into_iter()
        .map(|(date, weight)| WeighIn { date, weight })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{merge_entry, WeighIn, WeighInValidationError};
    use chrono::NaiveDate;

    fn entry(iso: &str, weight: f64) -> WeighIn {
        WeighIn::new(NaiveDate::parse_from_str(iso, "%Y-%m-%d").unwrap(), weight)
    }

    #[test]
    fn merge_into_empty_series_inserts_one_entry() {
        let merged = merge_entry(&[], entry("2024-01-01", 80.0));
        assert_eq!(merged, vec![entry("2024-01-01", 80.0)]);
    }

    #[test]
    fn merge_replaces_weight_for_an_existing_date() {
        let first = merge_entry(&[], entry("2024-01-01", 80.0));
        let merged = merge_entry(&first, entry("2024-01-01", 78.0));
        assert_eq!(merged, vec![entry("2024-01-01", 78.0)]);
    }

    #[test]
    fn merge_is_idempotent_for_identical_entries() {
        let once = merge_entry(&[], entry("2024-02-10", 75.5));
        let twice = merge_entry(&once, entry("2024-02-10", 75.5));
        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn merge_sorts_ascending_regardless_of_insertion_order() {
        let mut series = Vec::new();
        for e in [
            entry("2024-03-01", 78.0),
            entry("2024-01-15", 80.0),
            entry("2024-02-10", 79.0),
        ] {
            series = merge_entry(&series, e);
        }

        let dates: Vec<String> = series.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(dates, ["2024-01-15", "2024-02-10", "2024-03-01"]);
    }

    #[test]
    fn merge_does_not_mutate_input() {
        let original = vec![entry("2024-01-01", 80.0)];
        let _ = merge_entry(&original, entry("2024-01-02", 79.0));
        assert_eq!(original, vec![entry("2024-01-01", 80.0)]);
    }

    #[test]
    fn validate_rejects_non_finite_weight() {
        let err = entry("2024-01-01", f64::NAN).validate().unwrap_err();
        assert!(matches!(err, WeighInValidationError::NonFiniteWeight(_)));
        assert!(entry("2024-01-01", 80.0).validate().is_ok());
    }
}
