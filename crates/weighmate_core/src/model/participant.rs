//! Participant domain model.
//!
//! # Responsibility
//! - Define the canonical participant record used by store and views.
//! - Enforce profile invariants before anything reaches persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another participant.
//! - A fully-loaded participant's `entries` is never empty: creation seeds
//!   one entry at the start weight.
//! - `entries` is sorted strictly ascending by date with no duplicate dates.

use crate::model::entry::WeighIn;
use crate::model::progress::{self, Trend};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a participant.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ParticipantId = Uuid;

/// Validation error for participant profile data.
#[derive(Debug, Clone, PartialEq)]
pub enum ParticipantValidationError {
    /// Name is empty after trimming.
    EmptyName,
    /// Start weight is NaN or infinite.
    NonFiniteStartWeight(f64),
    /// Goal weight is NaN or infinite.
    NonFiniteGoalWeight(f64),
}

impl Display for ParticipantValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "participant name cannot be empty"),
            Self::NonFiniteStartWeight(weight) => {
                write!(f, "start weight must be finite, got {weight}")
            }
            Self::NonFiniteGoalWeight(weight) => {
                write!(f, "goal weight must be finite, got {weight}")
            }
        }
    }
}

impl Error for ParticipantValidationError {}

/// Canonical participant record.
///
/// Field names serialize in camelCase to match the external document
/// store's naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Stable global ID used for store documents and UI state keys.
    pub id: ParticipantId,
    /// Display name, non-empty after trimming.
    pub name: String,
    /// Registered weight at challenge entry, in kilograms.
    pub start_weight: f64,
    /// Personal goal weight, in kilograms. May be above, below, or equal to
    /// the start weight.
    pub goal_weight: f64,
    /// Observation series, ascending by date.
    pub entries: Vec<WeighIn>,
}

impl Participant {
    /// Creates a participant with a generated ID and one seed entry at the
    /// start weight, dated `created_on`.
    pub fn new(
        name: impl Into<String>,
        start_weight: f64,
        goal_weight: f64,
        created_on: NaiveDate,
    ) -> Result<Self, ParticipantValidationError> {
        Self::with_id(Uuid::new_v4(), name, start_weight, goal_weight, created_on)
    }

    /// Creates a participant with a caller-provided stable ID.
    pub fn with_id(
        id: ParticipantId,
        name: impl Into<String>,
        start_weight: f64,
        goal_weight: f64,
        created_on: NaiveDate,
    ) -> Result<Self, ParticipantValidationError> {
        let participant = Self {
            id,
            name: name.into().trim().to_string(),
            start_weight,
            goal_weight,
            entries: vec![WeighIn::new(created_on, start_weight)],
        };
        participant.validate()?;
        Ok(participant)
    }

    /// Checks profile invariants.
    pub fn validate(&self) -> Result<(), ParticipantValidationError> {
        validate_profile(&self.name, self.start_weight, self.goal_weight)
    }

    /// Latest observed weight, falling back to the start weight when the
    /// series is empty (only possible before seeding).
    pub fn current_weight(&self) -> f64 {
        self.entries
            .last()
            .map_or(self.start_weight, |entry| entry.weight)
    }

    /// Fraction of goal distance covered, in [0, 1].
    pub fn progress(&self) -> f64 {
        progress::compute_progress(self.start_weight, self.goal_weight, self.current_weight())
    }

    /// Categorical goal direction.
    pub fn trend(&self) -> Trend {
        Trend::of(self.start_weight, self.goal_weight)
    }

    /// True when the goal counts as reached (rounding-tolerant).
    pub fn goal_reached(&self) -> bool {
        progress::goal_reached(self.progress())
    }

    /// Absolute distance from the current weight to the goal, in kilograms.
    pub fn remaining_delta(&self) -> f64 {
        (self.goal_weight - self.current_weight()).abs()
    }
}

/// Checks profile fields shared by the create and update paths.
pub fn validate_profile(
    name: &str,
    start_weight: f64,
    goal_weight: f64,
) -> Result<(), ParticipantValidationError> {
    if name.trim().is_empty() {
        return Err(ParticipantValidationError::EmptyName);
    }
    if !start_weight.is_finite() {
        return Err(ParticipantValidationError::NonFiniteStartWeight(
            start_weight,
        ));
    }
    if !goal_weight.is_finite() {
        return Err(ParticipantValidationError::NonFiniteGoalWeight(goal_weight));
    }
    Ok(())
}
