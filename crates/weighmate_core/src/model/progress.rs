//! Progress ratio and trend direction for a weight goal.
//!
//! # Responsibility
//! - Convert (start, goal, current) into a bounded completion ratio.
//! - Derive the categorical trend direction from start and goal.
//!
//! # Invariants
//! - `compute_progress` always returns a value in [0, 1] for finite input.
//! - A maintenance goal (`start == goal`) is complete by definition.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Tolerance absorbing floating-point rounding at exact goal equality.
pub const GOAL_EPSILON: f64 = 1e-6;

/// Categorical direction of a weight goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Goal weight below start weight.
    Lose,
    /// Goal equals start; nothing to move.
    Maintain,
    /// Goal weight above start weight.
    Gain,
}

impl Trend {
    /// Derives the trend from start and goal weight.
    pub fn of(start: f64, goal: f64) -> Self {
        if goal == start {
            Self::Maintain
        } else if goal < start {
            Self::Lose
        } else {
            Self::Gain
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Lose => "lose",
            Self::Maintain => "maintain",
            Self::Gain => "gain",
        }
    }
}

impl Display for Trend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Computes the fraction of goal distance covered, clamped to [0, 1].
///
/// A maintenance goal (`start == goal`) has no numeric progress axis and is
/// always reported complete, regardless of the current value. Overshooting
/// the goal clamps at 1; moving the wrong direction clamps at 0.
pub fn compute_progress(start: f64, goal: f64, current: f64) -> f64 {
    if start == goal {
        return 1.0;
    }
    let ratio = if goal < start {
        (start - current) / (start - goal)
    } else {
        (current - start) / (goal - start)
    };
    ratio.clamp(0.0, 1.0)
}

/// True when a progress ratio counts as goal reached.
///
/// Exact 1.0 and values within `GOAL_EPSILON` below it both qualify.
pub fn goal_reached(progress: f64) -> bool {
    progress >= 1.0 - GOAL_EPSILON
}
