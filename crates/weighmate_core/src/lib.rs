//! Core domain logic for the weighmate group weight challenge.
//! This crate is the single source of truth for business invariants.

pub mod calendar;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{merge_entry, WeighIn, WeighInValidationError};
pub use model::participant::{Participant, ParticipantId, ParticipantValidationError};
pub use model::progress::{compute_progress, goal_reached, Trend, GOAL_EPSILON};
pub use repo::kv_repo::{ScopedKvRepository, SqliteKvRepository};
pub use repo::participant_repo::{
    ParticipantRepository, RepoError, RepoResult, SqliteParticipantRepository,
};
pub use service::celebration::CelebrationLedger;
pub use service::challenge_service::{
    ChallengeError, ChallengeResult, ChallengeService, HistoryFilter, HistoryStats, HistoryView,
    LeaderboardRow,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
