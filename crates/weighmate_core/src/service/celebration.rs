//! Once-per-participant celebration ledger.
//!
//! # Responsibility
//! - Decide whether the goal-reached celebration should play for a
//!   participant, exactly once.
//!
//! # Invariants
//! - The flag is ephemeral UI state stored through the generic key-value
//!   collaborator, never on the domain entities.

use crate::model::participant::Participant;
use crate::repo::kv_repo::ScopedKvRepository;
use crate::repo::participant_repo::RepoResult;

const CELEBRATION_SCOPE: &str = "celebrations";
const SHOWN: &str = "shown";

/// Tracks which participants already had their celebration.
pub struct CelebrationLedger<S: ScopedKvRepository> {
    kv: S,
}

impl<S: ScopedKvRepository> CelebrationLedger<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// True exactly once: the first time it is consulted while the
    /// participant's goal is reached. Records the flag on that first hit.
    pub fn should_celebrate(&self, participant: &Participant) -> RepoResult<bool> {
        if !participant.goal_reached() {
            return Ok(false);
        }

        let key = participant.id.to_string();
        if self.kv.get(CELEBRATION_SCOPE, &key)?.is_some() {
            return Ok(false);
        }

        self.kv.put(CELEBRATION_SCOPE, &key, SHOWN)?;
        Ok(true)
    }
}
