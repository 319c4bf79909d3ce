//! Challenge session service.
//!
//! # Responsibility
//! - Own the session-scoped participant list as the single source of truth
//!   for the presentation layer.
//! - Gate every local mutation on persistence success.
//! - Derive leaderboard and history views from session state.
//!
//! # Invariants
//! - Session state changes only through these APIs, never by direct field
//!   assignment; sorted-entries and unique-date invariants are enforced at
//!   this choke point.
//! - A failed store call leaves session state untouched.
//! - The submission deadline is checked here, before persistence; the merge
//!   engine has no notion of deadlines.

use crate::calendar;
use crate::model::entry::{self, WeighIn, WeighInValidationError};
use crate::model::participant::{
    validate_profile, Participant, ParticipantId, ParticipantValidationError,
};
use crate::model::progress::{compute_progress, Trend};
use crate::repo::participant_repo::{ParticipantRepository, RepoError};
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ChallengeResult<T> = Result<T, ChallengeError>;

/// Service error for challenge session use-cases.
#[derive(Debug)]
pub enum ChallengeError {
    /// Profile input failed validation.
    Validation(ParticipantValidationError),
    /// Weigh-in input failed validation.
    EntryValidation(WeighInValidationError),
    /// Weigh-in dated strictly after the submission cutoff.
    PastDeadline {
        date: NaiveDate,
        deadline: NaiveDate,
    },
    /// Target participant does not exist in this session.
    ParticipantNotFound(ParticipantId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ChallengeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EntryValidation(err) => write!(f, "{err}"),
            Self::PastDeadline { date, deadline } => write!(
                f,
                "weigh-in date {date} is past the submission deadline {deadline}"
            ),
            Self::ParticipantNotFound(id) => write!(f, "participant not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ChallengeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::EntryValidation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParticipantValidationError> for ChallengeError {
    fn from(value: ParticipantValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<WeighInValidationError> for ChallengeError {
    fn from(value: WeighInValidationError) -> Self {
        Self::EntryValidation(value)
    }
}

impl From<RepoError> for ChallengeError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ParticipantNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// One leaderboard row, ranked by progress.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    pub id: ParticipantId,
    pub name: String,
    pub progress: f64,
}

/// Inclusive date-range filter for history views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Summary statistics over a filtered history range.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStats {
    /// Weight of the first entry in range.
    pub first_weight: f64,
    /// Weight of the last entry in range.
    pub last_weight: f64,
    /// Last minus first; positive means the weight went up.
    pub delta: f64,
    /// Rounded progress percent against the participant's goal.
    pub progress_pct: u8,
    pub trend: Trend,
    pub start_weight: f64,
    pub goal_weight: f64,
}

/// Filtered history entries plus stats; stats absent for an empty range.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryView {
    pub entries: Vec<WeighIn>,
    pub stats: Option<HistoryStats>,
}

/// Session-scoped state container over a participant store.
///
/// Populated once via `load`; thereafter the in-memory list is the source
/// of truth for reads, and the store is the source of truth across
/// sessions.
pub struct ChallengeService<R: ParticipantRepository> {
    repo: R,
    participants: Vec<Participant>,
}

impl<R: ParticipantRepository> ChallengeService<R> {
    /// Creates a service with an empty session over the given store.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            participants: Vec::new(),
        }
    }

    /// Populates the session from the store.
    ///
    /// On failure the session list is left untouched (empty at startup,
    /// the degraded state); there is no partial-data fallback and no retry.
    pub fn load(&mut self) -> ChallengeResult<()> {
        let loaded = self.repo.list_all(calendar::today())?;
        self.participants = loaded;
        Ok(())
    }

    /// Read view over the session participant list.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Looks up one participant by id.
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Registers a new participant with a seed entry dated today.
    pub fn add_participant(
        &mut self,
        name: &str,
        start_weight: f64,
        goal_weight: f64,
    ) -> ChallengeResult<ParticipantId> {
        let participant = Participant::new(name, start_weight, goal_weight, calendar::today())?;
        let id = self.repo.create_participant(&participant)?;
        self.participants.push(participant);
        Ok(id)
    }

    /// Submits one weigh-in: validates, checks the deadline, persists, then
    /// merges into the session series.
    pub fn add_entry(
        &mut self,
        id: ParticipantId,
        date: NaiveDate,
        weight: f64,
    ) -> ChallengeResult<()> {
        let incoming = WeighIn::new(date, weight);
        incoming.validate()?;

        let deadline = calendar::submission_deadline_for(calendar::today());
        if calendar::is_past_deadline(date, deadline) {
            return Err(ChallengeError::PastDeadline { date, deadline });
        }

        let index = self.index_of(id)?;
        self.repo.add_entry(id, &incoming)?;

        let merged = entry::merge_entry(&self.participants[index].entries, incoming);
        self.participants[index].entries = merged;
        Ok(())
    }

    /// Edits profile metadata; existing entries are never altered.
    pub fn update_participant(
        &mut self,
        id: ParticipantId,
        name: &str,
        start_weight: f64,
        goal_weight: f64,
    ) -> ChallengeResult<()> {
        let name = name.trim();
        validate_profile(name, start_weight, goal_weight)?;

        let index = self.index_of(id)?;
        self.repo
            .update_profile(id, name, start_weight, goal_weight)?;

        let participant = &mut self.participants[index];
        participant.name = name.to_string();
        participant.start_weight = start_weight;
        participant.goal_weight = goal_weight;
        Ok(())
    }

    /// Deletes a participant and its whole series.
    pub fn delete_participant(&mut self, id: ParticipantId) -> ChallengeResult<()> {
        let index = self.index_of(id)?;
        self.repo.delete_participant(id)?;
        self.participants.remove(index);
        Ok(())
    }

    /// Ranking of all participants, descending by progress.
    ///
    /// Ties keep session order (stable sort).
    pub fn leaderboard(&self) -> Vec<LeaderboardRow> {
        let mut rows: Vec<LeaderboardRow> = self
            .participants
            .iter()
            .map(|p| LeaderboardRow {
                id: p.id,
                name: p.name.clone(),
                progress: p.progress(),
            })
            .collect();
        rows.sort_by(|a, b| b.progress.total_cmp(&a.progress));
        rows
    }

    /// Date-range-filtered history for one participant.
    pub fn history(
        &self,
        id: ParticipantId,
        filter: HistoryFilter,
    ) -> ChallengeResult<HistoryView> {
        let participant = self
            .participant(id)
            .ok_or(ChallengeError::ParticipantNotFound(id))?;

        let entries: Vec<WeighIn> = participant
            .entries
            .iter()
            .filter(|entry| {
                filter.from.map_or(true, |from| entry.date >= from)
                    && filter.to.map_or(true, |to| entry.date <= to)
            })
            .copied()
            .collect();

        let stats = match (entries.first(), entries.last()) {
            (Some(first), Some(last)) => {
                let progress = compute_progress(
                    participant.start_weight,
                    participant.goal_weight,
                    last.weight,
                );
                Some(HistoryStats {
                    first_weight: first.weight,
                    last_weight: last.weight,
                    delta: last.weight - first.weight,
                    progress_pct: (progress * 100.0).round() as u8,
                    trend: participant.trend(),
                    start_weight: participant.start_weight,
                    goal_weight: participant.goal_weight,
                })
            }
            _ => None,
        };

        Ok(HistoryView { entries, stats })
    }

    fn index_of(&self, id: ParticipantId) -> ChallengeResult<usize> {
        self.participants
            .iter()
            .position(|p| p.id == id)
            .ok_or(ChallengeError::ParticipantNotFound(id))
    }
}
