use chrono::{Datelike, Days, NaiveDate};
use weighmate_core::db::open_db_in_memory;
use weighmate_core::repo::participant_repo::{
    ParticipantRepository, RepoError, RepoResult, SqliteParticipantRepository,
};
use weighmate_core::{
    calendar, ChallengeError, ChallengeService, HistoryFilter, Participant, ParticipantId, Trend,
    WeighIn,
};
use uuid::Uuid;

/// A date in January of the current year: always on/before the submission
/// deadline, whatever day the tests run.
fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(calendar::today().year(), 1, day).unwrap()
}

fn seeded(conn: &rusqlite::Connection, name: &str, start: f64, goal: f64) -> ParticipantId {
    let repo = SqliteParticipantRepository::new(conn);
    let participant = Participant::new(name, start, goal, jan(1)).unwrap();
    repo.create_participant(&participant).unwrap()
}

#[test]
fn load_populates_the_session_from_the_store() {
    let conn = open_db_in_memory().unwrap();
    let id = seeded(&conn, "Ana", 90.0, 80.0);

    let mut service = ChallengeService::new(SqliteParticipantRepository::new(&conn));
    assert!(service.participants().is_empty());

    service.load().unwrap();
    assert_eq!(service.participants().len(), 1);
    assert_eq!(service.participant(id).unwrap().name, "Ana");
}

#[test]
fn add_participant_validates_before_persisting() {
    let conn = open_db_in_memory().unwrap();
    let mut service = ChallengeService::new(SqliteParticipantRepository::new(&conn));
    service.load().unwrap();

    let err = service.add_participant("   ", 90.0, 80.0).unwrap_err();
    assert!(matches!(err, ChallengeError::Validation(_)));

    let err = service.add_participant("Ana", f64::NAN, 80.0).unwrap_err();
    assert!(matches!(err, ChallengeError::Validation(_)));

    assert!(service.participants().is_empty());

    let id = service.add_participant("Ana", 90.0, 80.0).unwrap();
    let participant = service.participant(id).unwrap();
    assert_eq!(participant.entries.len(), 1);
    assert_eq!(participant.entries[0].weight, 90.0);
    assert_eq!(participant.entries[0].date, calendar::today());
}

#[test]
fn add_entry_merges_into_the_session_series() {
    let conn = open_db_in_memory().unwrap();
    let id = seeded(&conn, "Ana", 90.0, 80.0);
    let mut service = ChallengeService::new(SqliteParticipantRepository::new(&conn));
    service.load().unwrap();

    service.add_entry(id, jan(15), 87.0).unwrap();
    service.add_entry(id, jan(8), 88.5).unwrap();

    let dates: Vec<NaiveDate> = service
        .participant(id)
        .unwrap()
        .entries
        .iter()
        .map(|entry| entry.date)
        .collect();
    assert_eq!(dates, vec![jan(1), jan(8), jan(15)]);

    // Same date replaces the weight, chronology unchanged.
    service.add_entry(id, jan(8), 88.0).unwrap();
    let participant = service.participant(id).unwrap();
    assert_eq!(participant.entries.len(), 3);
    assert_eq!(participant.entries[1].weight, 88.0);
}

#[test]
fn add_entry_rejects_dates_past_the_deadline() {
    let conn = open_db_in_memory().unwrap();
    let id = seeded(&conn, "Ana", 90.0, 80.0);
    let mut service = ChallengeService::new(SqliteParticipantRepository::new(&conn));
    service.load().unwrap();

    let deadline = calendar::submission_deadline_for(calendar::today());

    // The cutoff day itself is accepted.
    service.add_entry(id, deadline, 86.0).unwrap();

    let day_after = deadline.checked_add_days(Days::new(1)).unwrap();
    let err = service.add_entry(id, day_after, 85.0).unwrap_err();
    assert!(matches!(err, ChallengeError::PastDeadline { .. }));

    let entry_dates: Vec<NaiveDate> = service
        .participant(id)
        .unwrap()
        .entries
        .iter()
        .map(|entry| entry.date)
        .collect();
    assert!(!entry_dates.contains(&day_after));
}

#[test]
fn add_entry_rejects_non_finite_weight_and_unknown_participant() {
    let conn = open_db_in_memory().unwrap();
    let id = seeded(&conn, "Ana", 90.0, 80.0);
    let mut service = ChallengeService::new(SqliteParticipantRepository::new(&conn));
    service.load().unwrap();

    let err = service.add_entry(id, jan(8), f64::NAN).unwrap_err();
    assert!(matches!(err, ChallengeError::EntryValidation(_)));

    let ghost = Uuid::parse_str("00000000-0000-4000-8000-00000000dead").unwrap();
    let err = service.add_entry(ghost, jan(8), 80.0).unwrap_err();
    assert!(matches!(err, ChallengeError::ParticipantNotFound(id) if id == ghost));
}

#[test]
fn update_participant_keeps_entries_untouched() {
    let conn = open_db_in_memory().unwrap();
    let id = seeded(&conn, "Ana", 90.0, 80.0);
    let mut service = ChallengeService::new(SqliteParticipantRepository::new(&conn));
    service.load().unwrap();
    service.add_entry(id, jan(8), 88.0).unwrap();

    service.update_participant(id, "  Ana Maria ", 91.0, 79.0).unwrap();

    let participant = service.participant(id).unwrap();
    assert_eq!(participant.name, "Ana Maria");
    assert_eq!(participant.start_weight, 91.0);
    assert_eq!(participant.goal_weight, 79.0);
    assert_eq!(participant.entries.len(), 2);
    assert_eq!(participant.entries[0], WeighIn::new(jan(1), 90.0));
}

#[test]
fn delete_participant_removes_it_from_the_session() {
    let conn = open_db_in_memory().unwrap();
    let id = seeded(&conn, "Ana", 90.0, 80.0);
    let other = seeded(&conn, "Luis", 70.0, 75.0);
    let mut service = ChallengeService::new(SqliteParticipantRepository::new(&conn));
    service.load().unwrap();

    service.delete_participant(id).unwrap();
    assert!(service.participant(id).is_none());
    assert!(service.participant(other).is_some());

    let err = service.delete_participant(id).unwrap_err();
    assert!(matches!(err, ChallengeError::ParticipantNotFound(_)));
}

#[test]
fn leaderboard_ranks_by_progress_descending() {
    let conn = open_db_in_memory().unwrap();
    let half = seeded(&conn, "Half", 90.0, 80.0);
    let done = seeded(&conn, "Done", 82.0, 82.0);
    let zero = seeded(&conn, "Zero", 70.0, 65.0);

    let mut service = ChallengeService::new(SqliteParticipantRepository::new(&conn));
    service.load().unwrap();
    service.add_entry(half, jan(8), 85.0).unwrap();

    let rows = service.leaderboard();
    let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, ["Done", "Half", "Zero"]);
    assert_eq!(rows[0].progress, 1.0);
    assert_eq!(rows[1].progress, 0.5);
    assert_eq!(rows[2].progress, 0.0);
    assert_eq!(rows[2].id, zero);
}

#[test]
fn history_filters_inclusively_and_summarizes() {
    let conn = open_db_in_memory().unwrap();
    let id = seeded(&conn, "Ana", 90.0, 80.0);
    let mut service = ChallengeService::new(SqliteParticipantRepository::new(&conn));
    service.load().unwrap();
    service.add_entry(id, jan(8), 88.0).unwrap();
    service.add_entry(id, jan(15), 85.0).unwrap();

    let full = service.history(id, HistoryFilter::default()).unwrap();
    assert_eq!(full.entries.len(), 3);
    let stats = full.stats.unwrap();
    assert_eq!(stats.first_weight, 90.0);
    assert_eq!(stats.last_weight, 85.0);
    assert_eq!(stats.delta, -5.0);
    assert_eq!(stats.progress_pct, 50);
    assert_eq!(stats.trend, Trend::Lose);
    assert_eq!(stats.start_weight, 90.0);
    assert_eq!(stats.goal_weight, 80.0);

    let tail = service
        .history(
            id,
            HistoryFilter {
                from: Some(jan(8)),
                to: None,
            },
        )
        .unwrap();
    assert_eq!(tail.entries.len(), 2);
    assert_eq!(tail.stats.unwrap().delta, -3.0);

    let head = service
        .history(
            id,
            HistoryFilter {
                from: None,
                to: Some(jan(8)),
            },
        )
        .unwrap();
    assert_eq!(head.entries.len(), 2);

    let empty = service
        .history(
            id,
            HistoryFilter {
                from: Some(jan(20)),
                to: None,
            },
        )
        .unwrap();
    assert!(empty.entries.is_empty());
    assert!(empty.stats.is_none());
}

/// Store stub whose write operations always fail; used to pin the rule
/// that persistence failure leaves session state untouched.
struct FailingWritesRepo {
    stored: Vec<Participant>,
}

impl ParticipantRepository for FailingWritesRepo {
    fn list_all(&self, _seed_date: NaiveDate) -> RepoResult<Vec<Participant>> {
        Ok(self.stored.clone())
    }

    fn create_participant(&self, _participant: &Participant) -> RepoResult<ParticipantId> {
        Err(RepoError::InvalidData("stub write failure".to_string()))
    }

    fn add_entry(&self, _id: ParticipantId, _entry: &WeighIn) -> RepoResult<()> {
        Err(RepoError::InvalidData("stub write failure".to_string()))
    }

    fn update_profile(
        &self,
        _id: ParticipantId,
        _name: &str,
        _start_weight: f64,
        _goal_weight: f64,
    ) -> RepoResult<()> {
        Err(RepoError::InvalidData("stub write failure".to_string()))
    }

    fn delete_participant(&self, _id: ParticipantId) -> RepoResult<()> {
        Err(RepoError::InvalidData("stub write failure".to_string()))
    }
}

#[test]
fn failed_persistence_never_mutates_session_state() {
    let participant = Participant::new("Ana", 90.0, 80.0, jan(1)).unwrap();
    let id = participant.id;
    let mut service = ChallengeService::new(FailingWritesRepo {
        stored: vec![participant.clone()],
    });
    service.load().unwrap();

    assert!(service.add_participant("Luis", 70.0, 75.0).is_err());
    assert_eq!(service.participants().len(), 1);

    assert!(service.add_entry(id, jan(8), 88.0).is_err());
    assert_eq!(service.participant(id).unwrap().entries, participant.entries);

    assert!(service.update_participant(id, "Renamed", 91.0, 79.0).is_err());
    assert_eq!(service.participant(id).unwrap().name, "Ana");

    assert!(service.delete_participant(id).is_err());
    assert_eq!(service.participants().len(), 1);
}

/// Store stub that fails on read; the session must stay empty (degraded
/// state) after a failed load.
struct FailingLoadRepo;

impl ParticipantRepository for FailingLoadRepo {
    fn list_all(&self, _seed_date: NaiveDate) -> RepoResult<Vec<Participant>> {
        Err(RepoError::InvalidData("stub load failure".to_string()))
    }

    fn create_participant(&self, participant: &Participant) -> RepoResult<ParticipantId> {
        Ok(participant.id)
    }

    fn add_entry(&self, _id: ParticipantId, _entry: &WeighIn) -> RepoResult<()> {
        Ok(())
    }

    fn update_profile(
        &self,
        _id: ParticipantId,
        _name: &str,
        _start_weight: f64,
        _goal_weight: f64,
    ) -> RepoResult<()> {
        Ok(())
    }

    fn delete_participant(&self, _id: ParticipantId) -> RepoResult<()> {
        Ok(())
    }
}

#[test]
fn failed_load_leaves_the_session_empty() {
    let mut service = ChallengeService::new(FailingLoadRepo);
    let err = service.load().unwrap_err();
    assert!(matches!(err, ChallengeError::Repo(_)));
    assert!(service.participants().is_empty());
}

#[test]
fn history_for_unknown_participant_fails() {
    let conn = open_db_in_memory().unwrap();
    let mut service = ChallengeService::new(SqliteParticipantRepository::new(&conn));
    service.load().unwrap();

    let ghost = Uuid::parse_str("00000000-0000-4000-8000-00000000dead").unwrap();
    let err = service.history(ghost, HistoryFilter::default()).unwrap_err();
    assert!(matches!(err, ChallengeError::ParticipantNotFound(_)));
}
