//! Participant store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the durable CRUD collaborator for participants and entries.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate domain values before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Persisted dates are strict zero-padded `YYYY-MM-DD`.
//! - Deleting a participant removes every one of its entries in the same
//!   transaction.

use crate::calendar;
use crate::db::DbError;
use crate::model::entry::{WeighIn, WeighInValidationError};
use crate::model::participant::{
    validate_profile, Participant, ParticipantId, ParticipantValidationError,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for participant persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(ParticipantValidationError),
    EntryValidation(WeighInValidationError),
    Db(DbError),
    NotFound(ParticipantId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EntryValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "participant not found: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted challenge data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::EntryValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ParticipantValidationError> for RepoError {
    fn from(value: ParticipantValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<WeighInValidationError> for RepoError {
    fn from(value: WeighInValidationError) -> Self {
        Self::EntryValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable store collaborator for participants and their weigh-in series.
///
/// The wire format behind an implementation is not part of the core design;
/// callers only rely on these operation contracts.
pub trait ParticipantRepository {
    /// Loads every participant with entries sorted ascending by date.
    ///
    /// A participant with zero persisted entries is seeded, in the returned
    /// value, with one entry at its start weight dated `seed_date`.
    fn list_all(&self, seed_date: NaiveDate) -> RepoResult<Vec<Participant>>;

    /// Persists a new participant profile together with its seed entries.
    fn create_participant(&self, participant: &Participant) -> RepoResult<ParticipantId>;

    /// Upserts one weigh-in keyed by (participant, date).
    ///
    /// Fails with `NotFound` when the participant does not exist.
    fn add_entry(&self, id: ParticipantId, entry: &WeighIn) -> RepoResult<()>;

    /// Updates profile fields without touching any existing entries.
    fn update_profile(
        &self,
        id: ParticipantId,
        name: &str,
        start_weight: f64,
        goal_weight: f64,
    ) -> RepoResult<()>;

    /// Removes the participant and all of its entries atomically.
    fn delete_participant(&self, id: ParticipantId) -> RepoResult<()>;
}

/// SQLite-backed participant repository.
pub struct SqliteParticipantRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteParticipantRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ParticipantRepository for SqliteParticipantRepository<'_> {
    fn list_all(&self, seed_date: NaiveDate) -> RepoResult<Vec<Participant>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, start_weight, goal_weight
             FROM participants
             ORDER BY created_at ASC, id ASC;",
        )?;

        let mut participants: Vec<Participant> = Vec::new();
        let mut index_by_id: HashMap<ParticipantId, usize> = HashMap::new();

        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let participant = parse_participant_row(row)?;
            index_by_id.insert(participant.id, participants.len());
            participants.push(participant);
        }

        let mut entry_stmt = self.conn.prepare(
            "SELECT participant_id, date, weight
             FROM entries
             ORDER BY participant_id ASC, date ASC;",
        )?;
        let mut entry_rows = entry_stmt.query([])?;
        while let Some(row) = entry_rows.next()? {
            let (participant_id, entry) = parse_entry_row(row)?;
            if let Some(&index) = index_by_id.get(&participant_id) {
                participants[index].entries.push(entry);
            }
        }

        for participant in &mut participants {
            if participant.entries.is_empty() {
                participant
                    .entries
                    .push(WeighIn::new(seed_date, participant.start_weight));
            } else {
                participant.entries.sort_by_key(|entry| entry.date);
            }
        }

        Ok(participants)
    }

    fn create_participant(&self, participant: &Participant) -> RepoResult<ParticipantId> {
        participant.validate()?;
        for entry in &participant.entries {
            entry.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO participants (id, name, start_weight, goal_weight)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                participant.id.to_string(),
                participant.name.as_str(),
                participant.start_weight,
                participant.goal_weight,
            ],
        )?;
        for entry in &participant.entries {
            tx.execute(
                "INSERT INTO entries (participant_id, date, weight)
                 VALUES (?1, ?2, ?3);",
                params![
                    participant.id.to_string(),
                    calendar::format_date_iso(entry.date),
                    entry.weight,
                ],
            )?;
        }
        tx.commit()?;

        Ok(participant.id)
    }

    fn add_entry(&self, id: ParticipantId, entry: &WeighIn) -> RepoResult<()> {
        entry.validate()?;

        if !self.participant_exists(id)? {
            return Err(RepoError::NotFound(id));
        }

        self.conn.execute(
            "INSERT INTO entries (participant_id, date, weight)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (participant_id, date)
             DO UPDATE SET weight = excluded.weight;",
            params![
                id.to_string(),
                calendar::format_date_iso(entry.date),
                entry.weight,
            ],
        )?;

        Ok(())
    }

    fn update_profile(
        &self,
        id: ParticipantId,
        name: &str,
        start_weight: f64,
        goal_weight: f64,
    ) -> RepoResult<()> {
        validate_profile(name, start_weight, goal_weight)?;

        let changed = self.conn.execute(
            "UPDATE participants
             SET
                name = ?1,
                start_weight = ?2,
                goal_weight = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4;",
            params![name, start_weight, goal_weight, id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_participant(&self, id: ParticipantId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM entries WHERE participant_id = ?1;",
            [id.to_string()],
        )?;
        let changed = tx.execute("DELETE FROM participants WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            // Dropping the transaction rolls the entry deletes back.
            return Err(RepoError::NotFound(id));
        }
        tx.commit()?;

        Ok(())
    }
}

impl SqliteParticipantRepository<'_> {
    fn participant_exists(&self, id: ParticipantId) -> RepoResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM participants WHERE id = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

fn parse_participant_row(row: &Row<'_>) -> RepoResult<Participant> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in participants.id"))
    })?;

    let participant = Participant {
        id,
        name: row.get("name")?,
        start_weight: row.get("start_weight")?,
        goal_weight: row.get("goal_weight")?,
        entries: Vec::new(),
    };
    participant.validate()?;
    Ok(participant)
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<(ParticipantId, WeighIn)> {
    let id_text: String = row.get("participant_id")?;
    let participant_id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{id_text}` in entries.participant_id"
        ))
    })?;

    let date_text: String = row.get("date")?;
    let date = calendar::parse_date_iso_strict(&date_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid date in entries.date: {err}"))
    })?;

    let entry = WeighIn::new(date, row.get("weight")?);
    entry.validate()?;
    Ok((participant_id, entry))
}
