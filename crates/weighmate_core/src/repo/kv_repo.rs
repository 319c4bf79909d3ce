//! Generic scoped key-value collaborator.
//!
//! # Responsibility
//! - Persist small pieces of ephemeral UI state outside the domain tables.
//!
//! # Invariants
//! - Values are opaque strings keyed by (scope, key); no business meaning
//!   lives here.

use crate::repo::participant_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Scoped key-value storage contract.
pub trait ScopedKvRepository {
    fn get(&self, scope: &str, key: &str) -> RepoResult<Option<String>>;
    fn put(&self, scope: &str, key: &str, value: &str) -> RepoResult<()>;
}

/// SQLite-backed key-value store over the `ui_state` table.
pub struct SqliteKvRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ScopedKvRepository for SqliteKvRepository<'_> {
    fn get(&self, scope: &str, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM ui_state WHERE scope = ?1 AND key = ?2;",
                params![scope, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(RepoError::from)?;
        Ok(value)
    }

    fn put(&self, scope: &str, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO ui_state (scope, key, value)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (scope, key)
             DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![scope, key, value],
        )?;
        Ok(())
    }
}
