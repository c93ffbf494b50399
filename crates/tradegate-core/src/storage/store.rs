//! SQLite-backed checklist state persistence.
//!
//! A single keyed record holds the serialized [`ChecklistState`]. The
//! key carries the record version; a shape change bumps the version
//! and old records are simply never read again. On load, a record is
//! accepted only when its length matches the configured task count,
//! guarding against stale state after a task-list change.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::checklist::ChecklistState;
use crate::error::StorageError;

/// Versioned key for the checklist record.
const STATE_KEY: &str = "trading_checklist_v5";

/// Key-value state store.
///
/// Loads never fail the caller into an unusable checklist: an absent,
/// stale or undecodable record reads as `None` and the gate starts
/// from the all-false default.
pub struct StateStore {
    conn: Connection,
}

impl StateStore {
    /// Open the store at `~/.config/tradegate/tradegate.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?
            .join("tradegate.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path (tests use a temp dir).
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Read a raw value by key.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Write a raw value by key, replacing any existing record.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Load the persisted checklist state.
    ///
    /// Returns `None` when no record exists or when the record does
    /// not decode to exactly `expected_len` flags; the caller then
    /// starts from the all-false default.
    ///
    /// # Errors
    /// Returns an error only for a failed read, never for a stale or
    /// corrupt record.
    pub fn load_checklist(&self, expected_len: usize) -> Result<Option<ChecklistState>, StorageError> {
        let Some(json) = self.kv_get(STATE_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<ChecklistState>(&json) {
            Ok(state) if state.len() == expected_len => Ok(Some(state)),
            _ => Ok(None),
        }
    }

    /// Persist the full checklist state snapshot.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails; callers
    /// treat this as non-fatal and keep the in-memory state
    /// authoritative.
    pub fn save_checklist(&self, state: &ChecklistState) -> Result<(), StorageError> {
        let json = serde_json::to_string(state)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        self.kv_set(STATE_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let store = StateStore::open_memory().unwrap();
        let state = ChecklistState {
            checked: vec![true, true, false, false],
        };
        store.save_checklist(&state).unwrap();
        let loaded = store.load_checklist(4).unwrap();
        assert_eq!(loaded, Some(state));
    }

    #[test]
    fn missing_record_loads_as_none() {
        let store = StateStore::open_memory().unwrap();
        assert_eq!(store.load_checklist(9).unwrap(), None);
    }

    #[test]
    fn length_mismatch_is_discarded() {
        let store = StateStore::open_memory().unwrap();
        let state = ChecklistState {
            checked: vec![true, true, true],
        };
        store.save_checklist(&state).unwrap();
        // The task list grew since the record was written.
        assert_eq!(store.load_checklist(9).unwrap(), None);
    }

    #[test]
    fn undecodable_record_is_discarded() {
        let store = StateStore::open_memory().unwrap();
        store.kv_set(STATE_KEY, "{not json").unwrap();
        assert_eq!(store.load_checklist(9).unwrap(), None);
    }

    #[test]
    fn save_replaces_previous_record() {
        let store = StateStore::open_memory().unwrap();
        store
            .save_checklist(&ChecklistState::new(3))
            .unwrap();
        let updated = ChecklistState {
            checked: vec![true, false, false],
        };
        store.save_checklist(&updated).unwrap();
        assert_eq!(store.load_checklist(3).unwrap(), Some(updated));
    }

    #[test]
    fn open_at_creates_file_in_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tradegate.db");
        let store = StateStore::open_at(&path).unwrap();
        store.save_checklist(&ChecklistState::new(2)).unwrap();
        drop(store);

        let reopened = StateStore::open_at(&path).unwrap();
        assert_eq!(
            reopened.load_checklist(2).unwrap(),
            Some(ChecklistState::new(2))
        );
    }
}
