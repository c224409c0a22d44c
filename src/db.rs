// src/db.rs
use crate::models::{Exercise, Plans, Sessions, WorkoutSplit};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use strum_macros::{EnumIter, IntoStaticStr};
use thiserror::Error;
use tracing::{debug, warn};

// Custom Error type for storage operations
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection failed")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing database file")]
    Io(#[from] std::io::Error),
    #[error("Database query failed: {0}")]
    QueryFailed(rusqlite::Error),
    #[error("Database write failed: {0}")]
    WriteFailed(rusqlite::Error),
    #[error("Stored document '{key}' is malformed: {source}")]
    Malformed {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("Failed to serialize '{key}': {source}")]
    Serialize {
        key: &'static str,
        source: serde_json::Error,
    },
}

const DB_FILE_NAME: &str = "trackme.sqlite";
const APP_DATA_DIR: &str = "trackme";

/// The four persisted documents. Each is stored whole as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum DocumentKey {
    #[strum(serialize = "trackMeWorkouts")]
    Sessions,
    #[strum(serialize = "trackMeCustomExercises")]
    CustomExercises,
    #[strum(serialize = "trackMeWorkoutPlans")]
    Plans,
    #[strum(serialize = "trackMeWorkoutSplit")]
    Split,
}

impl DocumentKey {
    #[must_use]
    pub fn storage_name(self) -> &'static str {
        self.into()
    }
}

/// Key/value persistence for whole documents.
pub trait Store {
    /// `Ok(None)` when nothing was ever saved under `key`.
    fn load(&self, key: DocumentKey) -> Result<Option<String>, DbError>;
    fn save(&mut self, key: DocumentKey, value: &str) -> Result<(), DbError>;
}

/// Gets the path to the SQLite database file within the app's data directory.
/// Creates the directory if it doesn't exist.
pub fn get_db_path() -> Result<PathBuf, DbError> {
    let data_dir = dirs::data_dir().ok_or(DbError::DataDir)?;
    let app_dir = data_dir.join(APP_DATA_DIR);
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(DB_FILE_NAME))
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let conn = Connection::open(path).map_err(DbError::Connection)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory().map_err(DbError::Connection)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, DbError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,        -- JSON document
                updated_at TEXT NOT NULL    -- RFC3339
            )",
            [],
        )
        .map_err(DbError::Connection)?;
        Ok(Self { conn })
    }
}

impl Store for SqliteStore {
    fn load(&self, key: DocumentKey) -> Result<Option<String>, DbError> {
        self.conn
            .query_row(
                "SELECT value FROM documents WHERE key = ?1",
                params![key.storage_name()],
                |row| row.get(0),
            )
            .optional()
            .map_err(DbError::QueryFailed)
    }

    fn save(&mut self, key: DocumentKey, value: &str) -> Result<(), DbError> {
        self.conn
            .execute(
                "INSERT INTO documents (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key.storage_name(), value, chrono::Utc::now()],
            )
            .map_err(DbError::WriteFailed)?;
        Ok(())
    }
}

/// Volatile store for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: BTreeMap<&'static str, String>,
}

impl Store for MemoryStore {
    fn load(&self, key: DocumentKey) -> Result<Option<String>, DbError> {
        Ok(self.documents.get(key.storage_name()).cloned())
    }

    fn save(&mut self, key: DocumentKey, value: &str) -> Result<(), DbError> {
        self.documents.insert(key.storage_name(), value.to_string());
        Ok(())
    }
}

/// Reads and decodes one document. Missing documents decode to the default.
pub fn load_document<T, S>(store: &S, key: DocumentKey) -> Result<T, DbError>
where
    T: DeserializeOwned + Default,
    S: Store + ?Sized,
{
    match store.load(key)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| DbError::Malformed {
            key: key.storage_name(),
            source,
        }),
        None => Ok(T::default()),
    }
}

pub fn save_document<T, S>(store: &mut S, key: DocumentKey, value: &T) -> Result<(), DbError>
where
    T: Serialize + ?Sized,
    S: Store + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| DbError::Serialize {
        key: key.storage_name(),
        source,
    })?;
    store.save(key, &raw)?;
    debug!("Saved '{}' ({} bytes)", key.storage_name(), raw.len());
    Ok(())
}

/// Everything the app keeps between runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub sessions: Sessions,
    pub custom_exercises: Vec<Exercise>,
    pub plans: Plans,
    pub split: WorkoutSplit,
}

fn load_or_default<T, S>(store: &S, key: DocumentKey) -> T
where
    T: DeserializeOwned + Default,
    S: Store + ?Sized,
{
    load_document(store, key).unwrap_or_else(|e| {
        warn!("Starting with empty '{}': {}", key.storage_name(), e);
        T::default()
    })
}

impl Collections {
    /// Loads every document. An unreadable document is logged and replaced
    /// by its empty value; the others still load.
    pub fn load_all<S: Store + ?Sized>(store: &S) -> Self {
        Self {
            sessions: load_or_default(store, DocumentKey::Sessions),
            custom_exercises: load_or_default(store, DocumentKey::CustomExercises),
            plans: load_or_default(store, DocumentKey::Plans),
            split: load_or_default(store, DocumentKey::Split),
        }
    }
}
