use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::info;

use crate::chat::models::Session;
use crate::config::{StorageBackend, StorageConfig};
use crate::db::{connection::get_connection, service::DbService, DbPool};

/// Key under which the whole message list is stored.
pub const SESSION_KEY: &str = "chat-messages";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database Error: {0}")]
    Database(#[from] duckdb::Error),
    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Synchronous persistence for the single chat session.
pub trait SessionStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Session>, StoreError>;

    fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Removes the stored copy entirely.
    fn remove(&self) -> Result<(), StoreError>;
}

pub struct DuckDbStore {
    pool: DbPool,
}

impl DuckDbStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn open(path: &str) -> Result<Self, StoreError> {
        Ok(Self::new(get_connection(path)?))
    }
}

impl SessionStore for DuckDbStore {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        let conn = self.pool.lock().map_err(|_| StoreError::Poisoned)?;
        match DbService::get_value(&conn, SESSION_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let raw = serde_json::to_string(session)?;
        let conn = self.pool.lock().map_err(|_| StoreError::Poisoned)?;
        DbService::put_value(&conn, SESSION_KEY, &raw)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        let conn = self.pool.lock().map_err(|_| StoreError::Poisoned)?;
        DbService::delete_value(&conn, SESSION_KEY)?;
        Ok(())
    }
}

/// Process-local store. Values are kept serialized so reads go through the
/// same decoding path as the database.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        match entries.get(SESSION_KEY) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let raw = serde_json::to_string(session)?;
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(SESSION_KEY.to_string(), raw);
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(SESSION_KEY);
        Ok(())
    }
}

pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn SessionStore>, StoreError> {
    match config.backend {
        StorageBackend::Duckdb => Ok(Arc::new(DuckDbStore::open(&config.path)?)),
        StorageBackend::Memory => {
            info!("Using in-memory session storage; history will not survive restarts");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
