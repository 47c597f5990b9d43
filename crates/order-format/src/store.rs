use std::collections::HashMap;

use design_engine::{DesignSnapshot, DesignState};
use tracing::{debug, info};

use crate::errors::{SessionError, StoreError};
use crate::session::{load_session, save_session};

/// Key/value storage that survives page reloads (browser local storage).
pub trait SessionStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store, for tests and hosts without persistent storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Write the snapshot under `key`.
pub fn persist_design(
    store: &mut dyn SessionStore,
    key: &str,
    snapshot: &DesignSnapshot,
) -> Result<(), SessionError> {
    let json = save_session(snapshot)?;
    store.save(key, &json)?;
    debug!(key, bytes = json.len(), "persisted design");
    Ok(())
}

/// Read the snapshot stored under `key`, if any.
pub fn load_design(store: &dyn SessionStore, key: &str) -> Result<Option<DesignSnapshot>, SessionError> {
    match store.load(key)? {
        Some(json) => Ok(Some(load_session(&json)?)),
        None => Ok(None),
    }
}

/// Rehydrate `state` from storage. Returns false when nothing was stored.
pub fn restore_design(
    store: &dyn SessionStore,
    key: &str,
    state: &mut DesignState,
) -> Result<bool, SessionError> {
    let Some(snapshot) = load_design(store, key)? else {
        return Ok(false);
    };
    state.restore(&snapshot)?;
    info!(key, logos = snapshot.logo_count(), "restored design from storage");
    Ok(true)
}

pub fn clear_design(store: &mut dyn SessionStore, key: &str) -> Result<(), SessionError> {
    store.remove(key)?;
    Ok(())
}
