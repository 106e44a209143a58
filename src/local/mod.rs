//! Local Client State
//!
//! The only state this client owns: the anonymous client token and the
//! onboarding acknowledgment flag. Both are read through [`LocalState`],
//! which falls back to an in-memory map whenever the backend fails, so
//! storage problems are logged and never surfaced.

mod storage;

pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageError, StorageResult};

use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Storage key for the anonymous client token
pub const CLIENT_TOKEN_KEY: &str = "anonymous_initiative_client_token";

/// Storage key for the onboarding acknowledgment flag
pub const ACK_KEY: &str = "anonymous_initiative_manifesto_ack";

/// Per-profile state with an in-memory fallback
pub struct LocalState {
    backend: Box<dyn LocalStorage>,
    fallback: Mutex<HashMap<String, String>>,
}

impl LocalState {
    pub fn new(backend: impl LocalStorage + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            fallback: Mutex::new(HashMap::new()),
        }
    }

    /// State that is never persisted
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    fn fallback_get(&self, key: &str) -> Option<String> {
        self.fallback
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// Read a value, consulting the session fallback when storage has none
    pub fn read(&self, key: &str) -> Option<String> {
        match self.backend.get_item(key) {
            Ok(Some(value)) => Some(value),
            Ok(None) => self.fallback_get(key),
            Err(e) => {
                tracing::warn!(key, error = %e, "Local storage read failed, using session value");
                self.fallback_get(key)
            }
        }
    }

    /// Write a value; the session fallback always keeps a copy
    pub fn write(&self, key: &str, value: &str) {
        self.fallback
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());

        if let Err(e) = self.backend.set_item(key, value) {
            tracing::warn!(
                key,
                error = %e,
                "Local storage write failed, keeping value for this session"
            );
        }
    }

    /// The anonymous client token, generated on first use
    pub fn client_token(&self) -> String {
        if let Some(token) = self.read(CLIENT_TOKEN_KEY).filter(|t| !t.is_empty()) {
            return token;
        }

        let token = Uuid::new_v4().to_string();
        tracing::info!("Generated new anonymous client token");
        self.write(CLIENT_TOKEN_KEY, &token);
        token
    }

    /// Whether the onboarding panel was acknowledged
    pub fn is_acknowledged(&self) -> bool {
        self.read(ACK_KEY).as_deref() == Some("true")
    }

    pub fn acknowledge(&self) {
        self.write(ACK_KEY, "true");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Backend that refuses every operation, like storage in privacy mode
    struct DeniedStorage;

    impl LocalStorage for DeniedStorage {
        fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("access denied".to_string()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_client_token_stable() {
        let state = LocalState::in_memory();
        let first = state.client_token();
        assert!(Uuid::parse_str(&first).is_ok());
        assert_eq!(state.client_token(), first);
        assert_eq!(state.read(CLIENT_TOKEN_KEY).as_deref(), Some(first.as_str()));
    }

    #[test]
    fn test_client_token_kept_when_present() {
        let storage = MemoryStorage::new();
        storage.set_item(CLIENT_TOKEN_KEY, "existing-token").unwrap();

        let state = LocalState::new(storage);
        assert_eq!(state.client_token(), "existing-token");
    }

    #[test]
    fn test_client_token_survives_restart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let token = LocalState::new(FileStorage::new(&path)).client_token();
        let again = LocalState::new(FileStorage::new(&path)).client_token();
        assert_eq!(token, again);
    }

    #[test]
    fn test_denied_storage_falls_back() {
        let state = LocalState::new(DeniedStorage);

        let token = state.client_token();
        assert_eq!(state.client_token(), token);

        assert!(!state.is_acknowledged());
        state.acknowledge();
        assert!(state.is_acknowledged());
    }

    #[test]
    fn test_acknowledgment_flag() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let state = LocalState::new(FileStorage::new(&path));
        assert!(!state.is_acknowledged());
        state.acknowledge();

        assert!(LocalState::new(FileStorage::new(&path)).is_acknowledged());
    }
}
