use crate::config::Config;
use crate::store::Store;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<Config>,
}

#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        store_backend: crate::config::StoreBackend::Memory,
        spanner_emulator_host: None,
        spanner_project: String::new(),
        spanner_instance: String::new(),
        spanner_database: String::new(),
        spanner_region: "us-central1".to_string(),
        service_port: 3001,
        service_host: "0.0.0.0".to_string(),
    }
}

/// State backed by a fresh, empty in-memory store
#[cfg(test)]
pub fn test_state() -> AppState {
    AppState {
        store: Store::Memory(crate::memory::MemoryStore::new()),
        config: Arc::new(test_config()),
    }
}

/// State whose store fails every operation
#[cfg(test)]
pub fn failing_state() -> AppState {
    AppState {
        store: Store::Failing(crate::store::FailingStore),
        config: Arc::new(test_config()),
    }
}
