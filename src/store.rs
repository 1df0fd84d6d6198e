use anyhow::Result;
use std::future::Future;

use crate::config::{Config, StoreBackend};
use crate::memory::MemoryStore;
use crate::models::{Todo, TodoPatch};
use crate::spanner::SpannerClient;

/// Storage contract the HTTP handlers are written against
///
/// Every method maps onto a single store operation. Implementations must be
/// cheap to clone and safe to share across concurrently running handlers.
pub trait TodoStore: Clone + Send + Sync + 'static {
    /// Full, unfiltered scan of all todos
    fn list(&self) -> impl Future<Output = Result<Vec<Todo>>> + Send;

    /// Point lookup by id, `Ok(None)` when absent
    fn get(&self, id: &str) -> impl Future<Output = Result<Option<Todo>>> + Send;

    /// Unconditional upsert
    fn put(&self, todo: &Todo) -> impl Future<Output = Result<()>> + Send;

    /// Write only the fields carried by `patch`
    ///
    /// Returns the full record after the update, or `Ok(None)` if no todo
    /// exists with that id. Missing records are never created.
    fn update_partial(
        &self,
        id: &str,
        patch: &TodoPatch,
    ) -> impl Future<Output = Result<Option<Todo>>> + Send;

    /// Unconditional delete, a no-op for unknown ids
    fn delete(&self, id: &str) -> impl Future<Output = Result<()>> + Send;

    /// Lightweight round trip proving the store is reachable
    fn health_check(&self) -> impl Future<Output = Result<()>> + Send;
}

/// The store backend selected at startup
#[derive(Clone)]
pub enum Store {
    Spanner(SpannerClient),
    Memory(MemoryStore),
    #[cfg(test)]
    Failing(FailingStore),
}

impl Store {
    /// Build the configured backend once; the result is shared by all handlers
    pub async fn from_config(config: &Config) -> Result<Self> {
        match config.store_backend {
            StoreBackend::Spanner => Ok(Store::Spanner(SpannerClient::from_config(config).await?)),
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store, todos will not survive a restart");
                Ok(Store::Memory(MemoryStore::new()))
            }
        }
    }
}

impl TodoStore for Store {
    async fn list(&self) -> Result<Vec<Todo>> {
        match self {
            Store::Spanner(s) => s.list().await,
            Store::Memory(m) => m.list().await,
            #[cfg(test)]
            Store::Failing(f) => f.list().await,
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Todo>> {
        match self {
            Store::Spanner(s) => s.get(id).await,
            Store::Memory(m) => m.get(id).await,
            #[cfg(test)]
            Store::Failing(f) => f.get(id).await,
        }
    }

    async fn put(&self, todo: &Todo) -> Result<()> {
        match self {
            Store::Spanner(s) => s.put(todo).await,
            Store::Memory(m) => m.put(todo).await,
            #[cfg(test)]
            Store::Failing(f) => f.put(todo).await,
        }
    }

    async fn update_partial(&self, id: &str, patch: &TodoPatch) -> Result<Option<Todo>> {
        match self {
            Store::Spanner(s) => s.update_partial(id, patch).await,
            Store::Memory(m) => m.update_partial(id, patch).await,
            #[cfg(test)]
            Store::Failing(f) => f.update_partial(id, patch).await,
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        match self {
            Store::Spanner(s) => s.delete(id).await,
            Store::Memory(m) => m.delete(id).await,
            #[cfg(test)]
            Store::Failing(f) => f.delete(id).await,
        }
    }

    async fn health_check(&self) -> Result<()> {
        match self {
            Store::Spanner(s) => s.health_check().await,
            Store::Memory(m) => m.health_check().await,
            #[cfg(test)]
            Store::Failing(f) => f.health_check().await,
        }
    }
}

/// Store whose every operation fails, for exercising error paths
#[cfg(test)]
#[derive(Clone, Default)]
pub struct FailingStore;

#[cfg(test)]
impl TodoStore for FailingStore {
    async fn list(&self) -> Result<Vec<Todo>> {
        Err(anyhow::anyhow!("store unavailable"))
    }

    async fn get(&self, _id: &str) -> Result<Option<Todo>> {
        Err(anyhow::anyhow!("store unavailable"))
    }

    async fn put(&self, _todo: &Todo) -> Result<()> {
        Err(anyhow::anyhow!("store unavailable"))
    }

    async fn update_partial(&self, _id: &str, _patch: &TodoPatch) -> Result<Option<Todo>> {
        Err(anyhow::anyhow!("store unavailable"))
    }

    async fn delete(&self, _id: &str) -> Result<()> {
        Err(anyhow::anyhow!("store unavailable"))
    }

    async fn health_check(&self) -> Result<()> {
        Err(anyhow::anyhow!("store unavailable"))
    }
}
