use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{Todo, TodoPatch};
use crate::store::TodoStore;

/// Process-local todo store for development and tests
#[derive(Clone, Default)]
pub struct MemoryStore {
    todos: Arc<RwLock<HashMap<String, Todo>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TodoStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Todo>> {
        Ok(self.todos.read().await.get(id).cloned())
    }

    async fn put(&self, todo: &Todo) -> Result<()> {
        self.todos.write().await.insert(todo.id.clone(), todo.clone());
        Ok(())
    }

    async fn update_partial(&self, id: &str, patch: &TodoPatch) -> Result<Option<Todo>> {
        let mut todos = self.todos.write().await;
        Ok(todos.get_mut(id).map(|todo| {
            patch.apply_to(todo);
            todo.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.todos.write().await.remove(id);
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
