//! In-memory credential store for tests and throwaway runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::auth::repo::{StoreError, UserStore};
use crate::auth::repo_types::{UniqueField, User};

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: HashMap<i64, User>,
}

/// Uniqueness is checked and the row inserted under one write lock.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    table: Arc<RwLock<Table>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|u| u.username == username) {
            return Err(StoreError::Conflict(UniqueField::Username));
        }
        if table.rows.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict(UniqueField::Email));
        }

        table.next_id += 1;
        let user = User {
            id: table.next_id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }
}
