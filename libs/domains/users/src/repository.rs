use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::{NewUser, UpdateUser, User};

/// Record store for users
///
/// Adapters hold no business rules. `update` and `delete` report nothing about
/// affected rows; callers check existence themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user, assigning its id
    async fn save(&self, user: NewUser) -> UserResult<User>;

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Slice in creation order plus the total number of records
    async fn find_page(&self, offset: u64, limit: u64) -> UserResult<(Vec<User>, u64)>;

    /// Overwrite the fields present in `patch`
    async fn update(&self, id: Uuid, patch: &UpdateUser) -> UserResult<()>;

    async fn delete(&self, id: Uuid) -> UserResult<()>;

    async fn exists(&self, id: Uuid) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
///
/// Records are kept in insertion order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: NewUser) -> UserResult<User> {
        let user = user.into_user(Uuid::now_v7());
        self.users.write().await.push(user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_page(&self, offset: u64, limit: u64) -> UserResult<(Vec<User>, u64)> {
        let users = self.users.read().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        let page = users.iter().skip(offset).take(limit).cloned().collect();
        Ok((page, users.len() as u64))
    }

    async fn update(&self, id: Uuid, patch: &UpdateUser) -> UserResult<()> {
        let mut users = self.users.write().await;

        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            patch.apply_to(user);
            tracing::info!(user_id = %id, "Updated user");
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> UserResult<()> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);

        if users.len() < before {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.id == id))
    }
}
