//! In-memory implementation of UserRepository

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::user::{NewUser, User};
use crate::errors::{AuthError, DomainError};
use crate::repositories::user::UserRepository;

/// In-memory user repository
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.username == username && !u.is_deleted())
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id && !u.is_deleted()).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::Auth(AuthError::UsernameTaken));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let user = User::from_new(id, user);
        users.push(user.clone());
        Ok(user)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.username == username && !u.is_deleted()))
    }
}
