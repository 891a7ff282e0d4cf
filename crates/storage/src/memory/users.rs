use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::UserId;
use domain::User;
use tokio::sync::RwLock;

use crate::repository::UserRepository;
use crate::{Result, StoreError};

#[derive(Debug, Default)]
struct UserState {
    users: BTreeMap<UserId, User>,
    last_id: i64,
}

/// In-memory user store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<UserState>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<User>> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn add(&self, mut user: User) -> Result<UserId> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        user.id = UserId::new(state.last_id);
        let id = user.id;
        state.users.insert(id, user);
        Ok(id)
    }

    async fn update(&self, user: User) -> Result<()> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "User",
                id: user.id.as_i64(),
            }),
        }
    }

    async fn delete(&self, id: UserId) -> Result<bool> {
        Ok(self.state.write().await.users.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();
        let first = repo.add(User::new("John", "Doe", "john@example.com")).await.unwrap();
        let second = repo.add(User::new("Jane", "Smith", "jane@example.com")).await.unwrap();

        assert_eq!(first, UserId::new(1));
        assert_eq!(second, UserId::new(2));
        assert_eq!(repo.get_all().await.unwrap().len(), 2);
        assert_eq!(repo.get_by_id(second).await.unwrap().unwrap().first_name, "Jane");
    }

    #[tokio::test]
    async fn get_by_email_ignores_case() {
        let repo = InMemoryUserRepository::new();
        repo.add(User::new("John", "Doe", "John.Doe@Example.com")).await.unwrap();

        let found = repo.get_by_email("john.doe@example.com").await.unwrap();
        assert!(found.is_some());
        assert!(repo.get_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_missing_user_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let mut user = User::new("Ghost", "User", "ghost@example.com");
        user.id = UserId::new(99);

        let result = repo.update(user).await;
        assert!(matches!(result, Err(StoreError::NotFound { entity: "User", id: 99 })));
    }

    #[tokio::test]
    async fn update_and_delete_existing_user() {
        let repo = InMemoryUserRepository::new();
        let id = repo.add(User::new("John", "Doe", "john@example.com")).await.unwrap();

        let mut user = repo.get_by_id(id).await.unwrap().unwrap();
        user.last_name = "Dough".to_string();
        repo.update(user).await.unwrap();
        assert_eq!(repo.get_by_id(id).await.unwrap().unwrap().last_name, "Dough");

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
        assert!(repo.get_by_id(id).await.unwrap().is_none());
    }
}
