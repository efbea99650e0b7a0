use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence.
///
/// Each query is a named method; implementations can use any storage backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Find a user by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// List all users
    async fn find_all(&self) -> UserResult<Vec<User>>;

    /// Insert or update a user record
    async fn save(&self, user: User) -> UserResult<User>;

    /// Delete a user by ID; unknown ids are a no-op
    async fn delete_by_id(&self, id: Uuid) -> UserResult<()>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        let user = users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned();
        Ok(user)
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        // Registration order
        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }

    async fn save(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        // Authoritative email uniqueness lives here
        let email_taken = users
            .values()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email));

        if email_taken {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::debug!(user_id = %user.id, email = %user.email, "Saved user");
        Ok(user)
    }

    async fn delete_by_id(&self, id: Uuid) -> UserResult<()> {
        let mut users = self.users.write().await;

        if users.remove(&id).is_some() {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_find_by_id() {
        let repo = InMemoryUserRepository::new();

        let user = User::new("test@example.com".to_string(), "hashed".to_string());
        let saved = repo.save(user.clone()).await.unwrap();
        assert_eq!(saved.email, "test@example.com");

        let fetched = repo.find_by_id(saved.id).await.unwrap();
        assert_eq!(fetched.unwrap().id, saved.id);
    }

    #[tokio::test]
    async fn test_find_by_email_is_case_insensitive() {
        let repo = InMemoryUserRepository::new();

        repo.save(User::new("test@example.com".to_string(), "h".to_string()))
            .await
            .unwrap();

        assert!(repo.find_by_email("test@example.com").await.unwrap().is_some());
        assert!(repo.find_by_email("TEST@EXAMPLE.COM").await.unwrap().is_some());
        assert!(repo.find_by_email("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();

        repo.save(User::new("test@example.com".to_string(), "h1".to_string()))
            .await
            .unwrap();

        let result = repo
            .save(User::new("Test@Example.com".to_string(), "h2".to_string()))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_save_same_user_twice_is_an_update() {
        let repo = InMemoryUserRepository::new();

        let mut user = User::new("test@example.com".to_string(), "h".to_string());
        repo.save(user.clone()).await.unwrap();

        user.active = false;
        repo.save(user.clone()).await.unwrap();

        let fetched = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert!(!fetched.active);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_a_noop() {
        let repo = InMemoryUserRepository::new();
        repo.delete_by_id(Uuid::now_v7()).await.unwrap();
    }
}
