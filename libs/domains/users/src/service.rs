use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::instrument;
use uuid::Uuid;

use crate::auth;
use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, Role, RoleSelection, User};
use crate::repository::UserRepository;

/// Service layer for account lifecycle business logic.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Register a new account.
    ///
    /// Returns `Ok(false)` without writing anything when the email is already
    /// registered. Otherwise the stored record is active, holds the base
    /// role, and carries an Argon2 hash instead of the plaintext password;
    /// exactly one save is performed.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<bool> {
        if self.repository.find_by_email(&input.email).await?.is_some() {
            tracing::info!(email = %input.email, "Registration rejected, email taken");
            return Ok(false);
        }

        let password_hash = auth::hash_password(&input.password)?;
        let user = User::new(input.email, password_hash);

        self.repository.save(user).await?;
        Ok(true)
    }

    /// List all users in repository order.
    pub async fn list(&self) -> UserResult<Vec<User>> {
        self.repository.find_all().await
    }

    /// Toggle the active flag of a user.
    ///
    /// Calling twice restores the original state. Unknown ids are a silent
    /// no-op with zero writes.
    #[instrument(skip(self))]
    pub async fn ban_user(&self, id: Uuid) -> UserResult<()> {
        let Some(mut user) = self.repository.find_by_id(id).await? else {
            tracing::debug!(user_id = %id, "Ban requested for unknown user, ignoring");
            return Ok(());
        };

        user.active = !user.active;
        user.updated_at = chrono::Utc::now();

        tracing::info!(user_id = %id, active = user.active, "Toggled user active flag");
        self.repository.save(user).await?;
        Ok(())
    }

    /// Grant the roles selected in the form.
    ///
    /// Iterates the closed role set; roles mapped to `true` are added to the
    /// user's set. Roles left unselected keep their current state, so this
    /// operation never revokes anything.
    #[instrument(skip(self, selection))]
    pub async fn change_user_roles(&self, id: Uuid, selection: RoleSelection) -> UserResult<User> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        for role in Role::iter() {
            if selection.granted(role) {
                user.roles.insert(role);
            }
        }
        user.updated_at = chrono::Utc::now();

        self.repository.save(user).await
    }
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::repository::MockUserRepository;
    use std::collections::BTreeMap;

    fn create_input(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password: "password".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo.expect_find_by_email().returning(|_| Ok(None));
        mock_repo
            .expect_save()
            .times(1)
            .returning(|user| {
                assert!(user.active);
                assert!(user.roles.contains(&Role::User));
                assert_ne!(user.password_hash, "password");
                assert!(verify_password("password", &user.password_hash).unwrap());
                Ok(user)
            });

        let service = UserService::new(mock_repo);
        let created = service.create_user(create_input("test@example.com")).await.unwrap();

        assert!(created);
    }

    #[tokio::test]
    async fn test_create_user_email_taken() {
        let mut mock_repo = MockUserRepository::new();

        let existing = User::new("existing@example.com".to_string(), "hash".to_string());
        mock_repo
            .expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo.expect_save().never();

        let service = UserService::new(mock_repo);
        let created = service
            .create_user(create_input("existing@example.com"))
            .await
            .unwrap();

        assert!(!created);
    }

    #[tokio::test]
    async fn test_list_returns_repository_order() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo.expect_find_all().returning(|| {
            Ok(vec![
                User::new("a@example.com".to_string(), "h".to_string()),
                User::new("b@example.com".to_string(), "h".to_string()),
            ])
        });

        let service = UserService::new(mock_repo);
        let users = service.list().await.unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].email, "a@example.com");
        assert_eq!(users[1].email, "b@example.com");
    }

    #[tokio::test]
    async fn test_ban_user_deactivates_active_user() {
        let mut mock_repo = MockUserRepository::new();
        let user = User::new("test@example.com".to_string(), "h".to_string());
        let id = user.id;

        mock_repo
            .expect_find_by_id()
            .with(mockall::predicate::eq(id))
            .returning(move |_| Ok(Some(user.clone())));
        mock_repo
            .expect_save()
            .times(1)
            .returning(|user| {
                assert!(!user.active);
                Ok(user)
            });

        let service = UserService::new(mock_repo);
        service.ban_user(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_ban_user_reactivates_banned_user() {
        let mut mock_repo = MockUserRepository::new();
        let mut user = User::new("test@example.com".to_string(), "h".to_string());
        user.active = false;
        let id = user.id;

        mock_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        mock_repo
            .expect_save()
            .times(1)
            .returning(|user| {
                assert!(user.active);
                Ok(user)
            });

        let service = UserService::new(mock_repo);
        service.ban_user(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_ban_unknown_user_is_a_noop() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo.expect_find_by_id().returning(|_| Ok(None));
        mock_repo.expect_save().never();

        let service = UserService::new(mock_repo);
        service.ban_user(Uuid::now_v7()).await.unwrap();
    }

    #[tokio::test]
    async fn test_change_user_roles_grants_selected_roles() {
        let mut mock_repo = MockUserRepository::new();
        let user = User::new("test@example.com".to_string(), "h".to_string());
        let id = user.id;

        mock_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        mock_repo.expect_save().times(1).returning(Ok);

        let service = UserService::new(mock_repo);
        let selection = RoleSelection {
            roles: BTreeMap::from([(Role::Admin, true), (Role::User, true)]),
        };
        let updated = service.change_user_roles(id, selection).await.unwrap();

        assert!(updated.roles.contains(&Role::Admin));
        assert!(updated.roles.contains(&Role::User));
    }

    #[tokio::test]
    async fn test_change_user_roles_never_revokes() {
        let mut mock_repo = MockUserRepository::new();
        let mut user = User::new("test@example.com".to_string(), "h".to_string());
        user.roles.insert(Role::Admin);
        let id = user.id;

        mock_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        mock_repo.expect_save().times(1).returning(Ok);

        let service = UserService::new(mock_repo);

        // Admin unchecked: existing grant stays
        let selection = RoleSelection {
            roles: BTreeMap::from([(Role::Admin, false)]),
        };
        let updated = service.change_user_roles(id, selection).await.unwrap();

        assert!(updated.roles.contains(&Role::Admin));
        assert!(updated.roles.contains(&Role::User));
    }
}
