//! Authentication lookup: resolves a login identifier to a credentials view
//! and verifies submitted passwords against the stored hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{Role, UserResponse};
use crate::repository::UserRepository;

/// Credentials view of a user record, consumed by the authentication layer.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Login name (the user's email)
    pub username: String,
    /// Stored one-way password hash
    pub password_hash: String,
    /// Always true in the credentials view; banning is enforced at login
    pub enabled: bool,
    /// The user's roles as authorization capabilities (may be empty)
    pub authorities: Vec<Role>,
}

/// Hash a plaintext password with Argon2 and a fresh salt.
pub(crate) fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

/// Verify a plaintext password against a stored hash.
pub(crate) fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Resolves user records for credential verification.
pub struct AuthService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Look up the credentials view for a login identifier.
    ///
    /// Unknown identifiers fail with [`UserError::PrincipalNotFound`] carrying
    /// the identifier, never with a silent empty value. No side effects.
    pub async fn load_user(&self, username: &str) -> UserResult<AuthenticatedUser> {
        let user = self
            .repository
            .find_by_email(username)
            .await?
            .ok_or_else(|| UserError::PrincipalNotFound(username.to_string()))?;

        Ok(AuthenticatedUser {
            username: user.email,
            password_hash: user.password_hash,
            enabled: true,
            authorities: user.roles.into_iter().collect(),
        })
    }

    /// Verify a login attempt. Unknown emails and bad passwords are
    /// indistinguishable to the caller; banned accounts are rejected.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> UserResult<UserResponse> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !user.active {
            return Err(UserError::Inactive);
        }

        if !verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user.into())
    }
}

impl<R: UserRepository> Clone for AuthService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::repository::MockUserRepository;

    fn stored_user(email: &str, password: &str) -> User {
        User::new(email.to_string(), hash_password(password).unwrap())
    }

    #[tokio::test]
    async fn test_load_user_returns_credentials_view() {
        let mut mock_repo = MockUserRepository::new();
        let user = stored_user("test@example.com", "password");
        let hash = user.password_hash.clone();

        mock_repo
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(mock_repo);
        let details = service.load_user("test@example.com").await.unwrap();

        assert_eq!(details.username, "test@example.com");
        assert_eq!(details.password_hash, hash);
        assert!(details.enabled);
        assert_eq!(details.authorities, vec![Role::User]);
    }

    #[tokio::test]
    async fn test_load_user_unknown_fails_with_identifier() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_by_email().returning(|_| Ok(None));

        let service = AuthService::new(mock_repo);
        let err = service.load_user("nobody@example.com").await.unwrap_err();

        match err {
            UserError::PrincipalNotFound(name) => assert_eq!(name, "nobody@example.com"),
            other => panic!("expected PrincipalNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_verify_credentials_success() {
        let mut mock_repo = MockUserRepository::new();
        let user = stored_user("test@example.com", "password");

        mock_repo
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(mock_repo);
        let verified = service
            .verify_credentials("test@example.com", "password")
            .await
            .unwrap();

        assert_eq!(verified.email, "test@example.com");
    }

    #[tokio::test]
    async fn test_verify_credentials_wrong_password() {
        let mut mock_repo = MockUserRepository::new();
        let user = stored_user("test@example.com", "password");

        mock_repo
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(mock_repo);
        let err = service
            .verify_credentials("test@example.com", "wrong")
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_verify_credentials_banned_account() {
        let mut mock_repo = MockUserRepository::new();
        let mut user = stored_user("test@example.com", "password");
        user.active = false;

        mock_repo
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(mock_repo);
        let err = service
            .verify_credentials("test@example.com", "password")
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::Inactive));
    }

    #[test]
    fn test_hash_password_is_one_way() {
        let hash = hash_password("plaintext").unwrap();
        assert_ne!(hash, "plaintext");
        assert!(verify_password("plaintext", &hash).unwrap());
        assert!(!verify_password("other", &hash).unwrap());
    }
}
