use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Authorization roles. This is the closed set; role editing iterates over
/// every variant via `EnumIter`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// User email, doubles as the login name (unique)
    pub email: String,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role set; non-empty after creation
    pub roles: BTreeSet<Role>,
    /// Account active flag, toggled by ban/unban
    pub active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new account record with the base role and an active flag.
    /// The password must already be hashed by the service layer.
    pub fn new(email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email,
            password_hash,
            roles: BTreeSet::from([Role::User]),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// DTO for registering a new user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
}

/// DTO for user login
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
}

/// Explicit role selection submitted by the admin form: every role name maps
/// to a checkbox state. Roles mapped to `true` are granted; anything else is
/// left untouched (granting is add-only).
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RoleSelection {
    pub roles: BTreeMap<Role, bool>,
}

impl RoleSelection {
    pub fn granted(&self, role: Role) -> bool {
        self.roles.get(&role).copied().unwrap_or(false)
    }
}

/// User response DTO (without password_hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            roles: user.roles.iter().map(|r| r.to_string()).collect(),
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_new_user_has_base_role_and_is_active() {
        let user = User::new("a@x.com".to_string(), "hash".to_string());
        assert!(user.active);
        assert_eq!(user.roles, BTreeSet::from([Role::User]));
    }

    #[test]
    fn test_role_round_trips_through_strings() {
        for role in Role::iter() {
            let rendered = role.to_string();
            assert_eq!(rendered.parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_selection_defaults_to_not_granted() {
        let selection = RoleSelection::default();
        assert!(!selection.granted(Role::Admin));

        let selection = RoleSelection {
            roles: BTreeMap::from([(Role::Admin, true), (Role::User, false)]),
        };
        assert!(selection.granted(Role::Admin));
        assert!(!selection.granted(Role::User));
    }

    #[test]
    fn test_user_response_hides_password_hash() {
        let user = User::new("a@x.com".to_string(), "hash".to_string());
        let rendered = serde_json::to_string(&user).unwrap();
        assert!(!rendered.contains("hash"));
    }
}
