//! Users Domain
//!
//! Account lifecycle for the marketplace: registration with hashed
//! passwords, login lookup, ban/unban toggling and role editing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, password hashing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, enums
//! └─────────────┘
//! ```

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod principal;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use auth::{AuthService, AuthenticatedUser};
pub use error::{UserError, UserResult};
pub use models::{CreateUser, LoginRequest, Role, RoleSelection, User, UserResponse};
pub use principal::Principal;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
