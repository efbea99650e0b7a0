use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_helpers::ValidatedJson;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthService;
use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, LoginRequest, RoleSelection, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

/// Create the users admin router
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users))
        .route("/{id}/ban", post(ban_user))
        .route("/{id}/roles", put(change_user_roles))
        .with_state(shared_service)
}

/// Application state for the auth endpoints
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub auth: AuthService<R>,
}

impl<R: UserRepository> Clone for AuthState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            auth: self.auth.clone(),
        }
    }
}

/// Create the registration/login router
pub fn auth_router<R: UserRepository + 'static>(
    service: UserService<R>,
    auth: AuthService<R>,
) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(AuthState { service, auth })
}

/// List all users
///
/// GET /users
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let users = service.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Toggle a user's active flag
///
/// POST /users/:id/ban
async fn ban_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<Uuid>,
) -> UserResult<impl IntoResponse> {
    service.ban_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Grant roles from an explicit selection
///
/// PUT /users/:id/roles
async fn change_user_roles<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<Uuid>,
    Json(selection): Json<RoleSelection>,
) -> UserResult<Json<UserResponse>> {
    let user = service.change_user_roles(id, selection).await?;
    Ok(Json(user.into()))
}

/// Register a new user
///
/// POST /auth/register
async fn register<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let email = input.email.clone();

    if state.service.create_user(input).await? {
        Ok(StatusCode::CREATED)
    } else {
        Err(UserError::DuplicateEmail(email))
    }
}

/// User login (verify credentials)
///
/// POST /auth/login
async fn login<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<UserResponse>> {
    let user = state
        .auth
        .verify_credentials(&input.email, &input.password)
        .await?;
    Ok(Json(user))
}
