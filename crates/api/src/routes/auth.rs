//! Authentication routes for login, token refresh, and the current profile.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use farmstead_core::auth::{UserRole, verify_password};
use farmstead_db::{UserRepository, entities::users};
use farmstead_shared::{
    TokenKind,
    auth::{LoginRequest, LoginResponse, RefreshRequest, TokenPair, UserInfo},
    types::UserId,
};
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::ApiJson,
    middleware::AuthUser,
};

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

/// Auth routes behind the token middleware.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid username or password").with_code("invalid_credentials")
}

fn user_info(user: &users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        role: UserRole::from(user.role).as_str().to_string(),
        branch_id: user.branch_id,
        image: user.image.clone(),
    }
}

fn issue_tokens(state: &AppState, user: &users::Model) -> ApiResult<TokenPair> {
    let role = UserRole::from(user.role).as_str();
    Ok(TokenPair {
        access_token: state
            .jwt_service
            .generate_access_token(user.id, user.branch_id, role)?,
        refresh_token: state
            .jwt_service
            .generate_refresh_token(user.id, user.branch_id, role)?,
        expires_in: state.jwt_service.access_token_expires_in(),
    })
}

/// POST /auth/login - Authenticate by username and password.
async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user_repo = UserRepository::new((*state.db).clone());

    let Some(user) = user_repo.find_by_username(payload.username.trim()).await? else {
        info!(username = %payload.username, "Login attempt for unknown user");
        return Err(invalid_credentials());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(invalid_credentials());
    }

    let tokens = issue_tokens(&state, &user)?;
    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        user: user_info(&user),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
    }))
}

/// POST /auth/refresh - Exchange a refresh token for a new pair.
///
/// The user is reloaded so role or branch changes apply to the new tokens.
async fn refresh(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> ApiResult<Json<TokenPair>> {
    let claims = state
        .jwt_service
        .validate_kind(&payload.refresh_token, TokenKind::Refresh)?;

    let user = UserRepository::new((*state.db).clone())
        .find_by_id(UserId::from_uuid(claims.user_id()))
        .await?
        .ok_or_else(|| ApiError::unauthorized("User no longer exists").with_code("invalid_token"))?;

    Ok(Json(issue_tokens(&state, &user)?))
}

/// GET /auth/me - Current user's profile.
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserInfo>> {
    let user = UserRepository::new((*state.db).clone())
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    Ok(Json(user_info(&user)))
}
