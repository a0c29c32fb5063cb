//! User management and profile picture upload.

use std::path::Path;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
};
use farmstead_core::{
    auth::{UserRole, check_password_policy, hash_password},
    validation::{optional_text, require_text, validate_email},
};
use farmstead_db::{
    CreateUserInput, UpdateUserInput, UserRepository, UserWithBranch, entities::users,
};
use farmstead_shared::{
    AppError,
    types::{BranchId, UserId},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiPath},
    middleware::AuthUser,
};

/// Multipart framing allowance on top of the file size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Creates the user routes.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route(
            "/users/upload",
            post(upload_image).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(MULTIPART_OVERHEAD),
            )),
        )
}

// ============================================================================
// Request / Response Types
// ============================================================================

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plain-text password, hashed before storage.
    pub password: String,
    /// Home branch.
    pub branch_id: BranchId,
    /// Role, `staff` when omitted.
    pub role: Option<UserRole>,
    /// Profile picture path from `/users/upload`.
    pub image: Option<String>,
}

/// Request body for updating a user. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New email.
    pub email: Option<String>,
    /// New password.
    pub password: Option<String>,
    /// New branch.
    pub branch_id: Option<BranchId>,
    /// New role.
    pub role: Option<UserRole>,
    /// New picture path; an empty string clears it.
    pub image: Option<String>,
}

/// Response for a stored upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Human-readable confirmation.
    pub message: &'static str,
    /// Public path of the stored file.
    pub file_path: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /users
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<users::Model>)> {
    auth.require_admin()?;

    let username = require_text("username", &payload.username)?;
    let email = validate_email(&payload.email)?;
    if payload.password.is_empty() {
        return Err(ApiError::validation("password is required"));
    }
    check_password_policy(&payload.password)?;
    let image = optional_text("image", payload.image.as_deref())?;
    let password_hash = hash_password(&payload.password)?;

    let user = UserRepository::new((*state.db).clone())
        .create(CreateUserInput {
            username,
            email,
            password_hash,
            branch_id: payload.branch_id,
            role: payload.role.unwrap_or_default().into(),
            image,
        })
        .await?;

    info!(user_id = %user.id, username = %user.username, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users
async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<UserWithBranch>>> {
    auth.require_admin()?;
    let users = UserRepository::new((*state.db).clone())
        .list_with_branch()
        .await?;
    Ok(Json(users))
}

/// GET /users/{id}
async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<UserId>,
) -> ApiResult<Json<users::Model>> {
    auth.require_self_or_admin(id)?;
    let user = UserRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;
    Ok(Json(user))
}

/// PATCH /users/{id}
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<UserId>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<users::Model>> {
    auth.require_admin()?;

    let email = payload.email.as_deref().map(validate_email).transpose()?;
    let password_hash = match payload.password.as_deref() {
        Some(password) => {
            check_password_policy(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };
    let image = match payload.image.as_deref() {
        Some(image) => Some(optional_text("image", Some(image))?),
        None => None,
    };

    let user = UserRepository::new((*state.db).clone())
        .update(
            id,
            UpdateUserInput {
                email,
                password_hash,
                branch_id: payload.branch_id,
                role: payload.role.map(Into::into),
                image,
            },
        )
        .await?;
    Ok(Json(user))
}

/// DELETE /users/{id}
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<UserId>,
) -> ApiResult<StatusCode> {
    auth.require_admin()?;
    if auth.user_id() == id {
        return Err(AppError::BusinessRule("cannot delete your own account".to_string()).into());
    }

    UserRepository::new((*state.db).clone()).delete(id).await?;
    info!(user_id = %id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /users/upload - Store a profile picture from the `file` field.
async fn upload_image(
    State(state): State<AppState>,
    _auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let original = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        if data.is_empty() {
            return Err(ApiError::validation("uploaded file is empty"));
        }
        if data.len() > state.storage.max_upload_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "file exceeds {} bytes",
                state.storage.max_upload_bytes
            ))
            .into());
        }

        let stored_name = format!(
            "{}-{}",
            chrono::Utc::now().timestamp_millis(),
            sanitize_filename(&original)
        );
        let dir = Path::new(&state.storage.upload_dir);
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            error!(error = %e, dir = %dir.display(), "Failed to create upload directory");
            ApiError::internal(e.to_string())
        })?;
        tokio::fs::write(dir.join(&stored_name), &data)
            .await
            .map_err(|e| {
                error!(error = %e, file = %stored_name, "Failed to write upload");
                ApiError::internal(e.to_string())
            })?;

        info!(file = %stored_name, bytes = data.len(), "File uploaded");
        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                message: "File uploaded successfully",
                file_path: format!("/uploads/{stored_name}"),
            }),
        ));
    }

    Err(ApiError::validation("no file uploaded"))
}

/// Reduces a client-supplied file name to its last path component made of
/// ASCII letters, digits, `.`, `-` and `_`.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("photo.png", "photo.png")]
    #[case("my photo (1).jpg", "my_photo__1_.jpg")]
    #[case("../../etc/passwd", "passwd")]
    #[case("C:\\Users\\me\\avatar.gif", "avatar.gif")]
    #[case(".hidden", "hidden")]
    #[case("", "upload")]
    #[case("日本.png", "__.png")]
    fn test_sanitize_filename(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_filename(input), expected);
    }
}
