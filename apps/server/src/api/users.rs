use std::sync::Arc;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use finbook_core::users::{
    ForgotPassword, LoginRequest, NewUser, PasswordChange, PasswordReset, UserProfile,
};
use serde::{Deserialize, Serialize};

const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

#[derive(Serialize)]
struct LoginResponse {
    #[serde(flatten)]
    profile: UserProfile,
    token: String,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Deserialize)]
struct TokenQuery {
    token: String,
}

#[derive(Serialize)]
struct AvatarResponse {
    message: &'static str,
    #[serde(rename = "avatarURL")]
    avatar_url: Option<String>,
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(new_user): Json<NewUser>,
) -> ApiResult<Json<UserProfile>> {
    let user = state.user_service.register(new_user).await?;
    Ok(Json(UserProfile::from(&user)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state.user_service.authenticate(&payload)?;
    let token = state.auth.issue_token(&user)?;
    Ok(Json(LoginResponse {
        profile: UserProfile::from(&user),
        token,
    }))
}

async fn me(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<UserProfile>> {
    let found = state.user_service.get_user(&user.user_id)?;
    Ok(Json(UserProfile::from(&found)))
}

async fn change_password(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(change): Json<PasswordChange>,
) -> ApiResult<StatusCode> {
    state
        .user_service
        .change_password(&user.user_id, change)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ForgotPassword>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .user_service
        .request_password_reset(&request.email)
        .await?;
    Ok(Json(MessageResponse {
        message: "Password reset email sent",
    }))
}

async fn validate_token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TokenQuery>,
) -> ApiResult<Json<MessageResponse>> {
    state.user_service.validate_reset_token(&query.token)?;
    Ok(Json(MessageResponse {
        message: "Token is valid",
    }))
}

async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(reset): Json<PasswordReset>,
) -> ApiResult<Json<MessageResponse>> {
    state.user_service.reset_password(reset).await?;
    Ok(Json(MessageResponse {
        message: "Password updated successfully",
    }))
}

fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

async fn upload_avatar(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<AvatarResponse>> {
    let mut image: Option<(&'static str, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let extension = field
            .content_type()
            .and_then(image_extension)
            .ok_or_else(|| {
                ApiError::BadRequest("Avatar must be a PNG, JPEG, GIF or WebP image".to_string())
            })?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;
        image = Some((extension, bytes));
    }

    let (extension, bytes) = image
        .filter(|(_, bytes)| !bytes.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing image in multipart request".to_string()))?;

    let file_name = format!(
        "{}-{}.{}",
        user.user_id,
        Utc::now().timestamp_millis(),
        extension
    );
    tokio::fs::create_dir_all(&state.upload_dir)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create upload directory: {}", e)))?;
    tokio::fs::write(state.upload_dir.join(&file_name), &bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to store avatar: {}", e)))?;
    tracing::debug!("Stored avatar {} ({} bytes)", file_name, bytes.len());

    let updated = state
        .user_service
        .update_avatar(&user.user_id, format!("/uploads/{}", file_name))
        .await?;
    Ok(Json(AvatarResponse {
        message: "Avatar uploaded successfully",
        avatar_url: updated.avatar_url,
    }))
}

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/validate-token", get(validate_token))
        .route("/reset-password", post(reset_password))
}

pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(me))
        .route("/profile-reset-password", post(change_password))
        .route(
            "/upload-avatar",
            post(upload_avatar).layer(DefaultBodyLimit::max(MAX_AVATAR_BYTES)),
        )
}
