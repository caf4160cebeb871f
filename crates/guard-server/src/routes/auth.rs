//! Registration, login and the caller's own profile.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use guard_auth::{hash_password, verify_password_or_decoy};
use guard_core::responses::UserProfile;
use guard_db::updates::user::UserUpdate;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::extract::{CurrentUser, ValidJson};
use crate::state::AppState;
use crate::validation::{LoginRequest, ProfileUpdate, RegisterRequest};

const LOGIN_FAILED: &str = "Invalid email or password";

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserProfile,
}

/// Run Argon2 work off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile).put(update_profile))
}

async fn register(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    if state.service.find_user_by_email(&input.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".into()));
    }
    let RegisterRequest {
        email,
        full_name,
        password,
    } = input;
    let digest = blocking(move || hash_password(&password)).await??;
    let user = state
        .service
        .create_user(&email, &full_name, &digest)
        .await?;
    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}

async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .service
        .authenticate(&input.email, &input.password, |password, digest| async move {
            blocking(move || verify_password_or_decoy(&password, digest.as_deref()))
                .await
                .unwrap_or_else(|e| {
                    warn!(error = %e, "password check failed");
                    false
                })
        })
        .await?
        .ok_or_else(|| ApiError::Unauthorized(LOGIN_FAILED.into()))?;

    let access_token = state.tokens.issue(&user.email)?;
    info!(user_id = user.id, "login succeeded");
    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        user: UserProfile::from(&user),
    }))
}

async fn profile(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(UserProfile::from(&user))
}

async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(input): ValidJson<ProfileUpdate>,
) -> Result<Json<UserProfile>, ApiError> {
    let update = UserUpdate {
        full_name: input.full_name,
        is_active: None,
    };
    let updated = state.service.update_user(user.id, update).await?;
    Ok(Json(UserProfile::from(&updated)))
}
