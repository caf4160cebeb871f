//! Notification feed routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use guard_core::entities::Notification;
use guard_db::inputs::NotificationCreate;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::extract::{CurrentUser, Id, ValidJson};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/unread-count", get(unread_count))
        .route("/mark-all-read", patch(mark_all_read))
        .route("/{id}", get(fetch).delete(remove))
        .route("/{id}/read", patch(mark_read))
}

async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<Notification>>, ApiError> {
    Ok(Json(state.service.list_notifications().await?))
}

async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    ValidJson(input): ValidJson<NotificationCreate>,
) -> Result<(StatusCode, Json<Notification>), ApiError> {
    let notification = state.service.create_notification(input).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

async fn unread_count(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let unread = state.service.unread_count().await?;
    Ok(Json(json!({ "unread": unread })))
}

async fn mark_all_read(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let updated = state.service.mark_all_notifications_read().await?;
    Ok(Json(json!({ "updated": updated })))
}

async fn fetch(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id): Id,
) -> Result<Json<Notification>, ApiError> {
    Ok(Json(state.service.get_notification(id).await?))
}

async fn mark_read(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id): Id,
) -> Result<Json<Notification>, ApiError> {
    Ok(Json(state.service.mark_notification_read(id).await?))
}

async fn remove(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id): Id,
) -> Result<StatusCode, ApiError> {
    if state.service.delete_notification(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Notification"))
    }
}
