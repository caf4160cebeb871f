//! Cloud account routes, including the manual sync stub.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use guard_core::entities::CloudAccount;
use guard_db::inputs::AccountCreate;
use guard_db::updates::account::AccountUpdate;

use crate::error::ApiError;
use crate::extract::{CurrentUser, Id, ValidJson};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(fetch).patch(update).delete(remove))
        .route("/{id}/sync", post(sync))
}

async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<CloudAccount>>, ApiError> {
    Ok(Json(state.service.list_accounts().await?))
}

/// Create an account owned by the caller unless the body names an owner.
async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(mut input): ValidJson<AccountCreate>,
) -> Result<(StatusCode, Json<CloudAccount>), ApiError> {
    input.owner_id.get_or_insert(user.id);
    let account = state.service.create_account(input).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

async fn fetch(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id): Id,
) -> Result<Json<CloudAccount>, ApiError> {
    Ok(Json(state.service.get_account(id).await?))
}

async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id): Id,
    ValidJson(input): ValidJson<AccountUpdate>,
) -> Result<Json<CloudAccount>, ApiError> {
    Ok(Json(state.service.update_account(id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id): Id,
) -> Result<StatusCode, ApiError> {
    if state.service.delete_account(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Account"))
    }
}

async fn sync(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id): Id,
) -> Result<Json<CloudAccount>, ApiError> {
    Ok(Json(state.service.sync_account(id).await?))
}
