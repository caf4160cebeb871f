use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use guard_core::snapshot::DashboardSnapshot;

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/summary", get(summary))
}

async fn summary(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<DashboardSnapshot>, ApiError> {
    Ok(Json(state.service.dashboard_snapshot().await?))
}
