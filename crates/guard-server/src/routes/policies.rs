//! Policy catalog routes and, under `/evaluations`, policy evaluations.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use guard_core::entities::Policy;
use guard_core::responses::EvaluationDetail;
use guard_db::inputs::{EvaluationCreate, PolicyCreate};
use guard_db::updates::evaluation::EvaluationUpdate;
use guard_db::updates::policy::PolicyUpdate;

use crate::error::ApiError;
use crate::extract::{CurrentUser, Id, ValidJson};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/evaluations", get(list_evaluations).post(create_evaluation))
        .route(
            "/evaluations/{id}",
            get(fetch_evaluation)
                .patch(update_evaluation)
                .delete(remove_evaluation),
        )
        .route("/{id}", get(fetch).put(update).delete(remove))
}

async fn list(State(state): State<AppState>, _user: CurrentUser) -> Result<Json<Vec<Policy>>, ApiError> {
    Ok(Json(state.service.list_policies().await?))
}

async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    ValidJson(input): ValidJson<PolicyCreate>,
) -> Result<(StatusCode, Json<Policy>), ApiError> {
    let policy = state.service.create_policy(input).await?;
    Ok((StatusCode::CREATED, Json(policy)))
}

async fn fetch(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id): Id,
) -> Result<Json<Policy>, ApiError> {
    Ok(Json(state.service.get_policy(id).await?))
}

async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id): Id,
    ValidJson(input): ValidJson<PolicyUpdate>,
) -> Result<Json<Policy>, ApiError> {
    Ok(Json(state.service.update_policy(id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id): Id,
) -> Result<StatusCode, ApiError> {
    if state.service.delete_policy(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Policy"))
    }
}

async fn list_evaluations(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<EvaluationDetail>>, ApiError> {
    Ok(Json(state.service.list_evaluations().await?))
}

async fn create_evaluation(
    State(state): State<AppState>,
    _user: CurrentUser,
    ValidJson(input): ValidJson<EvaluationCreate>,
) -> Result<(StatusCode, Json<EvaluationDetail>), ApiError> {
    let evaluation = state.service.create_evaluation(input).await?;
    Ok((StatusCode::CREATED, Json(evaluation)))
}

async fn fetch_evaluation(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id): Id,
) -> Result<Json<EvaluationDetail>, ApiError> {
    Ok(Json(state.service.get_evaluation(id).await?))
}

async fn update_evaluation(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id): Id,
    ValidJson(input): ValidJson<EvaluationUpdate>,
) -> Result<Json<EvaluationDetail>, ApiError> {
    Ok(Json(state.service.update_evaluation(id, input).await?))
}

async fn remove_evaluation(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id): Id,
) -> Result<StatusCode, ApiError> {
    if state.service.delete_evaluation(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Evaluation"))
    }
}
