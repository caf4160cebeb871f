//! Router assembly: resource routes nested under `/api`, plus CORS and
//! request tracing.

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::routes;
use crate::state::AppState;

/// Build the full application router.
///
/// `cors_origins` containing `"*"` allows any origin without credentials;
/// otherwise only the listed origins are allowed, with credentials.
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/health", get(routes::health::health))
        .nest("/auth", routes::auth::routes())
        .nest("/accounts", routes::accounts::routes())
        .nest("/policies", routes::policies::routes())
        .nest("/dashboard", routes::dashboard::routes())
        .nest("/notifications", routes::notifications::routes());

    Router::new()
        .nest("/api", api)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| warn!(%origin, "ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
