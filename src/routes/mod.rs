use std::time::Duration;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{auth::ApiKey, state::AppState};

pub mod applications;
pub mod file_types;
pub mod health;
pub mod statuses;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub fn create_router(state: AppState) -> Router<()> {
    let applications_routes = Router::new()
        .route(
            "/",
            get(applications::list_applications).post(applications::create_application),
        )
        .route(
            "/:id",
            get(applications::get_application)
                .put(applications::update_application)
                .delete(applications::delete_application),
        )
        .route("/:id/status", post(statuses::add_status))
        .route("/:id/statuses", get(statuses::list_statuses))
        .route(
            "/:id/file-types",
            get(file_types::list_file_types).post(file_types::add_file_type),
        )
        .route(
            "/:id/file-types/:file_type_id",
            delete(file_types::delete_file_type),
        );

    let protected_state = state.clone();
    let protected_routes = Router::new()
        .nest("/api/v1/applications", applications_routes)
        .layer(middleware::from_extractor_with_state::<ApiKey, _>(
            protected_state,
        ));

    Router::new()
        .merge(protected_routes)
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
}

/// Numeric path segments parse lossily: a malformed id becomes 0 and flows
/// through as an id that matches no row, rather than rejecting the request.
pub(crate) fn parse_id(raw: &str) -> i64 {
    raw.parse().unwrap_or(0)
}

pub(crate) fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.map(|value| value.parse().unwrap_or(0))
}

pub(crate) fn to_iso(dt: NaiveDateTime) -> String {
    DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc).to_rfc3339()
}
