//! Route definitions for the GreenSpot backend

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Room for multipart boundaries and form fields around the photo
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    let max_photo_bytes = state.config.uploads.max_photo_bytes;

    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - care schedules and tasks
        .nest("/care-tasks", care_task_routes(state.clone()))
        // Protected routes - climate lookup
        .nest("/climate", climate_routes(state.clone()))
        // Protected routes - plant health checks
        .nest("/health-checks", health_check_routes(state.clone(), max_photo_bytes))
        // Protected routes - garden assistant
        .nest("/assistant", assistant_routes(state, max_photo_bytes))
}

/// Care task routes (protected)
fn care_task_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_care_tasks).post(handlers::create_care_schedule),
        )
        .route("/today", get(handlers::get_todays_tasks))
        .route("/:task_id", patch(handlers::update_care_task))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Climate routes (protected)
fn climate_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_climate))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Plant health check routes (protected)
fn health_check_routes(state: AppState, max_photo_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_health_checks).post(handlers::create_health_check),
        )
        .layer(DefaultBodyLimit::max(max_photo_bytes + FORM_OVERHEAD_BYTES))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Garden assistant routes (protected)
fn assistant_routes(state: AppState, max_photo_bytes: usize) -> Router<AppState> {
    // Inline images arrive base64 encoded, a third larger than the raw bytes.
    let max_body = max_photo_bytes / 3 * 4 + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/chat", post(handlers::chat))
        .layer(DefaultBodyLimit::max(max_body))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
