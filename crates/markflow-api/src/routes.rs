//! API routes

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{analyze, generate, health, templates};
use crate::openapi::create_openapi_routes;
use crate::state::AppState;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    // Health check routes
    let health_routes = Router::new()
        .route("/", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route("/detailed", get(health::health_detailed))
        .with_state(state.clone());

    // Template routes
    let template_routes = Router::new()
        .route("/", get(templates::list_templates))
        .route("/", post(templates::create_template))
        .route("/:id", get(templates::get_template))
        .route("/:id", patch(templates::update_template))
        .route("/:id", delete(templates::delete_template))
        .route("/:id/edit", post(generate::edit_template));

    // Generation routes
    let generate_routes = Router::new()
        .route("/", post(generate::generate_batch))
        .route("/custom", post(generate::generate_custom))
        .route("/personal", post(generate::generate_personal));

    // API v1 routes
    let api_v1 = Router::new()
        .route("/analyze", post(analyze::analyze))
        .nest("/clients/:client_id/templates", template_routes)
        .nest("/clients/:client_id/generate", generate_routes)
        .with_state(state);

    // OpenAPI documentation routes
    let openapi_routes = create_openapi_routes();

    // Combine all routes
    Router::new()
        .nest("/health", health_routes)
        .nest("/api/v1", api_v1)
        .merge(openapi_routes)
        .layer(TraceLayer::new_for_http())
}
