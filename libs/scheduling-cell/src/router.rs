use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put, delete},
};

use shared_config::AppConfig;

use crate::handlers;

pub fn scheduling_routes(state: Arc<AppConfig>) -> Router {
    // Availability and schedule reads are public
    let public_routes = Router::new()
        .route("/availability/overview", get(handlers::get_availability_overview))
        .route("/{provider_id}/availability", get(handlers::get_provider_availability))
        .route("/{provider_id}/schedule", get(handlers::get_provider_schedule));

    // Schedule management forwards the caller's bearer token to the storage
    // layer, which enforces row-level access
    let management_routes = Router::new()
        .route("/{provider_id}/schedule", post(handlers::create_schedule_window))
        .route("/{provider_id}/schedule/{window_id}", put(handlers::update_schedule_window))
        .route("/{provider_id}/schedule/{window_id}", delete(handlers::delete_schedule_window));

    Router::new()
        .merge(public_routes)
        .merge(management_routes)
        .with_state(state)
}
